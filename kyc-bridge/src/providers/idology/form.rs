//! `application/x-www-form-urlencoded` request body.
//!
//! Fields are described by a static `(name, accessor)` table; a field whose
//! accessor yields nothing (or only whitespace) is left out of the body.

use chrono::Datelike;

use super::IdologyConfig;
use crate::model::CustomerRecord;

/// Everything the form is built from.
#[derive(Debug, Clone, Copy)]
pub struct FormSource<'a> {
    /// Account credentials.
    pub config: &'a IdologyConfig,
    /// Customer being verified.
    pub customer: &'a CustomerRecord,
    /// Number of the selected identity document, possibly empty.
    pub document_number: &'a str,
}

type Accessor = fn(&FormSource<'_>) -> Option<String>;

/// Form fields in submission order.
pub const FIELDS: &[(&str, Accessor)] = &[
    ("username", |s| Some(s.config.username.clone())),
    ("password", |s| Some(s.config.password.clone())),
    ("firstName", |s| Some(s.customer.first_name.clone())),
    ("lastName", |s| Some(s.customer.last_name.clone())),
    ("address", street_line),
    ("city", |s| s.customer.address.as_ref()?.city.clone()),
    ("state", |s| s.customer.address.as_ref()?.state.clone()),
    ("zip", |s| s.customer.address.as_ref()?.postal_code.clone()),
    ("country", |s| Some(s.customer.address.as_ref()?.country_alpha2.clone())),
    ("dobMonth", |s| s.customer.date_of_birth.map(|date| date.month().to_string())),
    ("dobDay", |s| s.customer.date_of_birth.map(|date| date.day().to_string())),
    ("dobYear", |s| s.customer.date_of_birth.map(|date| date.year().to_string())),
    ("email", |s| s.customer.contact.email.clone()),
    ("telephone", |s| s.customer.contact.phone.clone()),
    ("idNumber", |s| Some(s.document_number.to_owned())),
];

fn street_line(source: &FormSource<'_>) -> Option<String> {
    let address = source.customer.address.as_ref()?;
    let parts = [
        address.building_number.as_deref(),
        address.street.as_deref(),
        address.flat_number.as_deref(),
    ];
    let line = parts
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    Some(line)
}

/// Encodes the form body.
#[must_use]
pub fn encode(source: &FormSource<'_>) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (name, accessor) in FIELDS {
        if let Some(value) = accessor(source) {
            let value = value.trim();
            if !value.is_empty() {
                serializer.append_pair(name, value);
            }
        }
    }
    serializer.finish()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::model::{Address, ContactInfo};

    fn config() -> IdologyConfig {
        IdologyConfig {
            host: "https://web.idologylive.com/api/idiq.svc".to_owned(),
            username: "acme".to_owned(),
            password: "s3cret&more".to_owned(),
        }
    }

    #[test]
    fn test_full_form() {
        let customer = CustomerRecord {
            first_name: "John".to_owned(),
            last_name: "Smith".to_owned(),
            date_of_birth: NaiveDate::from_ymd_opt(1975, 2, 28),
            address: Some(Address {
                country_alpha2: "US".to_owned(),
                state: Some("GA".to_owned()),
                city: Some("Atlanta".to_owned()),
                postal_code: Some("30318".to_owned()),
                street: Some("Main St".to_owned()),
                building_number: Some("222333".to_owned()),
                flat_number: None,
            }),
            contact: ContactInfo { email: Some("john@example.com".to_owned()), phone: None },
            ..Default::default()
        };
        let config = config();
        let source = FormSource { config: &config, customer: &customer, document_number: "" };

        assert_eq!(
            encode(&source),
            "username=acme&password=s3cret%26more&firstName=John&lastName=Smith\
             &address=222333+Main+St&city=Atlanta&state=GA&zip=30318&country=US\
             &dobMonth=2&dobDay=28&dobYear=1975&email=john%40example.com"
        );
    }

    #[test]
    fn test_blank_values_are_skipped() {
        let customer = CustomerRecord {
            first_name: "Jane".to_owned(),
            last_name: "  ".to_owned(),
            ..Default::default()
        };
        let config = config();
        let source = FormSource { config: &config, customer: &customer, document_number: "X-9" };

        assert_eq!(encode(&source), "username=acme&password=s3cret%26more&firstName=Jane&idNumber=X-9");
    }

    #[test]
    fn test_field_names_are_unique() {
        let mut names: Vec<&str> = FIELDS.iter().map(|(name, _)| *name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), FIELDS.len());
    }
}

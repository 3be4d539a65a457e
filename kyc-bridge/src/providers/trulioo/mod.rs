//! Trulioo GlobalGateway adapter.
//!
//! Single-shot verification with HTTP basic authentication. The response
//! carries per-datasource results, which are aggregated into reasons when
//! the record does not match. Trulioo has no status polling.

pub mod models;
pub mod normalize;

use std::fmt;

use chrono::Datelike;
use serde::Deserialize;
use tracing::{info, instrument};

use self::{
    models::{Communication, DataFields, Document, Location, PersonInfo, VerifyRequest},
    normalize::TruliooNormalizer,
};
use crate::{
    config::{require, validate_host},
    documents::{TableTagger, select_identity_document},
    error::{KycError, Result},
    model::{CustomerRecord, DocumentKind, Gender, VerificationOutcome},
    normalize::{NormalizeContext, ResponseNormalizer},
    providers::{Provider, ProviderKind, endpoint, ensure_customer},
    transport::{HttpRequest, Transport},
};

/// Document type tags understood by Trulioo.
const DOCUMENT_TYPES: &[(DocumentKind, &str)] = &[
    (DocumentKind::Passport, "Passport"),
    (DocumentKind::DriverLicense, "DrivingLicence"),
    (DocumentKind::NationalIdCard, "IdentityCard"),
];

fn default_configuration_name() -> String {
    "Identity Verification".to_owned()
}

/// Trulioo credentials and host.
#[derive(Clone, Deserialize)]
pub struct TruliooConfig {
    /// API base URL.
    pub host: String,
    /// API username.
    pub username: String,
    /// API password.
    pub password: String,
    /// Account configuration to verify against.
    #[serde(default = "default_configuration_name")]
    pub configuration_name: String,
}

impl TruliooConfig {
    /// Validates host and credentials.
    ///
    /// # Errors
    ///
    /// Returns [`KycError::Config`] for a non-HTTPS or loopback host and for
    /// empty credentials.
    pub fn validate(&self) -> Result<()> {
        validate_host("trulioo", &self.host)?;
        require("trulioo", "username", &self.username)?;
        require("trulioo", "password", &self.password)?;
        require("trulioo", "configuration_name", &self.configuration_name)
    }
}

impl fmt::Debug for TruliooConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TruliooConfig")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("configuration_name", &self.configuration_name)
            .finish()
    }
}

/// Trulioo adapter over any [`Transport`].
#[derive(Debug)]
pub struct TruliooProvider<T> {
    config: TruliooConfig,
    transport: T,
}

impl<T: Transport> TruliooProvider<T> {
    /// Creates an adapter.
    #[must_use]
    pub fn new(config: TruliooConfig, transport: T) -> Self {
        Self { config, transport }
    }

    #[instrument(skip_all, fields(provider = "trulioo"))]
    async fn verify(&self, customer: &CustomerRecord) -> Result<VerificationOutcome> {
        ensure_customer(customer)?;

        let body = verify_request(&self.config.configuration_name, customer)?;
        let request =
            HttpRequest::post_json(endpoint(&self.config.host, "/verifications/v1/verify"), &body)?
                .with_basic_auth(&self.config.username, &self.config.password);

        let response = self.transport.send(request).await?;
        let outcome =
            TruliooNormalizer.normalize(&response, &NormalizeContext::new(ProviderKind::Trulioo))?;

        info!(status = ?outcome.status, reasons = outcome.reasons.len(), "trulioo check completed");
        Ok(outcome)
    }
}

/// Builds the verify request.
///
/// # Errors
///
/// Returns [`KycError::InvalidInput`] when the customer has no country.
pub fn verify_request<'a>(
    configuration_name: &'a str,
    customer: &'a CustomerRecord,
) -> Result<VerifyRequest<'a>> {
    let country_code = customer
        .country()
        .filter(|country| !country.trim().is_empty())
        .map(|country| country.trim().to_ascii_uppercase())
        .ok_or_else(|| KycError::InvalidInput("Trulioo requires a country".to_owned()))?;

    let identity = select_identity_document(customer, &TableTagger::new(DOCUMENT_TYPES));
    let document = identity.file.map(|front| Document {
        document_front_image: front.payload_base64,
        document_back_image: identity.back.map(|back| back.payload_base64),
        document_type: front.tag,
    });

    let person_info = PersonInfo {
        first_given_name: &customer.first_name,
        middle_name: customer.middle_name.as_deref(),
        first_sur_name: &customer.last_name,
        day_of_birth: customer.date_of_birth.map(|date| date.day()),
        month_of_birth: customer.date_of_birth.map(|date| date.month()),
        year_of_birth: customer.date_of_birth.map(|date| date.year()),
        gender: customer.gender.map(|gender| match gender {
            Gender::Male => "M",
            Gender::Female => "F",
        }),
    };

    let location = customer.address.as_ref().map(|address| Location {
        building_number: address.building_number.as_deref(),
        unit_number: address.flat_number.as_deref(),
        street_name: address.street.as_deref(),
        city: address.city.as_deref(),
        state_province_code: address.state.as_deref(),
        postal_code: address.postal_code.as_deref(),
    });

    let contact = &customer.contact;
    let communication = (contact.email.is_some() || contact.phone.is_some()).then(|| Communication {
        email_address: contact.email.as_deref(),
        telephone: contact.phone.as_deref(),
    });

    Ok(VerifyRequest {
        accept_trulioo_terms_and_conditions: true,
        configuration_name,
        country_code,
        data_fields: DataFields { person_info, location, communication, document },
    })
}

impl<T: Transport> Provider for TruliooProvider<T> {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Trulioo
    }

    async fn check_customer<'a>(
        &'a self,
        customer: &'a CustomerRecord,
    ) -> Result<VerificationOutcome> {
        self.verify(customer).await
    }

    async fn check_status<'a>(&'a self, _reference_id: &'a str) -> Result<VerificationOutcome> {
        Err(KycError::UnsupportedOperation {
            provider: ProviderKind::Trulioo,
            operation: "check_status",
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::model::{Address, DocumentFile, DocumentImage, DocumentProof};

    fn customer() -> CustomerRecord {
        CustomerRecord {
            first_name: "Jane".to_owned(),
            last_name: "Roe".to_owned(),
            date_of_birth: NaiveDate::from_ymd_opt(1988, 7, 14),
            gender: Some(Gender::Female),
            address: Some(Address {
                country_alpha2: "ca".to_owned(),
                city: Some("Toronto".to_owned()),
                postal_code: Some("M5V 2T6".to_owned()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_verify_request_shape() {
        let customer = customer();
        let body = serde_json::to_value(verify_request("Identity Verification", &customer).unwrap())
            .unwrap();

        assert_eq!(body["AcceptTruliooTermsAndConditions"], true);
        assert_eq!(body["CountryCode"], "CA");
        let person = &body["DataFields"]["PersonInfo"];
        assert_eq!(person["FirstGivenName"], "Jane");
        assert_eq!(person["FirstSurName"], "Roe");
        assert_eq!(person["DayOfBirth"], 14);
        assert_eq!(person["MonthOfBirth"], 7);
        assert_eq!(person["YearOfBirth"], 1988);
        assert_eq!(person["Gender"], "F");
        assert_eq!(body["DataFields"]["Location"]["PostalCode"], "M5V 2T6");
        assert!(body["DataFields"].get("Communication").is_none());
        assert!(body["DataFields"].get("Document").is_none());
    }

    #[test]
    fn test_driver_license_uses_vendor_tag() {
        let customer = CustomerRecord {
            driver_license: Some(DocumentProof {
                number: "D-1".to_owned(),
                image: Some(DocumentImage {
                    front: DocumentFile::new("image/jpeg", b"f".to_vec()),
                    back: Some(DocumentFile::new("image/jpeg", b"b".to_vec())),
                }),
                ..Default::default()
            }),
            ..customer()
        };

        let body = serde_json::to_value(verify_request("cfg", &customer).unwrap()).unwrap();
        let document = &body["DataFields"]["Document"];
        assert_eq!(document["DocumentType"], "DrivingLicence");
        assert_eq!(document["DocumentFrontImage"], "Zg==");
        assert_eq!(document["DocumentBackImage"], "Yg==");
    }

    #[test]
    fn test_translation_is_not_submitted() {
        let customer = CustomerRecord {
            driver_license_translation: Some(DocumentProof {
                number: "T-1".to_owned(),
                image: Some(DocumentImage {
                    front: DocumentFile::new("image/png", b"t".to_vec()),
                    back: None,
                }),
                ..Default::default()
            }),
            ..customer()
        };

        let body = serde_json::to_value(verify_request("cfg", &customer).unwrap()).unwrap();
        assert!(body["DataFields"].get("Document").is_none());
    }

    #[test]
    fn test_missing_country_is_invalid_input() {
        let customer = CustomerRecord { address: None, nationality: None, ..customer() };
        let err = verify_request("cfg", &customer).unwrap_err();
        assert!(matches!(err, KycError::InvalidInput(_)));
    }
}

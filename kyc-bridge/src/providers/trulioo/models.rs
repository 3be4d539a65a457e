//! Trulioo GlobalGateway wire models (PascalCase JSON).

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::normalize::{ErrorBody, SourceReport};

/// `POST /verifications/v1/verify` body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VerifyRequest<'a> {
    /// Always true; required by the API.
    pub accept_trulioo_terms_and_conditions: bool,
    /// Account configuration to verify against.
    pub configuration_name: &'a str,
    /// Country of verification (alpha-2).
    pub country_code: String,
    /// Customer data.
    pub data_fields: DataFields<'a>,
}

/// Customer data grouped the way the API expects it.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DataFields<'a> {
    /// Personal details.
    pub person_info: PersonInfo<'a>,
    /// Address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location<'a>>,
    /// Contact details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub communication: Option<Communication<'a>>,
    /// Identity document scans.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<Document>,
}

/// Personal details.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PersonInfo<'a> {
    /// Given name.
    pub first_given_name: &'a str,
    /// Middle name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<&'a str>,
    /// Family name.
    pub first_sur_name: &'a str,
    /// Day of birth.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day_of_birth: Option<u32>,
    /// Month of birth.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month_of_birth: Option<u32>,
    /// Year of birth.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_of_birth: Option<i32>,
    /// `M` or `F`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<&'static str>,
}

/// Address.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Location<'a> {
    /// Building number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_number: Option<&'a str>,
    /// Flat or unit number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_number: Option<&'a str>,
    /// Street name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_name: Option<&'a str>,
    /// City.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<&'a str>,
    /// State or province code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_province_code: Option<&'a str>,
    /// Postal code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<&'a str>,
}

/// Contact details.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Communication<'a> {
    /// E-mail address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<&'a str>,
    /// Phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telephone: Option<&'a str>,
}

/// Identity document scans, base64-encoded.
#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Document {
    /// Front side.
    pub document_front_image: String,
    /// Back side.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_back_image: Option<String>,
    /// Document type tag.
    pub document_type: String,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("document_type", &self.document_type)
            .field("has_back_image", &self.document_back_image.is_some())
            .finish_non_exhaustive()
    }
}

/// `{"Message": "..."}` error body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TruliooError {
    /// Human-readable message.
    pub message: Option<String>,
}

impl ErrorBody for TruliooError {
    fn into_message(self) -> Option<String> {
        self.message
    }
}

/// Verification result.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct VerifyResult {
    /// Transaction identifier.
    #[serde(rename = "TransactionID")]
    pub transaction_id: Option<String>,
    /// Request-level errors.
    pub errors: Vec<ServiceError>,
    /// Verification record.
    pub record: Option<Record>,
}

/// Verification record.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Record {
    /// Record identifier, used as the reference.
    #[serde(rename = "TransactionRecordID")]
    pub transaction_record_id: Option<String>,
    /// `match` or `nomatch`.
    pub record_status: String,
    /// Per-datasource results.
    pub datasource_results: Vec<DatasourceResult>,
    /// Record-level errors.
    pub errors: Vec<ServiceError>,
}

/// One datasource sub-result.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DatasourceResult {
    /// Datasource name.
    pub datasource_name: String,
    /// Datasource-level status.
    pub datasource_status: Option<String>,
    /// Per-field statuses.
    pub datasource_fields: Vec<DatasourceField>,
    /// Datasource errors.
    pub errors: Vec<ServiceError>,
}

impl DatasourceResult {
    /// View for reason aggregation.
    #[must_use]
    pub fn report(&self) -> SourceReport<'_> {
        SourceReport {
            name: &self.datasource_name,
            status: self.datasource_status.as_deref().unwrap_or_default(),
            fields: self
                .datasource_fields
                .iter()
                .map(|field| (field.field_name.as_str(), field.status.as_str()))
                .collect(),
            errors: self.errors.iter().map(ServiceError::text).collect(),
        }
    }
}

/// Field-level status.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DatasourceField {
    /// Field name.
    pub field_name: String,
    /// Field status.
    pub status: String,
}

/// Error entry.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ServiceError {
    /// Vendor error code.
    pub code: String,
    /// Message.
    pub message: String,
}

impl ServiceError {
    /// Message, or the code when the message is empty.
    #[must_use]
    pub fn text(&self) -> &str {
        if self.message.is_empty() { &self.code } else { &self.message }
    }

    /// `"<code>: <message>"`.
    #[must_use]
    pub fn describe(&self) -> String {
        match (self.code.is_empty(), self.message.is_empty()) {
            (false, false) => format!("{}: {}", self.code, self.message),
            (true, _) => self.message.clone(),
            (false, true) => self.code.clone(),
        }
    }
}

/// Record status vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStatus {
    /// Identity matched.
    Match,
    /// Identity did not match.
    NoMatch,
}

impl RecordStatus {
    /// Every status value.
    pub const ALL: [Self; 2] = [Self::Match, Self::NoMatch];

    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Match => "match",
            Self::NoMatch => "nomatch",
        }
    }
}

impl FromStr for RecordStatus {
    type Err = ();

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        Self::ALL.into_iter().find(|status| status.as_str().eq_ignore_ascii_case(raw)).ok_or(())
    }
}

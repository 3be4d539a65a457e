//! Coinfirm wire models.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{documents::SelectedFile, normalize::ErrorBody};

/// `POST /auth/login` body.
#[derive(Serialize)]
pub struct LoginRequest<'a> {
    /// Account e-mail.
    pub email: &'a str,
    /// Account password.
    pub password: &'a str,
}

impl fmt::Debug for LoginRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest").field("email", &self.email).finish_non_exhaustive()
    }
}

/// `POST /auth/login` response.
#[derive(Deserialize)]
pub struct LoginResponse {
    /// Session token.
    pub token: String,
}

impl fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginResponse").field("token", &"[REDACTED]").finish()
    }
}

/// Error body returned on non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct CoinfirmError {
    /// Human-readable message.
    #[serde(alias = "message")]
    pub error: Option<String>,
}

impl ErrorBody for CoinfirmError {
    fn into_message(self) -> Option<String> {
        self.error
    }
}

/// `POST /kyc/customers` body.
#[derive(Debug, Serialize)]
pub struct CustomerRequest<'a> {
    /// `individual` or `company`.
    #[serde(rename = "type")]
    pub customer_type: &'static str,
    /// Natural person details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub individual: Option<Individual<'a>>,
    /// Legal entity details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<Company<'a>>,
    /// Attached files.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<FileUpload>,
}

/// Natural person section.
#[derive(Debug, Serialize)]
pub struct Individual<'a> {
    /// Given name.
    pub first_name: &'a str,
    /// Middle name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<&'a str>,
    /// Family name.
    pub last_name: &'a str,
    /// Date of birth, `YYYY-MM-DD`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    /// Nationality (alpha-2).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationality: Option<&'a str>,
    /// Contact e-mail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'a str>,
    /// Contact phone.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<&'a str>,
    /// Country of residence (alpha-2).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<&'a str>,
    /// Single-line address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Number of the submitted identity document.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id_number: String,
    /// Client IP address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<&'a str>,
}

/// Legal entity section.
#[derive(Debug, Serialize)]
pub struct Company<'a> {
    /// Registered name.
    pub name: &'a str,
    /// Registration number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<&'a str>,
    /// Country of registration (alpha-2).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<&'a str>,
}

/// One attached file.
#[derive(Debug, Serialize)]
pub struct FileUpload {
    /// File category tag.
    #[serde(rename = "type")]
    pub file_type: String,
    /// Normalized extension.
    pub extension: String,
    /// Base64 payload.
    pub content: String,
}

impl From<SelectedFile> for FileUpload {
    fn from(file: SelectedFile) -> Self {
        Self { file_type: file.tag, extension: file.extension, content: file.payload_base64 }
    }
}

/// Case state returned by both `POST /kyc/customers` and `GET /kyc/status/{uuid}`.
#[derive(Debug, Deserialize)]
pub struct CaseState {
    /// Case identifier.
    pub uuid: Option<String>,
    /// Raw status value.
    pub current_status: String,
}

/// Coinfirm case status vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoinfirmStatus {
    /// Case created, not yet processed.
    New,
    /// Screening in progress.
    InProgress,
    /// Data missing; resubmission required.
    Incomplete,
    /// Low risk.
    Low,
    /// Medium risk.
    Medium,
    /// High risk.
    High,
    /// Unacceptable risk.
    Fail,
}

impl CoinfirmStatus {
    /// Every status value.
    pub const ALL: [Self; 7] = [
        Self::New,
        Self::InProgress,
        Self::Incomplete,
        Self::Low,
        Self::Medium,
        Self::High,
        Self::Fail,
    ];

    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProgress => "inprogress",
            Self::Incomplete => "incomplete",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Fail => "fail",
        }
    }
}

impl FromStr for CoinfirmStatus {
    type Err = ();

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        Self::ALL.into_iter().find(|status| status.as_str().eq_ignore_ascii_case(raw)).ok_or(())
    }
}

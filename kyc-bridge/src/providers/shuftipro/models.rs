//! Shufti Pro wire models.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::normalize::ErrorBody;

/// `POST /` verification body.
#[derive(Debug, Serialize)]
pub struct VerificationRequest<'a> {
    /// Caller-chosen unique reference.
    pub reference: String,
    /// Country of verification (alpha-2).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Interface language.
    pub language: &'a str,
    /// Customer e-mail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'a str>,
    /// Where Shufti Pro posts status changes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<&'a str>,
    /// Identity document service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<DocumentService<'a>>,
    /// Address service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<AddressService<'a>>,
    /// Face service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub face: Option<FaceService>,
}

/// Name block expected by the document and address services.
#[derive(Debug, Serialize)]
pub struct Name<'a> {
    /// Given name.
    pub first_name: &'a str,
    /// Middle name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<&'a str>,
    /// Family name.
    pub last_name: &'a str,
}

/// Identity document service.
#[derive(Serialize)]
pub struct DocumentService<'a> {
    /// Front side as a data URI.
    pub proof: String,
    /// Back side as a data URI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_proof: Option<String>,
    /// Accepted document types.
    pub supported_types: Vec<String>,
    /// Name to match against the document.
    pub name: Name<'a>,
    /// Date of birth to match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<NaiveDate>,
    /// Document number to match.
    #[serde(skip_serializing_if = "str::is_empty")]
    pub document_number: &'a str,
    /// Expiry date to match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
    /// Issue date to match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<NaiveDate>,
}

impl fmt::Debug for DocumentService<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentService")
            .field("supported_types", &self.supported_types)
            .field("has_additional_proof", &self.additional_proof.is_some())
            .finish_non_exhaustive()
    }
}

/// Address service.
#[derive(Serialize)]
pub struct AddressService<'a> {
    /// Proof of address as a data URI.
    pub proof: String,
    /// Accepted document types.
    pub supported_types: Vec<String>,
    /// Address to match.
    pub full_address: String,
    /// Name to match.
    pub name: Name<'a>,
}

impl fmt::Debug for AddressService<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddressService")
            .field("supported_types", &self.supported_types)
            .finish_non_exhaustive()
    }
}

/// Face service.
#[derive(Serialize)]
pub struct FaceService {
    /// Selfie as a data URI.
    pub proof: String,
}

impl fmt::Debug for FaceService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaceService").finish_non_exhaustive()
    }
}

/// `POST /status` body.
#[derive(Debug, Serialize)]
pub struct StatusRequest<'a> {
    /// Reference of the original request.
    pub reference: &'a str,
}

/// Event-carrying response to both verification and status requests.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EventResponse {
    /// Echoed reference.
    pub reference: Option<String>,
    /// Event name, e.g. `verification.accepted`.
    pub event: String,
    /// Error details for `request.*` failure events.
    pub error: Option<ServiceError>,
    /// Reason given with `verification.declined`.
    pub declined_reason: Option<String>,
}

/// Error payload, either structured or a plain string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ServiceError {
    /// `{"service", "key", "message"}`.
    Detailed {
        /// Service that failed (`document`, `face`, ...).
        #[serde(default)]
        service: String,
        /// Offending field.
        #[serde(default)]
        key: String,
        /// Human-readable message.
        #[serde(default)]
        message: String,
    },
    /// Plain message.
    Message(String),
}

impl ServiceError {
    /// Human-readable text.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Detailed { message, key, .. } => {
                if message.is_empty() { key } else { message }
            },
            Self::Message(message) => message,
        }
    }
}

/// `{"error": ...}` body returned on non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ShuftiProError {
    /// Error payload.
    pub error: Option<ServiceError>,
}

impl ErrorBody for ShuftiProError {
    fn into_message(self) -> Option<String> {
        self.error.map(|error| error.message().to_owned())
    }
}

/// Event vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShuftiProEvent {
    /// Request created, customer has not finished.
    RequestPending,
    /// Request received, processing.
    RequestReceived,
    /// Status changed by a back-office reviewer.
    StatusChanged,
    /// Verified.
    Accepted,
    /// Not verified.
    Declined,
    /// Request parameters rejected.
    RequestInvalid,
    /// Customer did not finish in time.
    RequestTimeout,
    /// Credentials rejected.
    RequestUnauthorized,
    /// Request deleted.
    RequestDeleted,
    /// Cancelled by the customer.
    Cancelled,
}

impl ShuftiProEvent {
    /// Every event.
    pub const ALL: [Self; 10] = [
        Self::RequestPending,
        Self::RequestReceived,
        Self::StatusChanged,
        Self::Accepted,
        Self::Declined,
        Self::RequestInvalid,
        Self::RequestTimeout,
        Self::RequestUnauthorized,
        Self::RequestDeleted,
        Self::Cancelled,
    ];

    /// Wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RequestPending => "request.pending",
            Self::RequestReceived => "request.received",
            Self::StatusChanged => "verification.status.changed",
            Self::Accepted => "verification.accepted",
            Self::Declined => "verification.declined",
            Self::RequestInvalid => "request.invalid",
            Self::RequestTimeout => "request.timeout",
            Self::RequestUnauthorized => "request.unauthorized",
            Self::RequestDeleted => "request.deleted",
            Self::Cancelled => "verification.cancelled",
        }
    }
}

impl FromStr for ShuftiProEvent {
    type Err = ();

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        Self::ALL.into_iter().find(|event| event.as_str().eq_ignore_ascii_case(raw)).ok_or(())
    }
}

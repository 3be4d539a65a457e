//! Error types for the KYC bridge.
//!
//! This module defines all error types that can occur while driving a
//! verification provider. All errors implement the standard
//! [`std::error::Error`] trait via [`thiserror::Error`].
//!
//! # Error Categories
//!
//! - **Transport Errors** ([`KycError::Transport`]): no HTTP response was obtained
//! - **Provider Errors** ([`KycError::Provider`]): the vendor answered with a non-success
//!   status or a body that could not be understood
//! - **Capability Errors** ([`KycError::UnsupportedOperation`]): the adapter cannot perform
//!   the requested operation
//! - **Validation Errors** ([`KycError::InvalidInput`], [`KycError::Config`]): bad input or
//!   configuration, detected before any network activity
//!
//! A vendor answer with an unrecognized status value is *not* an error at this
//! level: normalizers turn it into an outcome with
//! [`VerificationStatus::Error`](crate::model::VerificationStatus::Error).
//!
//! # Examples
//!
//! ```
//! use kyc_bridge::error::{KycError, ProviderError};
//!
//! let err = KycError::Provider(ProviderError::new(Some(400), "Invalid email or password"));
//! assert_eq!(err.http_status(), Some(400));
//!
//! let outcome = err.to_outcome();
//! assert_eq!(outcome.reasons, vec!["Invalid email or password".to_owned()]);
//! ```

use std::fmt;

use thiserror::Error;

use crate::{
    model::{Finality, VerificationOutcome, VerificationStatus},
    providers::ProviderKind,
};

/// Result type alias for bridge operations.
///
/// All fallible functions in this crate return this type.
pub type Result<T> = std::result::Result<T, KycError>;

/// Generic message used when a vendor error body cannot be parsed.
pub const GENERIC_HTTP_ERROR: &str = "http error";

/// Failure reported by a vendor over HTTP.
///
/// `http_status` is `None` only when the failure happened before any
/// response was received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    /// HTTP status code returned by the vendor, if any.
    pub http_status: Option<u16>,
    /// Vendor message, or [`GENERIC_HTTP_ERROR`] when the body was unreadable.
    pub message: String,
}

impl ProviderError {
    /// Creates a provider error.
    #[must_use]
    pub fn new(http_status: Option<u16>, message: impl Into<String>) -> Self {
        Self { http_status, message: message.into() }
    }

    /// Creates the fallback error used when a vendor body cannot be parsed.
    #[must_use]
    pub fn generic(http_status: u16) -> Self {
        Self::new(Some(http_status), GENERIC_HTTP_ERROR)
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.http_status {
            Some(status) => write!(f, "{} (http status {status})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Errors that can occur in the KYC bridge.
///
/// # Error Recovery
///
/// - **Transient errors** ([`Transport`](Self::Transport)): the caller may retry; the
///   bridge itself never does
/// - **Vendor errors** ([`Provider`](Self::Provider)): inspect the message; a 401 usually
///   means credentials or the session token were rejected
/// - **Validation errors** ([`InvalidInput`](Self::InvalidInput),
///   [`Config`](Self::Config)): fix the input and call again
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum KycError {
    /// No HTTP response was obtained (DNS, connection refused, timeout).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The vendor returned a non-success status or an unreadable body.
    #[error("provider error: {0}")]
    Provider(ProviderError),

    /// The adapter does not implement the requested operation.
    ///
    /// Returned by `check_status` on vendors that only offer single-shot
    /// verification.
    #[error("{provider} does not support {operation}")]
    UnsupportedOperation {
        /// Provider that was asked.
        provider: ProviderKind,
        /// Name of the unsupported operation.
        operation: &'static str,
    },

    /// The customer record or another argument was rejected before any
    /// network activity.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Configuration could not be loaded or failed validation.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A request body could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No configured provider serves the customer's jurisdiction.
    #[error("no provider configured for {0}")]
    NoProviderFor(String),
}

impl KycError {
    /// Returns the HTTP status preserved from the vendor response, if any.
    #[must_use]
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Provider(err) => err.http_status,
            _ => None,
        }
    }

    /// Folds this error into a canonical [`VerificationStatus::Error`] outcome.
    ///
    /// The reason carries the vendor or transport message verbatim and the
    /// HTTP status, when present, becomes the outcome's error code.
    pub fn to_outcome(&self) -> VerificationOutcome {
        let (reason, error_code) = match self {
            Self::Provider(err) => (err.message.clone(), err.http_status.map(|s| s.to_string())),
            Self::Transport(message) => (message.clone(), None),
            other => (other.to_string(), None),
        };

        VerificationOutcome {
            status: VerificationStatus::Error,
            reasons: vec![reason],
            finality: Finality::Unknown,
            reference_id: None,
            error_code,
            status_check: None,
        }
    }
}

impl From<ProviderError> for KycError {
    fn from(err: ProviderError) -> Self {
        Self::Provider(err)
    }
}

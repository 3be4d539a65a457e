//! Shared result-normalization contract.
//!
//! Every provider owns a normalizer that turns a raw [`TransportResponse`]
//! into a [`VerificationOutcome`]. The helpers here implement the rules all
//! vendors share:
//!
//! - a non-2xx response is decoded as the vendor's error body; its message
//!   becomes a [`ProviderError`] with the HTTP status preserved, or
//!   [`GENERIC_HTTP_ERROR`] when the body cannot be read
//! - a 2xx response whose body cannot be parsed is also [`GENERIC_HTTP_ERROR`]
//! - a status value outside the vendor vocabulary becomes an
//!   [`VerificationStatus::Error`](crate::model::VerificationStatus::Error)
//!   outcome naming the raw value
//! - per-datasource sub-results are folded into one reason line each
//!
//! [`GENERIC_HTTP_ERROR`]: crate::error::GENERIC_HTTP_ERROR

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::{
    error::{KycError, ProviderError, Result},
    model::{StatusCheck, VerificationOutcome},
    providers::ProviderKind,
    transport::TransportResponse,
};

/// Everything a normalizer needs besides the response itself.
///
/// The check timestamp is supplied by the caller so normalization stays a
/// pure function of its inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeContext {
    /// Provider that produced the response.
    pub provider: ProviderKind,
    /// Reference already known before the call (status polling).
    pub reference_id: Option<String>,
    /// Time of this check.
    pub checked_at: DateTime<Utc>,
}

impl NormalizeContext {
    /// Context for a check performed now.
    #[must_use]
    pub fn new(provider: ProviderKind) -> Self {
        Self { provider, reference_id: None, checked_at: Utc::now() }
    }

    /// Sets the known vendor reference.
    #[must_use]
    pub fn with_reference(mut self, reference_id: impl Into<String>) -> Self {
        self.reference_id = Some(reference_id.into());
        self
    }

    /// Overrides the check timestamp.
    #[must_use]
    pub fn at(mut self, checked_at: DateTime<Utc>) -> Self {
        self.checked_at = checked_at;
        self
    }

    /// Picks the reference reported by the vendor, falling back to the known one.
    #[must_use]
    pub fn reference_or<'a>(&'a self, reported: Option<&'a str>) -> Option<&'a str> {
        reported.filter(|id| !id.is_empty()).or(self.reference_id.as_deref())
    }

    /// Builds an [`Unclear`](crate::model::VerificationStatus::Unclear) outcome
    /// that can be polled with `check_status`.
    ///
    /// Without any reference there is nothing to poll, so the result is an
    /// error outcome instead.
    #[must_use]
    pub fn pending(&self, reported: Option<&str>) -> VerificationOutcome {
        match self.reference_or(reported) {
            Some(reference_id) => VerificationOutcome::unclear(StatusCheck {
                provider: self.provider,
                reference_id: reference_id.to_owned(),
                last_check: self.checked_at,
            }),
            None => VerificationOutcome::error(format!(
                "{} reported a pending check without a reference",
                self.provider
            )),
        }
    }
}

/// Converts a vendor response into a canonical outcome.
///
/// Implementations are pure: the same response and context always give the
/// same outcome.
pub trait ResponseNormalizer {
    /// Normalizes one response.
    ///
    /// # Errors
    ///
    /// Returns [`KycError::Provider`] for non-2xx statuses and unreadable
    /// bodies. Unrecognized vendor states are *not* errors; they produce an
    /// outcome with status `Error`.
    fn normalize(
        &self,
        response: &TransportResponse,
        context: &NormalizeContext,
    ) -> Result<VerificationOutcome>;
}

/// A vendor error body that may carry a human-readable message.
pub trait ErrorBody: DeserializeOwned {
    /// Extracts the message, if any.
    fn into_message(self) -> Option<String>;
}

/// Outcome for a vendor status value outside the known vocabulary.
///
/// # Examples
///
/// ```
/// use kyc_bridge::{model::VerificationStatus, normalize::unexpected_state};
///
/// let outcome = unexpected_state("current_status", "frozen");
/// assert_eq!(outcome.status, VerificationStatus::Error);
/// assert!(outcome.reasons[0].contains("frozen"));
/// ```
#[must_use]
pub fn unexpected_state(field: &str, raw: &str) -> VerificationOutcome {
    VerificationOutcome::error(format!("unexpected {field} value: {raw:?}"))
}

/// Builds the error for a non-2xx response from an optional vendor message.
pub fn http_failure(status: u16, message: Option<String>) -> KycError {
    match message.map(|m| m.trim().to_owned()).filter(|m| !m.is_empty()) {
        Some(message) => ProviderError::new(Some(status), message).into(),
        None => ProviderError::generic(status).into(),
    }
}

/// Decodes a JSON response: the success shape on 2xx, the error shape otherwise.
///
/// # Errors
///
/// Returns [`KycError::Provider`] with the vendor message (or
/// [`GENERIC_HTTP_ERROR`]) for non-2xx statuses, and [`GENERIC_HTTP_ERROR`]
/// for 2xx bodies that do not match `T`.
///
/// [`GENERIC_HTTP_ERROR`]: crate::error::GENERIC_HTTP_ERROR
pub fn decode_json<T, E>(response: &TransportResponse) -> Result<T>
where
    T: DeserializeOwned,
    E: ErrorBody,
{
    if !response.is_success() {
        let message = serde_json::from_slice::<E>(&response.body).ok().and_then(E::into_message);
        return Err(http_failure(response.status, message));
    }

    serde_json::from_slice(&response.body).map_err(|e| {
        warn!(status = response.status, error = %e, "unreadable response body");
        ProviderError::generic(response.status).into()
    })
}

/// One per-datasource sub-result reported by a vendor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceReport<'a> {
    /// Datasource name.
    pub name: &'a str,
    /// Datasource-level status, possibly empty.
    pub status: &'a str,
    /// Per-field `(field, status)` pairs, in vendor order.
    pub fields: Vec<(&'a str, &'a str)>,
    /// Error messages, in vendor order.
    pub errors: Vec<&'a str>,
}

impl SourceReport<'_> {
    /// Returns true when the sub-result carries nothing worth reporting.
    #[must_use]
    pub fn is_silent(&self) -> bool {
        self.status.is_empty() && self.fields.is_empty() && self.errors.iter().all(|e| e.is_empty())
    }

    /// Renders the reason line, or `None` for silent sub-results.
    #[must_use]
    pub fn reason_line(&self) -> Option<String> {
        if self.is_silent() {
            return None;
        }

        let mut line = format!("Datasource {}", self.name);
        if !self.status.is_empty() {
            let _ = write!(line, " has status: {};", self.status);
        }
        if !self.fields.is_empty() {
            line.push_str(" field statuses:");
            for (field, status) in &self.fields {
                let _ = write!(line, " {field} : {status};");
            }
        }
        for error in self.errors.iter().filter(|e| !e.is_empty()) {
            let _ = write!(line, " error: {error};");
        }
        Some(line)
    }
}

/// Folds datasource sub-results into reason lines, preserving order.
///
/// # Examples
///
/// ```
/// use kyc_bridge::normalize::{SourceReport, aggregate_source_reasons};
///
/// let reasons = aggregate_source_reasons([
///     SourceReport { name: "Credit Agency", status: "nomatch", ..Default::default() },
///     SourceReport { name: "Silent", ..Default::default() },
/// ]);
/// assert_eq!(reasons, vec!["Datasource Credit Agency has status: nomatch;".to_owned()]);
/// ```
#[must_use]
pub fn aggregate_source_reasons<'a, I>(reports: I) -> Vec<String>
where
    I: IntoIterator<Item = SourceReport<'a>>,
{
    reports.into_iter().filter_map(|report| report.reason_line()).collect()
}

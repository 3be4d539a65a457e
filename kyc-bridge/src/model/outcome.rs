//! Canonical verification outcome.
//!
//! Every vendor answer collapses into one of four [`VerificationStatus`]
//! values. Outcomes are assembled by normalizers with the builder methods
//! below and are not mutated after they are returned.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::providers::ProviderKind;

/// Closed outcome taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// The vendor verified the customer.
    Approved,
    /// The vendor rejected the customer.
    Denied,
    /// The vendor has not decided yet; poll again later.
    Unclear,
    /// The call failed, or the vendor reported an unrecoverable or unexpected state.
    Error,
}

/// Whether a decision may still change after human review.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Finality {
    /// Conclusive.
    Final,
    /// Subject to later review.
    #[default]
    Unknown,
}

/// Information needed to poll a pending check with `check_status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCheck {
    /// Provider holding the case.
    pub provider: ProviderKind,
    /// Opaque vendor reference.
    pub reference_id: String,
    /// When this check was performed.
    pub last_check: DateTime<Utc>,
}

/// Result of one verification call.
///
/// # Examples
///
/// ```
/// use kyc_bridge::model::{Finality, VerificationOutcome, VerificationStatus};
///
/// let outcome = VerificationOutcome::denied(Finality::Unknown)
///     .with_reason("evaluated risk as high")
///     .with_reference("c1d2");
///
/// assert_eq!(outcome.status, VerificationStatus::Denied);
/// assert_eq!(outcome.reasons, vec!["evaluated risk as high".to_owned()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationOutcome {
    /// Canonical status.
    pub status: VerificationStatus,
    /// Human-readable reasons, in the order the vendor reported them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
    /// Whether the decision is conclusive.
    pub finality: Finality,
    /// Vendor reference for the check.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    /// Vendor or HTTP error code, when the outcome is an error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Polling information for [`VerificationStatus::Unclear`] outcomes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_check: Option<StatusCheck>,
}

impl VerificationOutcome {
    fn with_status(status: VerificationStatus, finality: Finality) -> Self {
        Self {
            status,
            reasons: Vec::new(),
            finality,
            reference_id: None,
            error_code: None,
            status_check: None,
        }
    }

    /// Final approval.
    #[must_use]
    pub fn approved() -> Self {
        Self::with_status(VerificationStatus::Approved, Finality::Final)
    }

    /// Denial with the given finality.
    #[must_use]
    pub fn denied(finality: Finality) -> Self {
        Self::with_status(VerificationStatus::Denied, finality)
    }

    /// Pending decision carrying what is needed to poll later.
    #[must_use]
    pub fn unclear(check: StatusCheck) -> Self {
        let mut outcome = Self::with_status(VerificationStatus::Unclear, Finality::Unknown);
        outcome.reference_id = Some(check.reference_id.clone());
        outcome.status_check = Some(check);
        outcome
    }

    /// Error outcome with one reason.
    #[must_use]
    pub fn error(reason: impl Into<String>) -> Self {
        Self::with_status(VerificationStatus::Error, Finality::Unknown).with_reason(reason)
    }

    /// Error outcome carrying several reasons.
    #[must_use]
    pub fn error_with_reasons<I>(reasons: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self::with_status(VerificationStatus::Error, Finality::Unknown).with_reasons(reasons)
    }

    /// Appends a reason.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reasons.push(reason.into());
        self
    }

    /// Appends reasons, keeping their order.
    #[must_use]
    pub fn with_reasons<I>(mut self, reasons: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.reasons.extend(reasons.into_iter().map(Into::into));
        self
    }

    /// Sets the vendor reference if none is set yet.
    #[must_use]
    pub fn with_reference(mut self, reference_id: impl Into<String>) -> Self {
        if self.reference_id.is_none() {
            self.reference_id = Some(reference_id.into());
        }
        self
    }

    /// Sets the error code.
    #[must_use]
    pub fn with_error_code(mut self, code: impl Into<String>) -> Self {
        self.error_code = Some(code.into());
        self
    }

    /// Returns true for approved outcomes.
    #[must_use]
    pub fn is_approved(&self) -> bool {
        self.status == VerificationStatus::Approved
    }
}

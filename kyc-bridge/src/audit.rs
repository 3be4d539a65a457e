//! Audit logging for verification checks.
//!
//! Every check leaves a structured trail under the `audit` tracing target:
//! one event when it is requested and one when it completes or fails, all
//! sharing a correlation id. Customer identifiers are masked before they
//! reach the log.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::KycError,
    model::{CustomerRecord, VerificationOutcome, VerificationStatus},
    providers::ProviderKind,
};

/// Types of auditable events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    /// A customer was submitted to a provider.
    CheckRequested,
    /// The provider answered with an outcome.
    CheckCompleted,
    /// The check ended with an error.
    CheckFailed,
    /// A pending check was polled.
    StatusPolled,
}

/// Contextual details of an audit entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditDetails {
    /// Masked customer name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    /// Jurisdiction used for routing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Canonical status of the outcome.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<VerificationStatus>,
    /// Masked vendor reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    /// HTTP status preserved from a failed call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    /// Redacted error message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Duration of the check in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

/// Audit log entry.
///
/// # Examples
///
/// ```
/// use kyc_bridge::{
///     audit::{AuditEvent, AuditEventType, audit_log},
///     model::CustomerRecord,
///     providers::ProviderKind,
/// };
/// use uuid::Uuid;
///
/// let customer = CustomerRecord {
///     first_name: "Ada".to_owned(),
///     last_name: "Lovelace".to_owned(),
///     ..Default::default()
/// };
///
/// let event =
///     AuditEvent::new(AuditEventType::CheckRequested, ProviderKind::Coinfirm, Uuid::new_v4())
///     .with_customer(&customer);
/// assert_eq!(event.details.customer.as_deref(), Some("A** L*******"));
///
/// audit_log(&event);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// What happened.
    pub event_type: AuditEventType,
    /// Provider involved.
    pub provider: ProviderKind,
    /// Correlation id shared by all events of one check.
    pub request_id: Uuid,
    /// Event details.
    pub details: AuditDetails,
}

impl AuditEvent {
    /// Creates an event with empty details.
    #[must_use]
    pub fn new(event_type: AuditEventType, provider: ProviderKind, request_id: Uuid) -> Self {
        Self {
            timestamp: Utc::now(),
            event_type,
            provider,
            request_id,
            details: AuditDetails::default(),
        }
    }

    /// Records the masked customer name and jurisdiction.
    #[must_use]
    pub fn with_customer(mut self, customer: &CustomerRecord) -> Self {
        let name = match customer.business.as_ref().filter(|_| customer.full_name().is_empty()) {
            Some(business) => business.name.clone(),
            None => customer.full_name(),
        };
        self.details.customer = Some(mask_name(&name));
        self.details.country = customer.country().map(str::to_ascii_uppercase);
        self
    }

    /// Records status and masked reference of an outcome.
    #[must_use]
    pub fn with_outcome(mut self, outcome: &VerificationOutcome) -> Self {
        self.details.status = Some(outcome.status);
        self.details.reference_id = outcome.reference_id.as_deref().map(redact_identifier);
        self
    }

    /// Records a masked vendor reference.
    #[must_use]
    pub fn with_reference(mut self, reference_id: &str) -> Self {
        self.details.reference_id = Some(redact_identifier(reference_id));
        self
    }

    /// Records a failure; the message is redacted.
    #[must_use]
    pub fn with_error(mut self, error: &KycError) -> Self {
        self.details.status = Some(VerificationStatus::Error);
        self.details.http_status = error.http_status();
        self.details.error = Some(redact_sensitive(&error.to_string()));
        self
    }

    /// Records the duration of the check.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "duration in ms fits u64 for practical values"
    )]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.details.duration_ms = Some(duration.as_millis() as u64);
        self
    }
}

/// Logs an audit event to tracing with target `audit`.
pub fn audit_log(event: &AuditEvent) {
    tracing::info!(
        target: "audit",
        timestamp = %event.timestamp,
        event_type = ?event.event_type,
        provider = %event.provider,
        request_id = %event.request_id,
        details = ?event.details,
        "AUDIT"
    );
}

/// Masks a personal name, keeping the first letter of every word.
///
/// # Examples
///
/// ```
/// use kyc_bridge::audit::mask_name;
///
/// assert_eq!(mask_name("Ada Lovelace"), "A** L*******");
/// assert_eq!(mask_name("Łukasz"), "Ł*****");
/// assert_eq!(mask_name(""), "");
/// ```
#[must_use]
pub fn mask_name(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            word.chars()
                .enumerate()
                .map(|(i, c)| if i == 0 { c } else { '*' })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Masks an identifier, keeping any prefix up to the first `-` and the last
/// four characters.
///
/// # Examples
///
/// ```
/// use kyc_bridge::audit::redact_identifier;
///
/// assert_eq!(redact_identifier("case-1234567890"), "case-******7890");
/// assert_eq!(redact_identifier("P1234567"), "****4567");
/// assert_eq!(redact_identifier("abc"), "abc");
/// ```
#[must_use]
pub fn redact_identifier(identifier: &str) -> String {
    let chars: Vec<char> = identifier.chars().collect();
    let len = chars.len();
    if len <= 4 {
        return identifier.to_owned();
    }

    let prefix_len = match chars.iter().position(|c| *c == '-') {
        Some(pos) if pos + 1 + 4 < len => pos + 1,
        _ => 0,
    };

    chars[..prefix_len]
        .iter()
        .copied()
        .chain(std::iter::repeat_n('*', len - prefix_len - 4))
        .chain(chars[len - 4..].iter().copied())
        .collect()
}

/// Redacts personal data from free-form messages.
///
/// - e-mail addresses keep their domain: `jane@example.com` → `***@example.com`
/// - runs of six or more digits (document, phone and account numbers) keep
///   their last four: `5551234567` → `******4567`
///
/// # Examples
///
/// ```
/// use kyc_bridge::audit::redact_sensitive;
///
/// let redacted = redact_sensitive("duplicate passport 123456789 for jane@example.com");
/// assert_eq!(redacted, "duplicate passport *****6789 for ***@example.com");
/// ```
#[must_use]
pub fn redact_sensitive(input: &str) -> String {
    let mut words = Vec::new();
    for word in input.split(' ') {
        words.push(redact_word(word));
    }
    words.join(" ")
}

fn redact_word(word: &str) -> String {
    if let Some((local, domain)) = word.split_once('@')
        && !local.is_empty()
        && domain.contains('.')
    {
        return format!("***@{domain}");
    }

    let chars: Vec<char> = word.chars().collect();
    let mut out = String::with_capacity(word.len());
    let mut i = 0;
    while i < chars.len() {
        let run = chars[i..].iter().take_while(|c| c.is_ascii_digit()).count();
        if run >= 6 {
            out.extend(std::iter::repeat_n('*', run - 4));
            out.extend(&chars[i + run - 4..i + run]);
            i += run;
        } else if run > 0 {
            out.extend(&chars[i..i + run]);
            i += run;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}

/// Builds and logs an audit event in one expression.
///
/// # Examples
///
/// ```
/// use kyc_bridge::{audit, audit::AuditEventType, providers::ProviderKind};
/// use uuid::Uuid;
///
/// audit!(AuditEventType::StatusPolled, ProviderKind::ShuftiPro, Uuid::new_v4());
///
/// audit!(
///     AuditEventType::StatusPolled,
///     ProviderKind::ShuftiPro,
///     Uuid::new_v4(),
///     with_reference("3f2a-77b1")
/// );
/// ```
#[macro_export]
macro_rules! audit {
    ($event_type:expr, $provider:expr, $request_id:expr) => {
        $crate::audit::audit_log(
            &$crate::audit::AuditEvent::new($event_type, $provider, $request_id)
        )
    };
    ($event_type:expr, $provider:expr, $request_id:expr, $($method:ident($arg:expr)),+ $(,)?) => {
        $crate::audit::audit_log(
            &$crate::audit::AuditEvent::new($event_type, $provider, $request_id)
                $(.$method($arg))+
        )
    };
}

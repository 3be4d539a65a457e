//! Shufti Pro event normalization.

use super::models::{EventResponse, ShuftiProError, ShuftiProEvent};
use crate::{
    error::Result,
    model::{Finality, VerificationOutcome},
    normalize::{NormalizeContext, ResponseNormalizer, decode_json, unexpected_state},
    transport::TransportResponse,
};

/// Normalizer for Shufti Pro verification and status responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShuftiProNormalizer;

impl ResponseNormalizer for ShuftiProNormalizer {
    fn normalize(
        &self,
        response: &TransportResponse,
        context: &NormalizeContext,
    ) -> Result<VerificationOutcome> {
        let body = decode_json::<EventResponse, ShuftiProError>(response)?;
        Ok(normalize_event(&body, context))
    }
}

/// Maps a decoded event response to an outcome.
#[must_use]
pub fn normalize_event(
    response: &EventResponse,
    context: &NormalizeContext,
) -> VerificationOutcome {
    let reported = response.reference.as_deref();

    let Ok(event) = response.event.parse::<ShuftiProEvent>() else {
        return attach_reference(unexpected_state("event", &response.event), context, reported);
    };

    let outcome = match event {
        ShuftiProEvent::Accepted => VerificationOutcome::approved(),
        ShuftiProEvent::Declined => VerificationOutcome::denied(Finality::Final).with_reasons(
            response.declined_reason.as_deref().map(str::trim).filter(|reason| !reason.is_empty()),
        ),
        ShuftiProEvent::RequestPending
        | ShuftiProEvent::RequestReceived
        | ShuftiProEvent::StatusChanged => return context.pending(reported),
        ShuftiProEvent::RequestInvalid
        | ShuftiProEvent::RequestTimeout
        | ShuftiProEvent::RequestUnauthorized
        | ShuftiProEvent::RequestDeleted
        | ShuftiProEvent::Cancelled => {
            let message = response
                .error
                .as_ref()
                .map(|error| error.message().trim())
                .filter(|message| !message.is_empty())
                .unwrap_or(event.as_str());
            VerificationOutcome::error(message).with_error_code(event.as_str())
        },
    };

    attach_reference(outcome, context, reported)
}

fn attach_reference(
    outcome: VerificationOutcome,
    context: &NormalizeContext,
    reported: Option<&str>,
) -> VerificationOutcome {
    match context.reference_or(reported) {
        Some(reference) => outcome.with_reference(reference),
        None => outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::VerificationStatus, providers::ProviderKind};

    fn context() -> NormalizeContext {
        NormalizeContext::new(ProviderKind::ShuftiPro).with_reference("ref-1")
    }

    fn event(json: &str) -> VerificationOutcome {
        normalize_event(&serde_json::from_str(json).unwrap(), &context())
    }

    #[test]
    fn test_every_event_maps_to_one_canonical_status() {
        for kind in ShuftiProEvent::ALL {
            let outcome = event(&format!(r#"{{"event":"{}"}}"#, kind.as_str()));
            let expected = match kind {
                ShuftiProEvent::Accepted => VerificationStatus::Approved,
                ShuftiProEvent::Declined => VerificationStatus::Denied,
                ShuftiProEvent::RequestPending
                | ShuftiProEvent::RequestReceived
                | ShuftiProEvent::StatusChanged => VerificationStatus::Unclear,
                ShuftiProEvent::RequestInvalid
                | ShuftiProEvent::RequestTimeout
                | ShuftiProEvent::RequestUnauthorized
                | ShuftiProEvent::RequestDeleted
                | ShuftiProEvent::Cancelled => VerificationStatus::Error,
            };
            assert_eq!(outcome.status, expected, "{kind:?}");
            assert_eq!(outcome.reference_id.as_deref(), Some("ref-1"));
        }
    }

    #[test]
    fn test_declined_is_final_with_reason() {
        let outcome = event(
            r#"{"reference":"ref-1","event":"verification.declined","declined_reason":"Face not verified."}"#,
        );
        assert_eq!(outcome.status, VerificationStatus::Denied);
        assert_eq!(outcome.finality, Finality::Final);
        assert_eq!(outcome.reasons, vec!["Face not verified."]);
    }

    #[test]
    fn test_pending_is_pollable() {
        let outcome = event(r#"{"reference":"ref-1","event":"request.pending"}"#);
        let check = outcome.status_check.unwrap();
        assert_eq!(check.provider, ProviderKind::ShuftiPro);
        assert_eq!(check.reference_id, "ref-1");
    }

    #[test]
    fn test_invalid_request_reports_service_error() {
        let outcome = event(
            r#"{"event":"request.invalid","error":{"service":"document","key":"dob","message":"The dob must be a date."}}"#,
        );
        assert_eq!(outcome.status, VerificationStatus::Error);
        assert_eq!(outcome.reasons, vec!["The dob must be a date."]);
        assert_eq!(outcome.error_code.as_deref(), Some("request.invalid"));
    }

    #[test]
    fn test_unknown_event_cites_raw_value() {
        let outcome = event(r#"{"event":"verification.frozen"}"#);
        assert_eq!(outcome.status, VerificationStatus::Error);
        assert!(outcome.reasons[0].contains("verification.frozen"));
    }

    #[test]
    fn test_unauthorized_status_code() {
        let response = TransportResponse::new(
            401,
            r#"{"reference":"","event":"request.unauthorized","error":"Authorization keys are missing/invalid."}"#,
        );
        let err = ShuftiProNormalizer.normalize(&response, &context()).unwrap_err();
        assert_eq!(err.http_status(), Some(401));
        assert_eq!(err.to_outcome().reasons, vec!["Authorization keys are missing/invalid."]);
    }
}

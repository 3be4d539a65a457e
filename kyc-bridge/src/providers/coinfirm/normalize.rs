//! Coinfirm risk-tier normalization.
//!
//! | `current_status`      | Outcome  | Finality | Reason                             |
//! |-----------------------|----------|----------|------------------------------------|
//! | `new`, `inprogress`   | Unclear  | Unknown  |                                    |
//! | `incomplete`          | Error    | Unknown  | resubmission required              |
//! | `low`                 | Approved | Final    |                                    |
//! | `medium`              | Denied   | Unknown  | `evaluated risk as medium`         |
//! | `high`                | Denied   | Unknown  | `evaluated risk as high`           |
//! | `fail`                | Denied   | Unknown  | `evaluated risk as unacceptable`   |

use super::models::{CaseState, CoinfirmError, CoinfirmStatus};
use crate::{
    error::Result,
    model::{Finality, VerificationOutcome},
    normalize::{NormalizeContext, ResponseNormalizer, decode_json, unexpected_state},
    transport::TransportResponse,
};

/// Normalizer for Coinfirm case responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoinfirmNormalizer;

impl ResponseNormalizer for CoinfirmNormalizer {
    fn normalize(
        &self,
        response: &TransportResponse,
        context: &NormalizeContext,
    ) -> Result<VerificationOutcome> {
        let state: CaseState = decode_json::<CaseState, CoinfirmError>(response)?;
        Ok(normalize_state(&state, context))
    }
}

/// Maps a decoded case state to an outcome.
#[must_use]
pub fn normalize_state(state: &CaseState, context: &NormalizeContext) -> VerificationOutcome {
    let reference = context.reference_or(state.uuid.as_deref());

    let Ok(status) = state.current_status.parse::<CoinfirmStatus>() else {
        let outcome = unexpected_state("current_status", &state.current_status);
        return match reference {
            Some(reference) => outcome.with_reference(reference),
            None => outcome,
        };
    };

    let outcome = match status {
        CoinfirmStatus::New | CoinfirmStatus::InProgress => {
            return context.pending(state.uuid.as_deref());
        }
        CoinfirmStatus::Incomplete => {
            VerificationOutcome::error("customer data incomplete, resubmission required")
        }
        CoinfirmStatus::Low => VerificationOutcome::approved(),
        CoinfirmStatus::Medium => risk_denial("medium"),
        CoinfirmStatus::High => risk_denial("high"),
        CoinfirmStatus::Fail => risk_denial("unacceptable"),
    };

    match reference {
        Some(reference) => outcome.with_reference(reference),
        None => outcome,
    }
}

fn risk_denial(tier: &str) -> VerificationOutcome {
    VerificationOutcome::denied(Finality::Unknown).with_reason(format!("evaluated risk as {tier}"))
}

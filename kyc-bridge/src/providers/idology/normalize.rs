//! IDology response normalization.
//!
//! An `<error>` element always wins. Otherwise the summary result decides;
//! responses without a summary fall back to the location result. Qualifier
//! messages are carried as reasons on approvals and denials.

use tracing::warn;

use super::models::{IdologyResponse, ResultKey, SummaryKey};
use crate::{
    error::{ProviderError, Result},
    model::{Finality, VerificationOutcome, VerificationStatus},
    normalize::{NormalizeContext, ResponseNormalizer, http_failure, unexpected_state},
    transport::TransportResponse,
};

/// Normalizer for IDology ExpectID responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdologyNormalizer;

impl ResponseNormalizer for IdologyNormalizer {
    fn normalize(
        &self,
        response: &TransportResponse,
        context: &NormalizeContext,
    ) -> Result<VerificationOutcome> {
        let parsed = decode_xml(response);

        if !response.is_success() {
            let message = parsed.ok().and_then(|body| body.error_text().map(str::to_owned));
            return Err(http_failure(response.status, message));
        }

        let body = parsed
            .and_then(|body| {
                if body.is_blank() { Err("no IDology elements".to_owned()) } else { Ok(body) }
            })
            .map_err(|e| {
                warn!(status = response.status, error = %e, "unreadable response body");
                ProviderError::generic(response.status)
            })?;
        Ok(normalize_response(&body, context))
    }
}

fn decode_xml(response: &TransportResponse) -> std::result::Result<IdologyResponse, String> {
    let text = std::str::from_utf8(&response.body).map_err(|e| e.to_string())?;
    quick_xml::de::from_str(text).map_err(|e| e.to_string())
}

/// Maps a decoded response to an outcome.
#[must_use]
pub fn normalize_response(
    response: &IdologyResponse,
    context: &NormalizeContext,
) -> VerificationOutcome {
    let outcome = if let Some(error) = response.error_text() {
        VerificationOutcome::error(error)
    } else if let Some(summary) = &response.summary_result {
        match summary.key.parse::<SummaryKey>() {
            Ok(SummaryKey::Success) => VerificationOutcome::approved(),
            Ok(SummaryKey::Failure) => VerificationOutcome::denied(Finality::Unknown),
            Err(()) => unexpected_state("summary-result", &summary.key),
        }
    } else if let Some(results) = &response.results {
        match results.key.parse::<ResultKey>() {
            Ok(ResultKey::Match) => VerificationOutcome::approved(),
            Ok(ResultKey::NoMatch | ResultKey::MatchRestricted) => {
                VerificationOutcome::denied(Finality::Unknown)
            },
            Err(()) => unexpected_state("results", &results.key),
        }
    } else {
        VerificationOutcome::error("response carries neither a summary nor a result")
    };

    let outcome = if outcome.status == VerificationStatus::Error {
        outcome
    } else {
        outcome.with_reasons(response.qualifier_messages())
    };

    match context.reference_or(response.id_number.as_deref().map(str::trim)) {
        Some(reference) => outcome.with_reference(reference),
        None => outcome,
    }
}

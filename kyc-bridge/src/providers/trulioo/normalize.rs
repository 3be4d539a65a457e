//! Trulioo verification normalization.
//!
//! Request-level or record-level errors win over the record status. A
//! `match` record is a final approval; a `nomatch` record is a denial whose
//! reasons are the aggregated datasource lines.

use super::models::{RecordStatus, TruliooError, VerifyResult};
use crate::{
    error::Result,
    model::{Finality, VerificationOutcome},
    normalize::{
        NormalizeContext, ResponseNormalizer, aggregate_source_reasons, decode_json,
        unexpected_state,
    },
    transport::TransportResponse,
};

/// Normalizer for Trulioo verify responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct TruliooNormalizer;

impl ResponseNormalizer for TruliooNormalizer {
    fn normalize(
        &self,
        response: &TransportResponse,
        context: &NormalizeContext,
    ) -> Result<VerificationOutcome> {
        let result = decode_json::<VerifyResult, TruliooError>(response)?;
        Ok(normalize_result(&result, context))
    }
}

/// Maps a decoded verify result to an outcome.
#[must_use]
pub fn normalize_result(result: &VerifyResult, context: &NormalizeContext) -> VerificationOutcome {
    let record = result.record.as_ref();
    let reference = context.reference_or(
        record
            .and_then(|record| record.transaction_record_id.as_deref())
            .or(result.transaction_id.as_deref()),
    );

    let errors: Vec<String> = result
        .errors
        .iter()
        .chain(record.into_iter().flat_map(|record| record.errors.iter()))
        .map(|error| error.describe())
        .filter(|reason| !reason.is_empty())
        .collect();

    let outcome = if errors.is_empty() {
        match record {
            Some(record) => match record.record_status.parse::<RecordStatus>() {
                Ok(RecordStatus::Match) => VerificationOutcome::approved(),
                Ok(RecordStatus::NoMatch) => VerificationOutcome::denied(Finality::Unknown)
                    .with_reasons(aggregate_source_reasons(
                        record.datasource_results.iter().map(|source| source.report()),
                    )),
                Err(()) => unexpected_state("RecordStatus", &record.record_status),
            },
            None => VerificationOutcome::error("verification response carries no record"),
        }
    } else {
        VerificationOutcome::error_with_reasons(errors)
    };

    match reference {
        Some(reference) => outcome.with_reference(reference),
        None => outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::VerificationStatus, providers::ProviderKind};

    fn context() -> NormalizeContext {
        NormalizeContext::new(ProviderKind::Trulioo)
    }

    fn parse(json: &str) -> VerifyResult {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_every_record_status_maps_to_one_canonical_status() {
        for status in RecordStatus::ALL {
            let json = format!(r#"{{"Record":{{"RecordStatus":"{}"}}}}"#, status.as_str());
            let outcome = normalize_result(&parse(&json), &context());
            let expected = match status {
                RecordStatus::Match => VerificationStatus::Approved,
                RecordStatus::NoMatch => VerificationStatus::Denied,
            };
            assert_eq!(outcome.status, expected, "{status:?}");
        }
    }

    #[test]
    fn test_match_is_final_with_record_reference() {
        let result = parse(
            r#"{"TransactionID":"tx-1","Record":{"TransactionRecordID":"rec-9","RecordStatus":"match"}}"#,
        );
        let outcome = normalize_result(&result, &context());
        assert!(outcome.is_approved());
        assert_eq!(outcome.finality, Finality::Final);
        assert_eq!(outcome.reference_id.as_deref(), Some("rec-9"));
    }

    #[test]
    fn test_nomatch_aggregates_datasources() {
        let result = parse(
            r#"{
                "Record": {
                    "RecordStatus": "nomatch",
                    "DatasourceResults": [
                        {
                            "DatasourceName": "Name",
                            "DatasourceStatus": "status",
                            "DatasourceFields": [
                                {"FieldName": "Field name", "Status": "status"},
                                {"FieldName": "Field name2", "Status": "status2"}
                            ],
                            "Errors": [{"Code": "1001", "Message": "test error"}]
                        },
                        {"DatasourceName": "Silent"},
                        {
                            "DatasourceName": "Name1",
                            "DatasourceStatus": "status1",
                            "DatasourceFields": [
                                {"FieldName": "Field name3", "Status": "status3"},
                                {"FieldName": "Field name4", "Status": "status"}
                            ],
                            "Errors": [{"Code": "1002", "Message": "test error2"}]
                        }
                    ]
                }
            }"#,
        );

        let outcome = normalize_result(&result, &context());
        assert_eq!(outcome.status, VerificationStatus::Denied);
        assert_eq!(outcome.finality, Finality::Unknown);
        assert_eq!(outcome.reasons, vec![
            "Datasource Name has status: status; field statuses: Field name : status; \
             Field name2 : status2; error: test error;",
            "Datasource Name1 has status: status1; field statuses: Field name3 : status3; \
             Field name4 : status; error: test error2;",
        ]);
    }

    #[test]
    fn test_nomatch_without_datasources_has_no_reasons() {
        let outcome = normalize_result(&parse(r#"{"Record":{"RecordStatus":"nomatch"}}"#), &context());
        assert_eq!(outcome.status, VerificationStatus::Denied);
        assert!(outcome.reasons.is_empty());
    }

    #[test]
    fn test_top_level_errors_become_error_outcome() {
        let result = parse(
            r#"{"TransactionID":"tx-2","Errors":[{"Code":"1001","Message":"Missing required field: FirstGivenName"}]}"#,
        );
        let outcome = normalize_result(&result, &context());
        assert_eq!(outcome.status, VerificationStatus::Error);
        assert_eq!(outcome.reasons, vec!["1001: Missing required field: FirstGivenName"]);
        assert_eq!(outcome.reference_id.as_deref(), Some("tx-2"));
    }

    #[test]
    fn test_unknown_record_status() {
        let outcome =
            normalize_result(&parse(r#"{"Record":{"RecordStatus":"partial"}}"#), &context());
        assert_eq!(outcome.status, VerificationStatus::Error);
        assert!(outcome.reasons[0].contains("partial"));
    }

    #[test]
    fn test_missing_record_is_error() {
        let outcome = normalize_result(&parse("{}"), &context());
        assert_eq!(outcome.status, VerificationStatus::Error);
    }

    #[test]
    fn test_http_error_message() {
        let response = TransportResponse::new(401, r#"{"Message":"Authorization has been denied"}"#);
        let err = TruliooNormalizer.normalize(&response, &context()).unwrap_err();
        assert_eq!(err.http_status(), Some(401));
        assert_eq!(err.to_outcome().reasons, vec!["Authorization has been denied"]);
    }
}

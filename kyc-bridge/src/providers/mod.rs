//! Provider adapters.
//!
//! Each vendor gets its own module with a request builder, wire models and a
//! [`ResponseNormalizer`](crate::normalize::ResponseNormalizer). All adapters
//! implement [`Provider`], so callers drive them the same way:
//!
//! | Provider   | Request          | Response | Auth          | Polling |
//! |------------|------------------|----------|---------------|---------|
//! | Coinfirm   | JSON             | JSON     | session token | yes     |
//! | Trulioo    | JSON             | JSON     | basic         | no      |
//! | IDology    | form-urlencoded  | XML      | form fields   | no      |
//! | Shufti Pro | JSON             | JSON     | basic         | yes     |

#[allow(
    redundant_imports,
    reason = "Future needed for RPITIT despite being in Edition 2024 prelude"
)]
use std::future::Future;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    error::{KycError, Result},
    model::{CustomerRecord, VerificationOutcome},
};

pub mod coinfirm;
pub mod idology;
pub mod shuftipro;
pub mod trulioo;

pub use coinfirm::CoinfirmProvider;
pub use idology::IdologyProvider;
pub use shuftipro::ShuftiProProvider;
pub use trulioo::TruliooProvider;

/// Supported verification vendors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Coinfirm AML/KYC platform.
    Coinfirm,
    /// Trulioo GlobalGateway.
    Trulioo,
    /// IDology ExpectID.
    Idology,
    /// Shufti Pro.
    ShuftiPro,
}

impl ProviderKind {
    /// Every provider, in declaration order.
    pub const ALL: [Self; 4] = [Self::Coinfirm, Self::Trulioo, Self::Idology, Self::ShuftiPro];

    /// Lower-case identifier used in configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Coinfirm => "coinfirm",
            Self::Trulioo => "trulioo",
            Self::Idology => "idology",
            Self::ShuftiPro => "shuftipro",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Coinfirm => "Coinfirm",
            Self::Trulioo => "Trulioo",
            Self::Idology => "IDology",
            Self::ShuftiPro => "Shufti Pro",
        })
    }
}

/// Uniform capability implemented by every adapter.
///
/// Adapters perform at most one login exchange and one verification
/// exchange per call and never retry.
pub trait Provider: Send + Sync {
    /// Vendor behind this adapter.
    fn kind(&self) -> ProviderKind;

    /// Submits a customer for verification.
    ///
    /// # Errors
    ///
    /// - [`KycError::InvalidInput`] for an empty record, before any network activity
    /// - [`KycError::Transport`] when no response was obtained
    /// - [`KycError::Provider`] for non-2xx responses and unreadable bodies
    fn check_customer<'a>(
        &'a self,
        customer: &'a CustomerRecord,
    ) -> impl Future<Output = Result<VerificationOutcome>> + Send + 'a;

    /// Polls a previously submitted check.
    ///
    /// # Errors
    ///
    /// Returns [`KycError::UnsupportedOperation`] for vendors without
    /// polling, otherwise the same errors as
    /// [`check_customer`](Self::check_customer).
    fn check_status<'a>(
        &'a self,
        reference_id: &'a str,
    ) -> impl Future<Output = Result<VerificationOutcome>> + Send + 'a;
}

/// Rejects records with nothing to verify.
pub(crate) fn ensure_customer(customer: &CustomerRecord) -> Result<()> {
    if customer.is_empty() {
        return Err(KycError::InvalidInput("customer record has no name".to_owned()));
    }
    Ok(())
}

/// Validates a vendor reference before it is placed into a URL or body.
pub(crate) fn ensure_reference(reference_id: &str) -> Result<&str> {
    let reference_id = reference_id.trim();
    if reference_id.is_empty() {
        return Err(KycError::InvalidInput("reference id is empty".to_owned()));
    }
    if !reference_id.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')) {
        return Err(KycError::InvalidInput(format!(
            "reference id contains unsupported characters: {reference_id:?}"
        )));
    }
    if reference_id.contains("..") {
        return Err(KycError::InvalidInput("reference id contains '..'".to_owned()));
    }
    Ok(reference_id)
}

/// Joins a configured host and an endpoint path.
pub(crate) fn endpoint(host: &str, path: &str) -> String {
    format!("{}{path}", host.trim_end_matches('/'))
}

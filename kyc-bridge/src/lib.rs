//! # KYC Bridge
//!
//! Provider adapter and result-normalization layer for identity verification
//! vendors.
//!
//! Each vendor speaks its own protocol: Coinfirm wants a session token and
//! JSON, Trulioo takes basic auth and reports per-datasource field results,
//! IDology takes a URL-encoded form and answers in XML, Shufti Pro reports
//! event names. This crate hides those differences behind one capability,
//! [`Provider`], and one result type, [`VerificationOutcome`].
//!
//! # Quick Start
//!
//! ## 1. Route customers by jurisdiction
//!
//! ```rust,no_run
//! use kyc_bridge::{CustomerRecord, Dispatcher, KycConfig, VerificationStatus};
//!
//! # async fn example() -> kyc_bridge::Result<()> {
//! let config = KycConfig::from_file("kyc.toml")?;
//! let dispatcher = Dispatcher::from_config(&config)?;
//!
//! let customer = CustomerRecord {
//!     first_name: "Ada".to_owned(),
//!     last_name: "Lovelace".to_owned(),
//!     ..Default::default()
//! };
//!
//! let outcome = dispatcher.check_customer(&customer).await?;
//! if outcome.status == VerificationStatus::Unclear
//!     && let Some(check) = &outcome.status_check
//! {
//!     let later = dispatcher.check_status(check.provider, &check.reference_id).await?;
//!     println!("Resolved: {:?}", later.status);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## 2. Drive one adapter directly
//!
//! ```rust,no_run
//! use kyc_bridge::{
//!     CustomerRecord, Provider,
//!     providers::coinfirm::{CoinfirmConfig, CoinfirmProvider},
//!     transport::HttpTransport,
//! };
//!
//! # async fn example() -> kyc_bridge::Result<()> {
//! let config = CoinfirmConfig {
//!     host: "https://api.coinfirm.com/v2".to_owned(),
//!     email: "compliance@example.com".to_owned(),
//!     password: "secret".to_owned(),
//! };
//! let provider = CoinfirmProvider::new(config, HttpTransport::new()?);
//!
//! let outcome = provider.check_customer(&CustomerRecord::default()).await;
//! assert!(outcome.is_err());
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`model`]: canonical customer record and verification outcome
//! - [`providers`]: the four vendor adapters and the [`Provider`] trait
//! - [`dispatcher`]: jurisdiction routing across configured adapters
//! - [`documents`]: identity document selection, tagging and encoding
//! - [`normalize`]: rules shared by every vendor normalizer
//! - [`transport`]: HTTP abstraction, swappable in tests
//! - [`config`]: TOML configuration and validation
//! - [`audit`]: structured audit events with PII masking
//! - [`auth`]: session token cache
//! - [`error`]: error type and its outcome mapping
//!
//! # Error Handling
//!
//! Adapter operations return [`Result<VerificationOutcome>`](error::Result).
//! Callers that always want an outcome can fold errors with
//! [`KycError::to_outcome`]:
//!
//! ```rust
//! use kyc_bridge::{KycError, VerificationStatus, error::ProviderError};
//!
//! let err = KycError::from(ProviderError::new(Some(400), "Invalid email or password"));
//! let outcome = err.to_outcome();
//! assert_eq!(outcome.status, VerificationStatus::Error);
//! assert_eq!(outcome.error_code.as_deref(), Some("400"));
//! ```
//!
//! # Security Considerations
//!
//! - Provider hosts must be HTTPS and must not point at loopback addresses
//! - Credentials are redacted from `Debug` output
//! - Audit events mask names and identifiers before they reach the log
//! - Reference ids are checked before they are placed into a URL or body

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![allow(
    clippy::multiple_crate_versions,
    reason = "transitive dependencies from reqwest and quick-xml"
)]

pub mod audit;
pub mod auth;
pub mod config;
pub mod dispatcher;
pub mod documents;
pub mod error;
pub mod model;
pub mod normalize;
pub mod providers;
pub mod transport;

pub use config::KycConfig;
pub use dispatcher::Dispatcher;
pub use error::{KycError, Result};
pub use model::{CustomerRecord, Finality, VerificationOutcome, VerificationStatus};
pub use providers::{Provider, ProviderKind};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let _ = std::marker::PhantomData::<KycError>;
        assert_eq!(ProviderKind::ALL.len(), 4);
    }
}

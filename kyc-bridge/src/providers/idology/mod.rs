//! IDology ExpectID adapter.
//!
//! Credentials travel inside the form body; the answer is an XML document.
//! IDology decides synchronously, so there is no status polling.

pub mod form;
pub mod models;
pub mod normalize;

use std::fmt;

use serde::Deserialize;
use tracing::{info, instrument};

use self::{form::FormSource, normalize::IdologyNormalizer};
use crate::{
    config::{require, validate_host},
    documents::{TableTagger, select_identity_document},
    error::{KycError, Result},
    model::{CustomerRecord, DocumentKind, VerificationOutcome},
    normalize::{NormalizeContext, ResponseNormalizer},
    providers::{Provider, ProviderKind, ensure_customer},
    transport::{HttpRequest, Transport},
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Documents whose number IDology accepts as `idNumber`.
const ID_DOCUMENTS: &[(DocumentKind, &str)] = &[
    (DocumentKind::Passport, "passport"),
    (DocumentKind::DriverLicense, "driver_license"),
    (DocumentKind::NationalIdCard, "id_card"),
];

/// IDology credentials and endpoint.
#[derive(Clone, Deserialize)]
pub struct IdologyConfig {
    /// Full ExpectID endpoint URL.
    pub host: String,
    /// API username.
    pub username: String,
    /// API password.
    pub password: String,
}

impl IdologyConfig {
    /// Validates host and credentials.
    ///
    /// # Errors
    ///
    /// Returns [`KycError::Config`] for a non-HTTPS or loopback host and for
    /// empty credentials.
    pub fn validate(&self) -> Result<()> {
        validate_host("idology", &self.host)?;
        require("idology", "username", &self.username)?;
        require("idology", "password", &self.password)
    }
}

impl fmt::Debug for IdologyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdologyConfig")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// IDology adapter over any [`Transport`].
#[derive(Debug)]
pub struct IdologyProvider<T> {
    config: IdologyConfig,
    transport: T,
}

impl<T: Transport> IdologyProvider<T> {
    /// Creates an adapter.
    #[must_use]
    pub fn new(config: IdologyConfig, transport: T) -> Self {
        Self { config, transport }
    }

    #[instrument(skip_all, fields(provider = "idology"))]
    async fn verify(&self, customer: &CustomerRecord) -> Result<VerificationOutcome> {
        ensure_customer(customer)?;

        let body = form_body(&self.config, customer);
        let request = HttpRequest::post(&self.config.host, FORM_CONTENT_TYPE, body.into_bytes());
        let response = self.transport.send(request).await?;
        let outcome =
            IdologyNormalizer.normalize(&response, &NormalizeContext::new(ProviderKind::Idology))?;

        info!(
            status = ?outcome.status,
            reference = ?outcome.reference_id,
            "idology check completed"
        );
        Ok(outcome)
    }
}

/// Builds the form body for `customer`.
///
/// IDology takes no scans; only the number of the selected identity
/// document is forwarded.
#[must_use]
pub fn form_body(config: &IdologyConfig, customer: &CustomerRecord) -> String {
    let identity = select_identity_document(customer, &TableTagger::new(ID_DOCUMENTS));
    form::encode(&FormSource { config, customer, document_number: &identity.document_number })
}

impl<T: Transport> Provider for IdologyProvider<T> {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Idology
    }

    async fn check_customer<'a>(
        &'a self,
        customer: &'a CustomerRecord,
    ) -> Result<VerificationOutcome> {
        self.verify(customer).await
    }

    async fn check_status<'a>(&'a self, _reference_id: &'a str) -> Result<VerificationOutcome> {
        Err(KycError::UnsupportedOperation {
            provider: ProviderKind::Idology,
            operation: "check_status",
        })
    }
}

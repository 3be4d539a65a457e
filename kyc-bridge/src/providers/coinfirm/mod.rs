//! Coinfirm adapter.
//!
//! Coinfirm requires a session token obtained from `POST /auth/login`. The
//! token is cached per adapter instance and dropped when the vendor answers
//! 401, so the next call logs in again. Customers are submitted with their
//! identity document and every supporting file to `POST /kyc/customers`;
//! pending cases are polled with `GET /kyc/status/{uuid}`.

pub mod models;
pub mod normalize;

use std::fmt;

use serde::Deserialize;
use tracing::{info, instrument, warn};

use self::{
    models::{
        CoinfirmError, Company, CustomerRequest, FileUpload, Individual, LoginRequest,
        LoginResponse,
    },
    normalize::CoinfirmNormalizer,
};
use crate::{
    auth::TokenCache,
    config::{require, validate_host},
    documents::{FileKindTagger, select_identity_document, select_supporting_documents},
    error::{ProviderError, Result},
    model::{CustomerRecord, VerificationOutcome},
    normalize::{NormalizeContext, ResponseNormalizer, decode_json},
    providers::{Provider, ProviderKind, endpoint, ensure_customer, ensure_reference},
    transport::{HttpRequest, Transport, TransportResponse},
};

/// Coinfirm credentials and host.
///
/// ```toml
/// [coinfirm]
/// host = "https://api.coinfirm.com/v2"
/// email = "compliance@example.com"
/// password = "..."
/// ```
#[derive(Clone, Deserialize)]
pub struct CoinfirmConfig {
    /// API base URL.
    pub host: String,
    /// Account e-mail.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl CoinfirmConfig {
    /// Validates host and credentials.
    ///
    /// # Errors
    ///
    /// Returns [`KycError::Config`](crate::error::KycError::Config) for a
    /// non-HTTPS or loopback host and for empty credentials.
    pub fn validate(&self) -> Result<()> {
        validate_host("coinfirm", &self.host)?;
        require("coinfirm", "email", &self.email)?;
        require("coinfirm", "password", &self.password)
    }
}

impl fmt::Debug for CoinfirmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoinfirmConfig")
            .field("host", &self.host)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Coinfirm adapter over any [`Transport`].
#[derive(Debug)]
pub struct CoinfirmProvider<T> {
    config: CoinfirmConfig,
    transport: T,
    tokens: TokenCache,
}

impl<T: Transport> CoinfirmProvider<T> {
    /// Creates an adapter with an empty token cache.
    #[must_use]
    pub fn new(config: CoinfirmConfig, transport: T) -> Self {
        Self { config, transport, tokens: TokenCache::new() }
    }

    /// Returns true when a session token is cached.
    #[must_use]
    pub fn has_session(&self) -> bool {
        self.tokens.is_cached()
    }

    /// Returns the cached session token, logging in when there is none.
    async fn session_token(&self) -> Result<String> {
        if let Some(token) = self.tokens.get() {
            return Ok(token);
        }

        let login = LoginRequest { email: &self.config.email, password: &self.config.password };
        let request = HttpRequest::post_json(endpoint(&self.config.host, "/auth/login"), &login)?;
        let response = self.transport.send(request).await?;
        let session = decode_json::<LoginResponse, CoinfirmError>(&response)?;
        if session.token.is_empty() {
            return Err(ProviderError::generic(response.status).into());
        }

        info!("coinfirm session established");
        self.tokens.store(session.token.clone());
        Ok(session.token)
    }

    /// Sends an authorized request and drops the session on 401.
    async fn send_authorized(&self, request: HttpRequest) -> Result<TransportResponse> {
        let token = self.session_token().await?;
        let response = self.transport.send(request.with_bearer(&token)).await?;
        if response.status == 401 {
            warn!("coinfirm rejected session token");
            self.tokens.invalidate();
        }
        Ok(response)
    }

    #[instrument(skip_all, fields(provider = "coinfirm"))]
    async fn submit(&self, customer: &CustomerRecord) -> Result<VerificationOutcome> {
        ensure_customer(customer)?;

        let request = HttpRequest::post_json(
            endpoint(&self.config.host, "/kyc/customers"),
            &customer_request(customer),
        )?;
        let response = self.send_authorized(request).await?;
        let context = NormalizeContext::new(ProviderKind::Coinfirm);
        let outcome = CoinfirmNormalizer.normalize(&response, &context)?;

        info!(
            status = ?outcome.status,
            reference = ?outcome.reference_id,
            "coinfirm check completed"
        );
        Ok(outcome)
    }

    #[instrument(skip(self), fields(provider = "coinfirm"))]
    async fn poll(&self, reference_id: &str) -> Result<VerificationOutcome> {
        let reference_id = ensure_reference(reference_id)?;

        let request =
            HttpRequest::get(endpoint(&self.config.host, &format!("/kyc/status/{reference_id}")));
        let response = self.send_authorized(request).await?;
        let context = NormalizeContext::new(ProviderKind::Coinfirm).with_reference(reference_id);
        let outcome = CoinfirmNormalizer.normalize(&response, &context)?;

        info!(status = ?outcome.status, "coinfirm status polled");
        Ok(outcome)
    }
}

/// Builds the `POST /kyc/customers` body.
#[must_use]
pub fn customer_request(customer: &CustomerRecord) -> CustomerRequest<'_> {
    let tagger = FileKindTagger::new();
    let identity = select_identity_document(customer, &tagger);

    let mut files: Vec<FileUpload> = Vec::new();
    files.extend(identity.file.map(FileUpload::from));
    files.extend(identity.back.map(FileUpload::from));
    files.extend(select_supporting_documents(customer, &tagger).into_iter().map(FileUpload::from));

    let company = customer.business.as_ref().filter(|b| !b.name.trim().is_empty()).map(|b| {
        Company {
            name: &b.name,
            registration_number: b.registration_number.as_deref(),
            country: b.country_alpha2.as_deref(),
        }
    });

    let has_person =
        !customer.first_name.trim().is_empty() || !customer.last_name.trim().is_empty();
    let id_number = identity.document_number;
    let individual = has_person.then(|| Individual {
        first_name: &customer.first_name,
        middle_name: customer.middle_name.as_deref(),
        last_name: &customer.last_name,
        date_of_birth: customer.date_of_birth,
        nationality: customer.nationality.as_deref(),
        email: customer.contact.email.as_deref(),
        phone: customer.contact.phone.as_deref(),
        country: customer.address.as_ref().map(|a| a.country_alpha2.as_str()),
        address: customer.address.as_ref().map(|a| a.single_line()),
        id_number,
        ip: customer.ip_address.as_deref(),
    });

    CustomerRequest {
        customer_type: if individual.is_some() { "individual" } else { "company" },
        individual,
        company,
        files,
    }
}

impl<T: Transport> Provider for CoinfirmProvider<T> {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Coinfirm
    }

    async fn check_customer<'a>(
        &'a self,
        customer: &'a CustomerRecord,
    ) -> Result<VerificationOutcome> {
        self.submit(customer).await
    }

    async fn check_status<'a>(&'a self, reference_id: &'a str) -> Result<VerificationOutcome> {
        self.poll(reference_id).await
    }
}

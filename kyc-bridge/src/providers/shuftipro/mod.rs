//! Shufti Pro adapter.
//!
//! Every verification request carries a fresh reference generated here;
//! Shufti Pro echoes it back and accepts it on `POST /status` for polling.
//! The identity document, the proof of address and the selfie are sent as
//! `data:` URIs inside their respective services.

pub mod models;
pub mod normalize;

use std::fmt;

use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use self::{
    models::{
        AddressService, DocumentService, FaceService, Name, StatusRequest, VerificationRequest,
    },
    normalize::ShuftiProNormalizer,
};
use crate::{
    config::{require, validate_host},
    documents::{
        FileKind, TableTagger, encode_image, select_identity_document,
        select_supporting_documents,
    },
    error::Result,
    model::{CustomerRecord, DocumentKind, VerificationOutcome},
    normalize::{NormalizeContext, ResponseNormalizer},
    providers::{Provider, ProviderKind, endpoint, ensure_customer, ensure_reference},
    transport::{HttpRequest, Transport},
};

/// Shufti Pro document type tags.
const SUPPORTED_TYPES: &[(DocumentKind, &str)] = &[
    (DocumentKind::Passport, "passport"),
    (DocumentKind::DriverLicense, "driving_license"),
    (DocumentKind::NationalIdCard, "id_card"),
    (DocumentKind::UtilityBill, "utility_bill"),
];

fn default_language() -> String {
    "EN".to_owned()
}

/// Shufti Pro credentials and host.
#[derive(Clone, Deserialize)]
pub struct ShuftiProConfig {
    /// API base URL.
    pub host: String,
    /// Client identifier.
    pub client_id: String,
    /// Secret key.
    pub secret_key: String,
    /// Interface language sent with each request.
    #[serde(default = "default_language")]
    pub language: String,
    /// Webhook receiving status changes.
    #[serde(default)]
    pub callback_url: Option<String>,
}

impl ShuftiProConfig {
    /// Validates host, credentials and callback URL.
    ///
    /// # Errors
    ///
    /// Returns [`KycError::Config`](crate::error::KycError::Config) for a
    /// non-HTTPS or loopback host or callback, and for empty credentials.
    pub fn validate(&self) -> Result<()> {
        validate_host("shuftipro", &self.host)?;
        require("shuftipro", "client_id", &self.client_id)?;
        require("shuftipro", "secret_key", &self.secret_key)?;
        if let Some(callback_url) = &self.callback_url {
            validate_host("shuftipro.callback_url", callback_url)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ShuftiProConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShuftiProConfig")
            .field("host", &self.host)
            .field("client_id", &self.client_id)
            .field("secret_key", &"[REDACTED]")
            .field("language", &self.language)
            .field("callback_url", &self.callback_url)
            .finish()
    }
}

/// Shufti Pro adapter over any [`Transport`].
#[derive(Debug)]
pub struct ShuftiProProvider<T> {
    config: ShuftiProConfig,
    transport: T,
}

impl<T: Transport> ShuftiProProvider<T> {
    /// Creates an adapter.
    #[must_use]
    pub fn new(config: ShuftiProConfig, transport: T) -> Self {
        Self { config, transport }
    }

    #[instrument(skip_all, fields(provider = "shuftipro", reference = tracing::field::Empty))]
    async fn submit(&self, customer: &CustomerRecord) -> Result<VerificationOutcome> {
        ensure_customer(customer)?;

        let reference = Uuid::new_v4().to_string();
        tracing::Span::current().record("reference", reference.as_str());

        let body = verification_request(&self.config, customer, reference.clone());
        let request = HttpRequest::post_json(endpoint(&self.config.host, "/"), &body)?
            .with_basic_auth(&self.config.client_id, &self.config.secret_key);

        let response = self.transport.send(request).await?;
        let context = NormalizeContext::new(ProviderKind::ShuftiPro).with_reference(reference);
        let outcome = ShuftiProNormalizer.normalize(&response, &context)?;

        info!(status = ?outcome.status, "shuftipro check completed");
        Ok(outcome)
    }

    #[instrument(skip(self), fields(provider = "shuftipro"))]
    async fn poll(&self, reference_id: &str) -> Result<VerificationOutcome> {
        let reference = ensure_reference(reference_id)?;

        let body = StatusRequest { reference };
        let request = HttpRequest::post_json(endpoint(&self.config.host, "/status"), &body)?
            .with_basic_auth(&self.config.client_id, &self.config.secret_key);

        let response = self.transport.send(request).await?;
        let context = NormalizeContext::new(ProviderKind::ShuftiPro).with_reference(reference);
        let outcome = ShuftiProNormalizer.normalize(&response, &context)?;

        info!(status = ?outcome.status, "shuftipro status polled");
        Ok(outcome)
    }
}

/// Builds the verification body under the given reference.
#[must_use]
pub fn verification_request<'a>(
    config: &'a ShuftiProConfig,
    customer: &'a CustomerRecord,
    reference: String,
) -> VerificationRequest<'a> {
    let tagger = TableTagger::new(SUPPORTED_TYPES);
    let name = || Name {
        first_name: &customer.first_name,
        middle_name: customer.middle_name.as_deref(),
        last_name: &customer.last_name,
    };

    let identity = select_identity_document(customer, &tagger);
    let proof = identity.kind.and_then(|kind| customer.proof(kind));
    let document = identity.file.map(|front| DocumentService {
        proof: front.data_uri(),
        additional_proof: identity.back.as_ref().map(|back| back.data_uri()),
        supported_types: vec![front.tag],
        name: name(),
        dob: customer.date_of_birth,
        document_number: proof.map_or("", |proof| proof.number.as_str()),
        expiry_date: proof.and_then(|proof| proof.valid_until),
        issue_date: proof.and_then(|proof| proof.issued_date),
    });

    let address = select_supporting_documents(customer, &tagger)
        .into_iter()
        .find(|file| file.kind == FileKind::Address)
        .map(|file| AddressService {
            proof: file.data_uri(),
            supported_types: vec![file.tag],
            full_address: customer.address.as_ref().map(|a| a.single_line()).unwrap_or_default(),
            name: name(),
        });

    let face = customer
        .selfie
        .as_ref()
        .and_then(|selfie| selfie.image.as_ref())
        .and_then(|image| {
            encode_image(&image.front).map(|(_, payload)| FaceService {
                proof: format!("data:{};base64,{payload}", image.front.content_type),
            })
        });

    VerificationRequest {
        reference,
        country: customer.country().map(str::to_ascii_uppercase),
        language: &config.language,
        email: customer.contact.email.as_deref(),
        callback_url: config.callback_url.as_deref(),
        document,
        address,
        face,
    }
}

impl<T: Transport> Provider for ShuftiProProvider<T> {
    fn kind(&self) -> ProviderKind {
        ProviderKind::ShuftiPro
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

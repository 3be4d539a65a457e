//! Shared fixtures for integration tests.

#![allow(dead_code, reason = "not every test binary uses every fixture")]

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use kyc_bridge::{
    KycError, Result,
    model::{Address, CustomerRecord, DocumentFile, DocumentImage, DocumentProof},
    providers::{
        coinfirm::CoinfirmConfig, idology::IdologyConfig, shuftipro::ShuftiProConfig,
        trulioo::TruliooConfig,
    },
    transport::{HttpRequest, Transport, TransportResponse},
};
use tracing_subscriber::EnvFilter;

/// Routes spans and audit events to the test output; filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Default)]
struct Script {
    replies: VecDeque<Result<TransportResponse>>,
    requests: Vec<HttpRequest>,
}

/// Transport that answers from a queue and records every request.
///
/// Clones share the same queue, so a clone can be handed to an adapter and
/// the original kept for assertions.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an HTTP response.
    pub fn reply(self, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.push(Ok(TransportResponse::new(status, body)));
        self
    }

    /// Queues a failure with no HTTP response.
    pub fn fail(self, message: &str) -> Self {
        self.push(Err(KycError::Transport(message.to_owned())));
        self
    }

    fn push(&self, reply: Result<TransportResponse>) {
        self.script.lock().expect("script lock poisoned").replies.push_back(reply);
    }

    /// Requests sent so far, in order.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.script.lock().expect("script lock poisoned").requests.clone()
    }

    /// Replies still queued.
    pub fn pending(&self) -> usize {
        self.script.lock().expect("script lock poisoned").replies.len()
    }
}

impl Transport for ScriptedTransport {
    async fn send<'a>(&'a self, request: HttpRequest) -> Result<TransportResponse> {
        let mut script = self.script.lock().expect("script lock poisoned");
        script.requests.push(request);
        script
            .replies
            .pop_front()
            .unwrap_or_else(|| Err(KycError::Transport("no scripted reply".to_owned())))
    }
}

pub fn coinfirm_config() -> CoinfirmConfig {
    CoinfirmConfig {
        host: "https://api.coinfirm.example/v2".to_owned(),
        email: "compliance@example.com".to_owned(),
        password: "hunter2".to_owned(),
    }
}

pub fn trulioo_config() -> TruliooConfig {
    TruliooConfig {
        host: "https://gateway.trulioo.example".to_owned(),
        username: "acme_api".to_owned(),
        password: "secret".to_owned(),
        configuration_name: "Identity Verification".to_owned(),
    }
}

pub fn idology_config() -> IdologyConfig {
    IdologyConfig {
        host: "https://web.idology.example/api/idiq.svc".to_owned(),
        username: "acme".to_owned(),
        password: "secret".to_owned(),
    }
}

pub fn shuftipro_config() -> ShuftiProConfig {
    ShuftiProConfig {
        host: "https://api.shuftipro.example".to_owned(),
        client_id: "client".to_owned(),
        secret_key: "secret".to_owned(),
        language: "EN".to_owned(),
        callback_url: None,
    }
}

/// A customer with an address in `country` and a scanned passport.
pub fn customer(country: &str) -> CustomerRecord {
    CustomerRecord {
        first_name: "Ada".to_owned(),
        last_name: "Lovelace".to_owned(),
        address: Some(Address {
            country_alpha2: country.to_owned(),
            city: Some("London".to_owned()),
            street: Some("St James's Square".to_owned()),
            building_number: Some("12".to_owned()),
            ..Default::default()
        }),
        passport: Some(DocumentProof {
            number: "P-1815".to_owned(),
            image: Some(DocumentImage {
                front: DocumentFile::new("image/jpeg", b"passport-front".to_vec()),
                back: None,
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

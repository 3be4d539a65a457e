//! Provider registry and jurisdiction routing.
//!
//! The [`Dispatcher`] owns one [`Adapter`] per configured vendor and picks
//! one for each customer from the country of the customer's address,
//! falling back to nationality and then to the default provider.

use std::{collections::BTreeMap, time::Instant};

use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    audit,
    audit::AuditEventType,
    config::KycConfig,
    error::{KycError, Result},
    model::{CustomerRecord, VerificationOutcome},
    providers::{
        CoinfirmProvider, IdologyProvider, Provider, ProviderKind, ShuftiProProvider,
        TruliooProvider,
    },
    transport::{HttpTransport, Transport},
};

/// A configured adapter for one vendor.
#[derive(Debug)]
pub enum Adapter<T> {
    /// Coinfirm.
    Coinfirm(CoinfirmProvider<T>),
    /// Trulioo.
    Trulioo(TruliooProvider<T>),
    /// IDology.
    Idology(IdologyProvider<T>),
    /// Shufti Pro.
    ShuftiPro(ShuftiProProvider<T>),
}

impl<T: Transport> Provider for Adapter<T> {
    fn kind(&self) -> ProviderKind {
        match self {
            Self::Coinfirm(provider) => provider.kind(),
            Self::Trulioo(provider) => provider.kind(),
            Self::Idology(provider) => provider.kind(),
            Self::ShuftiPro(provider) => provider.kind(),
        }
    }

    async fn check_customer<'a>(
        &'a self,
        customer: &'a CustomerRecord,
    ) -> Result<VerificationOutcome> {
        match self {
            Self::Coinfirm(provider) => provider.check_customer(customer).await,
            Self::Trulioo(provider) => provider.check_customer(customer).await,
            Self::Idology(provider) => provider.check_customer(customer).await,
            Self::ShuftiPro(provider) => provider.check_customer(customer).await,
        }
    }

    async fn check_status<'a>(&'a self, reference_id: &'a str) -> Result<VerificationOutcome> {
        match self {
            Self::Coinfirm(provider) => provider.check_status(reference_id).await,
            Self::Trulioo(provider) => provider.check_status(reference_id).await,
            Self::Idology(provider) => provider.check_status(reference_id).await,
            Self::ShuftiPro(provider) => provider.check_status(reference_id).await,
        }
    }
}

impl<T> From<CoinfirmProvider<T>> for Adapter<T> {
    fn from(provider: CoinfirmProvider<T>) -> Self {
        Self::Coinfirm(provider)
    }
}

impl<T> From<TruliooProvider<T>> for Adapter<T> {
    fn from(provider: TruliooProvider<T>) -> Self {
        Self::Trulioo(provider)
    }
}

impl<T> From<IdologyProvider<T>> for Adapter<T> {
    fn from(provider: IdologyProvider<T>) -> Self {
        Self::Idology(provider)
    }
}

impl<T> From<ShuftiProProvider<T>> for Adapter<T> {
    fn from(provider: ShuftiProProvider<T>) -> Self {
        Self::ShuftiPro(provider)
    }
}

/// Routes customers to configured providers.
///
/// # Examples
///
/// ```
/// use kyc_bridge::{config::KycConfig, dispatcher::Dispatcher, providers::ProviderKind};
///
/// let config = KycConfig::from_toml(
///     r#"
///     [trulioo]
///     host = "https://gateway.trulioo.com"
///     username = "acme_api"
///     password = "secret"
///
///     [routing.countries]
///     ca = "trulioo"
///     "#,
/// )?;
///
/// let dispatcher = Dispatcher::from_config(&config)?;
/// assert_eq!(dispatcher.route_for(Some("CA"))?, ProviderKind::Trulioo);
/// assert!(dispatcher.route_for(Some("FR")).is_err());
/// # Ok::<(), kyc_bridge::error::KycError>(())
/// ```
#[derive(Debug)]
pub struct Dispatcher<T = HttpTransport> {
    adapters: BTreeMap<ProviderKind, Adapter<T>>,
    routes: BTreeMap<String, ProviderKind>,
    default: Option<ProviderKind>,
}

impl<T> Default for Dispatcher<T> {
    fn default() -> Self {
        Self { adapters: BTreeMap::new(), routes: BTreeMap::new(), default: None }
    }
}

impl Dispatcher<HttpTransport> {
    /// Builds a dispatcher over a pooled [`HttpTransport`].
    ///
    /// # Errors
    ///
    /// Returns [`KycError::Config`] when the configuration fails validation
    /// or the HTTP client cannot be built.
    pub fn from_config(config: &KycConfig) -> Result<Self> {
        let transport = HttpTransport::with_config(&config.http)?;
        Self::from_config_with(config, transport)
    }
}

impl<T: Transport> Dispatcher<T> {
    /// Creates an empty dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a dispatcher whose adapters share clones of `transport`.
    ///
    /// # Errors
    ///
    /// Returns [`KycError::Config`] when the configuration fails validation.
    pub fn from_config_with(config: &KycConfig, transport: T) -> Result<Self>
    where
        T: Clone,
    {
        config.validate()?;

        let mut dispatcher = Self::new();
        if let Some(coinfirm) = &config.coinfirm {
            dispatcher =
                dispatcher.with_adapter(CoinfirmProvider::new(coinfirm.clone(), transport.clone()));
        }
        if let Some(trulioo) = &config.trulioo {
            dispatcher =
                dispatcher.with_adapter(TruliooProvider::new(trulioo.clone(), transport.clone()));
        }
        if let Some(idology) = &config.idology {
            dispatcher =
                dispatcher.with_adapter(IdologyProvider::new(idology.clone(), transport.clone()));
        }
        if let Some(shuftipro) = &config.shuftipro {
            dispatcher =
                dispatcher.with_adapter(ShuftiProProvider::new(shuftipro.clone(), transport));
        }

        for (country, provider) in &config.routing.countries {
            dispatcher = dispatcher.with_route(country, *provider);
        }
        if let Some(default) = config.routing.default {
            dispatcher = dispatcher.with_default(default);
        }

        Ok(dispatcher)
    }

    /// Registers an adapter, replacing any adapter for the same vendor.
    #[must_use]
    pub fn with_adapter(mut self, adapter: impl Into<Adapter<T>>) -> Self {
        let adapter = adapter.into();
        self.adapters.insert(adapter.kind(), adapter);
        self
    }

    /// Routes a country (ISO alpha-2, any case) to a provider.
    #[must_use]
    pub fn with_route(mut self, country: &str, provider: ProviderKind) -> Self {
        self.routes.insert(country.trim().to_ascii_uppercase(), provider);
        self
    }

    /// Sets the provider used when no country rule matches.
    #[must_use]
    pub fn with_default(mut self, provider: ProviderKind) -> Self {
        self.default = Some(provider);
        self
    }

    /// Returns the adapter for `provider`, if configured.
    #[must_use]
    pub fn adapter(&self, provider: ProviderKind) -> Option<&Adapter<T>> {
        self.adapters.get(&provider)
    }

    /// Resolves the provider for a country.
    ///
    /// # Errors
    ///
    /// Returns [`KycError::NoProviderFor`] when neither a country rule nor a
    /// default applies, or the chosen provider has no adapter.
    pub fn route_for(&self, country: Option<&str>) -> Result<ProviderKind> {
        let country = country.map(|c| c.trim().to_ascii_uppercase()).filter(|c| !c.is_empty());

        let provider = country
            .as_deref()
            .and_then(|country| self.routes.get(country).copied())
            .or(self.default)
            .filter(|provider| self.adapters.contains_key(provider));

        provider.ok_or_else(|| {
            KycError::NoProviderFor(country.unwrap_or_else(|| "unknown jurisdiction".to_owned()))
        })
    }

    /// Verifies a customer with the provider serving their jurisdiction.
    ///
    /// # Errors
    ///
    /// Returns [`KycError::NoProviderFor`] when no provider is routed, and
    /// otherwise any error of [`Provider::check_customer`].
    #[instrument(
        skip_all,
        fields(provider = tracing::field::Empty, request_id = tracing::field::Empty)
    )]
    pub async fn check_customer(&self, customer: &CustomerRecord) -> Result<VerificationOutcome> {
        let provider = self.route_for(customer.country()).inspect_err(|e| {
            warn!(error = %e, "no route for customer");
        })?;
        let adapter = self
            .adapter(provider)
            .ok_or_else(|| KycError::NoProviderFor(provider.to_string()))?;

        let request_id = Uuid::new_v4();
        let span = tracing::Span::current();
        span.record("provider", provider.as_str());
        span.record("request_id", tracing::field::display(request_id));

        audit!(AuditEventType::CheckRequested, provider, request_id, with_customer(customer));
        let started = Instant::now();

        let result = adapter.check_customer(customer).await;
        match &result {
            Ok(outcome) => {
                audit!(
                    AuditEventType::CheckCompleted,
                    provider,
                    request_id,
                    with_outcome(outcome),
                    with_duration(started.elapsed())
                );
                info!(status = ?outcome.status, "check completed");
            },
            Err(e) => {
                audit!(
                    AuditEventType::CheckFailed,
                    provider,
                    request_id,
                    with_error(e),
                    with_duration(started.elapsed())
                );
                warn!(error = %e, "check failed");
            },
        }
        result
    }

    /// Polls a pending check.
    ///
    /// # Errors
    ///
    /// Returns [`KycError::NoProviderFor`] when `provider` is not configured,
    /// and otherwise any error of [`Provider::check_status`].
    #[instrument(skip(self))]
    pub async fn check_status(
        &self,
        provider: ProviderKind,
        reference_id: &str,
    ) -> Result<VerificationOutcome> {
        let adapter = self
            .adapter(provider)
            .ok_or_else(|| KycError::NoProviderFor(provider.to_string()))?;

        let request_id = Uuid::new_v4();
        let started = Instant::now();
        let result = adapter.check_status(reference_id).await;

        match &result {
            Ok(outcome) => audit!(
                AuditEventType::StatusPolled,
                provider,
                request_id,
                with_reference(reference_id),
                with_outcome(outcome),
                with_duration(started.elapsed())
            ),
            Err(e) => audit!(
                AuditEventType::StatusPolled,
                provider,
                request_id,
                with_reference(reference_id),
                with_error(e),
                with_duration(started.elapsed())
            ),
        }
        result
    }

    /// Verifies a customer and always yields an outcome.
    ///
    /// Errors are folded with [`KycError::to_outcome`].
    pub async fn verify(&self, customer: &CustomerRecord) -> VerificationOutcome {
        self.check_customer(customer).await.unwrap_or_else(|e| e.to_outcome())
    }
}

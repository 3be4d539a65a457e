//! Bridge configuration.
//!
//! Configuration is read from TOML. Every provider section is optional; a
//! provider without a section is simply not available for routing.
//!
//! ```toml
//! [http]
//! timeout_secs = 30
//!
//! [coinfirm]
//! host = "https://api.coinfirm.com/v2"
//! email = "compliance@example.com"
//! password = "..."
//!
//! [trulioo]
//! host = "https://gateway.trulioo.com"
//! username = "acme_api"
//! password = "..."
//!
//! [routing]
//! default = "coinfirm"
//!
//! [routing.countries]
//! CA = "trulioo"
//! ```

use std::{collections::BTreeMap, path::Path};

use serde::Deserialize;
use url::Url;

use crate::{
    error::{KycError, Result},
    providers::{
        ProviderKind, coinfirm::CoinfirmConfig, idology::IdologyConfig,
        shuftipro::ShuftiProConfig, trulioo::TruliooConfig,
    },
    transport::{HttpConfig, http::check_endpoint},
};

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KycConfig {
    /// Shared HTTP client settings.
    #[serde(default)]
    pub http: HttpConfig,
    /// Coinfirm credentials.
    pub coinfirm: Option<CoinfirmConfig>,
    /// Trulioo credentials.
    pub trulioo: Option<TruliooConfig>,
    /// IDology credentials.
    pub idology: Option<IdologyConfig>,
    /// Shufti Pro credentials.
    pub shuftipro: Option<ShuftiProConfig>,
    /// Jurisdiction routing.
    #[serde(default)]
    pub routing: RoutingConfig,
}

/// Maps customer jurisdictions to providers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    /// Provider used when no country rule matches.
    pub default: Option<ProviderKind>,
    /// ISO 3166-1 alpha-2 country code to provider.
    #[serde(default)]
    pub countries: BTreeMap<String, ProviderKind>,
}

impl KycConfig {
    /// Parses configuration from a TOML string.
    ///
    /// The result is not validated; call [`validate`](Self::validate).
    ///
    /// # Errors
    ///
    /// Returns [`KycError::Config`] when the TOML is malformed or has unknown keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use kyc_bridge::{config::KycConfig, providers::ProviderKind};
    ///
    /// let config = KycConfig::from_toml(
    ///     r#"
    ///     [idology]
    ///     host = "https://web.idologylive.com/api/idiq.svc"
    ///     username = "acme"
    ///     password = "secret"
    ///
    ///     [routing]
    ///     default = "idology"
    ///     "#,
    /// )?;
    ///
    /// config.validate()?;
    /// assert_eq!(config.routing.default, Some(ProviderKind::Idology));
    /// # Ok::<(), kyc_bridge::error::KycError>(())
    /// ```
    pub fn from_toml(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| KycError::Config(e.to_string()))
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`KycError::Config`] when the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| KycError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml(&source)
    }

    /// Returns true when a section exists for `provider`.
    #[must_use]
    pub fn is_configured(&self, provider: ProviderKind) -> bool {
        match provider {
            ProviderKind::Coinfirm => self.coinfirm.is_some(),
            ProviderKind::Trulioo => self.trulioo.is_some(),
            ProviderKind::Idology => self.idology.is_some(),
            ProviderKind::ShuftiPro => self.shuftipro.is_some(),
        }
    }

    /// Validates every section and the routing table.
    ///
    /// # Errors
    ///
    /// Returns [`KycError::Config`] naming the first offending setting.
    pub fn validate(&self) -> Result<()> {
        self.http.validate()?;

        if let Some(coinfirm) = &self.coinfirm {
            coinfirm.validate()?;
        }
        if let Some(trulioo) = &self.trulioo {
            trulioo.validate()?;
        }
        if let Some(idology) = &self.idology {
            idology.validate()?;
        }
        if let Some(shuftipro) = &self.shuftipro {
            shuftipro.validate()?;
        }

        self.validate_routing()
    }

    fn validate_routing(&self) -> Result<()> {
        if let Some(default) = self.routing.default
            && !self.is_configured(default)
        {
            return Err(KycError::Config(format!(
                "routing.default points to {default}, which has no [{}] section",
                default.as_str()
            )));
        }

        for (country, provider) in &self.routing.countries {
            if country.len() != 2 || !country.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(KycError::Config(format!(
                    "routing.countries key {country:?} is not an ISO alpha-2 code"
                )));
            }
            if !self.is_configured(*provider) {
                return Err(KycError::Config(format!(
                    "routing.countries.{country} points to {provider}, which has no [{}] section",
                    provider.as_str()
                )));
            }
        }

        Ok(())
    }
}

/// Checks that a configured host is an HTTPS URL outside loopback.
pub(crate) fn validate_host(section: &str, host: &str) -> Result<()> {
    let url = Url::parse(host)
        .map_err(|e| KycError::Config(format!("{section}.host {host:?} is not a valid URL: {e}")))?;
    check_endpoint(&url).map_err(|reason| KycError::Config(format!("{section}.host: {reason}")))
}

/// Checks that a credential is present.
pub(crate) fn require(section: &str, field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(KycError::Config(format!("{section}.{field} must not be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
        [http]
        timeout_secs = 30

        [coinfirm]
        host = "https://api.coinfirm.com/v2"
        email = "compliance@example.com"
        password = "pw"

        [trulioo]
        host = "https://gateway.trulioo.com"
        username = "acme_api"
        password = "pw"

        [shuftipro]
        host = "https://api.shuftipro.com"
        client_id = "client"
        secret_key = "secret"

        [routing]
        default = "coinfirm"

        [routing.countries]
        CA = "trulioo"
        GB = "shuftipro"
    "#;

    #[test]
    fn test_full_config() {
        let config = KycConfig::from_toml(FULL).unwrap();
        config.validate().unwrap();

        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.trulioo.as_ref().unwrap().configuration_name, "Identity Verification");
        assert_eq!(config.shuftipro.as_ref().unwrap().language, "EN");
        assert!(config.idology.is_none());
        assert_eq!(config.routing.countries.get("CA"), Some(&ProviderKind::Trulioo));
    }

    #[test]
    fn test_route_to_unconfigured_provider() {
        let config = KycConfig::from_toml(
            r#"
            [coinfirm]
            host = "https://api.coinfirm.com"
            email = "a@b.c"
            password = "pw"

            [routing.countries]
            US = "idology"
            "#,
        )
        .unwrap();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("routing.countries.US"), "{err}");
    }

    #[test]
    fn test_bad_country_key() {
        let config = KycConfig::from_toml(
            r#"
            [routing.countries]
            USA = "idology"
            "#,
        )
        .unwrap();
        assert!(config.validate().unwrap_err().to_string().contains("alpha-2"));
    }

    #[test]
    fn test_default_must_be_configured() {
        let config = KycConfig::from_toml("[routing]\ndefault = \"trulioo\"").unwrap();
        assert!(matches!(config.validate(), Err(KycError::Config(_))));
    }

    #[test]
    fn test_unknown_section_is_rejected() {
        assert!(KycConfig::from_toml("[onfido]\nhost = \"https://x\"").is_err());
    }

    #[test]
    fn test_unknown_provider_name_is_rejected() {
        assert!(KycConfig::from_toml("[routing]\ndefault = \"onfido\"").is_err());
    }

    #[test]
    fn test_validate_host() {
        assert!(validate_host("coinfirm", "https://api.coinfirm.com").is_ok());
        assert!(validate_host("coinfirm", "http://api.coinfirm.com").is_err());
        assert!(validate_host("coinfirm", "https://localhost:8443").is_err());
        assert!(validate_host("coinfirm", "https://127.0.0.1").is_err());
        assert!(validate_host("coinfirm", "not a url").is_err());
    }

    #[test]
    fn test_empty_credentials() {
        let config = KycConfig::from_toml(
            r#"
            [coinfirm]
            host = "https://api.coinfirm.com"
            email = "a@b.c"
            password = "  "
            "#,
        )
        .unwrap();
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "invalid configuration: coinfirm.password must not be empty");
    }

    #[test]
    fn test_missing_file() {
        let err = KycConfig::from_file("/nonexistent/kyc.toml").unwrap_err();
        assert!(matches!(err, KycError::Config(_)));
    }
}

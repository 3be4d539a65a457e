//! HTTP transport implementation on top of reqwest.

use std::net::IpAddr;

use reqwest::Client;
use tracing::{debug, instrument};
use url::{Host, Url};

use super::config::{HttpConfig, HttpVersion};
use crate::{
    error::{KycError, Result},
    transport::{HttpRequest, Method, Transport, TransportResponse},
};

/// Checks that a vendor endpoint is HTTPS and not a loopback address.
///
/// Shared by the transport (per request) and configuration validation
/// (per configured host). Returns a short description of the violation.
pub(crate) fn check_endpoint(url: &Url) -> std::result::Result<(), &'static str> {
    if url.scheme() != "https" {
        return Err("only HTTPS URLs are allowed");
    }

    let loopback = match url.host() {
        Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(ip)) => IpAddr::V4(ip).is_loopback(),
        Some(Host::Ipv6(ip)) => IpAddr::V6(ip).is_loopback(),
        None => return Err("URL has no host"),
    };
    if loopback {
        return Err("localhost URLs are not allowed");
    }

    Ok(())
}

/// Validates header name and value for CRLF injection prevention.
fn validate_header(name: &str, value: &str) -> Result<()> {
    let forbidden = |c: char| matches!(c, '\r' | '\n' | '\0');
    if name.contains(forbidden) {
        return Err(KycError::Transport(
            "invalid header name: control characters not allowed".to_owned(),
        ));
    }
    if value.contains(forbidden) {
        return Err(KycError::Transport(format!(
            "invalid value for header {name}: control characters not allowed"
        )));
    }
    Ok(())
}

/// Production transport using a pooled reqwest client.
///
/// Timeouts come from [`HttpConfig`]; a request that exceeds them fails
/// with [`KycError::Transport`]. Non-2xx responses are returned as-is.
///
/// # Examples
///
/// ```
/// use kyc_bridge::transport::{HttpConfig, HttpTransport, HttpVersion};
///
/// let config =
///     HttpConfig { timeout_secs: 30, http_version: HttpVersion::Http1, ..Default::default() };
/// let transport = HttpTransport::with_config(&config).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    http_version: HttpVersion,
}

impl HttpTransport {
    /// Creates a transport with the default [`HttpConfig`] (60 second timeout).
    ///
    /// # Errors
    ///
    /// Returns [`KycError::Config`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Self::with_config(&HttpConfig::default())
    }

    /// Creates a transport from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`KycError::Config`] if the configuration is out of bounds or
    /// the HTTP client cannot be built.
    pub fn with_config(config: &HttpConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder()
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout());

        builder = match config.http_version {
            HttpVersion::Http1 => builder.http1_only(),
            HttpVersion::Http2 => builder.http2_prior_knowledge(),
            HttpVersion::Auto => builder,
        };

        let client = builder
            .build()
            .map_err(|e| KycError::Config(format!("cannot build HTTP client: {e}")))?;

        Ok(Self { client, http_version: config.http_version })
    }

    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn execute(&self, request: HttpRequest) -> Result<TransportResponse> {
        let url = Url::parse(&request.url)
            .map_err(|e| KycError::Transport(format!("invalid URL '{}': {e}", request.url)))?;
        check_endpoint(&url).map_err(|reason| KycError::Transport(reason.to_owned()))?;

        for (name, value) in &request.headers {
            validate_header(name, value)?;
        }

        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };

        let mut builder = self.client.request(method, url);
        for (name, value) in request.headers {
            builder = builder.header(name, value);
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body);
        }

        let response = builder.send().await.map_err(|e| KycError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or_default().to_owned()))
            .collect();

        let body = response.bytes().await.map_err(|e| KycError::Transport(e.to_string()))?.to_vec();

        debug!(status, body_len = body.len(), "response received");

        Ok(TransportResponse { status, body, headers })
    }
}

impl Transport for HttpTransport {
    async fn send<'a>(&'a self, request: HttpRequest) -> Result<TransportResponse> {
        self.execute(request).await
    }

    fn protocol_name(&self) -> &'static str {
        match self.http_version {
            HttpVersion::Http1 => "http/1.1",
            HttpVersion::Http2 => "http/2",
            HttpVersion::Auto => "http",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_transport_new() {
        let transport = HttpTransport::new().unwrap();
        assert_eq!(transport.protocol_name(), "http");
    }

    #[test]
    fn test_http_transport_protocol_name() {
        let http1 = HttpConfig { http_version: HttpVersion::Http1, ..Default::default() };
        assert_eq!(HttpTransport::with_config(&http1).unwrap().protocol_name(), "http/1.1");

        let http2 = HttpConfig { http_version: HttpVersion::Http2, ..Default::default() };
        assert_eq!(HttpTransport::with_config(&http2).unwrap().protocol_name(), "http/2");
    }

    #[test]
    fn test_with_config_validates() {
        let config = HttpConfig { timeout_secs: 0, ..Default::default() };
        assert!(matches!(HttpTransport::with_config(&config), Err(KycError::Config(_))));
    }

    #[test]
    fn test_check_endpoint_https_required() {
        let https = Url::parse("https://api.example.com").unwrap();
        assert!(check_endpoint(&https).is_ok());

        let http = Url::parse("http://api.example.com").unwrap();
        assert_eq!(check_endpoint(&http), Err("only HTTPS URLs are allowed"));
    }

    #[test]
    fn test_check_endpoint_loopback_blocked() {
        let loopbacks = [
            "https://localhost/api",
            "https://127.0.0.1/api",
            "https://127.8.0.1",
            "https://[::1]/api",
        ];
        for url in loopbacks {
            let url = Url::parse(url).unwrap();
            assert_eq!(check_endpoint(&url), Err("localhost URLs are not allowed"), "{url}");
        }
    }

    #[test]
    fn test_validate_header_crlf_injection_blocked() {
        assert!(validate_header("Content-Type", "application/json").is_ok());
        assert!(validate_header("X-Evil\r\n", "value").is_err());
        assert!(validate_header("X-Custom", "value\r\nEvil-Header: injected").is_err());
        assert!(validate_header("X-Custom", "value\0evil").is_err());
    }

    #[tokio::test]
    async fn test_send_rejects_http_url_before_network() {
        let transport = HttpTransport::new().unwrap();
        let result = transport.send(HttpRequest::get("http://api.example.com/status")).await;
        let Err(KycError::Transport(message)) = result else {
            panic!("expected transport error");
        };
        assert!(message.contains("HTTPS"));
    }

    #[tokio::test]
    async fn test_send_rejects_localhost() {
        let transport = HttpTransport::new().unwrap();
        let result = transport.send(HttpRequest::get("https://localhost/status")).await;
        assert!(matches!(result, Err(KycError::Transport(_))));
    }

    #[tokio::test]
    async fn test_send_rejects_crlf_header() {
        let transport = HttpTransport::new().unwrap();
        let request = HttpRequest::get("https://api.example.com/status")
            .with_header("X-Custom", "value\r\nInjected: yes");
        let result = transport.send(request).await;
        assert!(matches!(result, Err(KycError::Transport(_))));
    }

    #[tokio::test]
    async fn test_send_rejects_malformed_url() {
        let transport = HttpTransport::new().unwrap();
        let result = transport.send(HttpRequest::get("not-a-url")).await;
        let Err(KycError::Transport(message)) = result else {
            panic!("expected transport error");
        };
        assert!(message.contains("invalid URL"));
    }
}

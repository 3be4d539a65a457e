//! Transport abstraction layer.
//!
//! Adapters never talk to the network directly: they build an
//! [`HttpRequest`] and hand it to a [`Transport`]. The transport reports
//! every HTTP status back as a [`TransportResponse`]; deciding whether a
//! 4xx/5xx is an error belongs to the provider's normalizer. Only failures
//! that produce no response at all (DNS, refused connection, timeout)
//! surface as [`KycError::Transport`](crate::error::KycError::Transport).
//!
//! # Examples
//!
//! ```rust,no_run
//! use kyc_bridge::transport::{HttpRequest, HttpTransport, Transport};
//!
//! # async fn example() -> kyc_bridge::error::Result<()> {
//! let transport = HttpTransport::new()?;
//!
//! let request = HttpRequest::post_json(
//!     "https://api.vendor.example/auth/login",
//!     &serde_json::json!({ "email": "ops@example.com", "password": "secret" }),
//! )?;
//!
//! let response = transport.send(request).await?;
//! println!("Status: {}", response.status);
//! # Ok(())
//! # }
//! ```

#[allow(
    redundant_imports,
    reason = "Future needed for RPITIT despite being in Edition 2024 prelude"
)]
use std::future::Future;
use std::{fmt, sync::Arc};

use base64::Engine;
use serde::Serialize;

use crate::error::Result;

pub mod config;
pub mod http;

pub use config::{HttpConfig, HttpVersion};
pub use http::HttpTransport;

/// HTTP method used by vendor calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
}

impl Method {
    /// Upper-case method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outbound request handed to a [`Transport`].
#[derive(Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Request method.
    pub method: Method,
    /// Absolute URL.
    pub url: String,
    /// Request headers, in insertion order.
    pub headers: Vec<(String, String)>,
    /// Raw body; empty for `GET`.
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// Creates a `GET` request.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self { method: Method::Get, url: url.into(), headers: Vec::new(), body: Vec::new() }
    }

    /// Creates a `POST` request with an explicit content type.
    #[must_use]
    pub fn post(url: impl Into<String>, content_type: &str, body: Vec<u8>) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            headers: vec![("Content-Type".to_owned(), content_type.to_owned())],
            body,
        }
    }

    /// Creates a `POST` request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`KycError::Serialization`](crate::error::KycError::Serialization)
    /// if `body` cannot be serialized.
    pub fn post_json<T: Serialize + ?Sized>(url: impl Into<String>, body: &T) -> Result<Self> {
        Ok(Self::post(url, "application/json", serde_json::to_vec(body)?))
    }

    /// Appends a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Adds an `Authorization: Basic` header.
    #[must_use]
    pub fn with_basic_auth(self, username: &str, password: &str) -> Self {
        let credentials =
            base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"));
        self.with_header("Authorization", format!("Basic {credentials}"))
    }

    /// Adds an `Authorization: Bearer` header.
    #[must_use]
    pub fn with_bearer(self, token: &str) -> Self {
        self.with_header("Authorization", format!("Bearer {token}"))
    }

    /// Returns the first header with the given name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header_names: Vec<&str> = self.headers.iter().map(|(name, _)| name.as_str()).collect();
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &header_names)
            .field("body_len", &self.body.len())
            .finish()
    }
}

/// Response from transport operations.
///
/// Contains the raw response body, HTTP status code, and response headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body bytes.
    pub body: Vec<u8>,
    /// Response headers.
    pub headers: Vec<(String, String)>,
}

impl TransportResponse {
    /// Creates a response without headers.
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, body: body.into(), headers: Vec::new() }
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns the first header with the given name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Outbound HTTP abstraction.
///
/// Implementations must return a [`TransportResponse`] for every HTTP
/// status, including 4xx and 5xx, and fail only when no response was
/// obtained.
pub trait Transport: Send + Sync {
    /// Sends one request and waits for the complete response.
    ///
    /// # Errors
    ///
    /// Returns [`KycError::Transport`](crate::error::KycError::Transport) when
    /// the request could not be delivered or no response arrived in time.
    fn send<'a>(
        &'a self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<TransportResponse>> + Send + 'a;

    /// Returns the protocol name for logging.
    fn protocol_name(&self) -> &'static str {
        "http"
    }
}

impl<T: Transport> Transport for Arc<T> {
    fn send<'a>(
        &'a self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<TransportResponse>> + Send + 'a {
        (**self).send(request)
    }

    fn protocol_name(&self) -> &'static str {
        (**self).protocol_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_json_sets_content_type() {
        let request =
            HttpRequest::post_json("https://api.example.com/x", &serde_json::json!({"a": 1}))
                .unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.body, br#"{"a":1}"#);
    }

    #[test]
    fn test_basic_auth_header() {
        let request = HttpRequest::get("https://api.example.com").with_basic_auth("user", "pass");
        assert_eq!(request.header("Authorization"), Some("Basic dXNlcjpwYXNz"));
    }

    #[test]
    fn test_bearer_header() {
        let request = HttpRequest::get("https://api.example.com").with_bearer("tok");
        assert_eq!(request.header("authorization"), Some("Bearer tok"));
    }

    #[test]
    fn test_request_debug_hides_header_values_and_body() {
        let request = HttpRequest::post("https://api.example.com", "text/plain", b"secret".to_vec())
            .with_bearer("very-secret-token");
        let debug = format!("{request:?}");
        assert!(debug.contains("Authorization"));
        assert!(!debug.contains("very-secret-token"));
        assert!(debug.contains("body_len: 6"));
    }

    #[test]
    fn test_transport_response_is_success() {
        assert!(TransportResponse::new(200, "ok").is_success());
        assert!(TransportResponse::new(204, "").is_success());
        assert!(!TransportResponse::new(301, "").is_success());
        assert!(!TransportResponse::new(400, "bad").is_success());
    }

    #[test]
    fn test_transport_response_header_lookup() {
        let response = TransportResponse {
            status: 200,
            body: Vec::new(),
            headers: vec![("Content-Type".to_owned(), "application/xml".to_owned())],
        };
        assert_eq!(response.header("content-type"), Some("application/xml"));
        assert_eq!(response.header("x-missing"), None);
    }

    #[test]
    fn test_method_display() {
        assert_eq!(Method::Get.to_string(), "GET");
        assert_eq!(Method::Post.as_str(), "POST");
    }
}

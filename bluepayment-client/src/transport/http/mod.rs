//! HTTP transport implementation.
//!
//! This module provides HTTP/1.1 and HTTP/2 transport using reqwest.

use std::{sync::LazyLock, time::Duration};

use reqwest::{Client, header::CONTENT_TYPE};
use tracing::{debug, instrument};
use url::Url;

use super::config::{HttpConfig, HttpVersion};
use crate::{
    error::{GatewayError, Result},
    transport::{Transport, TransportResponse, sealed},
};

/// Default HTTP client with connection pooling enabled.
///
/// Shared so that every default transport reuses the same pool.
static DEFAULT_HTTP_CLIENT: LazyLock<std::result::Result<Client, String>> = LazyLock::new(|| {
    Client::builder()
        .pool_max_idle_per_host(10)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .map_err(|e| e.to_string())
});

/// Applies the endpoint policy: HTTPS only and no loopback hosts, unless the
/// transport was configured with `allow_insecure`.
///
/// Endpoints come from configuration, so a refusal is a configuration error.
fn validate_url(url: &Url, allow_insecure: bool) -> Result<()> {
    if allow_insecure {
        return match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(GatewayError::Configuration(format!("unsupported URL scheme in {url}: {scheme}"))),
        };
    }

    if url.scheme() != "https" {
        return Err(GatewayError::Configuration(format!("endpoint {url} must use https")));
    }

    if let Some(host) = url.host_str()
        && (host == "localhost" || host == "127.0.0.1" || host == "::1" || host == "[::1]")
    {
        return Err(GatewayError::Configuration(format!("endpoint {url} points at a loopback host")));
    }

    Ok(())
}

/// HTTP/1.1 and HTTP/2 transport using reqwest.
///
/// Supports automatic connection pooling and keep-alive. Request timeouts come
/// from [`HttpConfig`]; callers that need tighter bounds wrap the call in
/// their own timeout.
///
/// # Examples
///
/// ```
/// use bluepayment_client::transport::{HttpConfig, HttpTransport, HttpVersion};
///
/// let config = HttpConfig { timeout_secs: 10, http_version: HttpVersion::Http1, ..HttpConfig::default() };
/// let transport = HttpTransport::with_config(&config).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    http_version: HttpVersion,
    allow_insecure: bool,
}

impl sealed::private::Sealed for HttpTransport {}

impl HttpTransport {
    /// Creates a new HTTP transport with default settings.
    ///
    /// Uses a shared singleton client for connection pooling efficiency.
    ///
    /// # Errors
    ///
    /// Returns error if the shared client could not be built.
    pub fn new() -> Result<Self> {
        let client = DEFAULT_HTTP_CLIENT.clone().map_err(GatewayError::Transport)?;
        Ok(Self { client, http_version: HttpVersion::Auto, allow_insecure: false })
    }

    /// Creates HTTP transport with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the configuration is out of bounds or the HTTP client
    /// cannot be created.
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

        let client = builder.build().map_err(GatewayError::Http)?;

        Ok(Self { client, http_version: config.http_version, allow_insecure: config.allow_insecure })
    }
}

impl Transport for HttpTransport {
    #[instrument(skip(self, body), fields(url = %url, body_len = body.len()))]
    async fn post_json<'a>(&'a self, url: &'a Url, body: &'a [u8]) -> Result<TransportResponse> {
        validate_url(url, self.allow_insecure)?;

        let response = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_vec())
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(GatewayError::Http)?.to_vec();
        debug!(status, response_len = body.len(), "Gateway responded");

        Ok(TransportResponse { status, body })
    }

    fn check_url(&self, url: &Url) -> Result<()> {
        validate_url(url, self.allow_insecure)
    }

    fn protocol_name(&self) -> &'static str {
        match self.http_version {
            HttpVersion::Http1 => "http/1.1",
            HttpVersion::Http2 => "http/2",
            HttpVersion::Auto => "http",
        }
    }
}

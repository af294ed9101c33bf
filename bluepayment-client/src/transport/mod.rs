//! Transport abstraction for gateway requests.
//!
//! The API client hands a fully signed JSON body to a [`Transport`] and gets
//! the raw response back. Signing and response interpretation stay in
//! [`client`](crate::client); the transport only moves bytes.
//!
//! # Examples
//!
//! ```rust,no_run
//! use bluepayment_client::transport::{HttpTransport, Transport};
//! use url::Url;
//!
//! # async fn example() -> bluepayment_client::Result<()> {
//! let transport = HttpTransport::new()?;
//! let url = Url::parse("https://pay.example.com/gatewayList/v2").unwrap();
//!
//! let response = transport.post_json(&url, br#"{"ServiceID":"100"}"#).await?;
//! println!("Status: {}", response.status);
//! # Ok(())
//! # }
//! ```

#[allow(
    redundant_imports,
    reason = "Future needed for RPITIT despite being in Edition 2024 prelude"
)]
use std::future::Future;

use url::Url;

use crate::error::Result;

pub mod config;
pub mod http;
mod sealed;

pub use config::{CONNECT_TIMEOUT_SECS, HttpConfig, HttpVersion, REQUEST_TIMEOUT_SECS};
pub use http::HttpTransport;

/// Response from transport operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body bytes.
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Moves a signed request to the gateway.
///
/// This trait is sealed: only implementations within this crate are allowed.
/// No retry happens at this layer or above it.
pub trait Transport: sealed::private::Sealed + Send + Sync {
    /// POSTs `body` as `application/json` to `url`.
    ///
    /// # Errors
    ///
    /// Returns error if the URL is rejected or the request cannot be completed.
    fn post_json<'a>(
        &'a self,
        url: &'a Url,
        body: &'a [u8],
    ) -> impl Future<Output = Result<TransportResponse>> + Send + 'a;

    /// Checks that `url` is an endpoint this transport is willing to reach.
    ///
    /// Called before a request is signed, so a refused endpoint is reported
    /// as configuration rather than as an outage.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Configuration`](crate::GatewayError::Configuration)
    /// if the URL is refused.
    fn check_url(&self, _url: &Url) -> Result<()> {
        Ok(())
    }

    /// Returns the protocol name for logging.
    fn protocol_name(&self) -> &'static str;
}

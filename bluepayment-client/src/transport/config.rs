//! Settings for [`HttpTransport`](super::HttpTransport), read from the
//! `[http]` table of the operator's TOML file.

use std::{ops::RangeInclusive, time::Duration};

use serde::Deserialize;

use crate::error::{GatewayError, Result};

/// Accepted whole-request timeouts, in seconds.
pub const REQUEST_TIMEOUT_SECS: RangeInclusive<u64> = 1..=300;

/// Accepted connect timeouts, in seconds.
pub const CONNECT_TIMEOUT_SECS: RangeInclusive<u64> = 1..=60;

/// Connection and timeout settings for gateway calls.
///
/// Every key is optional; missing keys keep the [`Default`] value. Unknown
/// keys are rejected so a misspelt timeout does not silently fall back.
///
/// # Examples
///
/// ```toml
/// [http]
/// timeout_secs = 20
/// http_version = "http1"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct HttpConfig {
    /// Idle connections kept open per gateway host.
    pub pool_max_idle_per_host: usize,

    /// Whole-request timeout, see [`REQUEST_TIMEOUT_SECS`].
    pub timeout_secs: u64,

    /// TCP and TLS handshake timeout, see [`CONNECT_TIMEOUT_SECS`].
    pub connect_timeout_secs: u64,

    /// Protocol selection.
    pub http_version: HttpVersion,

    /// Permits plain `http://` and loopback endpoints.
    ///
    /// Only meant for local test gateways.
    pub allow_insecure: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            pool_max_idle_per_host: 10,
            timeout_secs: 30,
            connect_timeout_secs: 10,
            http_version: HttpVersion::Auto,
            allow_insecure: false,
        }
    }
}

impl HttpConfig {
    /// Checks both timeouts against their accepted ranges.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Configuration`] naming the first key out of range.
    pub fn validate(&self) -> Result<()> {
        within("http.timeout_secs", self.timeout_secs, &REQUEST_TIMEOUT_SECS)?;
        within("http.connect_timeout_secs", self.connect_timeout_secs, &CONNECT_TIMEOUT_SECS)
    }

    /// Whole-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Connect timeout.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

fn within(key: &str, secs: u64, range: &RangeInclusive<u64>) -> Result<()> {
    if range.contains(&secs) {
        return Ok(());
    }
    Err(GatewayError::Configuration(format!(
        "{key} = {secs} is outside {}..={} seconds",
        range.start(),
        range.end()
    )))
}

/// Which HTTP protocol the transport speaks.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HttpVersion {
    /// HTTP/1.1 only.
    Http1,
    /// HTTP/2 with prior knowledge.
    Http2,
    /// Let the TLS handshake decide.
    #[default]
    Auto,
}

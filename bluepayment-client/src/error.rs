//! Error types for the Blue Media gateway client.
//!
//! This module defines every error that can occur while resolving configuration,
//! signing requests, talking to the gateway, verifying callbacks or using the
//! response cache. All errors implement [`std::error::Error`] via [`thiserror::Error`].
//!
//! # Error Categories
//!
//! - **Configuration errors** ([`GatewayError::Configuration`],
//!   [`GatewayError::UnknownHashAlgorithm`]): fatal for the current call, never
//!   replaced by defaults for security-relevant values
//! - **Transport errors** ([`GatewayError::Transport`], [`GatewayError::Http`],
//!   [`GatewayError::MalformedResponse`]): recovered inside
//!   [`ApiClient::call`](crate::client::ApiClient::call) and surfaced as
//!   [`CallOutcome::Unavailable`](crate::client::CallOutcome::Unavailable)
//! - **Verification errors** ([`GatewayError::Verification`]): inbound payload
//!   rejected, no business effect may follow
//!
//! # Examples
//!
//! ```
//! use bluepayment_client::error::{GatewayError, Result};
//!
//! fn require_service_id(value: Option<String>) -> Result<String> {
//!     value.ok_or_else(|| GatewayError::Configuration("service_id is not set".to_owned()))
//! }
//!
//! assert!(require_service_id(None).is_err());
//! ```

use thiserror::Error;

/// Result type alias for gateway operations.
///
/// All fallible functions in this crate return this type.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors that can occur while integrating with the payment gateway.
///
/// # Error Recovery
///
/// - **Configuration** ([`Configuration`](Self::Configuration),
///   [`UnknownHashAlgorithm`](Self::UnknownHashAlgorithm)): fix the store
///   configuration; retrying will not help
/// - **Transport** ([`Transport`](Self::Transport), [`Http`](Self::Http),
///   [`MalformedResponse`](Self::MalformedResponse)): treat the remote data as
///   unavailable; retries are the caller's decision
/// - **Verification** ([`Verification`](Self::Verification)): drop the payload
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Required configuration is missing or invalid.
    ///
    /// Raised for an unset service id, shared key, hash algorithm or endpoint URL.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The configured hash algorithm name is not in the registry.
    ///
    /// The client never falls back to a different algorithm.
    ///
    /// # Examples
    ///
    /// ```
    /// use bluepayment_client::error::GatewayError;
    ///
    /// let err = GatewayError::UnknownHashAlgorithm("whirlpool".to_owned());
    /// assert_eq!(err.to_string(), "Unknown hash algorithm: whirlpool");
    /// ```
    #[error("Unknown hash algorithm: {0}")]
    UnknownHashAlgorithm(String),

    /// Transport-level failure other than a reqwest error.
    ///
    /// Covers rejected URLs, non-success HTTP statuses and invalid transport settings.
    #[error("Transport error: {0}")]
    Transport(String),

    /// HTTP request failed.
    ///
    /// Wraps [`reqwest::Error`]: timeouts, refused connections, DNS and TLS failures.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway answered with a body that is not a JSON object.
    #[error("Malformed gateway response: {0}")]
    MalformedResponse(String),

    /// An inbound signed payload failed hash verification.
    ///
    /// The payload must be rejected as a whole.
    #[error("Hash verification failed: {0}")]
    Verification(String),

    /// The cache backend could not store or decode an entry.
    #[error("Cache error: {0}")]
    Cache(String),

    /// Caller supplied an unusable argument.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl GatewayError {
    /// Returns true for errors that the API client converts into an
    /// unavailable outcome instead of returning them.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Http(_) | Self::MalformedResponse(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = GatewayError::Configuration("service_id is not set".into());
        assert_eq!(error.to_string(), "Configuration error: service_id is not set");
    }

    #[test]
    fn test_verification_error() {
        let error = GatewayError::Verification("hash mismatch".into());
        assert!(error.to_string().contains("Hash verification failed"));
    }

    #[test]
    fn test_transport_classification() {
        assert!(GatewayError::Transport("status 500".into()).is_transport());
        assert!(GatewayError::MalformedResponse("not json".into()).is_transport());
        assert!(!GatewayError::Configuration("x".into()).is_transport());
        assert!(!GatewayError::UnknownHashAlgorithm("x".into()).is_transport());
        assert!(!GatewayError::Verification("x".into()).is_transport());
    }
}

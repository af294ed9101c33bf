//! Blue Media payment gateway client: signed API calls, callback
//! verification and response caching.
//!
//! The gateway authenticates every message with a keyed hash over the
//! message's values. This crate builds and checks those hashes, talks to the
//! gateway's JSON endpoints and memoizes slow-changing data such as
//! agreement texts. It is independent of any storefront framework: it only
//! consumes configuration values and a key-value cache, and produces plain
//! data records.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   ┌───────────────┐   ┌─────────────┐
//! │ ConfigSource │──▶│ ConfigProvider│──▶│MessageSigner│
//! └──────────────┘   └───────┬───────┘   └──────┬──────┘
//!                            │                  │
//!                    ┌───────▼──────────────────▼──────┐     ┌───────────────┐
//!                    │            ApiClient            │────▶│   Transport   │──▶ gateway
//!                    └───────┬─────────────────────────┘     └───────────────┘
//!                            │
//!                    ┌───────▼───────┐
//!                    │ ResponseCache │  (agreement texts, 15 min)
//!                    └───────────────┘
//!
//! inbound callback ──▶ CallbackVerifier ──▶ VerifiedCallback
//! stored catalog   ──▶ find_gateway_name
//! ```
//!
//! # Quick Start
//!
//! ## 1. Sign a request
//!
//! ```rust
//! use bluepayment_client::hash::{MessageSigner, SignedFields};
//!
//! # fn example() -> bluepayment_client::Result<()> {
//! let signer = MessageSigner::from_config("sha256", Some("|"))?;
//! let fields = SignedFields::new()
//!     .with("ServiceID", "123")
//!     .with("MessageID", "abc")
//!     .with("Currencies", "PLN");
//!
//! let hash = signer.sign(&fields, "topsecret");
//! assert_eq!(hash.len(), 64);
//! # Ok(())
//! # }
//! ```
//!
//! ## 2. Verify an inbound callback
//!
//! ```rust
//! use bluepayment_client::hash::{CallbackVerifier, MessageSigner, SignedFields};
//!
//! # fn example(received: SignedFields) -> bluepayment_client::Result<()> {
//! let verifier = CallbackVerifier::new(MessageSigner::from_config("sha256", None)?);
//!
//! // Only a verified callback exposes its fields.
//! let callback = verifier.verify_strict(received, "topsecret")?;
//! println!("order: {:?}", callback.get("OrderID"));
//! # Ok(())
//! # }
//! ```
//!
//! ## 3. Call the gateway
//!
//! ```rust,no_run
//! use bluepayment_client::{
//!     client::{ApiClient, CallOutcome},
//!     config::{ConfigProvider, MemoryConfig},
//!     transport::HttpTransport,
//! };
//!
//! # async fn example(toml: &str) -> bluepayment_client::Result<()> {
//! let config = ConfigProvider::new(MemoryConfig::from_toml(toml)?);
//! let credentials = config.credentials("PLN")?;
//! let client = ApiClient::new(HttpTransport::new()?, config);
//!
//! match client.gateway_list(&credentials.service_id, &credentials.shared_key, "PLN").await? {
//!     CallOutcome::Success(fields) => println!("{}", fields.len()),
//!     CallOutcome::Unavailable => println!("gateway list unavailable"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`config`]: configuration lookup and typed gateway settings
//! - [`hash`]: hash registry, request signing, callback verification
//! - [`client`]: signed JSON calls and the remote operations
//! - [`cache`]: cache backends and read-through response caching
//! - [`catalog`]: gateway name lookup over stored gateway lists
//! - [`transport`]: HTTP transport abstraction
//! - [`security`]: audit logging
//! - [`error`]: error types
//!
//! # Error Handling
//!
//! Configuration problems are returned as errors; transport problems are
//! folded into [`CallOutcome::Unavailable`](client::CallOutcome::Unavailable):
//!
//! ```rust
//! use bluepayment_client::{
//!     GatewayError,
//!     config::{ConfigProvider, MemoryConfig},
//! };
//!
//! let config = ConfigProvider::new(MemoryConfig::new());
//! match config.signer() {
//!     Ok(_) => unreachable!(),
//!     Err(GatewayError::Configuration(msg)) => assert!(msg.contains("hash_algorithm")),
//!     Err(e) => panic!("unexpected: {e}"),
//! }
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![allow(
    clippy::multiple_crate_versions,
    reason = "transitive dependencies from reqwest and wiremock"
)]

pub mod cache;
pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod hash;
pub mod security;
pub mod transport;

pub use error::{GatewayError, Result};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let _ = std::marker::PhantomData::<GatewayError>;
        let _ = std::marker::PhantomData::<client::ApiClient<transport::HttpTransport, config::MemoryConfig>>;
    }
}

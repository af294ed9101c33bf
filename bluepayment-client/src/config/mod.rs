//! Gateway configuration.
//!
//! Values are consumed, never owned: a [`ConfigSource`] exposes the store's
//! configuration and [`ConfigProvider`] turns it into credentials, a
//! validated [`MessageSigner`](crate::hash::MessageSigner) and endpoint URLs.
//!
//! # Layout
//!
//! ```toml
//! [payment.bluepayment]
//! hash_algorithm = "sha256"
//! hash_separator = "|"
//! test_mode = true
//! gateway_list_url_test = "https://pay-accept.bm.pl/gatewayList/v2"
//! gateway_list_url_prod = "https://pay.bm.pl/gatewayList/v2"
//!
//! [payment.bluepayment.pln]
//! service_id = "100"
//! shared_key = "..."
//! ```

mod provider;
mod source;

pub use provider::{ConfigProvider, Credentials, DEFAULT_PROVIDER_CODE, Operation};
pub use source::{ConfigSource, MemoryConfig};

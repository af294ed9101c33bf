//! Gateway message hashing.
//!
//! Every message exchanged with the gateway carries a `Hash` field computed
//! over the message's values and the merchant's shared key:
//!
//! ```text
//! hash = H(value_1 | value_2 | ... | value_n | shared_key)
//! ```
//!
//! `H` is chosen by name in the store configuration ([`HashAlgorithm`]) and
//! `|` is the default separator. Outbound requests are signed with
//! [`MessageSigner`]; inbound callbacks are checked with [`CallbackVerifier`].
//!
//! # Examples
//!
//! ```
//! use bluepayment_client::hash::{CallbackVerifier, MessageSigner, SignedFields};
//!
//! # fn example() -> bluepayment_client::Result<()> {
//! let signer = MessageSigner::from_config("sha256", None)?;
//!
//! let request = SignedFields::new()
//!     .with("ServiceID", "100")
//!     .with("MessageID", "0123456789abcdef0123456789abcdef")
//!     .with("Currencies", "PLN")
//!     .with_hash(&signer, "shared-key");
//!
//! assert!(CallbackVerifier::new(signer).verify(&request, "shared-key"));
//! # Ok(())
//! # }
//! ```

mod algorithm;
mod fields;
mod signer;
mod verifier;


pub use algorithm::HashAlgorithm;
pub use fields::{FieldValue, HASH_FIELD, SignedFields};
pub use signer::{DEFAULT_HASH_SEPARATOR, MessageSigner};
pub use verifier::{CallbackVerifier, ORDER_ID_FIELD, SERVICE_ID_FIELD, VerifiedCallback};

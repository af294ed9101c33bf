//! Message hashing for outbound requests.

use tracing::instrument;

use crate::hash::{HashAlgorithm, SignedFields};

/// Separator used when the store configuration leaves `hash_separator` unset.
pub const DEFAULT_HASH_SEPARATOR: &str = "|";

/// Computes gateway message hashes.
///
/// The hash input is the field values in insertion order followed by the
/// shared key, joined with the separator. Keys never take part.
///
/// # Examples
///
/// ```
/// use bluepayment_client::hash::{HashAlgorithm, MessageSigner, SignedFields};
///
/// let signer = MessageSigner::new(HashAlgorithm::Sha256, "|");
/// let fields = SignedFields::new()
///     .with("ServiceID", "123")
///     .with("MessageID", "abc")
///     .with("Currencies", "PLN");
///
/// let hash = signer.sign(&fields, "topsecret");
/// assert_eq!(hash, HashAlgorithm::Sha256.digest_hex(b"123|abc|PLN|topsecret"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSigner {
    algorithm: HashAlgorithm,
    separator: String,
}

impl MessageSigner {
    /// Creates a signer for an already validated algorithm.
    #[must_use]
    pub fn new(algorithm: HashAlgorithm, separator: impl Into<String>) -> Self {
        Self { algorithm, separator: separator.into() }
    }

    /// Creates a signer from raw configuration values.
    ///
    /// An unset or empty separator falls back to [`DEFAULT_HASH_SEPARATOR`];
    /// the algorithm has no fallback.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::UnknownHashAlgorithm`](crate::GatewayError::UnknownHashAlgorithm)
    /// if `algorithm` is not registered.
    pub fn from_config(algorithm: &str, separator: Option<&str>) -> crate::Result<Self> {
        let algorithm = algorithm.parse()?;
        let separator = separator.filter(|s| !s.is_empty()).unwrap_or(DEFAULT_HASH_SEPARATOR);
        Ok(Self::new(algorithm, separator))
    }

    /// The configured algorithm.
    #[must_use]
    pub const fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    /// The configured separator.
    #[must_use]
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Builds the string that gets hashed: values, then the secret.
    ///
    /// A `Hash` field, if present, is skipped.
    #[must_use]
    pub fn hash_input(&self, fields: &SignedFields, secret: &str) -> String {
        let mut parts: Vec<String> = fields.hashable_values().map(ToString::to_string).collect();
        parts.push(secret.to_owned());
        parts.join(&self.separator)
    }

    /// Returns the hex digest for `fields` keyed with `secret`.
    #[instrument(skip(self, fields, secret), fields(algorithm = %self.algorithm, field_count = fields.len()))]
    #[must_use]
    pub fn sign(&self, fields: &SignedFields, secret: &str) -> String {
        self.algorithm.digest_hex(self.hash_input(fields, secret).as_bytes())
    }
}

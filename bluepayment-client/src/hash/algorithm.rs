//! Hash algorithm registry.
//!
//! The gateway is configured by name (`hash_algorithm = "sha256"`), so the
//! client resolves that name to a digest function once per call and refuses
//! names it does not know.

use std::{fmt, str::FromStr};

use sha2::{Digest, Sha224, Sha256, Sha384, Sha512, Sha512_224, Sha512_256};

use crate::error::{GatewayError, Result};

/// One-way hash functions accepted for message signing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    /// MD5, kept for legacy gateway accounts.
    Md5,
    /// SHA-224.
    Sha224,
    /// SHA-256, the gateway default.
    Sha256,
    /// SHA-384.
    Sha384,
    /// SHA-512.
    Sha512,
    /// SHA-512/224.
    Sha512Trunc224,
    /// SHA-512/256.
    Sha512Trunc256,
}

impl HashAlgorithm {
    /// Every registered algorithm, in registry order.
    pub const ALL: [Self; 7] = [
        Self::Md5,
        Self::Sha224,
        Self::Sha256,
        Self::Sha384,
        Self::Sha512,
        Self::Sha512Trunc224,
        Self::Sha512Trunc256,
    ];

    /// Returns the canonical configuration name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
            Self::Sha512Trunc224 => "sha512/224",
            Self::Sha512Trunc256 => "sha512/256",
        }
    }

    /// Length of the hex-encoded digest.
    #[must_use]
    pub const fn hex_len(&self) -> usize {
        match self {
            Self::Md5 => 32,
            Self::Sha224 | Self::Sha512Trunc224 => 56,
            Self::Sha256 | Self::Sha512Trunc256 => 64,
            Self::Sha384 => 96,
            Self::Sha512 => 128,
        }
    }

    /// Computes the digest of `message` as lowercase hex.
    ///
    /// # Examples
    ///
    /// ```
    /// use bluepayment_client::hash::HashAlgorithm;
    ///
    /// let digest = HashAlgorithm::Md5.digest_hex(b"abcdefghijklmnopqrstuvwxyz");
    /// assert_eq!(digest, "c3fcd3d76192e4007dfb496cca67e13b");
    /// ```
    #[must_use]
    pub fn digest_hex(&self, message: &[u8]) -> String {
        match self {
            Self::Md5 => hex::encode(md5::compute(message).0),
            Self::Sha224 => hex::encode(Sha224::digest(message)),
            Self::Sha256 => hex::encode(Sha256::digest(message)),
            Self::Sha384 => hex::encode(Sha384::digest(message)),
            Self::Sha512 => hex::encode(Sha512::digest(message)),
            Self::Sha512Trunc224 => hex::encode(Sha512_224::digest(message)),
            Self::Sha512Trunc256 => hex::encode(Sha512_256::digest(message)),
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = GatewayError;

    /// Parses a configuration name, ignoring ASCII case and surrounding whitespace.
    ///
    /// `sha-256` style spellings are accepted as aliases.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        let algorithm = match normalized.as_str() {
            "md5" => Self::Md5,
            "sha224" | "sha-224" => Self::Sha224,
            "sha256" | "sha-256" => Self::Sha256,
            "sha384" | "sha-384" => Self::Sha384,
            "sha512" | "sha-512" => Self::Sha512,
            "sha512/224" | "sha-512/224" => Self::Sha512Trunc224,
            "sha512/256" | "sha-512/256" => Self::Sha512Trunc256,
            _ => return Err(GatewayError::UnknownHashAlgorithm(s.trim().to_owned())),
        };
        Ok(algorithm)
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

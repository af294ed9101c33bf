//! Resolution of gateway settings from store configuration.

use std::fmt;

use url::Url;

use crate::{
    config::ConfigSource,
    error::{GatewayError, Result},
    hash::MessageSigner,
};

/// Provider segment of configuration paths.
pub const DEFAULT_PROVIDER_CODE: &str = "bluepayment";

/// Remote gateway operations with their own endpoint URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Google Pay merchant information.
    GooglePayMerchantInfo,
    /// List of payment channels enabled for a service.
    GatewayList,
    /// Legal texts (agreements) for a payment channel.
    LegalData,
}

impl Operation {
    /// Configuration key prefix; `_test` or `_prod` is appended.
    #[must_use]
    pub const fn url_key(&self) -> &'static str {
        match self {
            Self::GooglePayMerchantInfo => "gpay_merchant_info_url",
            Self::GatewayList => "gateway_list_url",
            Self::LegalData => "legal_data_url",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url_key().trim_end_matches("_url"))
    }
}

/// Merchant credentials for one currency scope.
///
/// Resolved fresh for every call. `Debug` output never shows the key.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Merchant account id issued by the gateway.
    pub service_id: String,
    /// Shared key used for hashing.
    pub shared_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("service_id", &self.service_id)
            .field("shared_key", &"[REDACTED]")
            .finish()
    }
}

/// Reads gateway settings from a [`ConfigSource`].
///
/// Every accessor goes back to the source; nothing is cached.
///
/// # Examples
///
/// ```
/// use bluepayment_client::config::{ConfigProvider, MemoryConfig};
///
/// let source = MemoryConfig::new()
///     .with("payment/bluepayment/pln/service_id", "100")
///     .with("payment/bluepayment/pln/shared_key", "secret");
///
/// let config = ConfigProvider::new(source);
/// assert_eq!(config.get_value("service_id", Some("PLN")).as_deref(), Some("100"));
/// assert_eq!(config.get_value("service_id", None), None);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigProvider<S> {
    source: S,
    provider_code: String,
}

impl<S: ConfigSource> ConfigProvider<S> {
    /// Creates a provider reading under `payment/bluepayment/`.
    #[must_use]
    pub fn new(source: S) -> Self {
        Self::with_provider_code(source, DEFAULT_PROVIDER_CODE)
    }

    /// Creates a provider reading under `payment/<provider_code>/`.
    #[must_use]
    pub fn with_provider_code(source: S, provider_code: impl Into<String>) -> Self {
        Self { source, provider_code: provider_code.into() }
    }

    /// Returns the underlying source.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Builds the configuration path for `name`.
    ///
    /// With a currency the path is currency-scoped and the currency code is
    /// lowercased.
    #[must_use]
    pub fn path(&self, name: &str, currency: Option<&str>) -> String {
        match currency {
            Some(currency) => {
                format!("payment/{}/{}/{name}", self.provider_code, currency.to_lowercase())
            }
            None => format!("payment/{}/{name}", self.provider_code),
        }
    }

    /// Returns the raw value of `name`, optionally scoped to `currency`.
    ///
    /// An empty currency string is treated as no currency.
    #[must_use]
    pub fn get_value(&self, name: &str, currency: Option<&str>) -> Option<String> {
        let currency = currency.filter(|c| !c.is_empty());
        self.source.get(&self.path(name, currency))
    }

    /// Returns the value of `name` or a configuration error when it is unset or empty.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Configuration`] naming the missing path.
    pub fn require_value(&self, name: &str, currency: Option<&str>) -> Result<String> {
        self.get_value(name, currency).filter(|v| !v.trim().is_empty()).ok_or_else(|| {
            GatewayError::Configuration(format!("{} is not set", self.path(name, currency)))
        })
    }

    /// Resolves the merchant service id for `currency`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Configuration`] if it is not configured.
    pub fn service_id(&self, currency: &str) -> Result<String> {
        self.require_value("service_id", Some(currency))
    }

    /// Resolves service id and shared key for `currency`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Configuration`] if either value is missing.
    pub fn credentials(&self, currency: &str) -> Result<Credentials> {
        Ok(Credentials {
            service_id: self.service_id(currency)?,
            shared_key: self.require_value("shared_key", Some(currency))?,
        })
    }

    /// Builds the message signer from `hash_algorithm` and `hash_separator`.
    ///
    /// The separator defaults to `|`; the algorithm is mandatory.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Configuration`] if no algorithm is configured,
    /// or [`GatewayError::UnknownHashAlgorithm`] if it is not registered.
    pub fn signer(&self) -> Result<MessageSigner> {
        let algorithm = self.require_value("hash_algorithm", None)?;
        let separator = self.get_value("hash_separator", None);
        MessageSigner::from_config(&algorithm, separator.as_deref())
    }

    /// Returns true when the store is configured against the test gateway.
    #[must_use]
    pub fn is_test_mode(&self) -> bool {
        self.get_value("test_mode", None).is_some_and(|value| is_truthy(&value))
    }

    /// Resolves the endpoint URL for `operation` in the current mode.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Configuration`] if the URL is missing or does not parse.
    pub fn endpoint(&self, operation: Operation) -> Result<Url> {
        let suffix = if self.is_test_mode() { "test" } else { "prod" };
        let name = format!("{}_{suffix}", operation.url_key());
        let raw = self.require_value(&name, None)?;
        Url::parse(raw.trim()).map_err(|e| {
            GatewayError::Configuration(format!("{} is not a valid URL: {e}", self.path(&name, None)))
        })
    }
}

/// Mirrors how stores write flags: empty, `0` and `false` are off.
fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    !(value.is_empty() || value == "0" || value.eq_ignore_ascii_case("false"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::MemoryConfig, hash::HashAlgorithm};

    fn source() -> MemoryConfig {
        MemoryConfig::new()
            .with("payment/bluepayment/pln/service_id", "100")
            .with("payment/bluepayment/pln/shared_key", "secret")
            .with("payment/bluepayment/hash_algorithm", "sha256")
            .with("payment/bluepayment/gateway_list_url_test", "https://test.example.com/gatewayList")
            .with("payment/bluepayment/gateway_list_url_prod", "https://pay.example.com/gatewayList")
    }

    #[test]
    fn test_path_lowercases_currency() {
        let config = ConfigProvider::new(MemoryConfig::new());
        assert_eq!(config.path("service_id", Some("PLN")), "payment/bluepayment/pln/service_id");
        assert_eq!(config.path("hash_algorithm", None), "payment/bluepayment/hash_algorithm");
    }

    #[test]
    fn test_custom_provider_code() {
        let config = ConfigProvider::with_provider_code(MemoryConfig::new(), "other");
        assert_eq!(config.path("x", None), "payment/other/x");
    }

    #[test]
    fn test_get_value_scopes() {
        let config = ConfigProvider::new(source());
        assert_eq!(config.get_value("service_id", Some("pln")).as_deref(), Some("100"));
        assert_eq!(config.get_value("service_id", Some("EUR")), None);
        assert_eq!(config.get_value("hash_algorithm", None).as_deref(), Some("sha256"));
        assert_eq!(config.get_value("hash_algorithm", Some("")).as_deref(), Some("sha256"));
    }

    #[test]
    fn test_credentials() {
        let config = ConfigProvider::new(source());
        let credentials = config.credentials("PLN").unwrap();
        assert_eq!(credentials.service_id, "100");
        assert_eq!(credentials.shared_key, "secret");
    }

    #[test]
    fn test_credentials_missing_currency() {
        let config = ConfigProvider::new(source());
        let result = config.credentials("EUR");
        assert!(matches!(result, Err(GatewayError::Configuration(ref msg)) if msg.contains("eur/service_id")));
    }

    #[test]
    fn test_credentials_blank_key_is_missing() {
        let config = ConfigProvider::new(source().with("payment/bluepayment/pln/shared_key", "  "));
        assert!(matches!(config.credentials("PLN"), Err(GatewayError::Configuration(_))));
    }

    #[test]
    fn test_credentials_debug_redacts_key() {
        let credentials = Credentials { service_id: "100".into(), shared_key: "secret".into() };
        let debug = format!("{credentials:?}");
        assert!(debug.contains("100"));
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn test_signer_defaults_separator() {
        let config = ConfigProvider::new(source());
        let signer = config.signer().unwrap();
        assert_eq!(signer.algorithm(), HashAlgorithm::Sha256);
        assert_eq!(signer.separator(), "|");
    }

    #[test]
    fn test_signer_requires_algorithm() {
        let mut source = source();
        source.unset("payment/bluepayment/hash_algorithm");
        let config = ConfigProvider::new(source);
        assert!(matches!(config.signer(), Err(GatewayError::Configuration(_))));
    }

    #[test]
    fn test_signer_unknown_algorithm() {
        let config =
            ConfigProvider::new(source().with("payment/bluepayment/hash_algorithm", "whirlpool"));
        assert!(matches!(config.signer(), Err(GatewayError::UnknownHashAlgorithm(_))));
    }

    #[test]
    fn test_endpoint_follows_test_mode() {
        let config = ConfigProvider::new(source());
        assert_eq!(
            config.endpoint(Operation::GatewayList).unwrap().as_str(),
            "https://pay.example.com/gatewayList"
        );

        let config = ConfigProvider::new(source().with("payment/bluepayment/test_mode", "1"));
        assert_eq!(
            config.endpoint(Operation::GatewayList).unwrap().as_str(),
            "https://test.example.com/gatewayList"
        );
    }

    #[test]
    fn test_endpoint_missing_url() {
        let config = ConfigProvider::new(source());
        assert!(matches!(config.endpoint(Operation::LegalData), Err(GatewayError::Configuration(_))));
    }

    #[test]
    fn test_endpoint_invalid_url() {
        let config = ConfigProvider::new(
            source().with("payment/bluepayment/legal_data_url_prod", "not a url"),
        );
        assert!(matches!(config.endpoint(Operation::LegalData), Err(GatewayError::Configuration(_))));
    }

    #[test]
    fn test_truthy_values() {
        assert!(is_truthy("1"));
        assert!(is_truthy("yes"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy(""));
        assert!(!is_truthy("false"));
        assert!(!is_truthy("FALSE"));
    }

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::GatewayList.to_string(), "gateway_list");
        assert_eq!(Operation::GooglePayMerchantInfo.url_key(), "gpay_merchant_info_url");
    }
}

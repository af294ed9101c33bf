//! Signed calls to the gateway's web API.
//!
//! [`ApiClient::call`] signs an ordered field set with the configured hash
//! settings, POSTs it as JSON and returns the response mapping. Transport
//! problems never escape as errors: they are logged and reported as
//! [`CallOutcome::Unavailable`]. Missing or invalid configuration is fatal for
//! the call and returned as `Err`.
//!
//! No retry is attempted. Callers that need bounded latency wrap the call in
//! their own timeout.
//!
//! # Examples
//!
//! ```rust,no_run
//! use bluepayment_client::{
//!     client::{ApiClient, CallOutcome},
//!     config::{ConfigProvider, MemoryConfig},
//!     transport::HttpTransport,
//! };
//!
//! # async fn example() -> bluepayment_client::Result<()> {
//! let source = MemoryConfig::from_toml(&std::fs::read_to_string("bluepayment.toml").unwrap())?;
//! let client = ApiClient::new(HttpTransport::new()?, ConfigProvider::new(source));
//!
//! match client.agreements(1500, "PLN", "pl_PL").await? {
//!     CallOutcome::Success(fields) => println!("{fields:?}"),
//!     CallOutcome::Unavailable => println!("agreements unavailable"),
//! }
//! # Ok(())
//! # }
//! ```

mod message;
mod outcome;

use tracing::{debug, instrument, warn};
use url::Url;

pub use message::{
    CURRENCIES_FIELD, GATEWAY_ID_FIELD, LANGUAGE_FIELD, MERCHANT_DOMAIN_FIELD, MESSAGE_ID_FIELD,
    MESSAGE_ID_LENGTH, language_from_locale, new_message_id,
};
pub use outcome::{CallOutcome, ResponseFields};

use crate::{
    cache::{AGREEMENTS_CACHE_TAG, AGREEMENTS_TTL, CacheBackend, MemoryCache, ResponseCache, cache_key},
    config::{ConfigProvider, ConfigSource, Operation},
    error::{GatewayError, Result},
    hash::{SERVICE_ID_FIELD, SignedFields},
    security::audit::{AuditEvent, AuditEventType, audit_log, redact_secret},
    transport::Transport,
};

/// Client for the gateway's signed JSON API.
///
/// Generic over the [`Transport`], the [`ConfigSource`] and the
/// [`CacheBackend`] used for agreement texts. Configuration is re-read on
/// every call.
#[derive(Debug)]
pub struct ApiClient<T, S, B = MemoryCache> {
    transport: T,
    config: ConfigProvider<S>,
    cache: ResponseCache<B>,
}

impl<T: Transport, S: ConfigSource> ApiClient<T, S> {
    /// Creates a client with an in-memory agreements cache.
    #[must_use]
    pub fn new(transport: T, config: ConfigProvider<S>) -> Self {
        Self::with_cache(transport, config, ResponseCache::new(MemoryCache::default()))
    }
}

impl<T: Transport, S: ConfigSource, B: CacheBackend> ApiClient<T, S, B> {
    /// Creates a client using `cache` for agreement texts.
    #[must_use]
    pub const fn with_cache(transport: T, config: ConfigProvider<S>, cache: ResponseCache<B>) -> Self {
        Self { transport, config, cache }
    }

    /// Returns the configuration provider.
    #[must_use]
    pub const fn config(&self) -> &ConfigProvider<S> {
        &self.config
    }

    /// Returns the response cache.
    #[must_use]
    pub const fn cache(&self) -> &ResponseCache<B> {
        &self.cache
    }

    /// Signs `request` with `shared_key`, sends it to `endpoint` and parses the reply.
    ///
    /// `Hash` is appended after the given fields.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Configuration`] or
    /// [`GatewayError::UnknownHashAlgorithm`] when hash settings are missing
    /// or invalid, or when the transport refuses `endpoint`. Transport failures are not errors; they yield
    /// [`CallOutcome::Unavailable`].
    #[instrument(
        skip(self, request, shared_key),
        fields(endpoint = %endpoint, protocol = self.transport.protocol_name())
    )]
    pub async fn call(&self, endpoint: &Url, request: SignedFields, shared_key: &str) -> Result<CallOutcome> {
        audited(self.transport.check_url(endpoint), Some(endpoint))?;
        let signer = audited(self.config.signer(), Some(endpoint))?;

        let service_id = request.get(SERVICE_ID_FIELD).map(ToString::to_string);
        let message_id = request.get(MESSAGE_ID_FIELD).map(ToString::to_string);
        let signed = request.with_hash(&signer, shared_key);
        let body = serde_json::to_vec(&signed)
            .map_err(|e| GatewayError::InvalidInput(format!("request is not serializable: {e}")))?;

        match self.send(endpoint, &body).await {
            Ok(fields) => {
                debug!(field_count = fields.len(), "Gateway call succeeded");
                Ok(CallOutcome::Success(fields))
            }
            Err(e) if e.is_transport() => {
                let error = redact_secret(&e.to_string(), shared_key);
                warn!(error = %error, "Gateway call failed");

                let mut event = AuditEvent::new(AuditEventType::RemoteCallFailed)
                    .with_endpoint(endpoint.as_str())
                    .with_error(error);
                if let Some(service_id) = service_id {
                    event = event.with_service_id(service_id);
                }
                if let Some(message_id) = message_id {
                    event = event.with_message_id(message_id);
                }
                audit_log(&event);

                Ok(CallOutcome::Unavailable)
            }
            Err(e) => Err(e),
        }
    }

    /// Fetches the Google Pay merchant information for the store.
    ///
    /// `MerchantDomain` is the host of `store_base_url`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if credentials, hash settings or the
    /// endpoint are missing, or [`GatewayError::InvalidInput`] if the store
    /// URL has no host.
    pub async fn google_pay_merchant_info(&self, store_base_url: &Url, currency: &str) -> Result<CallOutcome> {
        let merchant_domain = store_base_url
            .host_str()
            .ok_or_else(|| GatewayError::InvalidInput(format!("store URL {store_base_url} has no host")))?;
        let credentials = audited(self.config.credentials(currency), None)?;
        let endpoint = audited(self.config.endpoint(Operation::GooglePayMerchantInfo), None)?;

        let request = SignedFields::new()
            .with(SERVICE_ID_FIELD, credentials.service_id)
            .with(MERCHANT_DOMAIN_FIELD, merchant_domain);

        self.call(&endpoint, request, &credentials.shared_key).await
    }

    /// Fetches the payment channels enabled for `service_id`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if hash settings or the endpoint are missing.
    pub async fn gateway_list(&self, service_id: &str, shared_key: &str, currency: &str) -> Result<CallOutcome> {
        let endpoint = audited(self.config.endpoint(Operation::GatewayList), None)?;

        let request = SignedFields::new()
            .with(SERVICE_ID_FIELD, service_id)
            .with(MESSAGE_ID_FIELD, new_message_id())
            .with(CURRENCIES_FIELD, currency);

        self.call(&endpoint, request, shared_key).await
    }

    /// Fetches the agreement texts for a gateway, served from cache for
    /// [`AGREEMENTS_TTL`].
    ///
    /// # Errors
    ///
    /// Returns a configuration error if credentials are missing (or, on a
    /// cache miss, hash settings or the endpoint), or
    /// [`GatewayError::InvalidInput`] if `locale` is empty.
    #[instrument(skip(self))]
    pub async fn agreements(&self, gateway_id: i64, currency: &str, locale: &str) -> Result<CallOutcome> {
        let credentials = audited(self.config.credentials(currency), None)?;
        let key = cache_key(AGREEMENTS_CACHE_TAG, &credentials.service_id, &gateway_id.to_string(), locale)?;

        let service_id = credentials.service_id.as_str();
        let shared_key = credentials.shared_key.as_str();
        self.cache
            .get_or_fetch(&key, AGREEMENTS_TTL, &[AGREEMENTS_CACHE_TAG], move || async move {
                let endpoint = audited(self.config.endpoint(Operation::LegalData), None)?;
                let request = SignedFields::new()
                    .with(SERVICE_ID_FIELD, service_id)
                    .with(MESSAGE_ID_FIELD, new_message_id())
                    .with(GATEWAY_ID_FIELD, gateway_id)
                    .with(LANGUAGE_FIELD, language_from_locale(locale));

                self.call(&endpoint, request, shared_key).await
            })
            .await
    }

    async fn send(&self, endpoint: &Url, body: &[u8]) -> Result<ResponseFields> {
        let response = self.transport.post_json(endpoint, body).await?;
        if !response.is_success() {
            return Err(GatewayError::Transport(format!("gateway returned HTTP {}", response.status)));
        }

        match serde_json::from_slice(&response.body) {
            Ok(serde_json::Value::Object(fields)) => Ok(fields),
            Ok(other) => Err(GatewayError::MalformedResponse(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
            Err(e) => Err(GatewayError::MalformedResponse(format!("response is not JSON: {e}"))),
        }
    }
}

/// Emits a `ConfigurationRejected` audit event for configuration errors.
fn audited<V>(result: Result<V>, endpoint: Option<&Url>) -> Result<V> {
    if let Err(e) = &result {
        let mut event = AuditEvent::new(AuditEventType::ConfigurationRejected).with_error(e.to_string());
        if let Some(endpoint) = endpoint {
            event = event.with_endpoint(endpoint.as_str());
        }
        audit_log(&event);
    }
    result
}

const fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

//! Backing storage for configuration values.
//!
//! The client only reads configuration; it never owns or writes it. A store
//! exposes string values under slash-separated paths such as
//! `payment/bluepayment/pln/service_id`.

use std::collections::BTreeMap;

use crate::error::{GatewayError, Result};

/// Read-only lookup of configuration values by full path.
///
/// Implementations may hit a database or a remote store on every call;
/// [`ConfigProvider`](super::ConfigProvider) never caches results.
pub trait ConfigSource: Send + Sync {
    /// Returns the raw value stored at `path`, or `None` when unset.
    fn get(&self, path: &str) -> Option<String>;
}

impl<T: ConfigSource + ?Sized> ConfigSource for &T {
    fn get(&self, path: &str) -> Option<String> {
        (**self).get(path)
    }
}

impl<T: ConfigSource + ?Sized> ConfigSource for std::sync::Arc<T> {
    fn get(&self, path: &str) -> Option<String> {
        (**self).get(path)
    }
}

/// In-memory configuration store.
///
/// # Examples
///
/// ```
/// use bluepayment_client::config::{ConfigSource, MemoryConfig};
///
/// let toml = r#"
///     [payment.bluepayment]
///     hash_algorithm = "sha256"
///     test_mode = true
///
///     [payment.bluepayment.pln]
///     service_id = "100"
///     shared_key = "secret"
/// "#;
///
/// let config = MemoryConfig::from_toml(toml).unwrap();
/// assert_eq!(config.get("payment/bluepayment/pln/service_id").as_deref(), Some("100"));
/// assert_eq!(config.get("payment/bluepayment/test_mode").as_deref(), Some("1"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryConfig {
    values: BTreeMap<String, String>,
}

impl MemoryConfig {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a value, builder style.
    #[must_use]
    pub fn with(mut self, path: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(path, value);
        self
    }

    /// Sets a value.
    pub fn set(&mut self, path: impl Into<String>, value: impl Into<String>) {
        self.values.insert(path.into(), value.into());
    }

    /// Removes a value.
    pub fn unset(&mut self, path: &str) {
        self.values.remove(path);
    }

    /// Number of stored paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parses a TOML document, flattening nested tables into paths.
    ///
    /// Strings, integers and floats are stored as written; booleans become
    /// `"1"` or `"0"`. Arrays and datetimes are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Configuration`] if the document does not parse
    /// or contains an unsupported value type.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(toml_str)
            .map_err(|e| GatewayError::Configuration(format!("failed to parse TOML: {e}")))?;

        let mut config = Self::new();
        flatten_table(&table, "", &mut config)?;
        Ok(config)
    }
}

impl ConfigSource for MemoryConfig {
    fn get(&self, path: &str) -> Option<String> {
        self.values.get(path).cloned()
    }
}

fn flatten_table(table: &toml::Table, prefix: &str, config: &mut MemoryConfig) -> Result<()> {
    for (key, value) in table {
        let path = if prefix.is_empty() { key.clone() } else { format!("{prefix}/{key}") };
        match value {
            toml::Value::Table(inner) => flatten_table(inner, &path, config)?,
            toml::Value::String(s) => config.set(path, s.clone()),
            toml::Value::Integer(i) => config.set(path, i.to_string()),
            toml::Value::Float(f) => config.set(path, f.to_string()),
            toml::Value::Boolean(b) => config.set(path, if *b { "1" } else { "0" }),
            toml::Value::Array(_) | toml::Value::Datetime(_) => {
                return Err(GatewayError::Configuration(format!(
                    "unsupported value type at '{path}'"
                )));
            }
        }
    }
    Ok(())
}

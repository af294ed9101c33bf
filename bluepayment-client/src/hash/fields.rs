//! Ordered field sets exchanged with the gateway.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::hash::MessageSigner;

/// Name of the hash field appended to every signed message.
pub const HASH_FIELD: &str = "Hash";

/// A single field value.
///
/// Serialized untagged, so JSON bodies carry plain strings, numbers and
/// booleans. A number hashes as its JSON text (`12.5`, `106`); a boolean as
/// `true` or `false`. Nulls, arrays and objects are not field values and make
/// a payload fail to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Numeric value, e.g. a gateway id or an amount.
    Number(serde_json::Number),
    /// Boolean flag.
    Bool(bool),
    /// Text value.
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::Number(value.into())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Insertion-ordered mapping of field name to value.
///
/// Order is significant: the gateway hashes values in the order it documents,
/// which is the order fields were inserted here.
///
/// # Examples
///
/// ```
/// use bluepayment_client::hash::SignedFields;
///
/// let fields = SignedFields::new()
///     .with("ServiceID", "123")
///     .with("MessageID", "abc")
///     .with("Currencies", "PLN");
///
/// let values: Vec<String> = fields.values().map(ToString::to_string).collect();
/// assert_eq!(values, ["123", "abc", "PLN"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignedFields(IndexMap<String, FieldValue>);

impl SignedFields {
    /// Creates an empty field set.
    #[must_use]
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Appends a field and returns the set, builder style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Inserts a field. Re-inserting an existing name keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Returns the value of a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    /// Returns the received `Hash` value, if present.
    #[must_use]
    pub fn hash(&self) -> Option<&FieldValue> {
        self.0.get(HASH_FIELD)
    }

    /// Iterates values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &FieldValue> {
        self.0.values()
    }

    /// Iterates `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Values that participate in the hash: every field except `Hash`.
    pub fn hashable_values(&self) -> impl Iterator<Item = &FieldValue> {
        self.0.iter().filter(|(name, _)| name.as_str() != HASH_FIELD).map(|(_, value)| value)
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no fields are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Computes the hash over the current fields and appends it as `Hash`.
    ///
    /// Any previous `Hash` entry is dropped first so the new one is always last.
    #[must_use]
    pub fn with_hash(mut self, signer: &MessageSigner, secret: &str) -> Self {
        self.0.shift_remove(HASH_FIELD);
        let hash = signer.sign(&self, secret);
        self.0.insert(HASH_FIELD.to_owned(), FieldValue::Text(hash));
        self
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for SignedFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::HashAlgorithm;

    #[test]
    fn test_field_value_display() {
        assert_eq!(FieldValue::from(106_i64).to_string(), "106");
        assert_eq!(FieldValue::from("PLN").to_string(), "PLN");
    }

    #[test]
    fn test_json_body_keeps_order_and_types() {
        let fields = SignedFields::new()
            .with("ServiceID", "100")
            .with("GatewayID", 106_i64)
            .with("Language", "PL");

        let json = serde_json::to_string(&fields).unwrap();
        assert_eq!(json, r#"{"ServiceID":"100","GatewayID":106,"Language":"PL"}"#);
    }

    #[test]
    fn test_with_hash_appends_last() {
        let signer = MessageSigner::new(HashAlgorithm::Sha256, "|");
        let fields = SignedFields::new().with("ServiceID", "1").with("MessageID", "m");

        let signed = fields.with_hash(&signer, "key");
        let names: Vec<&str> = signed.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["ServiceID", "MessageID", "Hash"]);
    }

    #[test]
    fn test_with_hash_replaces_existing_hash() {
        let signer = MessageSigner::new(HashAlgorithm::Sha256, "|");
        let fields = SignedFields::new().with("Hash", "stale").with("ServiceID", "1");

        let signed = fields.with_hash(&signer, "key");
        assert_eq!(signed.len(), 2);
        assert_eq!(signed.iter().last().map(|(name, _)| name), Some(HASH_FIELD));
        assert_eq!(
            signed.hash().unwrap().to_string(),
            HashAlgorithm::Sha256.digest_hex(b"1|key")
        );
    }

    #[test]
    fn test_callback_with_non_string_scalars_parses() {
        let raw = r#"{"ServiceID":"100","OrderID":"1","Amount":12.5,"GatewayID":106,"Big":18446744073709551615,"Recurring":true,"Hash":"ab"}"#;
        let fields: SignedFields = serde_json::from_str(raw).unwrap();

        let values: Vec<String> = fields.hashable_values().map(ToString::to_string).collect();
        assert_eq!(values, ["100", "1", "12.5", "106", "18446744073709551615", "true"]);
        assert_eq!(serde_json::to_string(&fields).unwrap(), raw);
    }

    #[test]
    fn test_nested_values_are_refused() {
        assert!(serde_json::from_str::<SignedFields>(r#"{"ServiceID":null}"#).is_err());
        assert!(serde_json::from_str::<SignedFields>(r#"{"ServiceID":[1]}"#).is_err());
    }

    #[test]
    fn test_hashable_values_skip_hash() {
        let fields: SignedFields =
            [("ServiceID", "1"), ("Hash", "abc"), ("OrderID", "o-1")].into_iter().collect();
        let values: Vec<String> = fields.hashable_values().map(ToString::to_string).collect();
        assert_eq!(values, ["1", "o-1"]);
    }
}

//! Request field names and message identifiers.

use uuid::Uuid;

/// Length of a generated `MessageID`.
pub const MESSAGE_ID_LENGTH: usize = 32;

/// Per-request correlation id field.
pub const MESSAGE_ID_FIELD: &str = "MessageID";
/// Currency filter of the gateway list.
pub const CURRENCIES_FIELD: &str = "Currencies";
/// Gateway id field.
pub const GATEWAY_ID_FIELD: &str = "GatewayID";
/// Agreement language field.
pub const LANGUAGE_FIELD: &str = "Language";
/// Store domain sent for Google Pay.
pub const MERCHANT_DOMAIN_FIELD: &str = "MerchantDomain";

/// Generates a random message id of [`MESSAGE_ID_LENGTH`] lowercase hex characters.
///
/// # Examples
///
/// ```
/// use bluepayment_client::client::{MESSAGE_ID_LENGTH, new_message_id};
///
/// let id = new_message_id();
/// assert_eq!(id.len(), MESSAGE_ID_LENGTH);
/// assert_ne!(id, new_message_id());
/// ```
#[must_use]
pub fn new_message_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Extracts the upper-cased language code from a locale such as `pl_PL`.
///
/// # Examples
///
/// ```
/// use bluepayment_client::client::language_from_locale;
///
/// assert_eq!(language_from_locale("pl_PL"), "PL");
/// assert_eq!(language_from_locale("en-GB"), "EN");
/// assert_eq!(language_from_locale("de"), "DE");
/// ```
#[must_use]
pub fn language_from_locale(locale: &str) -> String {
    locale.trim().split(['_', '-']).next().unwrap_or_default().to_uppercase()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_message_id_shape() {
        let id = new_message_id();
        assert_eq!(id.len(), MESSAGE_ID_LENGTH);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_message_ids_are_unique() {
        let ids: HashSet<String> = (0..1_000).map(|_| new_message_id()).collect();
        assert_eq!(ids.len(), 1_000);
    }

    #[test]
    fn test_language_from_locale() {
        assert_eq!(language_from_locale("pl_PL"), "PL");
        assert_eq!(language_from_locale(" en_US "), "EN");
        assert_eq!(language_from_locale(""), "");
    }
}

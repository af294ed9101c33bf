//! Result of a remote gateway call.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON object returned by the gateway, keys in document order.
pub type ResponseFields = serde_json::Map<String, Value>;

/// Either the full response mapping or nothing at all.
///
/// The gateway boundary never yields partial data: a non-2xx status, a body
/// that is not JSON, a JSON value that is not an object, or any transport
/// failure all become [`CallOutcome::Unavailable`].
///
/// # Examples
///
/// ```
/// use bluepayment_client::client::{CallOutcome, ResponseFields};
///
/// let outcome = CallOutcome::Success(ResponseFields::new());
/// assert!(outcome.is_success());
/// assert!(CallOutcome::Unavailable.into_fields().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallOutcome {
    /// The gateway answered with a JSON object.
    Success(ResponseFields),
    /// The call failed; treat the remote data as unavailable.
    Unavailable,
}

impl CallOutcome {
    /// Returns true for [`CallOutcome::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Borrows the response fields, if any.
    #[must_use]
    pub const fn fields(&self) -> Option<&ResponseFields> {
        match self {
            Self::Success(fields) => Some(fields),
            Self::Unavailable => None,
        }
    }

    /// Consumes the outcome, returning the response fields if any.
    #[must_use]
    pub fn into_fields(self) -> Option<ResponseFields> {
        match self {
            Self::Success(fields) => Some(fields),
            Self::Unavailable => None,
        }
    }
}

impl From<Option<ResponseFields>> for CallOutcome {
    fn from(fields: Option<ResponseFields>) -> Self {
        fields.map_or(Self::Unavailable, Self::Success)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn fields() -> ResponseFields {
        let Value::Object(map) = json!({ "serviceID": "100", "gatewayList": [] }) else {
            panic!("literal is an object");
        };
        map
    }

    #[test]
    fn test_accessors() {
        let outcome = CallOutcome::Success(fields());
        assert!(outcome.is_success());
        assert_eq!(outcome.fields().unwrap()["serviceID"], "100");

        assert!(!CallOutcome::Unavailable.is_success());
        assert!(CallOutcome::Unavailable.fields().is_none());
    }

    #[test]
    fn test_serialized_shape() {
        assert_eq!(serde_json::to_value(CallOutcome::Unavailable).unwrap(), json!("unavailable"));
        assert_eq!(
            serde_json::to_value(CallOutcome::Success(fields())).unwrap(),
            json!({ "success": { "serviceID": "100", "gatewayList": [] } })
        );
    }

    #[test]
    fn test_serde_preserves_outcome() {
        for outcome in [CallOutcome::Success(fields()), CallOutcome::Unavailable] {
            let bytes = serde_json::to_vec(&outcome).unwrap();
            let back: CallOutcome = serde_json::from_slice(&bytes).unwrap();
            assert_eq!(back, outcome);
        }
    }

    #[test]
    fn test_from_option() {
        assert_eq!(CallOutcome::from(None), CallOutcome::Unavailable);
        assert!(CallOutcome::from(Some(fields())).is_success());
    }
}

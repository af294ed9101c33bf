//! Audit logging for security-relevant gateway events.
//!
//! Audit events go to the dedicated `audit` tracing target so they can be
//! routed to a separate sink. Shared keys never appear in an event and
//! received hashes are shortened to a prefix.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// Number of hash characters kept when an event records a received hash.
const HASH_PREFIX_LEN: usize = 8;

/// Types of auditable events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditEventType {
    /// An inbound callback passed hash verification.
    CallbackVerified,
    /// An inbound callback failed hash verification and was rejected.
    CallbackRejected,
    /// A remote call failed and was reported as unavailable.
    RemoteCallFailed,
    /// A call was refused because configuration was missing or invalid.
    ConfigurationRejected,
}

impl AuditEventType {
    /// Rejections are security events; everything else is operational.
    #[must_use]
    pub const fn is_security_event(&self) -> bool {
        matches!(self, Self::CallbackRejected)
    }
}

/// Contextual fields of an audit event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditDetails {
    /// Gateway endpoint involved, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Order id carried by a callback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    /// Prefix of the hash that was received.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_hash: Option<String>,
    /// Error message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Audit log entry.
///
/// # Examples
///
/// ```
/// use bluepayment_client::security::audit::{AuditEvent, AuditEventType, audit_log};
///
/// let event = AuditEvent::new(AuditEventType::CallbackRejected)
///     .with_service_id("100")
///     .with_order_id("000001")
///     .with_received_hash("a1b2c3d4e5f60718293a");
///
/// audit_log(&event);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// When the event occurred.
    pub timestamp: SystemTime,
    /// What happened.
    pub event_type: AuditEventType,
    /// Merchant service id the event relates to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    /// Message id correlating request and response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    /// Event details.
    pub details: AuditDetails,
}

impl AuditEvent {
    /// Creates an event stamped with the current time.
    #[must_use]
    pub fn new(event_type: AuditEventType) -> Self {
        Self {
            timestamp: SystemTime::now(),
            event_type,
            service_id: None,
            message_id: None,
            details: AuditDetails::default(),
        }
    }

    /// Adds the merchant service id.
    #[must_use]
    pub fn with_service_id(mut self, service_id: impl Into<String>) -> Self {
        self.service_id = Some(service_id.into());
        self
    }

    /// Adds the message id.
    #[must_use]
    pub fn with_message_id(mut self, message_id: impl Into<String>) -> Self {
        self.message_id = Some(message_id.into());
        self
    }

    /// Adds the endpoint URL.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.details.endpoint = Some(endpoint.into());
        self
    }

    /// Adds the order id.
    #[must_use]
    pub fn with_order_id(mut self, order_id: impl Into<String>) -> Self {
        self.details.order_id = Some(order_id.into());
        self
    }

    /// Records a received hash, keeping only its prefix.
    #[must_use]
    pub fn with_received_hash(mut self, hash: &str) -> Self {
        self.details.received_hash = Some(truncate_hash(hash));
        self
    }

    /// Adds an error message.
    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.details.error = Some(error.into());
        self
    }
}

/// Logs an audit event on the `audit` target.
///
/// Security events are logged at `error`, the rest at `info`.
pub fn audit_log(event: &AuditEvent) {
    let details = serde_json::to_string(&event.details).unwrap_or_default();
    if event.event_type.is_security_event() {
        tracing::error!(
            target: "audit",
            timestamp = ?event.timestamp,
            event_type = ?event.event_type,
            service_id = event.service_id.as_deref(),
            message_id = event.message_id.as_deref(),
            details = %details,
            "AUDIT"
        );
    } else {
        tracing::info!(
            target: "audit",
            timestamp = ?event.timestamp,
            event_type = ?event.event_type,
            service_id = event.service_id.as_deref(),
            message_id = event.message_id.as_deref(),
            details = %details,
            "AUDIT"
        );
    }
}

/// Shortens a hash to a fixed prefix followed by an ellipsis.
///
/// # Examples
///
/// ```
/// use bluepayment_client::security::audit::truncate_hash;
///
/// assert_eq!(truncate_hash("0123456789abcdef"), "01234567...");
/// assert_eq!(truncate_hash("abc"), "abc");
/// ```
#[must_use]
pub fn truncate_hash(hash: &str) -> String {
    if hash.chars().count() <= HASH_PREFIX_LEN {
        return hash.to_owned();
    }
    let prefix: String = hash.chars().take(HASH_PREFIX_LEN).collect();
    format!("{prefix}...")
}

/// Replaces every occurrence of `secret` in `input`.
///
/// Used on error messages that might echo request data back.
///
/// # Examples
///
/// ```
/// use bluepayment_client::security::audit::redact_secret;
///
/// assert_eq!(redact_secret("bad body: 1|abc|s3cr3t", "s3cr3t"), "bad body: 1|abc|[REDACTED]");
/// ```
#[must_use]
pub fn redact_secret(input: &str, secret: &str) -> String {
    if secret.is_empty() {
        return input.to_owned();
    }
    input.replace(secret, "[REDACTED]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_builder() {
        let event = AuditEvent::new(AuditEventType::RemoteCallFailed)
            .with_service_id("100")
            .with_message_id("m-1")
            .with_endpoint("https://pay.example.com/gatewayList")
            .with_error("timeout");

        assert_eq!(event.service_id.as_deref(), Some("100"));
        assert_eq!(event.message_id.as_deref(), Some("m-1"));
        assert_eq!(event.details.endpoint.as_deref(), Some("https://pay.example.com/gatewayList"));
        assert_eq!(event.details.error.as_deref(), Some("timeout"));
    }

    #[test]
    fn test_received_hash_is_truncated() {
        let hash = "f".repeat(64);
        let event = AuditEvent::new(AuditEventType::CallbackRejected).with_received_hash(&hash);
        assert_eq!(event.details.received_hash.as_deref(), Some("ffffffff..."));
    }

    #[test]
    fn test_security_classification() {
        assert!(AuditEventType::CallbackRejected.is_security_event());
        assert!(!AuditEventType::CallbackVerified.is_security_event());
        assert!(!AuditEventType::RemoteCallFailed.is_security_event());
    }

    #[test]
    fn test_details_skip_empty_fields() {
        let details = AuditDetails { order_id: Some("o-1".to_owned()), ..AuditDetails::default() };
        let json = serde_json::to_string(&details).unwrap();
        assert_eq!(json, r#"{"order_id":"o-1"}"#);
    }

    #[test]
    fn test_event_type_serialization() {
        let json = serde_json::to_string(&AuditEventType::CallbackRejected).unwrap();
        assert_eq!(json, r#"{"type":"callback_rejected"}"#);
    }

    #[test]
    fn test_redact_secret_empty_secret() {
        assert_eq!(redact_secret("message", ""), "message");
    }

    #[test]
    fn test_audit_log_does_not_panic() {
        audit_log(&AuditEvent::new(AuditEventType::CallbackVerified));
        audit_log(&AuditEvent::new(AuditEventType::CallbackRejected).with_error("mismatch"));
    }
}

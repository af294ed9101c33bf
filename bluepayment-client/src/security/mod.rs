//! Security controls around inbound gateway data.
//!
//! # Audit Logging
//!
//! The [`audit`] module emits structured events on the `audit` tracing
//! target. Hash mismatches on callbacks are logged at `error`, above the
//! `warn` level used for transport failures:
//!
//! ```rust
//! use bluepayment_client::security::audit::{AuditEvent, AuditEventType, audit_log};
//!
//! let event = AuditEvent::new(AuditEventType::CallbackRejected)
//!     .with_service_id("100")
//!     .with_error("hash mismatch");
//!
//! audit_log(&event);
//! ```

pub mod audit;

pub use audit::{AuditDetails, AuditEvent, AuditEventType, audit_log, redact_secret, truncate_hash};

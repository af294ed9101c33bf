//! Verification of signed payloads received from the gateway.
//!
//! Callbacks and return redirects carry the same `Hash` field as outbound
//! requests. Nothing in a payload may be trusted until the hash has been
//! recomputed locally and matched.

use tracing::{debug, instrument};

use crate::{
    error::{GatewayError, Result},
    hash::{FieldValue, MessageSigner, SignedFields},
    security::audit::{AuditEvent, AuditEventType, audit_log},
};

/// Field carrying the merchant service id in gateway payloads.
pub const SERVICE_ID_FIELD: &str = "ServiceID";

/// Field carrying the order id in gateway payloads.
pub const ORDER_ID_FIELD: &str = "OrderID";

/// A payload whose hash has been checked.
///
/// Only obtainable through [`CallbackVerifier::verify_strict`], so code that
/// accepts a `VerifiedCallback` cannot act on unverified data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedCallback {
    fields: SignedFields,
}

impl VerifiedCallback {
    /// All received fields, `Hash` included.
    #[must_use]
    pub const fn fields(&self) -> &SignedFields {
        &self.fields
    }

    /// Returns a field value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Consumes the wrapper, returning the fields.
    #[must_use]
    pub fn into_fields(self) -> SignedFields {
        self.fields
    }
}

/// Verifies gateway hashes on inbound payloads.
///
/// Uses the same value ordering as [`MessageSigner`]: every field except
/// `Hash`, in received order, then the shared key. Hex digests are compared
/// case-insensitively.
///
/// # Examples
///
/// ```
/// use bluepayment_client::hash::{CallbackVerifier, HashAlgorithm, MessageSigner, SignedFields};
///
/// let signer = MessageSigner::new(HashAlgorithm::Sha256, "|");
/// let payload = SignedFields::new()
///     .with("ServiceID", "100")
///     .with("OrderID", "000001")
///     .with_hash(&signer, "shared-key");
///
/// let verifier = CallbackVerifier::new(signer);
/// assert!(verifier.verify(&payload, "shared-key"));
/// assert!(!verifier.verify(&payload, "other-key"));
/// ```
#[derive(Debug, Clone)]
pub struct CallbackVerifier {
    signer: MessageSigner,
}

impl CallbackVerifier {
    /// Creates a verifier using the given hashing settings.
    #[must_use]
    pub const fn new(signer: MessageSigner) -> Self {
        Self { signer }
    }

    /// Returns true if `fields` carries a `Hash` matching its other values.
    ///
    /// A payload without `Hash` never verifies.
    #[must_use]
    pub fn verify(&self, fields: &SignedFields, secret: &str) -> bool {
        let Some(received) = fields.hash() else {
            return false;
        };
        let expected = self.signer.sign(fields, secret);
        let received = received.to_string().to_ascii_lowercase();
        constant_time_eq(expected.as_bytes(), received.as_bytes())
    }

    /// Verifies `fields`, wrapping them on success.
    ///
    /// Every outcome is audited; a mismatch is logged as a security event.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Verification`] if the hash is missing or does
    /// not match. The payload must then be dropped without side effects.
    #[instrument(skip(self, fields, secret), fields(algorithm = %self.signer.algorithm()))]
    pub fn verify_strict(&self, fields: SignedFields, secret: &str) -> Result<VerifiedCallback> {
        let mut event = AuditEvent::new(AuditEventType::CallbackVerified);
        if let Some(service_id) = fields.get(SERVICE_ID_FIELD) {
            event = event.with_service_id(service_id.to_string());
        }
        if let Some(order_id) = fields.get(ORDER_ID_FIELD) {
            event = event.with_order_id(order_id.to_string());
        }

        let Some(received) = fields.hash().map(ToString::to_string) else {
            let mut event = event.with_error("missing Hash field");
            event.event_type = AuditEventType::CallbackRejected;
            audit_log(&event);
            return Err(GatewayError::Verification("payload has no Hash field".to_owned()));
        };

        if !self.verify(&fields, secret) {
            let mut event = event.with_received_hash(&received).with_error("hash mismatch");
            event.event_type = AuditEventType::CallbackRejected;
            audit_log(&event);
            return Err(GatewayError::Verification("hash mismatch".to_owned()));
        }

        audit_log(&event);
        debug!("Callback hash verified");
        Ok(VerifiedCallback { fields })
    }

    /// Verifies the parameters of a return redirect from the payment page.
    ///
    /// The gateway signs `ServiceID` and `OrderID`, in that order.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Verification`] on mismatch.
    pub fn verify_return(
        &self,
        service_id: &str,
        order_id: &str,
        hash: &str,
        secret: &str,
    ) -> Result<VerifiedCallback> {
        let fields = SignedFields::new()
            .with(SERVICE_ID_FIELD, service_id)
            .with(ORDER_ID_FIELD, order_id)
            .with(crate::hash::HASH_FIELD, hash);
        self.verify_strict(fields, secret)
    }
}

/// Compares two byte strings without an early exit on the first difference.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }

    diff == 0
}

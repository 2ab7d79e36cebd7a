//! Inbound notification verification.

use std::sync::Arc;

use serde_json::Value;

use crate::config::CredentialStore;
use crate::domain::{CanonicalPayload, RejectionReason, VerifiedNotification, WebhookOutcome};
use crate::ports::{SignatureVerifier, VerificationError};

use super::signature_engine::RsaSignatureEngine;

/// Header carrying the processor's signature on notifications.
pub const CALLBACK_SIGNATURE_HEADER: &str = "x-apay-callback";

/// Decides whether a received notification really comes from the processor.
///
/// The signature covers the canonical form of the parsed body, so
/// formatting differences in transit do not matter.
///
/// Callers pass the raw request body and the value of the
/// [`CALLBACK_SIGNATURE_HEADER`] header to [`WebhookVerifier::verify`]:
///
/// ```no_run
/// # use antilopay::adapters::antilopay::{WebhookVerifier, CALLBACK_SIGNATURE_HEADER};
/// # fn handle(verifier: &WebhookVerifier, headers: &reqwest::header::HeaderMap, body: &[u8]) {
/// let signature = headers
///     .get(CALLBACK_SIGNATURE_HEADER)
///     .and_then(|v| v.to_str().ok())
///     .unwrap_or_default();
/// let outcome = verifier.verify(body, signature);
/// # let _ = outcome;
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct WebhookVerifier<V = RsaSignatureEngine> {
    verifier: V,
}

impl WebhookVerifier<RsaSignatureEngine> {
    pub fn new(store: Arc<CredentialStore>) -> Self {
        Self::with_verifier(RsaSignatureEngine::new(store))
    }
}

impl<V: SignatureVerifier> WebhookVerifier<V> {
    pub fn with_verifier(verifier: V) -> Self {
        Self { verifier }
    }

    /// Judge one notification.
    ///
    /// Bad input (unparseable body, wrong or garbled signature) is a
    /// `Rejected` outcome. `Err` is reserved for a broken local public key,
    /// which no notification can pass.
    pub fn verify(
        &self,
        raw_body: &[u8],
        claimed_signature: &str,
    ) -> Result<WebhookOutcome, VerificationError> {
        let payload = match serde_json::from_slice::<Value>(raw_body) {
            Ok(value @ Value::Object(_)) => value,
            Ok(_) => {
                tracing::warn!("Webhook body is not a JSON object");
                return Ok(WebhookOutcome::Rejected(RejectionReason::MalformedPayload));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to parse webhook payload");
                return Ok(WebhookOutcome::Rejected(RejectionReason::MalformedPayload));
            }
        };

        let canonical = CanonicalPayload::from_value(&payload);
        match self.verifier.verify(&canonical, claimed_signature) {
            Ok(true) => {
                let payment_id = payload.get("payment_id").and_then(Value::as_str);
                let order_id = payload.get("order_id").and_then(Value::as_str);
                tracing::info!(payment_id, order_id, "Webhook accepted");
                Ok(WebhookOutcome::Accepted(VerifiedNotification::new(payload)))
            }
            Ok(false) => {
                tracing::warn!(reason = "signature mismatch", "Webhook rejected");
                Ok(WebhookOutcome::Rejected(RejectionReason::SignatureMismatch))
            }
            Err(VerificationError::MalformedSignature(detail)) => {
                tracing::warn!(
                    reason = "signature mismatch",
                    detail = %detail,
                    "Webhook rejected: signature not decodable"
                );
                Ok(WebhookOutcome::Rejected(RejectionReason::SignatureMismatch))
            }
            Err(e) => {
                tracing::error!(error = %e, "Cannot verify webhooks");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::PayloadSigner;
    use crate::test_support::{processor_engine, test_store};
    use serde_json::json;

    fn signed(body: &Value) -> (Vec<u8>, String) {
        let signature = processor_engine()
            .sign(&CanonicalPayload::from_value(body))
            .unwrap();
        (serde_json::to_vec(body).unwrap(), signature.into_string())
    }

    #[test]
    fn processor_signed_notification_is_accepted() {
        let verifier = WebhookVerifier::new(test_store());
        let body = json!({"payment_id": "APAY1", "status": "SUCCESS", "amount": 10.0});
        let (raw, signature) = signed(&body);

        let outcome = verifier.verify(&raw, &signature).unwrap();
        let notification = outcome.accepted().expect("accepted");
        assert_eq!(notification.payload(), &body);
    }

    #[test]
    fn reformatted_body_still_verifies() {
        let verifier = WebhookVerifier::new(test_store());
        let body = json!({"b": 1, "a": "x"});
        let (_, signature) = signed(&body);

        let pretty = serde_json::to_vec_pretty(&json!({"a": "x", "b": 1})).unwrap();
        assert!(verifier.verify(&pretty, &signature).unwrap().is_accepted());
    }

    #[test]
    fn altered_body_is_rejected() {
        let verifier = WebhookVerifier::new(test_store());
        let (_, signature) = signed(&json!({"amount": 10.0}));
        let forged = serde_json::to_vec(&json!({"amount": 10000.0})).unwrap();

        assert_eq!(
            verifier.verify(&forged, &signature).unwrap(),
            WebhookOutcome::Rejected(RejectionReason::SignatureMismatch)
        );
    }

    #[test]
    fn merchant_signature_is_not_trusted_inbound() {
        let store = test_store();
        let verifier = WebhookVerifier::new(store.clone());
        let body = json!({"payment_id": "APAY1"});
        let signature = RsaSignatureEngine::new(store)
            .sign(&CanonicalPayload::from_value(&body))
            .unwrap();

        let outcome = verifier
            .verify(&serde_json::to_vec(&body).unwrap(), signature.as_str())
            .unwrap();
        assert_eq!(outcome.rejection(), Some(RejectionReason::SignatureMismatch));
    }

    #[test]
    fn malformed_bodies_are_rejected() {
        let verifier = WebhookVerifier::new(test_store());
        for raw in [&b"{not json"[..], b"", b"[1,2,3]", b"\"text\""] {
            assert_eq!(
                verifier.verify(raw, "c2ln").unwrap(),
                WebhookOutcome::Rejected(RejectionReason::MalformedPayload)
            );
        }
    }

    #[test]
    fn garbled_signature_is_a_mismatch_not_an_error() {
        let verifier = WebhookVerifier::new(test_store());
        let raw = serde_json::to_vec(&json!({"a": 1})).unwrap();

        assert_eq!(
            verifier.verify(&raw, "%%%").unwrap(),
            WebhookOutcome::Rejected(RejectionReason::SignatureMismatch)
        );
    }

    #[test]
    fn key_faults_are_errors() {
        struct BrokenKey;
        impl SignatureVerifier for BrokenKey {
            fn verify(&self, _: &CanonicalPayload, _: &str) -> Result<bool, VerificationError> {
                Err(VerificationError::InvalidKey("truncated PEM".to_string()))
            }
        }

        let verifier = WebhookVerifier::with_verifier(BrokenKey);
        let raw = serde_json::to_vec(&json!({"a": 1})).unwrap();
        assert!(matches!(
            verifier.verify(&raw, "c2ln"),
            Err(VerificationError::InvalidKey(_))
        ));
    }
}

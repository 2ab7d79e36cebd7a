//! RSA signature engine.
//!
//! Signs outbound payloads with the merchant's private key and verifies
//! inbound payloads with the processor's public key (PKCS#1 v1.5 over the
//! configured SHA-2 digest). Keys are read from the [`CredentialStore`] on
//! every call; nothing is cached here.

use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::{crypto, Algorithm, DecodingKey, EncodingKey};
use secrecy::ExposeSecret;
use serde::Serialize;

use crate::config::{CredentialStore, SignatureAlgorithm};
use crate::domain::CanonicalPayload;
use crate::ports::{PayloadSigner, Signature, SignatureVerifier, SigningError, VerificationError};

/// Signs and verifies canonical payloads with the keys held by a store.
#[derive(Debug, Clone)]
pub struct RsaSignatureEngine {
    store: Arc<CredentialStore>,
}

impl RsaSignatureEngine {
    pub fn new(store: Arc<CredentialStore>) -> Self {
        Self { store }
    }

    /// Sign raw bytes.
    pub fn sign_bytes(&self, message: &[u8]) -> Result<Signature, SigningError> {
        let pem = self.store.credentials().private_signing_key().expose_secret();
        if pem.trim().is_empty() {
            return Err(SigningError::MissingKey);
        }
        let key = EncodingKey::from_rsa_pem(pem.as_bytes())
            .map_err(|e| SigningError::InvalidKey(e.to_string()))?;

        let runtime = self.store.runtime();
        let url_safe = crypto::sign(message, &key, jwt_algorithm(runtime.signature_algorithm))
            .map_err(|e| SigningError::Crypto(e.to_string()))?;

        // jsonwebtoken hands back unpadded base64url; re-render per configuration.
        let raw = URL_SAFE_NO_PAD
            .decode(url_safe)
            .map_err(|e| SigningError::Crypto(e.to_string()))?;

        Ok(Signature::new(runtime.signature_encoding.encode(&raw)))
    }

    /// Verify a text-encoded signature over raw bytes.
    pub fn verify_bytes(&self, message: &[u8], signature: &str) -> Result<bool, VerificationError> {
        let pem = self
            .store
            .credentials()
            .public_verification_key()
            .expose_secret();
        if pem.trim().is_empty() {
            return Err(VerificationError::MissingKey);
        }
        let key = DecodingKey::from_rsa_pem(pem.as_bytes())
            .map_err(|e| VerificationError::InvalidKey(e.to_string()))?;

        let runtime = self.store.runtime();
        let raw = runtime
            .signature_encoding
            .decode(signature.trim())
            .map_err(VerificationError::MalformedSignature)?;
        if raw.is_empty() {
            return Err(VerificationError::MalformedSignature(
                "empty signature".to_string(),
            ));
        }

        crypto::verify(
            &URL_SAFE_NO_PAD.encode(raw),
            message,
            &key,
            jwt_algorithm(runtime.signature_algorithm),
        )
        .map_err(|e| VerificationError::InvalidKey(e.to_string()))
    }

    /// Canonicalize and sign any serializable value.
    pub fn sign_json<T>(&self, value: &T) -> Result<Signature, SigningError>
    where
        T: Serialize + ?Sized,
    {
        let payload = CanonicalPayload::from_serialize(value)
            .map_err(|e| SigningError::Serialization(e.to_string()))?;
        self.sign(&payload)
    }

    /// Canonicalize any serializable value and verify a signature over it.
    pub fn verify_json<T>(&self, value: &T, signature: &str) -> Result<bool, VerificationError>
    where
        T: Serialize + ?Sized,
    {
        let payload = CanonicalPayload::from_serialize(value)
            .map_err(|e| VerificationError::Serialization(e.to_string()))?;
        self.verify(&payload, signature)
    }
}

impl PayloadSigner for RsaSignatureEngine {
    fn sign(&self, payload: &CanonicalPayload) -> Result<Signature, SigningError> {
        self.sign_bytes(payload.as_bytes())
    }
}

impl SignatureVerifier for RsaSignatureEngine {
    fn verify(
        &self,
        payload: &CanonicalPayload,
        signature: &str,
    ) -> Result<bool, VerificationError> {
        self.verify_bytes(payload.as_bytes(), signature)
    }
}

fn jwt_algorithm(algorithm: SignatureAlgorithm) -> Algorithm {
    match algorithm {
        SignatureAlgorithm::RS256 => Algorithm::RS256,
        SignatureAlgorithm::RS384 => Algorithm::RS384,
        SignatureAlgorithm::RS512 => Algorithm::RS512,
    }
}

//! Signature ports.
//!
//! Signing authenticates this merchant to the processor; verification
//! authenticates the processor to this merchant. The two directions use
//! different keys, so they are separate traits.

use std::fmt;

use thiserror::Error;

use crate::domain::CanonicalPayload;

/// Produces the signature sent with an outbound request.
pub trait PayloadSigner: Send + Sync {
    /// Sign the canonical bytes with the merchant's private key.
    fn sign(&self, payload: &CanonicalPayload) -> Result<Signature, SigningError>;
}

/// Checks the signature attached to inbound data.
pub trait SignatureVerifier: Send + Sync {
    /// Check `signature` against the canonical bytes with the processor's
    /// public key.
    ///
    /// A mismatch is `Ok(false)`. `Err` means the check could not be made.
    fn verify(&self, payload: &CanonicalPayload, signature: &str)
        -> Result<bool, VerificationError>;
}

/// Text-encoded signature, as carried in headers.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Signature(String);

impl Signature {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Signatures are long and useless in logs.
impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({} chars)", self.0.len())
    }
}

/// Signing could not produce a signature.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SigningError {
    #[error("Private signing key is not configured")]
    MissingKey,

    #[error("Private signing key is malformed: {0}")]
    InvalidKey(String),

    #[error("Payload cannot be serialized: {0}")]
    Serialization(String),

    #[error("Signature computation failed: {0}")]
    Crypto(String),
}

/// Verification could not be carried out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("Public verification key is not configured")]
    MissingKey,

    #[error("Public verification key is malformed: {0}")]
    InvalidKey(String),

    #[error("Signature is not validly encoded: {0}")]
    MalformedSignature(String),

    #[error("Payload cannot be serialized: {0}")]
    Serialization(String),
}

impl VerificationError {
    /// Faults in the local key, as opposed to faults in the inbound data.
    pub fn is_configuration_fault(&self) -> bool {
        matches!(self, Self::MissingKey | Self::InvalidKey(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_debug_hides_value() {
        let signature = Signature::new("c2VjcmV0");
        assert_eq!(format!("{:?}", signature), "Signature(8 chars)");
        assert_eq!(signature.to_string(), "c2VjcmV0");
    }

    #[test]
    fn configuration_faults() {
        assert!(VerificationError::MissingKey.is_configuration_fault());
        assert!(VerificationError::InvalidKey("bad".into()).is_configuration_fault());
        assert!(!VerificationError::MalformedSignature("bad".into()).is_configuration_fault());
    }
}

//! Merchant credentials

use std::path::{Path, PathBuf};

use jsonwebtoken::{DecodingKey, EncodingKey};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::{ConfigError, ValidationError};

/// Credentials as they arrive from the environment.
///
/// Each key may be supplied inline (PEM text) or as a path to a PEM file.
/// Inline values win when both are present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialsConfig {
    /// Project identifier issued by Antilopay
    #[serde(default)]
    pub project_id: String,

    /// Secret identifier sent with every request
    #[serde(default)]
    pub secret_id: String,

    /// Merchant private signing key (PEM)
    pub private_key: Option<SecretString>,

    /// Path to the merchant private signing key
    pub private_key_file: Option<PathBuf>,

    /// Processor public verification key (PEM)
    pub public_key: Option<SecretString>,

    /// Path to the processor public verification key
    pub public_key_file: Option<PathBuf>,
}

impl CredentialsConfig {
    /// Resolve inline values and key files into [`Credentials`].
    ///
    /// Missing values resolve to empty strings; [`Credentials::validate`]
    /// reports them.
    pub fn resolve(&self) -> Result<Credentials, ConfigError> {
        let private_key = resolve_key(&self.private_key, self.private_key_file.as_deref())?;
        let public_key = resolve_key(&self.public_key, self.public_key_file.as_deref())?;

        Ok(Credentials::new(
            self.project_id.clone(),
            self.secret_id.clone(),
            private_key,
            public_key,
        ))
    }
}

fn resolve_key(inline: &Option<SecretString>, file: Option<&Path>) -> Result<String, ConfigError> {
    if let Some(key) = inline {
        if !key.expose_secret().trim().is_empty() {
            return Ok(key.expose_secret().clone());
        }
    }

    match file {
        Some(path) => std::fs::read_to_string(path).map_err(|source| ConfigError::KeyFile {
            path: path.to_path_buf(),
            source,
        }),
        None => Ok(String::new()),
    }
}

/// The four identity and key values of a merchant account.
///
/// The private key signs outbound requests; the public key belongs to the
/// processor and verifies inbound notifications.
#[derive(Debug, Clone)]
pub struct Credentials {
    project_id: String,
    secret_id: String,
    private_signing_key: SecretString,
    public_verification_key: SecretString,
}

impl Credentials {
    /// Create credentials from raw values.
    pub fn new(
        project_id: impl Into<String>,
        secret_id: impl Into<String>,
        private_signing_key: impl Into<String>,
        public_verification_key: impl Into<String>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            secret_id: secret_id.into(),
            private_signing_key: SecretString::new(private_signing_key.into()),
            public_verification_key: SecretString::new(public_verification_key.into()),
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn secret_id(&self) -> &str {
        &self.secret_id
    }

    pub fn private_signing_key(&self) -> &SecretString {
        &self.private_signing_key
    }

    pub fn public_verification_key(&self) -> &SecretString {
        &self.public_verification_key
    }

    /// Validate credentials
    ///
    /// All four values must be present, the secret identifier must be usable
    /// as a header value, and each key must be a parseable RSA key of the kind
    /// its slot expects.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.project_id.trim().is_empty() {
            return Err(ValidationError::MissingRequired("PROJECT_ID"));
        }
        if self.secret_id.trim().is_empty() {
            return Err(ValidationError::MissingRequired("SECRET_ID"));
        }
        if !self.secret_id.bytes().all(|b| b.is_ascii_graphic()) {
            return Err(ValidationError::InvalidSecretId);
        }

        let private_pem = self.private_signing_key.expose_secret();
        if private_pem.trim().is_empty() {
            return Err(ValidationError::MissingRequired("PRIVATE_KEY"));
        }
        let public_pem = self.public_verification_key.expose_secret();
        if public_pem.trim().is_empty() {
            return Err(ValidationError::MissingRequired("PUBLIC_KEY"));
        }

        match pem_label(private_pem) {
            Some(label) if label.ends_with("PRIVATE KEY") => {}
            Some(label) if label.ends_with("PUBLIC KEY") => {
                return Err(ValidationError::KeyInWrongSlot("private_key"));
            }
            _ => {
                return Err(ValidationError::InvalidKey {
                    field: "private_key",
                    reason: "expected a PEM private key block".to_string(),
                });
            }
        }
        EncodingKey::from_rsa_pem(private_pem.as_bytes()).map_err(|e| {
            ValidationError::InvalidKey {
                field: "private_key",
                reason: e.to_string(),
            }
        })?;

        match pem_label(public_pem) {
            Some(label) if label.ends_with("PUBLIC KEY") => {}
            Some(label) if label.ends_with("PRIVATE KEY") => {
                return Err(ValidationError::KeyInWrongSlot("public_key"));
            }
            _ => {
                return Err(ValidationError::InvalidKey {
                    field: "public_key",
                    reason: "expected a PEM public key block".to_string(),
                });
            }
        }
        DecodingKey::from_rsa_pem(public_pem.as_bytes()).map_err(|e| {
            ValidationError::InvalidKey {
                field: "public_key",
                reason: e.to_string(),
            }
        })?;

        Ok(())
    }
}

/// Returns the label of the first PEM block, e.g. `RSA PRIVATE KEY`.
fn pem_label(pem: &str) -> Option<&str> {
    let start = pem.find("-----BEGIN ")? + "-----BEGIN ".len();
    let rest = &pem[start..];
    let end = rest.find("-----")?;
    Some(&rest[..end])
}

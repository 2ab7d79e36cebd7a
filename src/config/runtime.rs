//! Runtime API configuration

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;

use super::error::ValidationError;

/// Production API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.antilopay.com/v1";

/// Runtime knobs of the API client.
///
/// Unlike credentials these may change after startup through
/// [`CredentialStore`](super::CredentialStore).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RuntimeConfig {
    /// API base endpoint, without trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Signature scheme version sent as `X-Apay-Sign-Version`
    #[serde(default = "default_sign_version")]
    pub sign_version: u32,

    /// Timeout for a single HTTP exchange, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Digest and signature algorithm
    #[serde(default)]
    pub signature_algorithm: SignatureAlgorithm,

    /// Text encoding of signatures
    #[serde(default)]
    pub signature_encoding: SignatureEncoding,
}

/// RSA PKCS#1 v1.5 signature variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum SignatureAlgorithm {
    #[default]
    #[serde(alias = "rs256", alias = "SHA256withRSA")]
    RS256,
    #[serde(alias = "rs384", alias = "SHA384withRSA")]
    RS384,
    #[serde(alias = "rs512", alias = "SHA512withRSA")]
    RS512,
}

/// How signature bytes are rendered as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureEncoding {
    #[default]
    Base64,
    Hex,
}

impl SignatureEncoding {
    /// Render raw signature bytes.
    pub fn encode(&self, bytes: &[u8]) -> String {
        match self {
            SignatureEncoding::Base64 => STANDARD.encode(bytes),
            SignatureEncoding::Hex => hex::encode(bytes),
        }
    }

    /// Parse a rendered signature back into bytes.
    pub fn decode(&self, text: &str) -> Result<Vec<u8>, String> {
        match self {
            SignatureEncoding::Base64 => STANDARD.decode(text).map_err(|e| e.to_string()),
            SignatureEncoding::Hex => hex::decode(text).map_err(|e| e.to_string()),
        }
    }
}

impl RuntimeConfig {
    /// Absolute URL of an API operation, e.g. `payment/create`.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate runtime configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_base_url(&self.base_url)?;
        if self.sign_version == 0 {
            return Err(ValidationError::InvalidSignVersion);
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            sign_version: default_sign_version(),
            request_timeout_secs: default_request_timeout(),
            signature_algorithm: SignatureAlgorithm::default(),
            signature_encoding: SignatureEncoding::default(),
        }
    }
}

/// HTTPS is required except for loopback hosts, which local test servers use.
pub(crate) fn validate_base_url(url: &str) -> Result<(), ValidationError> {
    if url.trim().is_empty() {
        return Err(ValidationError::MissingRequired("API_BASE_URL"));
    }
    if let Some(rest) = url.strip_prefix("https://") {
        return if rest.is_empty() || rest.starts_with('/') {
            Err(ValidationError::InvalidBaseUrl)
        } else {
            Ok(())
        };
    }
    if let Some(rest) = url.strip_prefix("http://") {
        return if is_loopback(rest) {
            Ok(())
        } else {
            Err(ValidationError::BaseUrlMustBeHttps)
        };
    }
    Err(ValidationError::InvalidBaseUrl)
}

fn is_loopback(authority_and_path: &str) -> bool {
    if authority_and_path.starts_with("[::1]") {
        return true;
    }
    let host = authority_and_path
        .split(|c| c == ':' || c == '/')
        .next()
        .unwrap_or_default();
    host == "localhost" || host == "127.0.0.1"
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_sign_version() -> u32 {
    1
}

fn default_request_timeout() -> u64 {
    30
}

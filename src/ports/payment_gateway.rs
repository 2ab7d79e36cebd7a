//! Payment gateway port.
//!
//! Defines the contract for creating payments with an external processor.
//! The Antilopay client implements it; downstream code and tests can swap in
//! the mock.
//!
//! # Error model
//!
//! - `Transport` is the only retryable kind; retry policy lives with the caller
//! - `Api` is a definitive processor decision and is never retried
//! - `Protocol` means the integration is broken, not that a payment failed

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use super::signature::SigningError;
use crate::domain::{PaymentIntentRequest, PaymentIntentResponse, ProtocolError, ValidationError};

/// Port for payment creation.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment.
    ///
    /// Order id uniqueness is the caller's contract; duplicates come back as
    /// `PaymentError::Api`.
    async fn create_payment_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> Result<PaymentIntentResponse, PaymentError>;

    /// Ask the processor whether it accepts our signature over `body`.
    async fn check_signature(&self, body: &Value) -> Result<SignatureCheck, PaymentError>;
}

/// Processor verdict on a signature round-trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureCheck {
    Valid,
    Invalid { message: String },
}

impl SignatureCheck {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Errors from payment gateway operations.
#[derive(Debug, Clone, Error)]
pub enum PaymentError {
    /// Credentials or runtime settings unusable; nothing was sent.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The request failed local validation; nothing was sent.
    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),

    /// The request could not be signed; nothing was sent.
    #[error("Signing failed: {0}")]
    Signing(#[from] SigningError),

    /// Network fault or timeout.
    #[error("Transport error: {message}")]
    Transport { message: String, timeout: bool },

    /// The processor rejected the request.
    #[error("Processor rejected request with code {code}: {message}")]
    Api { code: i64, message: String },

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl PaymentError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            timeout: false,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            timeout: true,
        }
    }

    pub fn api(code: i64, message: impl Into<String>) -> Self {
        Self::Api {
            code,
            message: message.into(),
        }
    }

    /// Whether an external retry policy may try again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::Validation(_) => "validation",
            Self::Signing(_) => "signing",
            Self::Transport { .. } => "transport",
            Self::Api { .. } => "api",
            Self::Protocol(_) => "protocol",
        }
    }
}

//! Antilopay payment processor adapter.
//!
//! Implements the `PaymentGateway` port for the Antilopay API, including:
//! - RSA request signing over canonical JSON
//! - Authentication header assembly
//! - Payment creation and reply reconciliation
//! - Inbound notification verification
//!
//! # Keys
//!
//! - Outbound requests are signed with the merchant's private key
//! - Inbound notifications are verified with the processor's public key
//! - Key material lives in `CredentialStore` as `secrecy::SecretString`

mod auth_headers;
mod client;
#[cfg(any(test, feature = "test-utils"))]
mod mock_payment_gateway;
mod signature_engine;
mod webhook_verifier;
mod wire_types;

pub use auth_headers::{
    AuthHeaderBuilder, AuthHeaders, SECRET_ID_HEADER, SIGNATURE_HEADER, SIGN_VERSION_HEADER,
};
pub use client::AntilopayClient;
#[cfg(any(test, feature = "test-utils"))]
pub use mock_payment_gateway::{MethodCall, MockPaymentGateway};
pub use signature_engine::RsaSignatureEngine;
pub use webhook_verifier::{WebhookVerifier, CALLBACK_SIGNATURE_HEADER};
pub use wire_types::{
    CreatePaymentBody, CreatePaymentReply, SignatureCheckReply, INVALID_SIGNATURE_CODE,
};

//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `antilopay` - Signed HTTP client, RSA signature engine, webhook verifier

pub mod antilopay;

pub use antilopay::{AntilopayClient, RsaSignatureEngine, WebhookVerifier};

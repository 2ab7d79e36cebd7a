//! Shared fixtures for unit tests.

use std::sync::Arc;

use crate::adapters::antilopay::RsaSignatureEngine;
use crate::config::{CredentialStore, Credentials, RuntimeConfig};

pub const MERCHANT_PRIVATE_KEY: &str = include_str!("../tests/fixtures/merchant_private_key.pem");
pub const MERCHANT_PUBLIC_KEY: &str = include_str!("../tests/fixtures/merchant_public_key.pem");
pub const PROCESSOR_PRIVATE_KEY: &str =
    include_str!("../tests/fixtures/processor_private_key.pem");
pub const PROCESSOR_PUBLIC_KEY: &str = include_str!("../tests/fixtures/processor_public_key.pem");

/// Merchant credentials: our private key, the processor's public key.
pub fn test_credentials() -> Credentials {
    Credentials::new(
        "proj_test",
        "secret_test",
        MERCHANT_PRIVATE_KEY,
        PROCESSOR_PUBLIC_KEY,
    )
}

pub fn test_store() -> Arc<CredentialStore> {
    CredentialStore::shared(test_credentials(), RuntimeConfig::default())
        .expect("fixture credentials are valid")
}

/// The processor's side: signs notifications, verifies merchant requests.
pub fn processor_engine() -> RsaSignatureEngine {
    let credentials = Credentials::new(
        "processor",
        "processor",
        PROCESSOR_PRIVATE_KEY,
        MERCHANT_PUBLIC_KEY,
    );
    let store = CredentialStore::shared(credentials, RuntimeConfig::default())
        .expect("fixture credentials are valid");
    RsaSignatureEngine::new(store)
}

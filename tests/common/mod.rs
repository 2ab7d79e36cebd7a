//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use antilopay::config::{CredentialStore, Credentials, RuntimeConfig};
use antilopay::domain::{Customer, PaymentIntentRequest};
use antilopay::RsaSignatureEngine;
use rust_decimal::Decimal;

pub const MERCHANT_PRIVATE_KEY: &str = include_str!("../fixtures/merchant_private_key.pem");
pub const MERCHANT_PUBLIC_KEY: &str = include_str!("../fixtures/merchant_public_key.pem");
pub const PROCESSOR_PRIVATE_KEY: &str = include_str!("../fixtures/processor_private_key.pem");
pub const PROCESSOR_PUBLIC_KEY: &str = include_str!("../fixtures/processor_public_key.pem");

pub const PROJECT_ID: &str = "proj_test";
pub const SECRET_ID: &str = "secret_test";

/// Merchant store pointed at `base_url`.
pub fn merchant_store(base_url: &str) -> Arc<CredentialStore> {
    let credentials = Credentials::new(
        PROJECT_ID,
        SECRET_ID,
        MERCHANT_PRIVATE_KEY,
        PROCESSOR_PUBLIC_KEY,
    );
    let runtime = RuntimeConfig {
        base_url: base_url.to_string(),
        ..RuntimeConfig::default()
    };
    CredentialStore::shared(credentials, runtime).unwrap()
}

/// The processor's side of the key exchange: signs notifications with its
/// private key and checks merchant requests with the merchant public key.
pub fn processor_engine() -> RsaSignatureEngine {
    let credentials = Credentials::new(
        "processor",
        "processor",
        PROCESSOR_PRIVATE_KEY,
        MERCHANT_PUBLIC_KEY,
    );
    RsaSignatureEngine::new(CredentialStore::shared(credentials, RuntimeConfig::default()).unwrap())
}

pub fn payment_request(order_id: &str) -> PaymentIntentRequest {
    PaymentIntentRequest::new(
        order_id,
        Decimal::from(10),
        "Subscription",
        "Monthly plan",
        Customer::from_email("a@b.com").unwrap(),
    )
    .with_currency("RUB")
}

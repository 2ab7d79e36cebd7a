//! Antilopay - signed client for the Antilopay payment API
//!
//! Creates payments over the processor's HTTPS API, authenticating every
//! request with an RSA signature over canonical JSON, and verifies the
//! signatures on inbound payment notifications.
//!
//! # Example
//!
//! ```no_run
//! use antilopay::adapters::AntilopayClient;
//! use antilopay::config::AppConfig;
//! use antilopay::domain::{Customer, PaymentIntentRequest};
//! use antilopay::ports::PaymentGateway;
//! use rust_decimal::Decimal;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let store = AppConfig::load()?.into_store()?;
//! let client = AntilopayClient::new(store);
//!
//! let request = PaymentIntentRequest::new(
//!     PaymentIntentRequest::generate_order_id(),
//!     Decimal::new(1000, 2),
//!     "Subscription",
//!     "Monthly plan",
//!     Customer::from_email("payer@example.com")?,
//! );
//! let response = client.create_payment_intent(&request).await?;
//! println!("Pay at {}", response.payment_url());
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;

#[cfg(test)]
mod test_support;

pub use adapters::{AntilopayClient, RsaSignatureEngine, WebhookVerifier};
pub use config::{AppConfig, CredentialStore};
pub use ports::{PaymentError, PaymentGateway};

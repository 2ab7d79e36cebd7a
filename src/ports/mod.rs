//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `PaymentGateway` - Payment creation and signature round-trips
//! - `PayloadSigner` / `SignatureVerifier` - Outbound signing and inbound
//!   verification, kept apart because they use different keys

mod payment_gateway;
mod signature;

pub use payment_gateway::{PaymentError, PaymentGateway, SignatureCheck};
pub use signature::{
    PayloadSigner, Signature, SignatureVerifier, SigningError, VerificationError,
};

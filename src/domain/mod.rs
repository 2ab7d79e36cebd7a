//! Domain layer: payment values and the rules they enforce.
//!
//! # Module Organization
//!
//! - `canonical` - The one byte representation signatures are computed over
//! - `customer` - Payer value object
//! - `payment_request` - Payment creation request and its validation
//! - `payment_response` - Created payment, tagged by settlement mode
//! - `webhook` - Inbound notification verdicts and typed notifications
//! - `errors` - Validation and protocol errors

mod canonical;
mod customer;
mod errors;
mod payment_request;
mod payment_response;
mod webhook;

pub use canonical::CanonicalPayload;
pub use customer::Customer;
pub use errors::{ProtocolError, ValidationError};
pub use payment_request::{
    PaymentIntentRequest, PaymentMethod, PaymentParams, ProductType, MERCHANT_EXTRA_MAX_CHARS,
};
pub use payment_response::{PaymentIntent, PaymentIntentResponse};
pub use webhook::{
    PaymentNotification, PaymentStatus, RejectionReason, VerifiedNotification, WebhookOutcome,
};

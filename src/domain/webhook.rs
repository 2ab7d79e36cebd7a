//! Inbound payment notifications and the verdict on their authenticity.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::canonical::CanonicalPayload;

/// Terminal verdict on one received notification.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookOutcome {
    Accepted(VerifiedNotification),
    Rejected(RejectionReason),
}

impl WebhookOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// The verified notification, if accepted.
    pub fn accepted(self) -> Option<VerifiedNotification> {
        match self {
            Self::Accepted(notification) => Some(notification),
            Self::Rejected(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<RejectionReason> {
        match self {
            Self::Accepted(_) => None,
            Self::Rejected(reason) => Some(*reason),
        }
    }
}

/// Why a notification was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectionReason {
    /// Body is not a JSON object.
    MalformedPayload,
    /// Signature does not match the body.
    SignatureMismatch,
}

impl RejectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedPayload => "malformed payload",
            Self::SignatureMismatch => "signature mismatch",
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A notification body whose signature checked out.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedNotification {
    payload: Value,
}

impl VerifiedNotification {
    pub(crate) fn new(payload: Value) -> Self {
        Self { payload }
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn into_payload(self) -> Value {
        self.payload
    }

    /// The exact bytes the signature covered.
    pub fn canonical(&self) -> CanonicalPayload {
        CanonicalPayload::from_value(&self.payload)
    }

    /// View the payload through the typed notification shape.
    pub fn notification(&self) -> Result<PaymentNotification, serde_json::Error> {
        PaymentNotification::deserialize(&self.payload)
    }
}

/// Payment state as reported by the processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Success,
    Fail,
    Cancel,
    Expired,
    Chargeback,
    /// Any status this crate does not know about yet.
    #[default]
    #[serde(other)]
    Unknown,
}

impl PaymentStatus {
    /// Whether the processor will not change this status any more.
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            Self::Success | Self::Fail | Self::Cancel | Self::Expired | Self::Chargeback
        )
    }
}

/// Typed view of a payment notification.
///
/// Every field is optional on the wire; unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentNotification {
    #[serde(rename = "type")]
    pub notification_type: Option<String>,

    pub payment_id: Option<String>,

    pub order_id: Option<String>,

    /// Creation time as the processor formats it
    pub ctime: Option<String>,

    pub status: PaymentStatus,

    #[serde(with = "rust_decimal::serde::float_option")]
    pub amount: Option<Decimal>,

    #[serde(with = "rust_decimal::serde::float_option")]
    pub original_amount: Option<Decimal>,

    #[serde(with = "rust_decimal::serde::float_option")]
    pub fee: Option<Decimal>,

    pub currency: Option<String>,

    pub product_name: Option<String>,

    pub description: Option<String>,

    /// Method the payer actually used
    pub pay_method: Option<String>,

    pub pay_data: Option<String>,

    pub customer: Option<Value>,

    pub merchant_extra: Option<String>,
}

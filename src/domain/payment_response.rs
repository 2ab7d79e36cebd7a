//! Result of a successful payment creation.

use serde::{Deserialize, Serialize};

use super::errors::ProtocolError;

/// Fields every successful creation reply carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Processor result code; always 0 once a reply has been reconciled
    pub code: i64,

    /// Processor payment identifier
    pub payment_id: String,

    /// Where to send the payer
    pub payment_url: String,

    /// Advisory text the processor may attach even on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A created payment, tagged by settlement routing mode.
///
/// The direct-settlement variant is the only one that carries a transaction
/// identifier, and it can only be built with one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentIntentResponse {
    /// Routed through the processor's regular acquiring.
    Standard(PaymentIntent),

    /// Routed straight through NSPK.
    DirectNspk {
        intent: PaymentIntent,
        transaction_id: String,
    },
}

impl PaymentIntentResponse {
    pub fn standard(intent: PaymentIntent) -> Self {
        Self::Standard(intent)
    }

    /// Build a direct-settlement response.
    ///
    /// # Errors
    ///
    /// `ProtocolError` when the transaction identifier is blank.
    pub fn direct_nspk(
        intent: PaymentIntent,
        transaction_id: impl Into<String>,
    ) -> Result<Self, ProtocolError> {
        let transaction_id = transaction_id.into();
        if transaction_id.trim().is_empty() {
            return Err(ProtocolError::missing_field("transaction_id"));
        }
        Ok(Self::DirectNspk {
            intent,
            transaction_id,
        })
    }

    pub fn intent(&self) -> &PaymentIntent {
        match self {
            Self::Standard(intent) => intent,
            Self::DirectNspk { intent, .. } => intent,
        }
    }

    pub fn payment_id(&self) -> &str {
        &self.intent().payment_id
    }

    pub fn payment_url(&self) -> &str {
        &self.intent().payment_url
    }

    pub fn transaction_id(&self) -> Option<&str> {
        match self {
            Self::Standard(_) => None,
            Self::DirectNspk { transaction_id, .. } => Some(transaction_id),
        }
    }

    pub fn is_direct_nspk(&self) -> bool {
        matches!(self, Self::DirectNspk { .. })
    }
}

//! Payment creation request.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::customer::Customer;
use super::errors::ValidationError;

/// Maximum length of opaque merchant metadata, in characters.
pub const MERCHANT_EXTRA_MAX_CHARS: usize = 255;

/// What the payment is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    #[default]
    Goods,
    Services,
}

/// Payment methods the payer may be steered towards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Faster Payments System
    Sbp,
    /// Russian bank cards
    CardRu,
    SberPay,
    TPay,
}

/// Settlement routing options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PaymentParams {
    /// Route the payment straight through NSPK; the reply then carries a
    /// transaction identifier.
    #[serde(default)]
    pub direct_nspk: bool,
}

/// Everything needed to create a payment.
///
/// Serialized verbatim as the outbound body. Build with
/// [`PaymentIntentRequest::new`] and the `with_*` methods, then
/// [`validate`](PaymentIntentRequest::validate) before sending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntentRequest {
    /// Positive, at most two fractional digits, exact as a JSON float
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,

    /// Merchant order identifier; the processor rejects duplicates
    pub order_id: String,

    /// ISO 4217 alphabetic code
    pub currency: String,

    pub product_name: String,

    pub product_type: ProductType,

    pub product_quantity: u32,

    /// VAT rate in percent
    pub vat: u8,

    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_url: Option<String>,

    pub customer: Customer,

    /// Preferred payment methods, most preferred first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prefer_methods: Vec<PaymentMethod>,

    /// Opaque metadata echoed back in notifications
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_extra: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<PaymentParams>,
}

impl PaymentIntentRequest {
    /// Create a request with defaults: RUB, goods, quantity 1, VAT 0.
    pub fn new(
        order_id: impl Into<String>,
        amount: Decimal,
        product_name: impl Into<String>,
        description: impl Into<String>,
        customer: Customer,
    ) -> Self {
        Self {
            amount,
            order_id: order_id.into(),
            currency: "RUB".to_string(),
            product_name: product_name.into(),
            product_type: ProductType::default(),
            product_quantity: 1,
            vat: 0,
            description: description.into(),
            success_url: None,
            fail_url: None,
            customer,
            prefer_methods: Vec::new(),
            merchant_extra: None,
            params: None,
        }
    }

    /// A fresh order identifier for callers without their own numbering.
    pub fn generate_order_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_product_type(mut self, product_type: ProductType) -> Self {
        self.product_type = product_type;
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.product_quantity = quantity;
        self
    }

    pub fn with_vat(mut self, vat: u8) -> Self {
        self.vat = vat;
        self
    }

    pub fn with_redirects(
        mut self,
        success_url: impl Into<String>,
        fail_url: impl Into<String>,
    ) -> Self {
        self.success_url = Some(success_url.into());
        self.fail_url = Some(fail_url.into());
        self
    }

    pub fn with_preferred_methods(mut self, methods: impl IntoIterator<Item = PaymentMethod>) -> Self {
        self.prefer_methods = methods.into_iter().collect();
        self
    }

    pub fn with_merchant_extra(mut self, extra: impl Into<String>) -> Self {
        self.merchant_extra = Some(extra.into());
        self
    }

    pub fn with_direct_nspk(mut self, direct_nspk: bool) -> Self {
        self.params = Some(PaymentParams { direct_nspk });
        self
    }

    /// Check every field-level invariant.
    ///
    /// Order id uniqueness is not checked here; the processor owns it.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.order_id.trim().is_empty() {
            return Err(ValidationError::empty_field("order_id"));
        }

        if self.amount <= Decimal::ZERO {
            return Err(ValidationError::invalid_format("amount", "must be positive"));
        }
        if self.amount.normalize().scale() > 2 {
            return Err(ValidationError::invalid_format(
                "amount",
                "at most two fractional digits",
            ));
        }
        if !survives_float_encoding(self.amount) {
            return Err(ValidationError::invalid_format(
                "amount",
                "too many significant digits to send exactly",
            ));
        }

        if self.currency.len() != 3 || !self.currency.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(ValidationError::invalid_format(
                "currency",
                "expected a three-letter uppercase code",
            ));
        }

        if self.product_name.trim().is_empty() {
            return Err(ValidationError::empty_field("product_name"));
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::empty_field("description"));
        }

        if self.product_quantity == 0 {
            return Err(ValidationError::out_of_range(
                "product_quantity",
                1,
                i64::from(u32::MAX),
                0,
            ));
        }
        if self.vat > 100 {
            return Err(ValidationError::out_of_range("vat", 0, 100, i64::from(self.vat)));
        }

        for (field, url) in [("success_url", &self.success_url), ("fail_url", &self.fail_url)] {
            if let Some(url) = url {
                if !(url.starts_with("https://") || url.starts_with("http://")) {
                    return Err(ValidationError::invalid_format(field, "expected an http(s) URL"));
                }
            }
        }

        if let Some(extra) = &self.merchant_extra {
            if extra.chars().count() > MERCHANT_EXTRA_MAX_CHARS {
                return Err(ValidationError::too_long(
                    "merchant_extra",
                    MERCHANT_EXTRA_MAX_CHARS,
                ));
            }
        }

        Ok(())
    }
}

/// The amount goes on the wire as an f64; it must read back unchanged.
fn survives_float_encoding(amount: Decimal) -> bool {
    amount
        .to_f64()
        .filter(|f| f.is_finite())
        .and_then(|f| Decimal::from_str(&f.to_string()).ok())
        .is_some_and(|sent| sent == amount)
}

//! Customer value object.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::errors::ValidationError;

/// The payer as the processor sees it.
///
/// At least one contact channel (email or phone) is always present; blank
/// strings count as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CustomerFields", into = "CustomerFields")]
pub struct Customer {
    email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    ip_address: Option<String>,
    full_name: Option<String>,
}

/// Wire shape: all five keys, always.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CustomerFields {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    address: Option<String>,
    #[serde(default)]
    ip: Option<String>,
    #[serde(default)]
    fullname: Option<String>,
}

impl Customer {
    /// Create a customer from its contact channels.
    ///
    /// # Errors
    ///
    /// - `MissingContact` when both are absent or blank
    /// - `InvalidFormat` when the email has no `@`
    pub fn new(email: Option<String>, phone: Option<String>) -> Result<Self, ValidationError> {
        let email = non_blank(email);
        let phone = non_blank(phone);

        if email.is_none() && phone.is_none() {
            return Err(ValidationError::MissingContact);
        }
        if let Some(email) = &email {
            if !email.contains('@') {
                return Err(ValidationError::invalid_format("email", "missing '@'"));
            }
        }

        Ok(Self {
            email,
            phone,
            address: None,
            ip_address: None,
            full_name: None,
        })
    }

    pub fn from_email(email: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(Some(email.into()), None)
    }

    pub fn from_phone(phone: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(None, Some(phone.into()))
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = non_blank(Some(address.into()));
        self
    }

    pub fn with_ip_address(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = non_blank(Some(ip.into()));
        self
    }

    pub fn with_full_name(mut self, name: impl Into<String>) -> Self {
        self.full_name = non_blank(Some(name.into()));
        self
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn ip_address(&self) -> Option<&str> {
        self.ip_address.as_deref()
    }

    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }

    /// The processor's representation: `{email, phone, address, ip, fullname}`,
    /// with `null` for absent values.
    pub fn to_canonical(&self) -> Value {
        json!({
            "email": self.email,
            "phone": self.phone,
            "address": self.address,
            "ip": self.ip_address,
            "fullname": self.full_name,
        })
    }
}

impl TryFrom<CustomerFields> for Customer {
    type Error = ValidationError;

    fn try_from(fields: CustomerFields) -> Result<Self, Self::Error> {
        let mut customer = Customer::new(fields.email, fields.phone)?;
        customer.address = non_blank(fields.address);
        customer.ip_address = non_blank(fields.ip);
        customer.full_name = non_blank(fields.fullname);
        Ok(customer)
    }
}

impl From<Customer> for CustomerFields {
    fn from(customer: Customer) -> Self {
        Self {
            email: customer.email,
            phone: customer.phone,
            address: customer.address,
            ip: customer.ip_address,
            fullname: customer.full_name,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

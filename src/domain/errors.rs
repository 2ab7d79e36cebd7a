//! Error types for the domain layer.

use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: i64,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("Field '{field}' exceeds {max} characters")]
    TooLong { field: String, max: usize },

    #[error("Customer needs an email or a phone number")]
    MissingContact,
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: i64, max: i64, actual: i64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates a length limit validation error.
    pub fn too_long(field: impl Into<String>, max: usize) -> Self {
        ValidationError::TooLong {
            field: field.into(),
            max,
        }
    }
}

/// A processor reply that violates the documented response contract.
///
/// Distinct from a business rejection: this means the integration itself is
/// broken, not that the payment was declined.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Malformed processor response: {reason}")]
pub struct ProtocolError {
    reason: String,
}

impl ProtocolError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// A field the reply's declared shape requires is absent or empty.
    pub fn missing_field(field: &str) -> Self {
        Self::new(format!("missing required field '{}'", field))
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_field_displays_field_name() {
        let err = ValidationError::empty_field("order_id");
        assert_eq!(err.to_string(), "Field 'order_id' cannot be empty");
    }

    #[test]
    fn out_of_range_displays_bounds() {
        let err = ValidationError::out_of_range("vat", 0, 100, 120);
        assert_eq!(
            err.to_string(),
            "Field 'vat' must be between 0 and 100, got 120"
        );
    }

    #[test]
    fn protocol_error_missing_field() {
        let err = ProtocolError::missing_field("payment_id");
        assert_eq!(err.reason(), "missing required field 'payment_id'");
        assert!(err.to_string().starts_with("Malformed processor response"));
    }
}

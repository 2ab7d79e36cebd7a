//! Mock payment gateway for testing.
//!
//! Provides a configurable in-memory implementation of `PaymentGateway` for
//! unit and integration tests of code that creates payments. Supports:
//! - Pre-configured responses
//! - Error injection
//! - Call tracking

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{PaymentIntent, PaymentIntentRequest, PaymentIntentResponse};
use crate::ports::{PaymentError, PaymentGateway, SignatureCheck};

/// Mock payment gateway for testing.
///
/// Without configuration it answers like a healthy processor: a standard
/// response, or a direct-settlement one when the request asks for it.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentGateway::new();
/// mock.set_error(PaymentError::api(7, "Order already exists"));
///
/// let result = mock.create_payment_intent(&request).await;
/// assert!(mock.was_called("create_payment_intent"));
/// ```
#[derive(Default, Clone)]
pub struct MockPaymentGateway {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    /// Response for the next `create_payment_intent` call.
    next_response: Option<PaymentIntentResponse>,

    /// Verdict returned by `check_signature`.
    signature_check: Option<SignatureCheck>,

    /// Error to return on the next call to any method.
    next_error: Option<PaymentError>,

    /// Errors returned on every call to a given method.
    method_errors: HashMap<String, PaymentError>,

    /// Requests accepted so far, by order id.
    created: HashMap<String, PaymentIntentRequest>,

    call_log: Vec<MethodCall>,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock whose signature checks always fail.
    pub fn rejecting_signatures() -> Self {
        let mock = Self::new();
        mock.set_signature_check(SignatureCheck::Invalid {
            message: "Invalid signature".to_string(),
        });
        mock
    }

    pub fn set_response(&self, response: PaymentIntentResponse) {
        self.inner.lock().unwrap().next_response = Some(response);
    }

    pub fn set_signature_check(&self, check: SignatureCheck) {
        self.inner.lock().unwrap().signature_check = Some(check);
    }

    /// Set an error to return on the next call to any method.
    pub fn set_error(&self, error: PaymentError) {
        self.inner.lock().unwrap().next_error = Some(error);
    }

    /// Set an error for every call to a specific method.
    pub fn set_method_error(&self, method: &str, error: PaymentError) {
        self.inner
            .lock()
            .unwrap()
            .method_errors
            .insert(method.to_string(), error);
    }

    pub fn clear_errors(&self) {
        let mut state = self.inner.lock().unwrap();
        state.next_error = None;
        state.method_errors.clear();
    }

    /// The request accepted for an order id, if any.
    pub fn created_request(&self, order_id: &str) -> Option<PaymentIntentRequest> {
        self.inner.lock().unwrap().created.get(order_id).cloned()
    }

    pub fn calls(&self) -> Vec<MethodCall> {
        self.inner.lock().unwrap().call_log.clone()
    }

    pub fn was_called(&self, method: &str) -> bool {
        self.call_count(method) > 0
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    fn record_call(&self, method: &str, args: Vec<String>) {
        self.inner.lock().unwrap().call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
    }

    fn check_error(&self, method: &str) -> Result<(), PaymentError> {
        let mut state = self.inner.lock().unwrap();

        if let Some(error) = state.method_errors.get(method) {
            return Err(error.clone());
        }

        // Global error is consumed
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        Ok(())
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_payment_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> Result<PaymentIntentResponse, PaymentError> {
        self.record_call(
            "create_payment_intent",
            vec![request.order_id.clone(), request.amount.to_string()],
        );
        self.check_error("create_payment_intent")?;
        request.validate()?;

        let mut state = self.inner.lock().unwrap();
        let response = match state.next_response.take() {
            Some(response) => response,
            None => default_response(request)?,
        };
        state
            .created
            .insert(request.order_id.clone(), request.clone());

        Ok(response)
    }

    async fn check_signature(&self, body: &Value) -> Result<SignatureCheck, PaymentError> {
        self.record_call("check_signature", vec![body.to_string()]);
        self.check_error("check_signature")?;

        let state = self.inner.lock().unwrap();
        Ok(state.signature_check.clone().unwrap_or(SignatureCheck::Valid))
    }
}

fn default_response(request: &PaymentIntentRequest) -> Result<PaymentIntentResponse, PaymentError> {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let payment_id = format!("apay_mock_{}", &suffix[..12]);
    let intent = PaymentIntent {
        code: 0,
        payment_url: format!("https://pay.mock.invalid/{}", payment_id),
        payment_id,
        error: None,
    };

    if request.params.map(|p| p.direct_nspk).unwrap_or(false) {
        Ok(PaymentIntentResponse::direct_nspk(
            intent,
            format!("tx_mock_{}", &suffix[12..24]),
        )?)
    } else {
        Ok(PaymentIntentResponse::standard(intent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Customer;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn request(order_id: &str) -> PaymentIntentRequest {
        PaymentIntentRequest::new(
            order_id,
            Decimal::from(10),
            "Plan",
            "Monthly plan",
            Customer::from_email("a@b.com").unwrap(),
        )
    }

    #[tokio::test]
    async fn default_response_is_standard() {
        let mock = MockPaymentGateway::new();
        let response = mock.create_payment_intent(&request("O1")).await.unwrap();

        assert!(!response.is_direct_nspk());
        assert!(response.payment_id().starts_with("apay_mock_"));
        assert!(mock.created_request("O1").is_some());
        assert_eq!(mock.call_count("create_payment_intent"), 1);
    }

    #[tokio::test]
    async fn direct_nspk_request_gets_transaction_id() {
        let mock = MockPaymentGateway::new();
        let response = mock
            .create_payment_intent(&request("O2").with_direct_nspk(true))
            .await
            .unwrap();

        assert!(response.transaction_id().unwrap().starts_with("tx_mock_"));
    }

    #[tokio::test]
    async fn injected_error_is_returned_once() {
        let mock = MockPaymentGateway::new();
        mock.set_error(PaymentError::api(7, "Order already exists"));

        let err = mock.create_payment_intent(&request("O3")).await.unwrap_err();
        assert!(matches!(err, PaymentError::Api { code: 7, .. }));
        assert!(mock.create_payment_intent(&request("O3")).await.is_ok());
    }

    #[tokio::test]
    async fn method_error_persists() {
        let mock = MockPaymentGateway::new();
        mock.set_method_error("check_signature", PaymentError::timeout("slow"));

        for _ in 0..2 {
            assert!(mock.check_signature(&json!({})).await.unwrap_err().is_retryable());
        }
        mock.clear_errors();
        assert!(mock.check_signature(&json!({})).await.unwrap().is_valid());
    }

    #[tokio::test]
    async fn invalid_requests_fail_validation() {
        let mock = MockPaymentGateway::new();
        let err = mock
            .create_payment_intent(&request("O4").with_vat(150))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "validation");
        assert!(mock.was_called("create_payment_intent"));
    }

    #[tokio::test]
    async fn rejecting_signatures() {
        let mock = MockPaymentGateway::rejecting_signatures();
        assert!(!mock.check_signature(&json!({"a": 1})).await.unwrap().is_valid());
    }
}

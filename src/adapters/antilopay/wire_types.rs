//! Antilopay request and reply shapes.

use serde::{Deserialize, Serialize};

use crate::domain::{PaymentIntent, PaymentIntentRequest, PaymentIntentResponse, ProtocolError};
use crate::ports::{PaymentError, SignatureCheck};

/// Processor code for a signature that did not verify.
pub const INVALID_SIGNATURE_CODE: i64 = 3;

/// Body of `POST /payment/create`.
#[derive(Debug, Serialize)]
pub struct CreatePaymentBody<'a> {
    pub project_identificator: &'a str,

    #[serde(flatten)]
    pub request: &'a PaymentIntentRequest,
}

/// Reply of `POST /payment/create`, before the routing mode is checked.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreatePaymentReply {
    pub code: Option<i64>,
    pub payment_id: Option<String>,
    pub payment_url: Option<String>,
    pub error: Option<String>,
    pub direct_nspk: Option<bool>,
    pub transaction_id: Option<String>,
}

impl CreatePaymentReply {
    /// Turn the reply into a response variant.
    ///
    /// A nonzero code is a processor decision (`Api`). Missing fields, or a
    /// transaction id that disagrees with the routing flag, are `Protocol`.
    pub fn reconcile(self) -> Result<PaymentIntentResponse, PaymentError> {
        let code = self.code.ok_or_else(|| ProtocolError::missing_field("code"))?;
        if code != 0 {
            return Err(PaymentError::api(
                code,
                self.error.unwrap_or_else(|| "no error text".to_string()),
            ));
        }

        let intent = PaymentIntent {
            code,
            payment_id: required(self.payment_id, "payment_id")?,
            payment_url: required(self.payment_url, "payment_url")?,
            error: self.error.filter(|e| !e.trim().is_empty()),
        };
        let transaction_id = self.transaction_id.filter(|t| !t.trim().is_empty());

        match (self.direct_nspk.unwrap_or(false), transaction_id) {
            (true, Some(transaction_id)) => {
                Ok(PaymentIntentResponse::direct_nspk(intent, transaction_id)?)
            }
            (true, None) => Err(ProtocolError::missing_field("transaction_id").into()),
            (false, None) => Ok(PaymentIntentResponse::standard(intent)),
            (false, Some(_)) => Err(ProtocolError::new(
                "transaction_id present on a reply not routed through direct_nspk",
            )
            .into()),
        }
    }
}

/// Reply of `POST /signature/check`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignatureCheckReply {
    pub status: Option<String>,
    pub code: Option<i64>,
    pub error: Option<String>,
}

impl SignatureCheckReply {
    pub fn into_check(self) -> Result<SignatureCheck, PaymentError> {
        if self.status.as_deref() == Some("ok") {
            return Ok(SignatureCheck::Valid);
        }
        match self.code {
            Some(INVALID_SIGNATURE_CODE) => Ok(SignatureCheck::Invalid {
                message: self.error.unwrap_or_else(|| "invalid signature".to_string()),
            }),
            Some(code) if code != 0 => Err(PaymentError::api(
                code,
                self.error.unwrap_or_else(|| "no error text".to_string()),
            )),
            _ => Err(ProtocolError::new("expected status \"ok\" or an error code").into()),
        }
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, ProtocolError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ProtocolError::missing_field(field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Customer;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn reply(value: serde_json::Value) -> CreatePaymentReply {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn body_flattens_request_next_to_project() {
        let request = PaymentIntentRequest::new(
            "TEST1",
            Decimal::from(10),
            "Plan",
            "Monthly plan",
            Customer::from_email("a@b.com").unwrap(),
        );
        let body = CreatePaymentBody {
            project_identificator: "proj_test",
            request: &request,
        };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["project_identificator"], "proj_test");
        assert_eq!(value["order_id"], "TEST1");
        assert_eq!(value["customer"]["email"], "a@b.com");
    }

    #[test]
    fn standard_reply() {
        let response = reply(json!({
            "code": 0,
            "payment_id": "APAY1",
            "payment_url": "https://pay.example/APAY1",
            "direct_nspk": false
        }))
        .reconcile()
        .unwrap();

        assert!(!response.is_direct_nspk());
        assert_eq!(response.transaction_id(), None);
        assert_eq!(response.payment_id(), "APAY1");
    }

    #[test]
    fn absent_flag_means_standard() {
        let response = reply(json!({"code": 0, "payment_id": "P", "payment_url": "https://u"}))
            .reconcile()
            .unwrap();
        assert!(!response.is_direct_nspk());
    }

    #[test]
    fn direct_nspk_reply() {
        let response = reply(json!({
            "code": 0,
            "payment_id": "APAY2",
            "payment_url": "https://pay.example/APAY2",
            "direct_nspk": true,
            "transaction_id": "TX9"
        }))
        .reconcile()
        .unwrap();

        assert_eq!(response.transaction_id(), Some("TX9"));
    }

    #[test]
    fn direct_nspk_without_transaction_is_protocol_error() {
        for transaction in [json!(null), json!(""), json!("   ")] {
            let err = reply(json!({
                "code": 0,
                "payment_id": "P",
                "payment_url": "https://u",
                "direct_nspk": true,
                "transaction_id": transaction
            }))
            .reconcile()
            .unwrap_err();
            assert!(matches!(err, PaymentError::Protocol(_)), "{:?}", err);
        }
    }

    #[test]
    fn transaction_without_flag_is_protocol_error() {
        let err = reply(json!({
            "code": 0,
            "payment_id": "P",
            "payment_url": "https://u",
            "transaction_id": "TX1"
        }))
        .reconcile()
        .unwrap_err();
        assert!(matches!(err, PaymentError::Protocol(_)));
    }

    #[test]
    fn nonzero_code_is_api_error() {
        let err = reply(json!({"code": 7, "error": "Order already exists"}))
            .reconcile()
            .unwrap_err();
        match err {
            PaymentError::Api { code, message } => {
                assert_eq!(code, 7);
                assert_eq!(message, "Order already exists");
            }
            other => panic!("expected Api, got {:?}", other),
        }
    }

    #[test]
    fn missing_fields_are_protocol_errors() {
        assert!(matches!(
            reply(json!({})).reconcile(),
            Err(PaymentError::Protocol(_))
        ));
        assert!(matches!(
            reply(json!({"code": 0, "payment_url": "https://u"})).reconcile(),
            Err(PaymentError::Protocol(_))
        ));
    }

    #[test]
    fn signature_check_replies() {
        let ok: SignatureCheckReply = serde_json::from_value(json!({"status": "ok"})).unwrap();
        assert_eq!(ok.into_check().unwrap(), SignatureCheck::Valid);

        let invalid: SignatureCheckReply =
            serde_json::from_value(json!({"code": 3, "error": "Invalid signature"})).unwrap();
        assert_eq!(
            invalid.into_check().unwrap(),
            SignatureCheck::Invalid {
                message: "Invalid signature".to_string()
            }
        );

        let other: SignatureCheckReply =
            serde_json::from_value(json!({"code": 5, "error": "Project not found"})).unwrap();
        assert!(matches!(
            other.into_check(),
            Err(PaymentError::Api { code: 5, .. })
        ));

        let junk: SignatureCheckReply = serde_json::from_value(json!({"status": "maybe"})).unwrap();
        assert!(matches!(junk.into_check(), Err(PaymentError::Protocol(_))));
    }
}

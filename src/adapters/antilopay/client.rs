//! Antilopay HTTP client.
//!
//! Implements the `PaymentGateway` port against the processor's JSON API.
//! Every request body is canonicalized once; the same bytes are signed and
//! sent.
//!
//! # Reply handling
//!
//! The reply body is parsed whatever the HTTP status, since the processor
//! reports business errors in the body. On 5xx, a body without a `code`
//! (not JSON, or JSON from a gateway in between) is a `Transport` error.
//! Otherwise a body that does not parse is a `Protocol` error.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::CredentialStore;
use crate::domain::{CanonicalPayload, PaymentIntentRequest, PaymentIntentResponse, ProtocolError};
use crate::ports::{PaymentError, PaymentGateway, SignatureCheck, SigningError};

use super::auth_headers::AuthHeaderBuilder;
use super::signature_engine::RsaSignatureEngine;
use super::wire_types::{CreatePaymentBody, CreatePaymentReply, SignatureCheckReply};

const CREATE_PAYMENT_PATH: &str = "payment/create";
const SIGNATURE_CHECK_PATH: &str = "signature/check";

/// Signed client for the Antilopay API.
pub struct AntilopayClient {
    store: Arc<CredentialStore>,
    headers: AuthHeaderBuilder<RsaSignatureEngine>,
    http_client: reqwest::Client,
}

impl AntilopayClient {
    pub fn new(store: Arc<CredentialStore>) -> Self {
        Self::with_http_client(store, reqwest::Client::new())
    }

    /// Use a preconfigured HTTP client (proxies, TLS roots, connection pool).
    pub fn with_http_client(store: Arc<CredentialStore>, http_client: reqwest::Client) -> Self {
        let signer = RsaSignatureEngine::new(store.clone());
        Self {
            headers: AuthHeaderBuilder::new(store.clone(), signer),
            store,
            http_client,
        }
    }

    pub fn store(&self) -> &Arc<CredentialStore> {
        &self.store
    }

    /// Sign `body`, POST it to `path` and parse the reply as `R`.
    async fn post_signed<R>(&self, path: &str, body: CanonicalPayload) -> Result<R, PaymentError>
    where
        R: DeserializeOwned,
    {
        let auth = self.headers.build(&body)?;
        let header_map = auth
            .to_header_map()
            .map_err(|e| PaymentError::Configuration(format!("invalid header value: {}", e)))?;

        let runtime = self.store.runtime();
        let url = runtime.endpoint(path);

        tracing::debug!(url = %url, body_len = body.len(), "Dispatching signed request");

        let response = self
            .http_client
            .post(&url)
            .timeout(runtime.request_timeout())
            .headers(header_map)
            .header(CONTENT_TYPE, "application/json")
            .body(body.into_string())
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(transport_error)?;

        parse_reply(status, &bytes)
    }
}

#[async_trait]
impl PaymentGateway for AntilopayClient {
    async fn create_payment_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> Result<PaymentIntentResponse, PaymentError> {
        request.validate()?;

        let body = CreatePaymentBody {
            project_identificator: self.store.credentials().project_id(),
            request,
        };
        let body = CanonicalPayload::from_serialize(&body)
            .map_err(|e| SigningError::Serialization(e.to_string()))?;

        tracing::debug!(order_id = %request.order_id, "Creating payment");

        let result = self
            .post_signed::<CreatePaymentReply>(CREATE_PAYMENT_PATH, body)
            .await
            .and_then(CreatePaymentReply::reconcile);

        match &result {
            Ok(response) => tracing::info!(
                order_id = %request.order_id,
                payment_id = %response.payment_id(),
                direct_nspk = response.is_direct_nspk(),
                "Payment created"
            ),
            Err(e) => log_failure(&request.order_id, e),
        }

        result
    }

    async fn check_signature(&self, body: &Value) -> Result<SignatureCheck, PaymentError> {
        let body = CanonicalPayload::from_value(body);

        let result = self
            .post_signed::<SignatureCheckReply>(SIGNATURE_CHECK_PATH, body)
            .await
            .and_then(SignatureCheckReply::into_check);

        if let Ok(SignatureCheck::Invalid { message }) = &result {
            tracing::warn!(message = %message, "Processor rejected our signature");
        }

        result
    }
}

fn parse_reply<R: DeserializeOwned>(status: StatusCode, bytes: &[u8]) -> Result<R, PaymentError> {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(value) if status.is_server_error() && value.get("code").is_none() => {
            Err(PaymentError::transport(format!(
                "processor unavailable: HTTP {}",
                status.as_u16()
            )))
        }
        Ok(value) => {
            // A success code on a failed exchange cannot be trusted.
            if !status.is_success() && value.get("code").and_then(Value::as_i64) == Some(0) {
                return Err(ProtocolError::new(format!(
                    "code 0 with HTTP status {}",
                    status.as_u16()
                ))
                .into());
            }
            serde_json::from_value(value)
                .map_err(|e| ProtocolError::new(format!("unexpected reply shape: {}", e)).into())
        }
        Err(_) if status.is_server_error() => Err(PaymentError::transport(format!(
            "processor unavailable: HTTP {}",
            status.as_u16()
        ))),
        Err(e) => Err(ProtocolError::new(format!(
            "HTTP {} with a body that is not JSON: {}",
            status.as_u16(),
            e
        ))
        .into()),
    }
}

fn transport_error(e: reqwest::Error) -> PaymentError {
    if e.is_timeout() {
        PaymentError::timeout(e.to_string())
    } else {
        PaymentError::transport(e.to_string())
    }
}

fn log_failure(order_id: &str, error: &PaymentError) {
    match error {
        PaymentError::Api { code, message } => tracing::warn!(
            order_id = %order_id,
            code = *code,
            message = %message,
            "Processor rejected payment"
        ),
        PaymentError::Protocol(e) => tracing::error!(
            order_id = %order_id,
            reason = %e.reason(),
            "Processor reply violates the response contract"
        ),
        other => tracing::warn!(
            order_id = %order_id,
            kind = other.kind(),
            error = %other,
            "Payment creation failed"
        ),
    }
}

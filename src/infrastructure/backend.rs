use crate::config::Config;
use crate::domain::ports::{CreateIntentRequest, IntentResponse, PaymentIntentApi};
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

const CREATE_PATH: &str = "/api/payments/create";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Structured error body the payment-intent service may return on non-2xx.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// `PaymentIntentApi` over HTTP, speaking the JSON contract of the backend
/// payment-intent service.
pub struct HttpPaymentIntentApi {
    http: reqwest::Client,
    api_base: String,
}

impl HttpPaymentIntentApi {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CheckoutError::Unexpected(e.to_string()))?;
        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PaymentIntentApi for HttpPaymentIntentApi {
    async fn create_intent(&self, request: &CreateIntentRequest) -> Result<IntentResponse> {
        let url = format!("{}{CREATE_PATH}", self.api_base);
        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| CheckoutError::Unexpected(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CheckoutError::Unexpected(e.to_string()))?;

        if !status.is_success() {
            tracing::error!(status = status.as_u16(), body = %body, "payment intent creation failed");
            // Message resolution order: structured `message`, structured
            // `error`, the raw body, then a status-code fallback.
            let parsed: ErrorBody = serde_json::from_str(&body).unwrap_or_default();
            let message = parsed
                .message
                .filter(|m| !m.is_empty())
                .or(parsed.error.filter(|m| !m.is_empty()))
                .or_else(|| (!body.is_empty()).then(|| body.clone()))
                .unwrap_or_else(|| {
                    format!(
                        "Failed to create payment intent (status {}).",
                        status.as_u16()
                    )
                });
            return Err(CheckoutError::IntentCreation(message));
        }

        serde_json::from_str(&body).map_err(|e| {
            CheckoutError::Unexpected(format!("invalid response from payment service: {e}"))
        })
    }
}

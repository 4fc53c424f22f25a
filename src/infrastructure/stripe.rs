use crate::config::{ClientReadiness, Config};
use crate::domain::ports::{
    CardDetails, ConfirmedIntent, PaymentMethodToken, ProcessorClient, ProcessorError,
};
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_API_BASE: &str = "https://api.stripe.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct ApiError {
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PaymentMethodBody {
    id: Option<String>,
    error: Option<ApiError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PaymentIntentBody {
    status: Option<String>,
    error: Option<ApiError>,
}

/// `ProcessorClient` over the Stripe REST API, authenticated with the
/// publishable key. Tokenizes raw card input and confirms step-up
/// challenges; it never captures funds itself.
pub struct StripeProcessorClient {
    http: reqwest::Client,
    publishable_key: String,
    api_base: String,
    readiness: ClientReadiness,
}

impl StripeProcessorClient {
    /// Builds a client from configuration. An implausible key produces a
    /// client that reports `ConfigError` and is never called by the flow.
    pub fn new(config: &Config) -> Result<Self> {
        let (publishable_key, readiness) = match config.checked_key() {
            Ok(key) => (key.to_string(), ClientReadiness::Ready),
            Err(warning) => (String::new(), ClientReadiness::ConfigError(warning)),
        };
        let http = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CheckoutError::Unexpected(e.to_string()))?;
        Ok(Self {
            http,
            publishable_key,
            api_base: DEFAULT_API_BASE.to_string(),
            readiness,
        })
    }

    /// Points the client at a different API host, for tests.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base = url.into().trim_end_matches('/').to_string();
        self
    }

    async fn post_form(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> std::result::Result<String, ProcessorError> {
        let url = format!("{}{path}", self.api_base);
        let response = self
            .http
            .post(&url)
            .basic_auth(&self.publishable_key, None::<&str>)
            .form(params)
            .send()
            .await
            .map_err(|e| ProcessorError::new(e.to_string()))?;
        response
            .text()
            .await
            .map_err(|e| ProcessorError::new(e.to_string()))
    }
}

#[async_trait]
impl ProcessorClient for StripeProcessorClient {
    fn readiness(&self) -> ClientReadiness {
        self.readiness.clone()
    }

    async fn tokenize(
        &self,
        card: &CardDetails,
        billing_name: &str,
    ) -> std::result::Result<PaymentMethodToken, ProcessorError> {
        let params = [
            ("type", "card".to_string()),
            ("card[number]", card.number.clone()),
            ("card[exp_month]", card.exp_month.to_string()),
            ("card[exp_year]", card.exp_year.to_string()),
            ("card[cvc]", card.cvc.clone()),
            ("billing_details[name]", billing_name.to_string()),
        ];
        let body = self.post_form("/v1/payment_methods", &params).await?;
        let parsed: PaymentMethodBody =
            serde_json::from_str(&body).map_err(|e| ProcessorError::new(e.to_string()))?;
        if let Some(error) = parsed.error {
            return Err(ProcessorError {
                message: error.message,
            });
        }
        match parsed.id {
            Some(id) => Ok(PaymentMethodToken { id }),
            None => Err(ProcessorError { message: None }),
        }
    }

    async fn confirm_challenge(
        &self,
        client_secret: &str,
    ) -> std::result::Result<ConfirmedIntent, ProcessorError> {
        // Client secrets look like `pi_123_secret_456`; the prefix is the
        // intent id the confirm endpoint is addressed by.
        let Some((intent_id, _)) = client_secret.split_once("_secret_") else {
            return Err(ProcessorError::new("malformed client secret"));
        };
        let params = [("client_secret", client_secret.to_string())];
        let path = format!("/v1/payment_intents/{intent_id}/confirm");
        let body = self.post_form(&path, &params).await?;
        let parsed: PaymentIntentBody =
            serde_json::from_str(&body).map_err(|e| ProcessorError::new(e.to_string()))?;
        if let Some(error) = parsed.error {
            return Err(ProcessorError {
                message: error.message,
            });
        }
        match parsed.status {
            Some(status) => Ok(ConfirmedIntent { status }),
            None => Err(ProcessorError { message: None }),
        }
    }
}

use crate::config::ClientReadiness;
use crate::domain::session::{CheckoutSession, MinorUnits};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Raw card input as collected by the presentation layer. Only ever held
/// in memory on its way to the processor; never sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDetails {
    pub number: String,
    pub exp_month: u8,
    pub exp_year: u16,
    pub cvc: String,
}

/// Opaque reference to tokenized card data, safe to hand to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentMethodToken {
    pub id: String,
}

/// Result of confirming a step-up challenge with the processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedIntent {
    pub status: String,
}

/// Error reported by the processor client. Carries the processor's own
/// message when it provides one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", .message.as_deref().unwrap_or("processor error"))]
pub struct ProcessorError {
    pub message: Option<String>,
}

impl ProcessorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    pub fn message_or(&self, fallback: &str) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Body posted to the payment-intent service.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateIntentRequest {
    pub amount: MinorUnits,
    pub currency: String,
    pub payment_method: String,
    pub payment_method_id: String,
    pub card_holder: String,
    pub description: String,
}

impl CreateIntentRequest {
    pub fn for_session(
        session: &CheckoutSession,
        currency: &str,
        token: &PaymentMethodToken,
        card_holder: &str,
    ) -> Self {
        Self {
            amount: session.total(),
            currency: currency.to_string(),
            payment_method: "card".to_string(),
            payment_method_id: token.id.clone(),
            card_holder: card_holder.to_string(),
            description: "E-commerce order payment".to_string(),
        }
    }
}

/// Parsed success body from the payment-intent service. Every field is
/// optional on the wire; [`IntentResponse::disposition`] decides what the
/// combination means.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct IntentResponse {
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub client_secret: Option<String>,
    pub error: Option<String>,
}

/// The recognized shapes of an intent-service response, checked in order:
/// success (either status field), challenge, explicit error, anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentDisposition {
    Succeeded,
    RequiresChallenge { client_secret: String },
    Declined { message: String },
    Unrecognized,
}

impl IntentResponse {
    pub fn disposition(&self) -> IntentDisposition {
        let succeeded = |field: &Option<String>| field.as_deref() == Some("succeeded");
        if succeeded(&self.status) || succeeded(&self.payment_status) {
            return IntentDisposition::Succeeded;
        }
        if self.status.as_deref() == Some("requires_action") {
            if let Some(secret) = &self.client_secret {
                return IntentDisposition::RequiresChallenge {
                    client_secret: secret.clone(),
                };
            }
        }
        if let Some(message) = &self.error {
            return IntentDisposition::Declined {
                message: message.clone(),
            };
        }
        IntentDisposition::Unrecognized
    }
}

/// Client for the third-party payment processor. Tokenization and
/// confirmation never charge the card themselves; charging is a backend
/// side effect.
#[async_trait]
pub trait ProcessorClient: Send + Sync {
    fn readiness(&self) -> ClientReadiness;

    async fn tokenize(
        &self,
        card: &CardDetails,
        billing_name: &str,
    ) -> std::result::Result<PaymentMethodToken, ProcessorError>;

    async fn confirm_challenge(
        &self,
        client_secret: &str,
    ) -> std::result::Result<ConfirmedIntent, ProcessorError>;
}

/// Client for the backend payment-intent service.
#[async_trait]
pub trait PaymentIntentApi: Send + Sync {
    async fn create_intent(&self, request: &CreateIntentRequest) -> Result<IntentResponse>;
}

/// Handle to the card input owned by the presentation layer. `details`
/// returns `None` while the field is not mounted.
pub trait CardField: Send + Sync {
    fn details(&self) -> Option<CardDetails>;
    fn clear(&self);
}

pub type ProcessorClientHandle = Arc<dyn ProcessorClient>;
pub type PaymentIntentApiHandle = Arc<dyn PaymentIntentApi>;
pub type CardFieldHandle = Arc<dyn CardField>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::LineItem;
    use serde_json::json;

    fn response(body: serde_json::Value) -> IntentResponse {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_disposition_succeeded_on_either_field() {
        assert_eq!(
            response(json!({"status": "succeeded"})).disposition(),
            IntentDisposition::Succeeded
        );
        assert_eq!(
            response(json!({"paymentStatus": "succeeded"})).disposition(),
            IntentDisposition::Succeeded
        );
    }

    #[test]
    fn test_disposition_requires_challenge_needs_secret() {
        assert_eq!(
            response(json!({"status": "requires_action", "clientSecret": "pi_1_secret_2"}))
                .disposition(),
            IntentDisposition::RequiresChallenge {
                client_secret: "pi_1_secret_2".to_string()
            }
        );
        // Without a secret there is nothing to confirm.
        assert_eq!(
            response(json!({"status": "requires_action"})).disposition(),
            IntentDisposition::Unrecognized
        );
    }

    #[test]
    fn test_disposition_error_field() {
        assert_eq!(
            response(json!({"error": "insufficient funds"})).disposition(),
            IntentDisposition::Declined {
                message: "insufficient funds".to_string()
            }
        );
    }

    #[test]
    fn test_disposition_success_wins_over_error() {
        assert_eq!(
            response(json!({"status": "succeeded", "error": "ignored"})).disposition(),
            IntentDisposition::Succeeded
        );
    }

    #[test]
    fn test_disposition_unrecognized() {
        assert_eq!(response(json!({})).disposition(), IntentDisposition::Unrecognized);
        assert_eq!(
            response(json!({"status": "processing"})).disposition(),
            IntentDisposition::Unrecognized
        );
    }

    #[test]
    fn test_create_intent_request_wire_names() {
        let session = CheckoutSession::new(
            vec![LineItem::new("Product 1", 1, MinorUnits::new(30499)).unwrap()],
            MinorUnits::new(129),
            MinorUnits::ZERO,
        )
        .unwrap();
        let token = PaymentMethodToken {
            id: "pm_123".to_string(),
        };
        let request = CreateIntentRequest::for_session(&session, "inr", &token, "Asha Rao");

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "amount": 30628,
                "currency": "inr",
                "paymentMethod": "card",
                "paymentMethodId": "pm_123",
                "cardHolder": "Asha Rao",
                "description": "E-commerce order payment",
            })
        );
    }

    #[test]
    fn test_processor_error_fallback_message() {
        assert_eq!(
            ProcessorError { message: None }.message_or("fallback"),
            "fallback"
        );
        assert_eq!(
            ProcessorError::new("declined").message_or("fallback"),
            "declined"
        );
    }
}

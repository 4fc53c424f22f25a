use crate::config::ClientReadiness;
use crate::domain::ports::{
    CardDetails, ConfirmedIntent, CreateIntentRequest, IntentResponse, PaymentIntentApi,
    PaymentMethodToken, ProcessorClient, ProcessorError,
};
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Notify;

/// Processor double driven by canned responses. Records how often each
/// operation ran so callers can assert on call counts. Also backs the
/// offline demo mode of the CLI.
pub struct ScriptedProcessor {
    readiness: ClientReadiness,
    tokenize_response: std::result::Result<PaymentMethodToken, ProcessorError>,
    confirm_response: std::result::Result<ConfirmedIntent, ProcessorError>,
    panic_on_tokenize: bool,
    gate: Option<Arc<Notify>>,
    tokenize_calls: AtomicUsize,
    confirm_calls: AtomicUsize,
}

impl ScriptedProcessor {
    /// A ready client whose every operation succeeds.
    pub fn ready() -> Self {
        Self {
            readiness: ClientReadiness::Ready,
            tokenize_response: Ok(PaymentMethodToken {
                id: "pm_scripted".to_string(),
            }),
            confirm_response: Ok(ConfirmedIntent {
                status: "succeeded".to_string(),
            }),
            panic_on_tokenize: false,
            gate: None,
            tokenize_calls: AtomicUsize::new(0),
            confirm_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_readiness(mut self, readiness: ClientReadiness) -> Self {
        self.readiness = readiness;
        self
    }

    pub fn tokenize_failure(mut self, message: Option<&str>) -> Self {
        self.tokenize_response = Err(ProcessorError {
            message: message.map(str::to_string),
        });
        self
    }

    pub fn confirm_failure(mut self, message: Option<&str>) -> Self {
        self.confirm_response = Err(ProcessorError {
            message: message.map(str::to_string),
        });
        self
    }

    pub fn confirm_status(mut self, status: &str) -> Self {
        self.confirm_response = Ok(ConfirmedIntent {
            status: status.to_string(),
        });
        self
    }

    /// Makes `tokenize` panic, for exercising the unwind path.
    pub fn panicking(mut self) -> Self {
        self.panic_on_tokenize = true;
        self
    }

    /// Makes `tokenize` wait on the notify handle after recording its call,
    /// keeping an attempt in flight until the test releases it.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn tokenize_calls(&self) -> usize {
        self.tokenize_calls.load(Ordering::SeqCst)
    }

    pub fn confirm_calls(&self) -> usize {
        self.confirm_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProcessorClient for ScriptedProcessor {
    fn readiness(&self) -> ClientReadiness {
        self.readiness.clone()
    }

    async fn tokenize(
        &self,
        _card: &CardDetails,
        _billing_name: &str,
    ) -> std::result::Result<PaymentMethodToken, ProcessorError> {
        self.tokenize_calls.fetch_add(1, Ordering::SeqCst);
        if self.panic_on_tokenize {
            panic!("scripted tokenize panic");
        }
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.tokenize_response.clone()
    }

    async fn confirm_challenge(
        &self,
        _client_secret: &str,
    ) -> std::result::Result<ConfirmedIntent, ProcessorError> {
        self.confirm_calls.fetch_add(1, Ordering::SeqCst);
        self.confirm_response.clone()
    }
}

/// Intent-service double returning one canned response. Remembers the last
/// request so tests can inspect what would have gone over the wire.
pub struct ScriptedIntentApi {
    response: Result<IntentResponse>,
    calls: AtomicUsize,
    last_request: Mutex<Option<CreateIntentRequest>>,
}

impl ScriptedIntentApi {
    pub fn respond(response: IntentResponse) -> Self {
        Self {
            response: Ok(response),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn succeeded() -> Self {
        Self::respond(IntentResponse {
            status: Some("succeeded".to_string()),
            ..Default::default()
        })
    }

    pub fn requires_challenge(client_secret: &str) -> Self {
        Self::respond(IntentResponse {
            status: Some("requires_action".to_string()),
            client_secret: Some(client_secret.to_string()),
            ..Default::default()
        })
    }

    pub fn failure(error: CheckoutError) -> Self {
        Self {
            response: Err(error),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<CreateIntentRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl PaymentIntentApi for ScriptedIntentApi {
    async fn create_intent(&self, request: &CreateIntentRequest) -> Result<IntentResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self
            .last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(request.clone());
        self.response.clone()
    }
}

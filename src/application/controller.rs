use crate::config::Config;
use crate::domain::method::PaymentMethod;
use crate::domain::ports::{
    CardFieldHandle, CreateIntentRequest, IntentDisposition, PaymentIntentApiHandle,
    ProcessorClientHandle,
};
use crate::domain::session::CheckoutSession;
use crate::domain::state::{FlowEvent, PaymentOutcome, SubmissionState};
use crate::error::CheckoutError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

const TOKENIZE_FALLBACK: &str = "Unable to create payment method.";
const CHALLENGE_FALLBACK: &str = "Payment authentication failed.";
const UNEXPECTED_FALLBACK: &str = "Something went wrong. Please retry.";

/// Orchestrates one payment submission at a time: precondition gates,
/// tokenization, intent creation, and the optional step-up challenge.
///
/// Owns the transient flow state; the presentation layer reads it through
/// the accessors and feeds input through `set_card_holder`/`select_method`.
pub struct PaymentFlowController {
    processor: ProcessorClientHandle,
    intent_api: PaymentIntentApiHandle,
    card_field: CardFieldHandle,
    session: CheckoutSession,
    currency: String,
    busy: AtomicBool,
    state: Mutex<SubmissionState>,
    outcome: Mutex<Option<PaymentOutcome>>,
    card_holder: Mutex<String>,
    selected_method: Mutex<PaymentMethod>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl PaymentFlowController {
    pub fn new(
        config: &Config,
        processor: ProcessorClientHandle,
        intent_api: PaymentIntentApiHandle,
        card_field: CardFieldHandle,
        session: CheckoutSession,
    ) -> Self {
        Self {
            processor,
            intent_api,
            card_field,
            session,
            currency: config.currency.clone(),
            busy: AtomicBool::new(false),
            state: Mutex::new(SubmissionState::Idle),
            outcome: Mutex::new(None),
            card_holder: Mutex::new(String::new()),
            selected_method: Mutex::new(PaymentMethod::Card),
        }
    }

    pub fn state(&self) -> SubmissionState {
        lock(&self.state).clone()
    }

    pub fn outcome(&self) -> Option<PaymentOutcome> {
        lock(&self.outcome).clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    pub fn session(&self) -> &CheckoutSession {
        &self.session
    }

    pub fn set_card_holder(&self, value: impl Into<String>) {
        *lock(&self.card_holder) = value.into();
    }

    pub fn card_holder(&self) -> String {
        lock(&self.card_holder).clone()
    }

    pub fn select_method(&self, method: PaymentMethod) {
        *lock(&self.selected_method) = method;
    }

    pub fn selected_method(&self) -> PaymentMethod {
        *lock(&self.selected_method)
    }

    /// Runs one submission attempt end to end. A call made while another
    /// attempt is in flight returns immediately without side effects, so at
    /// most one submission is ever in flight per session.
    pub async fn submit(&self) {
        if self.busy.swap(true, Ordering::SeqCst) {
            tracing::debug!("submission already in flight, ignoring");
            return;
        }
        let _busy = BusyGuard { controller: self };
        self.run_attempt().await;
    }

    async fn run_attempt(&self) {
        // Precondition gates, checked in order. No adapter or network call
        // happens past a failed gate.
        if !self.processor.readiness().is_ready() {
            self.transition(FlowEvent::Rejected(CheckoutError::NotReady));
            return;
        }
        let card_holder = lock(&self.card_holder).trim().to_string();
        if card_holder.is_empty() {
            self.transition(FlowEvent::Rejected(CheckoutError::MissingCardHolder));
            return;
        }
        let Some(card) = self.card_field.details() else {
            self.transition(FlowEvent::Rejected(CheckoutError::CardFieldUnavailable));
            return;
        };

        self.transition(FlowEvent::SubmissionStarted);

        let token = match self.processor.tokenize(&card, &card_holder).await {
            Ok(token) => {
                self.transition(FlowEvent::Tokenized);
                token
            }
            Err(error) => {
                self.transition(FlowEvent::TokenizeFailed(CheckoutError::Tokenization(
                    error.message_or(TOKENIZE_FALLBACK),
                )));
                return;
            }
        };

        let request =
            CreateIntentRequest::for_session(&self.session, &self.currency, &token, &card_holder);
        let response = match self.intent_api.create_intent(&request).await {
            Ok(response) => response,
            Err(error) => {
                self.transition(FlowEvent::IntentFailed(error));
                return;
            }
        };

        let disposition = response.disposition();
        self.transition(FlowEvent::IntentResolved(disposition.clone()));
        match disposition {
            IntentDisposition::Succeeded => self.clear_inputs(),
            IntentDisposition::RequiresChallenge { client_secret } => {
                match self.processor.confirm_challenge(&client_secret).await {
                    Ok(confirmed) => {
                        let succeeded = confirmed.status == "succeeded";
                        self.transition(FlowEvent::ChallengeConfirmed {
                            status: confirmed.status,
                        });
                        if succeeded {
                            self.clear_inputs();
                        }
                    }
                    Err(error) => {
                        self.transition(FlowEvent::ChallengeFailed(CheckoutError::Challenge(
                            error.message_or(CHALLENGE_FALLBACK),
                        )));
                    }
                }
            }
            IntentDisposition::Declined { .. } | IntentDisposition::Unrecognized => {}
        }
    }

    fn transition(&self, event: FlowEvent) {
        let mut state = lock(&self.state);
        let next = state.clone().apply(event);
        tracing::debug!(state = ?next, "submission state advanced");
        match &next {
            SubmissionState::Submitting => *lock(&self.outcome) = None,
            SubmissionState::Succeeded => *lock(&self.outcome) = Some(PaymentOutcome::success()),
            SubmissionState::Failed(error) => {
                *lock(&self.outcome) = Some(PaymentOutcome::failure(error));
            }
            SubmissionState::Idle | SubmissionState::AwaitingChallenge => {}
        }
        *state = next;
    }

    fn clear_inputs(&self) {
        self.card_field.clear();
        lock(&self.card_holder).clear();
    }
}

/// Clears the busy flag on every exit path. If the attempt unwinds out of
/// an adapter call, the attempt is also marked failed so the flow never
/// sticks in a busy state.
struct BusyGuard<'a> {
    controller: &'a PaymentFlowController,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            let mut state = lock(&self.controller.state);
            if !state.is_terminal() {
                let error = CheckoutError::Unexpected(UNEXPECTED_FALLBACK.to_string());
                *lock(&self.controller.outcome) = Some(PaymentOutcome::failure(&error));
                *state = SubmissionState::Failed(error);
            }
        }
        self.controller.busy.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientReadiness;
    use crate::domain::session::{LineItem, MinorUnits};
    use crate::infrastructure::scripted::{ScriptedIntentApi, ScriptedProcessor};
    use crate::interfaces::cli::CliCardField;
    use std::sync::Arc;

    fn test_config() -> Config {
        Config {
            publishable_key: Some("pk_test_0123456789012345678901234567890".to_string()),
            api_base: "http://localhost:8081".to_string(),
            currency: "inr".to_string(),
        }
    }

    fn test_session() -> CheckoutSession {
        CheckoutSession::new(
            vec![LineItem::new("Product 1", 1, MinorUnits::new(15000)).unwrap()],
            MinorUnits::new(129),
            MinorUnits::ZERO,
        )
        .unwrap()
    }

    fn test_card() -> CliCardField {
        CliCardField::collected(crate::domain::ports::CardDetails {
            number: "4242424242424242".to_string(),
            exp_month: 12,
            exp_year: 2030,
            cvc: "123".to_string(),
        })
    }

    #[tokio::test]
    async fn test_not_ready_wins_over_missing_card_holder() {
        let processor = Arc::new(ScriptedProcessor::ready().with_readiness(ClientReadiness::Loading));
        let api = Arc::new(ScriptedIntentApi::succeeded());
        let controller = PaymentFlowController::new(
            &test_config(),
            processor.clone(),
            api.clone(),
            Arc::new(CliCardField::unmounted()),
            test_session(),
        );

        // Card holder is also empty, but the readiness gate is checked first.
        controller.submit().await;
        assert_eq!(
            controller.state(),
            SubmissionState::Failed(CheckoutError::NotReady)
        );
        assert_eq!(processor.tokenize_calls(), 0);
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_whitespace_card_holder_is_missing() {
        let processor = Arc::new(ScriptedProcessor::ready());
        let controller = PaymentFlowController::new(
            &test_config(),
            processor.clone(),
            Arc::new(ScriptedIntentApi::succeeded()),
            Arc::new(test_card()),
            test_session(),
        );
        controller.set_card_holder("   ");

        controller.submit().await;
        assert_eq!(
            controller.state(),
            SubmissionState::Failed(CheckoutError::MissingCardHolder)
        );
        assert_eq!(processor.tokenize_calls(), 0);
    }

    #[tokio::test]
    async fn test_intent_amount_is_session_total() {
        let processor = Arc::new(ScriptedProcessor::ready());
        let api = Arc::new(ScriptedIntentApi::succeeded());
        let controller = PaymentFlowController::new(
            &test_config(),
            processor,
            api.clone(),
            Arc::new(test_card()),
            test_session(),
        );
        controller.set_card_holder("Asha Rao");

        controller.submit().await;
        let request = api.last_request().expect("request recorded");
        assert_eq!(request.amount, MinorUnits::new(15129));
        assert_eq!(request.currency, "inr");
        assert_eq!(request.payment_method, "card");
        assert_eq!(request.card_holder, "Asha Rao");
    }
}

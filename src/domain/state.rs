use crate::domain::ports::IntentDisposition;
use crate::error::CheckoutError;

pub const SUCCESS_MESSAGE: &str = "Payment successful! Your order has been placed.";

/// Surfaced when a challenge confirmation comes back neither succeeded nor
/// failed. The attempt ends so the shopper can retry; there is no polling.
pub const STILL_PROCESSING_MESSAGE: &str =
    "Your payment is still being processed. Please wait a moment before retrying.";

/// Where the current submission attempt stands. Exactly one variant is
/// active at a time; every change goes through [`SubmissionState::apply`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    AwaitingChallenge,
    Succeeded,
    Failed(CheckoutError),
}

impl SubmissionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed(_))
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Submitting | Self::AwaitingChallenge)
    }

    /// Consumes one observed result from the submission sequence and
    /// returns the next state. Pure; the controller owns when events fire.
    pub fn apply(self, event: FlowEvent) -> SubmissionState {
        match event {
            FlowEvent::SubmissionStarted => Self::Submitting,
            FlowEvent::Rejected(error) => Self::Failed(error),
            FlowEvent::Tokenized => Self::Submitting,
            FlowEvent::TokenizeFailed(error) => Self::Failed(error),
            FlowEvent::IntentResolved(disposition) => match disposition {
                IntentDisposition::Succeeded => Self::Succeeded,
                IntentDisposition::RequiresChallenge { .. } => Self::AwaitingChallenge,
                IntentDisposition::Declined { message } => {
                    Self::Failed(CheckoutError::IntentCreation(message))
                }
                IntentDisposition::Unrecognized => {
                    Self::Failed(CheckoutError::UnrecognizedResponse)
                }
            },
            FlowEvent::IntentFailed(error) => Self::Failed(error),
            FlowEvent::ChallengeConfirmed { status } => {
                if status == "succeeded" {
                    Self::Succeeded
                } else {
                    Self::Failed(CheckoutError::Challenge(
                        STILL_PROCESSING_MESSAGE.to_string(),
                    ))
                }
            }
            FlowEvent::ChallengeFailed(error) => Self::Failed(error),
        }
    }
}

/// One result observed during a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    /// Preconditions passed; the attempt is under way.
    SubmissionStarted,
    /// A precondition gate failed before any adapter call.
    Rejected(CheckoutError),
    Tokenized,
    TokenizeFailed(CheckoutError),
    IntentResolved(IntentDisposition),
    IntentFailed(CheckoutError),
    ChallengeConfirmed { status: String },
    ChallengeFailed(CheckoutError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    Succeeded,
    Failed,
}

/// Terminal value surfaced to the shopper; replaced on the next attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentOutcome {
    pub status: OutcomeStatus,
    pub message: String,
}

impl PaymentOutcome {
    pub fn success() -> Self {
        Self {
            status: OutcomeStatus::Succeeded,
            message: SUCCESS_MESSAGE.to_string(),
        }
    }

    pub fn failure(error: &CheckoutError) -> Self {
        Self {
            status: OutcomeStatus::Failed,
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_started_enters_submitting() {
        let state = SubmissionState::Idle.apply(FlowEvent::SubmissionStarted);
        assert_eq!(state, SubmissionState::Submitting);
        assert!(state.is_busy());
    }

    #[test]
    fn test_rejection_is_terminal() {
        let state = SubmissionState::Idle.apply(FlowEvent::Rejected(CheckoutError::NotReady));
        assert_eq!(state, SubmissionState::Failed(CheckoutError::NotReady));
        assert!(state.is_terminal());
    }

    #[test]
    fn test_intent_success_disposition() {
        let state = SubmissionState::Submitting
            .apply(FlowEvent::IntentResolved(IntentDisposition::Succeeded));
        assert_eq!(state, SubmissionState::Succeeded);
    }

    #[test]
    fn test_intent_challenge_disposition() {
        let state =
            SubmissionState::Submitting.apply(FlowEvent::IntentResolved(
                IntentDisposition::RequiresChallenge {
                    client_secret: "pi_1_secret_2".to_string(),
                },
            ));
        assert_eq!(state, SubmissionState::AwaitingChallenge);
        assert!(state.is_busy());
    }

    #[test]
    fn test_intent_declined_carries_message() {
        let state = SubmissionState::Submitting.apply(FlowEvent::IntentResolved(
            IntentDisposition::Declined {
                message: "insufficient funds".to_string(),
            },
        ));
        assert_eq!(
            state,
            SubmissionState::Failed(CheckoutError::IntentCreation(
                "insufficient funds".to_string()
            ))
        );
    }

    #[test]
    fn test_unrecognized_response_uses_generic_message() {
        let state = SubmissionState::Submitting
            .apply(FlowEvent::IntentResolved(IntentDisposition::Unrecognized));
        let SubmissionState::Failed(error) = state else {
            panic!("expected failure");
        };
        assert_eq!(
            error.to_string(),
            "Payment failed. Please check your card details and try again."
        );
    }

    #[test]
    fn test_confirmed_challenge_succeeds() {
        let state = SubmissionState::AwaitingChallenge.apply(FlowEvent::ChallengeConfirmed {
            status: "succeeded".to_string(),
        });
        assert_eq!(state, SubmissionState::Succeeded);
    }

    #[test]
    fn test_confirmed_challenge_pending_terminates_attempt() {
        let state = SubmissionState::AwaitingChallenge.apply(FlowEvent::ChallengeConfirmed {
            status: "processing".to_string(),
        });
        assert_eq!(
            state,
            SubmissionState::Failed(CheckoutError::Challenge(
                STILL_PROCESSING_MESSAGE.to_string()
            ))
        );
    }

    #[test]
    fn test_outcome_messages() {
        assert_eq!(PaymentOutcome::success().message, SUCCESS_MESSAGE);
        let outcome =
            PaymentOutcome::failure(&CheckoutError::Challenge("auth failed".to_string()));
        assert_eq!(outcome.status, OutcomeStatus::Failed);
        assert_eq!(outcome.message, "auth failed");
    }
}

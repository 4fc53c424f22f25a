use thiserror::Error;

pub type Result<T> = std::result::Result<T, CheckoutError>;

/// Everything that can end a submission attempt. All variants are
/// recoverable: they populate the outcome banner and leave the session
/// ready for another try.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("Payment system not ready. Please refresh after the payment client loads.")]
    NotReady,
    #[error("Please enter the card holder name.")]
    MissingCardHolder,
    #[error("Card field is not ready yet. Please retry.")]
    CardFieldUnavailable,
    #[error("{0}")]
    Tokenization(String),
    #[error("{0}")]
    IntentCreation(String),
    #[error("{0}")]
    Challenge(String),
    #[error("Payment failed. Please check your card details and try again.")]
    UnrecognizedResponse,
    #[error("{0}")]
    Unexpected(String),
    #[error("{0}")]
    Validation(String),
}

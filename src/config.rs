use std::env;

pub const ENV_PUBLISHABLE_KEY: &str = "CHECKOUT_PUBLISHABLE_KEY";
pub const ENV_API_BASE: &str = "CHECKOUT_API_BASE";
pub const ENV_CURRENCY: &str = "CHECKOUT_CURRENCY";

const DEFAULT_API_BASE: &str = "http://localhost:8081";
const DEFAULT_CURRENCY: &str = "inr";

const PLACEHOLDER_KEY: &str = "pk_test_replace_with_your_key";
const MIN_KEY_LENGTH: usize = 30;

/// Initialization state of the processor client. Submissions fail fast
/// unless the client is `Ready`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientReadiness {
    Unconfigured,
    Loading,
    Ready,
    ConfigError(String),
}

impl ClientReadiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Runtime configuration, built once at startup and passed into the
/// adapter and controller constructors.
#[derive(Debug, Clone)]
pub struct Config {
    /// Publishable client key for the payment processor.
    pub publishable_key: Option<String>,
    /// Base URL of the payment-intent service.
    pub api_base: String,
    /// ISO currency code sent with every intent, lowercase.
    pub currency: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            publishable_key: env::var(ENV_PUBLISHABLE_KEY).ok(),
            api_base: env::var(ENV_API_BASE).unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            currency: env::var(ENV_CURRENCY).unwrap_or_else(|_| DEFAULT_CURRENCY.to_string()),
        }
    }

    /// Returns the publishable key if it looks usable. A missing key, the
    /// well-known placeholder, anything containing `example`, or a key too
    /// short to be real all disable the flow with a configuration warning.
    pub fn checked_key(&self) -> std::result::Result<&str, String> {
        let key = match self.publishable_key.as_deref() {
            Some(key) => key,
            None => return Err(Self::config_warning()),
        };
        if key == PLACEHOLDER_KEY || key.contains("example") || key.len() < MIN_KEY_LENGTH {
            return Err(Self::config_warning());
        }
        Ok(key)
    }

    fn config_warning() -> String {
        format!(
            "Payment client not configured. Set {ENV_PUBLISHABLE_KEY} to your publishable key before taking payments."
        )
    }
}

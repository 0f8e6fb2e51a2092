use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] crate::core::config::ConfigError),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Arguments required: {0}")]
    ArgumentsRequired(String),

    #[error("Bad symbol: {0}")]
    BadSymbol(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    #[error("Insufficient funds: {0}")]
    InsufficientFunds(String),

    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Invalid nonce: {0}")]
    InvalidNonce(String),

    #[error("DDoS protection: {0}")]
    DdosProtection(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Exchange not available: {0}")]
    ExchangeNotAvailable(String),

    /// Generic exchange-side failure, also used for unrecognized error messages
    #[error("Exchange error: {0}")]
    Exchange(String),
}

impl ExchangeError {
    /// Error for a non-2xx response the exchange layer could not classify
    pub fn from_http_status(status: u16, body: String) -> Self {
        match status {
            401 => Self::AuthError(body),
            418 => Self::DdosProtection(body),
            429 => Self::RateLimitExceeded(body),
            404 | 409 | 410 | 500..=599 => Self::ExchangeNotAvailable(body),
            _ => Self::HttpStatus { status, body },
        }
    }
}

/// Closed set of failure kinds an exchange error message can be classified into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Authentication,
    InvalidOrder,
    InsufficientFunds,
    OrderNotFound,
    InvalidNonce,
    DdosProtection,
    RateLimitExceeded,
    ExchangeNotAvailable,
    Exchange,
}

impl ErrorKind {
    /// Build the concrete error carrying `feedback` as its message
    pub fn into_error(self, feedback: impl Into<String>) -> ExchangeError {
        let feedback = feedback.into();
        match self {
            Self::Authentication => ExchangeError::AuthError(feedback),
            Self::InvalidOrder => ExchangeError::InvalidOrder(feedback),
            Self::InsufficientFunds => ExchangeError::InsufficientFunds(feedback),
            Self::OrderNotFound => ExchangeError::OrderNotFound(feedback),
            Self::InvalidNonce => ExchangeError::InvalidNonce(feedback),
            Self::DdosProtection => ExchangeError::DdosProtection(feedback),
            Self::RateLimitExceeded => ExchangeError::RateLimitExceeded(feedback),
            Self::ExchangeNotAvailable => ExchangeError::ExchangeNotAvailable(feedback),
            Self::Exchange => ExchangeError::Exchange(feedback),
        }
    }
}

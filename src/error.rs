use serde_json::Value;
use thiserror::Error;

/// Failures of a payment call. `pay` never returns these as `Err`; they are
/// carried inside [`RawApiResponse::Failed`](crate::models::payment::RawApiResponse).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaymentError {
    /// The string handed to `pay` was not a valid payment request document.
    #[error("Invalid JSON input: {0}")]
    InvalidInputJson(String),

    /// The amount could not be expressed as integer subunits.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// The API answered outside the 2xx range.
    #[error("Server error: {status}")]
    ServerError { status: u16, details: Value },

    /// The request went out but nothing usable came back.
    #[error("No response received from the server")]
    NoResponse,

    /// The request could not be dispatched at all.
    #[error("Connection error: {0}")]
    ConnectionError(String),
}

impl PaymentError {
    /// Classifies a transport error. Builder errors happen before anything is
    /// sent; everything else means the request was dispatched.
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_builder() {
            PaymentError::ConnectionError(err.to_string())
        } else {
            PaymentError::NoResponse
        }
    }

    pub fn details(&self) -> Option<&Value> {
        match self {
            PaymentError::ServerError { details, .. } => Some(details),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

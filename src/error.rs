use serde::Deserialize;
use thiserror::Error;

/// Error envelope the hosted record store returns on non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorObject,
}

#[derive(Debug, Deserialize)]
pub struct ErrorObject {
    pub code: String,
    pub message: String,
}

/// Failure of a single record-store operation. There are no automatic
/// retries; the caller decides whether and how to surface it.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{code}: {message}")]
    Api { code: String, message: String },

    #[error("not signed in or session expired")]
    Unauthorized,

    #[error("record not found")]
    NotFound,

    #[error("malformed record payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unexpected store response: {0}")]
    Envelope(&'static str),
}

impl StoreError {
    pub fn api(code: impl Into<String>, message: impl Into<String>) -> Self {
        StoreError::Api {
            code: code.into(),
            message: message.into(),
        }
    }
}

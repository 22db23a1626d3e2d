//! Error type shared by the server handlers and the API client.
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::time::Duration;
use tracing::{error, warn};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Required client configuration was empty.
    #[error("{0} is required")]
    InvalidArgument(&'static str),

    /// The base URL environment variable was unset or empty.
    #[error("Environment variable {0} is required for the base URL")]
    MissingEnvironment(String),

    /// The request body was not valid JSON.
    #[error("Invalid JSON payload: {0}")]
    MalformedInput(#[from] serde_json::Error),

    #[error("Unrecognized log level: {0}")]
    InvalidLogLevel(String),

    /// An inference backend failed to produce a result.
    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Transport failures are passed through as-is.
    #[error(transparent)]
    Transport(BoxError),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::MalformedInput(e) => {
                warn!(error = %e, "Rejecting malformed JSON payload");
                (StatusCode::BAD_REQUEST, "Invalid JSON payload").into_response()
            }
            other => {
                error!(error = %other, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()).into_response()
            }
        }
    }
}

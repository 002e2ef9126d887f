use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error; // Use thiserror for cleaner error definitions

// --- Backing Store Errors ---

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid backing store URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    // Store unreachable, timed out, connection reset...
    #[error("{method} {url} failed: {source}")]
    Transport {
        method: &'static str,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} {url} returned status {status}")]
    Status {
        method: &'static str,
        url: String,
        status: u16,
    },

    #[error("{method} {url} returned a malformed body: {source}")]
    Decode {
        method: &'static str,
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

// --- Controller Errors ---

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    #[error("Toy board controller has stopped")]
    ControllerStopped,
}

// --- Web Layer Error ---

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Toy board unavailable")]
    BoardUnavailable(#[from] BoardError),
    #[error("Failed to render board page: {0}")]
    RenderError(#[from] minijinja::Error),

    // Startup errors
    #[error("Initialization error: {0}")]
    InitError(String),
    #[error("Server I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::InitError(err.to_string())
    }
}

// --- Axum Response Implementation ---

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::BoardUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "Toy board is not running".to_string())
            }
            AppError::RenderError(e) => {
                tracing::error!(error.source = ?e, "Template rendering failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page".to_string())
            }
            AppError::InitError(_) | AppError::IoError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "An internal server error occurred".to_string())
            }
        };

        tracing::error!(error.message = %error_message, error.detail = %self, "Responding with error");

        let body = Json(serde_json::json!({ "error": error_message }));
        (status, body).into_response()
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP error! status: {0}")]
    HttpStatus(u16),

    #[error("Recipe API quota reached. Please check your Spoonacular plan.")]
    QuotaExceeded,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Get a sanitized error message safe for logging
    /// Filters out potentially sensitive information
    pub fn log_safe(&self) -> String {
        match self {
            // Transport errors carry the full request URL, which includes the API key
            Error::Http(_) => "External HTTP request failed".to_string(),
            Error::InvalidUrl(_) => "Invalid URL provided".to_string(),

            Error::Internal(msg) => {
                let lower = msg.to_lowercase();
                if lower.contains("password")
                    || lower.contains("secret")
                    || lower.contains("token")
                    || lower.contains("key")
                {
                    "Internal error (details redacted)".to_string()
                } else {
                    format!("Internal error: {msg}")
                }
            }

            Error::HttpStatus(status) => format!("HTTP error! status: {status}"),
            Error::QuotaExceeded => "Recipe API quota exceeded".to_string(),
            Error::Json(_) => "Malformed JSON payload".to_string(),
            Error::Io(_) => "File system operation failed".to_string(),
            Error::Template(_) => "Template rendering failed".to_string(),
            Error::Config(msg) => format!("Configuration error: {msg}"),
            Error::NotFound(msg) => format!("Not found: {msg}"),
            Error::Validation(msg) => format!("Validation error: {msg}"),
            Error::Unauthorized(msg) => format!("Unauthorized: {msg}"),
            Error::Unavailable(msg) => format!("Service unavailable: {msg}"),
            Error::Render(msg) => format!("Render error: {msg}"),
        }
    }

    /// Whether the request never produced an HTTP status (connection refused, DNS, timeout)
    pub fn is_transport(&self) -> bool {
        match self {
            Error::Http(e) => e.status().is_none(),
            _ => false,
        }
    }

    /// Message shown to the user in a notice or error panel
    pub fn user_message(&self) -> String {
        match self {
            Error::QuotaExceeded => self.to_string(),
            Error::Validation(msg) | Error::Unauthorized(msg) | Error::Unavailable(msg) => {
                msg.clone()
            }
            Error::NotFound(msg) => msg.clone(),
            _ => "Something went wrong. Please try again.".to_string(),
        }
    }
}

// Implement IntoResponse for API error handling
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!("Request error: {}", self.log_safe());

        let (status, error_message) = match &self {
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Error::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Error::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            Error::QuotaExceeded => (StatusCode::PAYMENT_REQUIRED, self.to_string()),
            Error::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            Error::Http(_) | Error::HttpStatus(_) => (
                StatusCode::BAD_GATEWAY,
                "External service error".to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

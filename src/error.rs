use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum BankError {
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Service account error: {0}")]
    ServiceAccount(String),

    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    #[error("Upstream error with status {status}: {message}")]
    Upstream { status: StatusCode, message: String },

    #[error("Worksheet not found: {0}")]
    WorksheetNotFound(String),

    #[error("Invalid ID token: {0}")]
    InvalidIdToken(String),

    #[error("{0} is not connected")]
    NotConnected(&'static str),

    #[error("Cookie key error: {0}")]
    CookieKey(String),
}

impl BankError {
    /// Failures caused by an unreachable or misconfigured backing service.
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            BankError::Reqwest(_)
                | BankError::Upstream { .. }
                | BankError::TokenExchange(_)
                | BankError::ServiceAccount(_)
                | BankError::WorksheetNotFound(_)
                | BankError::NotConnected(_)
        )
    }
}

impl IntoResponse for BankError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message) = match &self {
            BankError::InvalidIdToken(_) | BankError::Jwt(_) => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication error.",
            ),
            e if e.is_connectivity() => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
                "Service unavailable, try later.",
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal server error occurred.",
            ),
        };
        let body = ApiErrorResponse {
            error: ApiErrorBody {
                code: code.to_string(),
                message: message.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}

/// Conditions reported by the identity provider when creating an account.
#[derive(Debug, ThisError)]
pub enum AccountError {
    #[error("EMAIL_EXISTS")]
    EmailExists,

    #[error("INVALID_EMAIL")]
    InvalidEmail,

    #[error("WEAK_PASSWORD")]
    WeakPassword,

    #[error("INVALID_PASSWORD")]
    InvalidCredentials,

    #[error("{0}")]
    Other(String),
}

impl AccountError {
    /// Classify a provider error message such as `WEAK_PASSWORD : Password should be ...`.
    pub fn from_provider_message(message: &str) -> Self {
        if message.contains("EMAIL_EXISTS") {
            AccountError::EmailExists
        } else if message.contains("INVALID_EMAIL") {
            AccountError::InvalidEmail
        } else if message.contains("WEAK_PASSWORD") {
            AccountError::WeakPassword
        } else if message.contains("EMAIL_NOT_FOUND") || message.contains("INVALID_PASSWORD") {
            AccountError::InvalidCredentials
        } else {
            AccountError::Other(message.to_string())
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            AccountError::EmailExists => "This email is already registered.".to_string(),
            AccountError::InvalidEmail => "Invalid email format.".to_string(),
            AccountError::WeakPassword => "Password should be at least 6 characters.".to_string(),
            AccountError::InvalidCredentials => "Invalid email or password.".to_string(),
            AccountError::Other(text) => format!("An error occurred: {text}"),
        }
    }
}

impl From<BankError> for AccountError {
    fn from(e: BankError) -> Self {
        AccountError::Other(e.to_string())
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

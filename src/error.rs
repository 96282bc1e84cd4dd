//! Error types for Brewdesk

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Password hashing error: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Mail error: {0}")]
    Mail(#[from] lettre::error::Error),

    #[error("Mail address error: {0}")]
    MailAddress(#[from] lettre::address::AddressError),

    #[error("Mail transport error: {0}")]
    MailTransport(#[from] lettre::transport::smtp::Error),

    #[error("User '{0}' does not exist")]
    UserNotFound(String),

    #[error("No user found with email '{0}'")]
    EmailNotFound(String),

    #[error("A user with username or email '{0}' already exists")]
    DuplicateUser(String),

    #[error("Cafe '{0}' not found")]
    CafeNotFound(String),

    #[error("Category not found")]
    CategoryNotFound,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Current password is incorrect")]
    CurrentPasswordIncorrect,

    #[error("New passwords do not match")]
    PasswordMismatch,

    #[error("{0}")]
    WeakPassword(String),

    #[error("Invalid OTP or OTP has expired")]
    OtpRejected,

    #[error("You must be logged in to do that")]
    NotAuthenticated,

    #[error("{0}")]
    Validation(String),

    #[error("Config file not found. Run 'brewdesk init' first.")]
    ConfigNotFound,

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

// Flow errors are turned into flash messages by the handlers; anything
// that reaches this conversion is an infrastructure failure.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!("request failed: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;

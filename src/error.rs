//! Centralized error handling for the collections desk client
//!
//! One unified error type covers transport failures, non-2xx API responses,
//! and client-side validation failures that are caught before any network
//! round-trip. None of these are fatal to a session; mutation errors are
//! recovered locally by rolling the optimistic update back.

use thiserror::Error;

/// Client error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (HTTP {status}): {detail}")]
    Api { status: u16, detail: String },

    #[error("Not authenticated: {0}")]
    Unauthorized(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Fields are locked while the current status is Paid")]
    PaidLocked,

    #[error("A mutation for {0} is already in flight")]
    MutationInFlight(String),

    #[error("Invalid response body: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl Error {
    /// Get the error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Http(_) => "HTTP_TRANSPORT",
            Error::Api { .. } => "API_ERROR",
            Error::Unauthorized(_) => "UNAUTHORIZED",
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::PaidLocked => "PAID_LOCKED",
            Error::MutationInFlight(_) => "MUTATION_IN_FLIGHT",
            Error::InvalidResponse(_) => "INVALID_RESPONSE",
            Error::Config(_) => "CONFIG_ERROR",
        }
    }

    /// True for failures caught client-side, before any network call was made.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::Validation(_)
                | Error::PaidLocked
                | Error::MutationInFlight(_)
                | Error::Unauthorized(_)
        )
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Error::Validation(err.to_string())
    }
}

/// Result type alias using the client error
pub type Result<T> = std::result::Result<T, Error>;

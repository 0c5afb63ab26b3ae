use std::fmt;
use thiserror::Error;

/// The base error type for all classifieds errors.
///
/// Each crate keeps its own error enum and implements `From<CrateError>` for
/// `ClassifiedsError` so handlers can answer with a single error shape.
#[derive(Error, Debug)]
pub enum ClassifiedsError {
    /// Error occurred during an HTTP request
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Authentication failed; the message is shown to the user as is
    #[error("{0}")]
    AuthError(String),

    /// The caller is authenticated but may not touch the resource
    #[error("{0}")]
    ForbiddenError(String),

    /// Client-side validation failed before any backend call
    #[error("{0}")]
    ValidationError(String),

    /// Error occurred during database operation
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to a resource not being found
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for ClassifiedsError {
    fn status_code(&self) -> u16 {
        match self {
            ClassifiedsError::HttpError(_) => 500,
            ClassifiedsError::ParseError(_) => 400,
            ClassifiedsError::ConfigError(_) => 500,
            ClassifiedsError::AuthError(_) => 401,
            ClassifiedsError::ForbiddenError(_) => 403,
            ClassifiedsError::ValidationError(_) => 400,
            ClassifiedsError::DatabaseError(_) => 500,
            ClassifiedsError::ExternalServiceError { .. } => 502,
            ClassifiedsError::NotFoundError(_) => 404,
            ClassifiedsError::InternalError(_) => 500,
        }
    }
}

// Common error conversions
impl From<reqwest::Error> for ClassifiedsError {
    fn from(err: reqwest::Error) -> Self {
        ClassifiedsError::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for ClassifiedsError {
    fn from(err: serde_json::Error) -> Self {
        ClassifiedsError::ParseError(err.to_string())
    }
}

// Utility functions for error handling
pub fn validation_error<T: fmt::Display>(message: T) -> ClassifiedsError {
    ClassifiedsError::ValidationError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> ClassifiedsError {
    ClassifiedsError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

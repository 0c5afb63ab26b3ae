// --- File: crates/classifieds_firebase/src/error.rs ---
use classifieds_common::services::{AuthFailure, ClassifyAuthFailure};
use classifieds_common::{external_service_error, ClassifiedsError};
use thiserror::Error;

/// Errors that can occur when talking to Firebase Auth or Firebase Storage
#[derive(Error, Debug)]
pub enum FirebaseError {
    /// Error during HTTP request to a Firebase API
    #[error("HTTP request error: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Identity Toolkit rejected the call; `code` is its error code, e.g. `EMAIL_NOT_FOUND`
    #[error("Firebase Auth error: {code} (Status: {status_code})")]
    AuthApiError {
        status_code: u16,
        code: String,
        /// Text after the code, e.g. `Password should be at least 6 characters`
        detail: Option<String>,
    },

    /// Storage rejected the upload
    #[error("Firebase Storage error: {message} (Status: {status_code})")]
    StorageApiError { status_code: u16, message: String },

    /// Missing required configuration
    #[error("Missing configuration: {0}")]
    ConfigError(String),

    /// An endpoint or download URL could not be built
    #[error("Invalid URL: {0}")]
    UrlError(String),
}

impl ClassifyAuthFailure for FirebaseError {
    fn auth_failure(&self) -> AuthFailure {
        let FirebaseError::AuthApiError { code, .. } = self else {
            return AuthFailure::Other;
        };
        match code.as_str() {
            "EMAIL_NOT_FOUND" => AuthFailure::UserNotFound,
            "INVALID_PASSWORD" => AuthFailure::WrongPassword,
            "INVALID_EMAIL" => AuthFailure::InvalidEmail,
            "EMAIL_EXISTS" => AuthFailure::EmailInUse,
            "INVALID_ID_TOKEN" | "TOKEN_EXPIRED" | "USER_NOT_FOUND" | "USER_DISABLED" => {
                AuthFailure::InvalidToken
            }
            _ => AuthFailure::Other,
        }
    }

    fn detail(&self) -> Option<String> {
        match self {
            FirebaseError::AuthApiError { detail, .. } => detail.clone(),
            _ => None,
        }
    }
}

impl From<FirebaseError> for ClassifiedsError {
    fn from(err: FirebaseError) -> Self {
        match err {
            FirebaseError::RequestError(e) => ClassifiedsError::HttpError(e.to_string()),
            FirebaseError::AuthApiError { code, .. } => external_service_error("Firebase Auth", code),
            FirebaseError::StorageApiError {
                status_code,
                message,
            } => external_service_error(
                "Firebase Storage",
                format!("Status: {}, Message: {}", status_code, message),
            ),
            FirebaseError::ConfigError(msg) => ClassifiedsError::ConfigError(msg),
            FirebaseError::UrlError(msg) => ClassifiedsError::ConfigError(msg),
        }
    }
}

// --- File: crates/classifieds_push/src/error.rs ---
use classifieds_common::{external_service_error, ClassifiedsError};
use classifieds_db::DbError;
use thiserror::Error;

/// Push-specific error types.
#[derive(Error, Debug)]
pub enum PushError {
    /// The HTTP request to the relay failed
    #[error("Push relay request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// The relay answered with a non-success status
    #[error("Push relay returned an error: {message} (Status: {status_code})")]
    RelayError { status_code: u16, message: String },

    /// The relay accepted the request but rejected the message
    #[error("Push relay rejected the message: {0}")]
    TicketError(String),

    /// The device could not hand out a push token
    #[error("Push token unavailable: {0}")]
    TokenSourceError(String),

    /// Reading or writing profiles failed
    #[error("Profile store error: {0}")]
    StoreError(#[from] DbError),

    /// A send task panicked or was aborted
    #[error("Push task failed: {0}")]
    TaskError(String),
}

impl From<PushError> for ClassifiedsError {
    fn from(err: PushError) -> Self {
        match err {
            PushError::RequestError(e) => external_service_error("Push relay", e),
            PushError::RelayError {
                status_code,
                message,
            } => external_service_error(
                "Push relay",
                format!("Status: {}, Message: {}", status_code, message),
            ),
            PushError::TicketError(msg) => external_service_error("Push relay", msg),
            PushError::TokenSourceError(msg) => ClassifiedsError::InternalError(msg),
            PushError::StoreError(e) => e.into(),
            PushError::TaskError(msg) => ClassifiedsError::InternalError(msg),
        }
    }
}

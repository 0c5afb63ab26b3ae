//! Shared building blocks for the classifieds backend: the data model,
//! the error type every handler answers with, the traits the external
//! collaborators are reached through, form validation and logging setup.

pub mod error;
pub mod http;
pub mod logging;
pub mod models;
pub mod services;
pub mod session;
pub mod validation;

// Re-export error types and utilities for easier access
pub use error::{external_service_error, validation_error, ClassifiedsError, HttpStatusCode};

// Re-export HTTP utilities for easier access
pub use http::client::create_client;

// Re-export logging utilities for easier access
pub use logging::{init, init_with_level};

// Re-export session helpers for easier access
pub use session::{bearer_token, require_session, VERIFY_UNAVAILABLE_ALERT};

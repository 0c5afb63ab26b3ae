//! Client-side form checks, run before any backend call.
//!
//! Each check fails with a [`ClassifiedsError::ValidationError`] carrying the
//! alert text shown to the user.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{validation_error, ClassifiedsError};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Whether `email` has the `local@domain.tld` shape.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Fails with `message` if any of `fields` is empty.
pub fn require_all(fields: &[&str], message: &str) -> Result<(), ClassifiedsError> {
    if fields.iter().any(|field| field.is_empty()) {
        return Err(validation_error(message));
    }
    Ok(())
}

/// Fails with the standard alert unless `email` is well formed.
pub fn require_valid_email(email: &str) -> Result<(), ClassifiedsError> {
    if !is_valid_email(email) {
        return Err(validation_error("Please enter a valid email address."));
    }
    Ok(())
}

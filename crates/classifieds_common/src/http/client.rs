use reqwest::{Client, Error as ReqwestError};
use std::time::Duration;

/// Default timeout for outbound requests in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Build the HTTP client shared by the auth provider, object storage and
/// push relay integrations.
pub fn create_client(timeout_secs: u64) -> Result<Client, ReqwestError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
}

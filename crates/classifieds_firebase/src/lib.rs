//! Firebase integration for the classifieds backend
//!
//! - [`auth::FirebaseAuthClient`] implements the auth provider over the
//!   Identity Toolkit REST API and publishes sign-in / sign-out events.
//! - [`storage::FirebaseStorageClient`] implements object storage over the
//!   Firebase Storage REST API.
//! - [`account`] holds the sign-up, sign-in, sign-out and password-reset
//!   flows, generic over the provider so they can be tested with fakes.
//!
//! # API Endpoints
//!
//! - `POST /auth/sign-up` - Create an account
//! - `POST /auth/sign-in` - Sign in and register the device push token
//! - `POST /auth/sign-out` - End the caller's session
//! - `POST /auth/password-reset` - Email a password-reset link
//! - `GET /auth/me` - The identity behind the bearer token

pub mod account;
pub mod auth;
#[cfg(feature = "openapi")]
pub mod doc;
pub mod error;
pub mod handlers;
#[cfg(test)]
mod mock;
pub mod routes;
pub mod storage;

pub use auth::FirebaseAuthClient;
pub use error::FirebaseError;
pub use routes::routes;
pub use storage::FirebaseStorageClient;

#[cfg(feature = "openapi")]
pub mod openapi {
    pub use crate::doc::FirebaseApiDoc;
}

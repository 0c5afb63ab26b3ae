//! Service abstractions for the external collaborators.
//!
//! The auth provider, the object store and the push relay are reached through
//! these traits so the ad and push logic can be exercised against fakes.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::models::{Identity, PushMessage, PushTicket, Session};

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// An auth state transition, published to subscribers of the auth provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AuthEvent {
    SignedIn(Identity),
    SignedOut(Identity),
}

/// Provider failures the account flows tell apart when choosing alert text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    UserNotFound,
    WrongPassword,
    InvalidEmail,
    EmailInUse,
    /// The id token is expired, revoked or malformed
    InvalidToken,
    Other,
}

/// Implemented by auth provider errors so callers can classify them.
pub trait ClassifyAuthFailure {
    fn auth_failure(&self) -> AuthFailure;

    /// Human-readable explanation from the provider, when it sent one.
    fn detail(&self) -> Option<String> {
        None
    }
}

/// Email/password authentication.
pub trait AuthProvider: Send + Sync {
    /// Error type returned by auth operations.
    type Error: std::error::Error + ClassifyAuthFailure + Send + Sync + 'static;

    /// Create an account and return its first session.
    fn sign_up(&self, email: &str, password: &str) -> BoxFuture<'_, Session, Self::Error>;

    /// Authenticate an existing account.
    fn sign_in(&self, email: &str, password: &str) -> BoxFuture<'_, Session, Self::Error>;

    /// End a session.
    fn sign_out(&self, session: &Session) -> BoxFuture<'_, (), Self::Error>;

    /// Ask the provider to email a password-reset link.
    fn send_password_reset(&self, email: &str) -> BoxFuture<'_, (), Self::Error>;

    /// Resolve a bearer id token into the identity it was issued for.
    fn verify(&self, id_token: &str) -> BoxFuture<'_, Identity, Self::Error>;

    /// Subscribe to sign-in / sign-out transitions.
    fn subscribe(&self) -> broadcast::Receiver<AuthEvent>;
}

/// Blob upload to generated paths.
pub trait ObjectStorage: Send + Sync {
    /// Error type returned by storage operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Upload `bytes` to `path` and return a URL the content can be fetched from.
    fn upload(
        &self,
        session: &Session,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> BoxFuture<'_, String, Self::Error>;
}

/// A third-party push notification relay.
pub trait PushRelay: Send + Sync {
    /// Error type returned by relay sends.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Deliver one message to one device token.
    fn send(&self, message: PushMessage) -> BoxFuture<'_, PushTicket, Self::Error>;
}

impl<T: PushRelay + ?Sized> PushRelay for std::sync::Arc<T> {
    type Error = T::Error;

    fn send(&self, message: PushMessage) -> BoxFuture<'_, PushTicket, Self::Error> {
        (**self).send(message)
    }
}

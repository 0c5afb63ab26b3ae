//! In-test auth provider.

use std::sync::atomic::{AtomicUsize, Ordering};

use classifieds_common::models::{Identity, Session};
use classifieds_common::services::{
    AuthEvent, AuthFailure, AuthProvider, BoxFuture, ClassifyAuthFailure,
};
use tokio::sync::broadcast;

pub const GOOD_TOKEN: &str = "good-token";

#[derive(Debug, Clone, Copy, thiserror::Error)]
pub enum FakeAuthError {
    #[error("provider refused: {0:?}")]
    Code(AuthFailure),
    #[error("provider refused: {0:?}: {1}")]
    Detailed(AuthFailure, &'static str),
}

impl ClassifyAuthFailure for FakeAuthError {
    fn auth_failure(&self) -> AuthFailure {
        match self {
            FakeAuthError::Code(failure) | FakeAuthError::Detailed(failure, _) => *failure,
        }
    }

    fn detail(&self) -> Option<String> {
        match self {
            FakeAuthError::Code(_) => None,
            FakeAuthError::Detailed(_, detail) => Some(detail.to_string()),
        }
    }
}

/// Accepts every credential unless told to fail, and knows one id token.
pub struct FakeAuth {
    failure: Option<FakeAuthError>,
    calls: AtomicUsize,
    events: broadcast::Sender<AuthEvent>,
}

impl FakeAuth {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(8);
        Self {
            failure: None,
            calls: AtomicUsize::new(0),
            events,
        }
    }

    pub fn failing_with(mut self, failure: FakeAuthError) -> Self {
        self.failure = Some(failure);
        self
    }

    /// Provider calls made so far, token verification excluded.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn answer(&self, email: &str) -> Result<Session, FakeAuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = self.failure {
            return Err(failure);
        }
        let session = Session {
            user_id: format!("uid-{}", email),
            email: Some(email.to_string()),
            id_token: GOOD_TOKEN.to_string(),
        };
        let _ = self.events.send(AuthEvent::SignedIn(session.identity()));
        Ok(session)
    }
}

impl AuthProvider for FakeAuth {
    type Error = FakeAuthError;

    fn sign_up(&self, email: &str, _password: &str) -> BoxFuture<'_, Session, Self::Error> {
        let result = self.answer(email);
        Box::pin(async move { result })
    }

    fn sign_in(&self, email: &str, _password: &str) -> BoxFuture<'_, Session, Self::Error> {
        let result = self.answer(email);
        Box::pin(async move { result })
    }

    fn sign_out(&self, session: &Session) -> BoxFuture<'_, (), Self::Error> {
        let _ = self.events.send(AuthEvent::SignedOut(session.identity()));
        Box::pin(async { Ok(()) })
    }

    fn send_password_reset(&self, _email: &str) -> BoxFuture<'_, (), Self::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let result = match self.failure {
            Some(failure) => Err(failure),
            None => Ok(()),
        };
        Box::pin(async move { result })
    }

    fn verify(&self, id_token: &str) -> BoxFuture<'_, Identity, Self::Error> {
        let result = if id_token == GOOD_TOKEN {
            Ok(Identity {
                user_id: "uid-seller@example.com".to_string(),
                email: Some("seller@example.com".to_string()),
            })
        } else {
            Err(FakeAuthError::Code(AuthFailure::InvalidToken))
        };
        Box::pin(async move { result })
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}

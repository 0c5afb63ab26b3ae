//! In-test doubles for the push relay and the device token source.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use classifieds_common::models::{Identity, PushMessage, PushTicket, Session};
use classifieds_common::services::{
    AuthEvent, AuthFailure, AuthProvider, BoxFuture, ClassifyAuthFailure, PushRelay,
};
use tokio::sync::broadcast;

use crate::error::PushError;
use crate::registry::{PermissionStatus, PushTokenSource};

pub enum RelayBehaviour {
    AcceptAll,
    RejectToken(String),
}

/// Relay that records every message and how many sends overlapped.
pub struct FakeRelay {
    behaviour: RelayBehaviour,
    sent: Mutex<Vec<PushMessage>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeRelay {
    pub fn new(behaviour: RelayBehaviour) -> Self {
        Self {
            behaviour,
            sent: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn sent(&self) -> Vec<PushMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_tokens(&self) -> Vec<String> {
        self.sent().into_iter().map(|m| m.to).collect()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl PushRelay for FakeRelay {
    type Error = PushError;

    fn send(&self, message: PushMessage) -> BoxFuture<'_, PushTicket, Self::Error> {
        Box::pin(async move {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            tokio::task::yield_now().await;
            tokio::task::yield_now().await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            let rejected = matches!(&self.behaviour, RelayBehaviour::RejectToken(t) if *t == message.to);
            let to = message.to.clone();
            self.sent.lock().unwrap().push(message);

            if rejected {
                return Err(PushError::TicketError(format!("{} is not registered", to)));
            }
            Ok(PushTicket {
                id: Some(format!("ticket-{}", to)),
                status: "ok".to_string(),
            })
        })
    }
}

/// Token source with scripted permission answers.
pub struct FakeTokenSource {
    pub current: PermissionStatus,
    pub after_request: PermissionStatus,
    pub token: Result<String, String>,
    pub requests: AtomicUsize,
}

impl FakeTokenSource {
    pub fn granted(token: &str) -> Self {
        Self {
            current: PermissionStatus::Granted,
            after_request: PermissionStatus::Granted,
            token: Ok(token.to_string()),
            requests: AtomicUsize::new(0),
        }
    }
}

impl PushTokenSource for FakeTokenSource {
    fn permission_status(&self) -> BoxFuture<'_, PermissionStatus, PushError> {
        Box::pin(async move { Ok(self.current) })
    }

    fn request_permission(&self) -> BoxFuture<'_, PermissionStatus, PushError> {
        Box::pin(async move {
            self.requests.fetch_add(1, Ordering::SeqCst);
            Ok(self.after_request)
        })
    }

    fn device_token(&self) -> BoxFuture<'_, String, PushError> {
        Box::pin(async move {
            self.token
                .clone()
                .map_err(PushError::TokenSourceError)
        })
    }
}

#[derive(Debug, thiserror::Error)]
#[error("token rejected")]
pub struct RejectedToken;

impl ClassifyAuthFailure for RejectedToken {
    fn auth_failure(&self) -> AuthFailure {
        AuthFailure::InvalidToken
    }
}

/// Auth provider that only knows one id token.
pub struct FakeAuth {
    events: broadcast::Sender<AuthEvent>,
}

pub const GOOD_TOKEN: &str = "good-token";

impl FakeAuth {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(4);
        Self { events }
    }
}

impl AuthProvider for FakeAuth {
    type Error = RejectedToken;

    fn sign_up(&self, _email: &str, _password: &str) -> BoxFuture<'_, Session, Self::Error> {
        Box::pin(async { Err(RejectedToken) })
    }

    fn sign_in(&self, _email: &str, _password: &str) -> BoxFuture<'_, Session, Self::Error> {
        Box::pin(async { Err(RejectedToken) })
    }

    fn sign_out(&self, _session: &Session) -> BoxFuture<'_, (), Self::Error> {
        Box::pin(async { Ok(()) })
    }

    fn send_password_reset(&self, _email: &str) -> BoxFuture<'_, (), Self::Error> {
        Box::pin(async { Ok(()) })
    }

    fn verify(&self, id_token: &str) -> BoxFuture<'_, Identity, Self::Error> {
        let known = id_token == GOOD_TOKEN;
        Box::pin(async move {
            if known {
                Ok(Identity {
                    user_id: "u1".to_string(),
                    email: Some("seller@example.com".to_string()),
                })
            } else {
                Err(RejectedToken)
            }
        })
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}

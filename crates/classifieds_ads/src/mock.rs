//! In-test doubles for the auth provider, the object store and the relay.

use std::sync::Mutex;

use classifieds_common::models::{Identity, PushMessage, PushTicket, Session};
use classifieds_common::services::{
    AuthEvent, AuthFailure, AuthProvider, BoxFuture, ClassifyAuthFailure, ObjectStorage,
    PushRelay,
};
use tokio::sync::broadcast;

pub const SELLER_TOKEN: &str = "seller-token";
pub const BUYER_TOKEN: &str = "buyer-token";

pub fn seller() -> Session {
    Session {
        user_id: "seller".to_string(),
        email: Some("seller@example.com".to_string()),
        id_token: SELLER_TOKEN.to_string(),
    }
}

pub fn buyer() -> Session {
    Session {
        user_id: "buyer".to_string(),
        email: Some("buyer@example.com".to_string()),
        id_token: BUYER_TOKEN.to_string(),
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

/// Knows two id tokens, one per user.
pub struct FakeAuth {
    events: broadcast::Sender<AuthEvent>,
}

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
        let identity = [seller(), buyer()]
            .into_iter()
            .find(|session| session.id_token == id_token)
            .map(|session| session.identity());
        Box::pin(async move { identity.ok_or(RejectedToken) })
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("bucket unavailable")]
pub struct BucketDown;

#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub path: String,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Object store that keeps uploads in memory.
pub struct FakeStorage {
    fail: bool,
    objects: Mutex<Vec<StoredObject>>,
}

impl FakeStorage {
    pub fn new() -> Self {
        Self {
            fail: false,
            objects: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            objects: Mutex::new(Vec::new()),
        }
    }

    pub fn objects(&self) -> Vec<StoredObject> {
        self.objects.lock().unwrap().clone()
    }
}

impl ObjectStorage for FakeStorage {
    type Error = BucketDown;

    fn upload(
        &self,
        _session: &Session,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> BoxFuture<'_, String, Self::Error> {
        let object = StoredObject {
            path: path.to_string(),
            bytes,
            content_type: content_type.to_string(),
        };
        Box::pin(async move {
            if self.fail {
                return Err(BucketDown);
            }
            let url = format!("https://storage.test/{}", object.path);
            self.objects.lock().unwrap().push(object);
            Ok(url)
        })
    }
}

#[derive(Debug, thiserror::Error)]
#[error("relay unavailable")]
pub struct RelayDown;

/// Relay that records what it was asked to send.
pub struct FakeRelay {
    sent: Mutex<Vec<PushMessage>>,
}

impl FakeRelay {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<PushMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl PushRelay for FakeRelay {
    type Error = RelayDown;

    fn send(&self, message: PushMessage) -> BoxFuture<'_, PushTicket, Self::Error> {
        Box::pin(async move {
            let id = format!("ticket-{}", message.to);
            self.sent.lock().unwrap().push(message);
            Ok(PushTicket {
                id: Some(id),
                status: "ok".to_string(),
            })
        })
    }
}

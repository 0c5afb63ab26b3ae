//! Firebase Authentication client
//!
//! Talks to the Identity Toolkit REST API (`/v1/accounts:*`) with the web
//! API key. Every successful sign-up or sign-in and every sign-out is
//! published as an [`AuthEvent`] to subscribers.

use classifieds_common::create_client;
use classifieds_common::http::client::DEFAULT_TIMEOUT_SECS;
use classifieds_common::models::{Identity, Session};
use classifieds_common::services::{AuthEvent, AuthProvider, BoxFuture};
use classifieds_config::FirebaseConfig;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::error::FirebaseError;

const EVENT_CAPACITY: usize = 64;

/// Response of `accounts:signUp` and `accounts:signInWithPassword`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PasswordAuthResponse {
    local_id: String,
    email: Option<String>,
    id_token: String,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordAuthRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

/// Client for Firebase email/password authentication
#[derive(Debug, Clone)]
pub struct FirebaseAuthClient {
    client: Client,
    api_key: String,
    base_url: String,
    events: broadcast::Sender<AuthEvent>,
}

impl FirebaseAuthClient {
    /// Creates a new auth client with the given configuration
    ///
    /// # Errors
    ///
    /// Fails when the API key is empty or the HTTP client cannot be built.
    pub fn new(config: &FirebaseConfig) -> Result<Self, FirebaseError> {
        if config.api_key.is_empty() {
            return Err(FirebaseError::ConfigError(
                "Missing api_key in FirebaseConfig".to_string(),
            ));
        }

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Ok(Self {
            client: create_client(DEFAULT_TIMEOUT_SECS)?,
            api_key: config.api_key.clone(),
            base_url: config.auth_base_url.trim_end_matches('/').to_string(),
            events,
        })
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/v1/accounts:{}?key={}", self.base_url, method, self.api_key)
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T, FirebaseError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.endpoint(method))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            let (code, detail) = split_api_error(&text);
            return Err(FirebaseError::AuthApiError {
                status_code: status.as_u16(),
                code,
                detail,
            });
        }

        Ok(response.json().await?)
    }

    fn publish(&self, event: AuthEvent) {
        if self.events.send(event).is_err() {
            debug!("No auth event subscribers");
        }
    }

    /// Create an account; the new user is signed in right away.
    pub async fn sign_up_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, FirebaseError> {
        let request = PasswordAuthRequest {
            email,
            password,
            return_secure_token: true,
        };
        let response: PasswordAuthResponse = self.call("signUp", &request).await?;
        info!("Account created: {}", response.local_id);

        let session = session_from(response);
        self.publish(AuthEvent::SignedIn(session.identity()));
        Ok(session)
    }

    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, FirebaseError> {
        let request = PasswordAuthRequest {
            email,
            password,
            return_secure_token: true,
        };
        let response: PasswordAuthResponse = self.call("signInWithPassword", &request).await?;
        info!("User signed in: {}", response.local_id);

        let session = session_from(response);
        self.publish(AuthEvent::SignedIn(session.identity()));
        Ok(session)
    }

    /// Ask Firebase to email a password-reset link.
    pub async fn send_password_reset_email(&self, email: &str) -> Result<(), FirebaseError> {
        let request = json!({ "requestType": "PASSWORD_RESET", "email": email });
        let _: serde_json::Value = self.call("sendOobCode", &request).await?;
        info!("Password reset email requested");
        Ok(())
    }

    /// Resolve an id token to the account it belongs to.
    pub async fn lookup(&self, id_token: &str) -> Result<Identity, FirebaseError> {
        let request = json!({ "idToken": id_token });
        let response: LookupResponse = self.call("lookup", &request).await?;

        let user = response.users.into_iter().next().ok_or_else(|| {
            warn!("Token lookup returned no account");
            FirebaseError::AuthApiError {
                status_code: 400,
                code: "USER_NOT_FOUND".to_string(),
                detail: None,
            }
        })?;

        Ok(Identity {
            user_id: user.local_id,
            email: user.email,
        })
    }

    /// Firebase id tokens are stateless; signing out only ends the session
    /// on our side and notifies subscribers.
    pub fn end_session(&self, session: &Session) {
        info!("User signed out: {}", session.user_id);
        self.publish(AuthEvent::SignedOut(session.identity()));
    }
}

fn session_from(response: PasswordAuthResponse) -> Session {
    Session {
        user_id: response.local_id,
        email: response.email,
        id_token: response.id_token,
    }
}

/// Identity Toolkit messages look like `EMAIL_NOT_FOUND` or
/// `WEAK_PASSWORD : Password should be at least 6 characters`.
/// Identity Toolkit messages look like `CODE` or `CODE : detail`.
fn split_api_error(body: &str) -> (String, Option<String>) {
    let Ok(parsed) = serde_json::from_str::<ApiErrorResponse>(body) else {
        return (body.to_string(), None);
    };
    match parsed.error.message.split_once(" : ") {
        Some((code, detail)) => (code.trim().to_string(), Some(detail.trim().to_string())),
        None => (parsed.error.message.trim().to_string(), None),
    }
}

impl AuthProvider for FirebaseAuthClient {
    type Error = FirebaseError;

    fn sign_up(&self, email: &str, password: &str) -> BoxFuture<'_, Session, Self::Error> {
        let (email, password) = (email.to_string(), password.to_string());
        Box::pin(async move { self.sign_up_with_password(&email, &password).await })
    }

    fn sign_in(&self, email: &str, password: &str) -> BoxFuture<'_, Session, Self::Error> {
        let (email, password) = (email.to_string(), password.to_string());
        Box::pin(async move { self.sign_in_with_password(&email, &password).await })
    }

    fn sign_out(&self, session: &Session) -> BoxFuture<'_, (), Self::Error> {
        self.end_session(session);
        Box::pin(async { Ok(()) })
    }

    fn send_password_reset(&self, email: &str) -> BoxFuture<'_, (), Self::Error> {
        let email = email.to_string();
        Box::pin(async move { self.send_password_reset_email(&email).await })
    }

    fn verify(&self, id_token: &str) -> BoxFuture<'_, Identity, Self::Error> {
        let id_token = id_token.to_string();
        Box::pin(async move { self.lookup(&id_token).await })
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}

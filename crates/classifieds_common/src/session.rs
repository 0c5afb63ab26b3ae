//! Turning a bearer id token into an explicit [`Session`].

use axum::http::{header, HeaderMap};
use tracing::{debug, error, warn};

use crate::error::{external_service_error, ClassifiedsError};
use crate::models::Session;
use crate::services::{AuthFailure, AuthProvider, ClassifyAuthFailure};

/// Shown when the provider could not be asked about the token at all.
pub const VERIFY_UNAVAILABLE_ALERT: &str = "Could not verify your session. Please try again.";

/// The token of an `Authorization: Bearer <token>` header, if present.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Verify the bearer token with the auth provider and build the session.
///
/// Fails with an auth error carrying `message` when the header is missing
/// or the provider rejects the token. Any other provider failure (network,
/// outage, misconfiguration) is an external service error.
pub async fn require_session<A>(
    auth: &A,
    headers: &HeaderMap,
    message: &str,
) -> Result<Session, ClassifiedsError>
where
    A: AuthProvider + ?Sized,
{
    let Some(id_token) = bearer_token(headers) else {
        debug!("Request without bearer token");
        return Err(ClassifiedsError::AuthError(message.to_string()));
    };

    let identity = auth
        .verify(id_token)
        .await
        .map_err(|e| match e.auth_failure() {
            AuthFailure::InvalidToken | AuthFailure::UserNotFound => {
                warn!("Rejected id token: {}", e);
                ClassifiedsError::AuthError(message.to_string())
            }
            _ => {
                error!("Id token verification failed: {}", e);
                external_service_error("Auth provider", VERIFY_UNAVAILABLE_ALERT)
            }
        })?;

    Ok(Session {
        user_id: identity.user_id,
        email: identity.email,
        id_token: id_token.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HttpStatusCode;
    use crate::models::Identity;
    use crate::services::{AuthEvent, BoxFuture};
    use axum::http::HeaderValue;
    use tokio::sync::broadcast;

    #[derive(Debug, thiserror::Error)]
    #[error("verify failed: {0:?}")]
    struct VerifyError(AuthFailure);

    impl ClassifyAuthFailure for VerifyError {
        fn auth_failure(&self) -> AuthFailure {
            self.0
        }
    }

    /// Provider whose token check always fails the same way.
    struct FailingVerify(AuthFailure);

    impl AuthProvider for FailingVerify {
        type Error = VerifyError;

        fn sign_up(&self, _: &str, _: &str) -> BoxFuture<'_, Session, Self::Error> {
            Box::pin(async move { Err(VerifyError(self.0)) })
        }

        fn sign_in(&self, _: &str, _: &str) -> BoxFuture<'_, Session, Self::Error> {
            Box::pin(async move { Err(VerifyError(self.0)) })
        }

        fn sign_out(&self, _: &Session) -> BoxFuture<'_, (), Self::Error> {
            Box::pin(async { Ok(()) })
        }

        fn send_password_reset(&self, _: &str) -> BoxFuture<'_, (), Self::Error> {
            Box::pin(async { Ok(()) })
        }

        fn verify(&self, _: &str) -> BoxFuture<'_, Identity, Self::Error> {
            Box::pin(async move { Err(VerifyError(self.0)) })
        }

        fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
            broadcast::channel(1).1
        }
    }

    fn with_bearer(token: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        headers
    }

    #[tokio::test]
    async fn test_rejected_token_is_unauthorized() {
        let auth = FailingVerify(AuthFailure::InvalidToken);

        let err = require_session(&auth, &with_bearer("stale"), "You must be logged in.")
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 401);
        assert_eq!(err.to_string(), "You must be logged in.");
    }

    #[tokio::test]
    async fn test_provider_outage_is_bad_gateway() {
        let auth = FailingVerify(AuthFailure::Other);

        let err = require_session(&auth, &with_bearer("fresh"), "You must be logged in.")
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 502);
        assert!(err.to_string().contains(VERIFY_UNAVAILABLE_ALERT));
    }

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer id-123"));
        assert_eq!(bearer_token(&headers), Some("id-123"));
    }
}

//! Push token registration
//!
//! Runs on every signed-in transition: check the notification permission,
//! ask for it if needed, obtain the device token and merge it onto the
//! user's profile. Nothing here can fail the sign-in; every problem becomes a
//! [`RegistrationOutcome`] the caller may surface as an alert.

use std::sync::Arc;

use classifieds_common::models::Session;
use classifieds_common::services::BoxFuture;
use classifieds_db::ProfileRepository;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::error::PushError;

pub const PERMISSION_DENIED_ALERT: &str = "Permission not granted for push notifications!";
pub const TOKEN_FETCH_ALERT: &str = "An error occurred while fetching push token.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

/// Where the device push token comes from.
pub trait PushTokenSource: Send + Sync {
    fn permission_status(&self) -> BoxFuture<'_, PermissionStatus, PushError>;

    /// Prompt for permission and return the resulting status
    fn request_permission(&self) -> BoxFuture<'_, PermissionStatus, PushError>;

    fn device_token(&self) -> BoxFuture<'_, String, PushError>;
}

/// A token the client obtained on the device and sent along with its request.
///
/// A client only sends a token once the user granted the permission, so a
/// present token means granted and an absent one means denied.
#[derive(Debug, Clone, Default)]
pub struct ClientSuppliedToken {
    token: Option<String>,
}

impl ClientSuppliedToken {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }

    fn status(&self) -> PermissionStatus {
        if self.token.is_some() {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        }
    }
}

impl PushTokenSource for ClientSuppliedToken {
    fn permission_status(&self) -> BoxFuture<'_, PermissionStatus, PushError> {
        Box::pin(async move { Ok(self.status()) })
    }

    fn request_permission(&self) -> BoxFuture<'_, PermissionStatus, PushError> {
        Box::pin(async move { Ok(self.status()) })
    }

    fn device_token(&self) -> BoxFuture<'_, String, PushError> {
        Box::pin(async move {
            self.token
                .clone()
                .ok_or_else(|| PushError::TokenSourceError("no token supplied".to_string()))
        })
    }
}

/// Result of one registration attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RegistrationOutcome {
    /// The token is stored on the profile
    Registered { token: String },
    PermissionDenied,
    /// Asking for the permission or the token failed
    FetchFailed { reason: String },
    /// The device handed out an empty token; nothing was written
    NoToken,
    /// The token was obtained but the profile write failed
    StoreFailed { reason: String },
}

impl RegistrationOutcome {
    /// Alert text for the user, if this outcome warrants one.
    pub fn alert(&self) -> Option<&'static str> {
        match self {
            RegistrationOutcome::PermissionDenied => Some(PERMISSION_DENIED_ALERT),
            RegistrationOutcome::FetchFailed { .. } => Some(TOKEN_FETCH_ALERT),
            _ => None,
        }
    }

    pub fn is_registered(&self) -> bool {
        matches!(self, RegistrationOutcome::Registered { .. })
    }
}

/// Keeps each profile's push token current.
pub struct TokenRegistry<P> {
    profiles: Arc<P>,
}

impl<P> Clone for TokenRegistry<P> {
    fn clone(&self) -> Self {
        Self {
            profiles: Arc::clone(&self.profiles),
        }
    }
}

impl<P: ProfileRepository> TokenRegistry<P> {
    pub fn new(profiles: Arc<P>) -> Self {
        Self { profiles }
    }

    /// Register the device of `session`'s user for push notifications.
    ///
    /// Issues at most one profile write: a merge of the fresh token onto the
    /// profile keyed by the session's user id.
    pub async fn register<S>(&self, session: &Session, source: &S) -> RegistrationOutcome
    where
        S: PushTokenSource + ?Sized,
    {
        let token = match Self::obtain_token(source).await {
            Ok(Some(token)) => token,
            Ok(None) => {
                warn!("Push permission not granted for user {}", session.user_id);
                return RegistrationOutcome::PermissionDenied;
            }
            Err(e) => {
                error!("Error getting push token: {}", e);
                return RegistrationOutcome::FetchFailed {
                    reason: e.to_string(),
                };
            }
        };

        if token.is_empty() {
            warn!("Push token not generated for user {}", session.user_id);
            return RegistrationOutcome::NoToken;
        }

        debug!("Push token for user {}: {}", session.user_id, token);
        match self.profiles.upsert_push_token(&session.user_id, &token).await {
            Ok(()) => {
                info!("Push token saved for user {}", session.user_id);
                RegistrationOutcome::Registered { token }
            }
            Err(e) => {
                error!("Error handling token: {}", e);
                RegistrationOutcome::StoreFailed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// `Ok(None)` when the permission stays ungranted after asking.
    async fn obtain_token<S>(source: &S) -> Result<Option<String>, PushError>
    where
        S: PushTokenSource + ?Sized,
    {
        let mut status = source.permission_status().await?;
        if status != PermissionStatus::Granted {
            status = source.request_permission().await?;
        }
        if status != PermissionStatus::Granted {
            return Ok(None);
        }
        source.device_token().await.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::FakeTokenSource;
    use classifieds_common::models::UserProfile;
    use classifieds_db::{DbClient, SqlProfileRepository};
    use std::sync::atomic::Ordering;

    async fn registry() -> (TokenRegistry<SqlProfileRepository>, Arc<SqlProfileRepository>) {
        let client = DbClient::from_url("sqlite::memory:").await.unwrap();
        let repo = Arc::new(SqlProfileRepository::new(client));
        repo.init_schema().await.unwrap();
        (TokenRegistry::new(repo.clone()), repo)
    }

    fn session(user_id: &str) -> Session {
        Session {
            user_id: user_id.to_string(),
            email: Some("seller@example.com".to_string()),
            id_token: "id-token".to_string(),
        }
    }

    #[tokio::test]
    async fn test_granted_token_is_stored_and_merged() {
        let (registry, repo) = registry().await;
        repo.put_profile(UserProfile::new("u1".to_string(), Some("seller@example.com".to_string())))
            .await
            .unwrap();

        let outcome = registry
            .register(&session("u1"), &FakeTokenSource::granted("ExponentPushToken[fresh]"))
            .await;

        assert_eq!(
            outcome,
            RegistrationOutcome::Registered {
                token: "ExponentPushToken[fresh]".to_string()
            }
        );
        let profile = repo.find_by_user("u1").await.unwrap().unwrap();
        assert_eq!(profile.push_token.as_deref(), Some("ExponentPushToken[fresh]"));
        assert_eq!(profile.email.as_deref(), Some("seller@example.com"));
    }

    #[tokio::test]
    async fn test_reregistration_overwrites_token() {
        let (registry, repo) = registry().await;

        registry.register(&session("u1"), &FakeTokenSource::granted("old")).await;
        registry.register(&session("u1"), &FakeTokenSource::granted("new")).await;

        let profile = repo.find_by_user("u1").await.unwrap().unwrap();
        assert_eq!(profile.push_token.as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_permission_requested_when_undetermined() {
        let (registry, _) = registry().await;
        let source = FakeTokenSource {
            current: PermissionStatus::Undetermined,
            ..FakeTokenSource::granted("tok")
        };

        let outcome = registry.register(&session("u1"), &source).await;

        assert!(outcome.is_registered());
        assert_eq!(source.requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_denied_permission_writes_nothing() {
        let (registry, repo) = registry().await;
        let source = FakeTokenSource {
            current: PermissionStatus::Undetermined,
            after_request: PermissionStatus::Denied,
            ..FakeTokenSource::granted("tok")
        };

        let outcome = registry.register(&session("u1"), &source).await;

        assert_eq!(outcome, RegistrationOutcome::PermissionDenied);
        assert_eq!(outcome.alert(), Some(PERMISSION_DENIED_ALERT));
        assert!(repo.find_by_user("u1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_token_fetch_error_becomes_alert() {
        let (registry, repo) = registry().await;
        let source = FakeTokenSource {
            token: Err("no network".to_string()),
            ..FakeTokenSource::granted("unused")
        };

        let outcome = registry.register(&session("u1"), &source).await;

        assert!(matches!(outcome, RegistrationOutcome::FetchFailed { .. }));
        assert_eq!(outcome.alert(), Some(TOKEN_FETCH_ALERT));
        assert!(repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_token_is_not_written() {
        let (registry, repo) = registry().await;

        let outcome = registry.register(&session("u1"), &FakeTokenSource::granted("")).await;

        assert_eq!(outcome, RegistrationOutcome::NoToken);
        assert_eq!(outcome.alert(), None);
        assert!(repo.find_by_user("u1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_client_supplied_token() {
        let (registry, repo) = registry().await;

        let denied = registry
            .register(&session("u1"), &ClientSuppliedToken::new(None))
            .await;
        assert_eq!(denied, RegistrationOutcome::PermissionDenied);

        let granted = registry
            .register(&session("u1"), &ClientSuppliedToken::new(Some("tok".to_string())))
            .await;
        assert!(granted.is_registered());
        assert_eq!(
            repo.find_by_user("u1").await.unwrap().unwrap().push_token.as_deref(),
            Some("tok")
        );
    }
}

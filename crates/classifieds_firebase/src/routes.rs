use axum::{
    routing::{get, post},
    Router,
};
use classifieds_common::services::AuthProvider;
use classifieds_db::ProfileRepository;
use classifieds_push::TokenRegistry;
use std::sync::Arc;
use tracing::info;

use crate::handlers::{
    current_user_handler, password_reset_handler, sign_in_handler, sign_out_handler,
    sign_up_handler, AccountState,
};

/// Create the account routes for the API
///
/// Generic over the auth provider and the profile store so the same routes
/// run against Firebase in production and against fakes in tests.
pub fn routes<A, P>(auth: Arc<A>, profiles: Arc<P>) -> Router
where
    A: AuthProvider + 'static,
    P: ProfileRepository + 'static,
{
    let state = Arc::new(AccountState {
        auth,
        registry: TokenRegistry::new(profiles.clone()),
        profiles,
    });

    info!("Account routes initialized");

    Router::new()
        .route("/auth/sign-up", post(sign_up_handler::<A, P>))
        .route("/auth/sign-in", post(sign_in_handler::<A, P>))
        .route("/auth/sign-out", post(sign_out_handler::<A, P>))
        .route("/auth/password-reset", post(password_reset_handler::<A, P>))
        .route("/auth/me", get(current_user_handler::<A, P>))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{FakeAuth, GOOD_TOKEN};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use classifieds_db::{DbClient, SqlProfileRepository};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn app() -> (Router, Arc<SqlProfileRepository>) {
        let client = DbClient::from_url("sqlite::memory:").await.unwrap();
        let profiles = Arc::new(SqlProfileRepository::new(client));
        profiles.init_schema().await.unwrap();
        (routes(Arc::new(FakeAuth::new()), profiles.clone()), profiles)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_sign_up_mismatch_is_bad_request() {
        let (app, profiles) = app().await;

        let response = app
            .oneshot(post_json(
                "/auth/sign-up",
                json!({ "email": "a@b.co", "password": "one", "confirmPassword": "two" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({ "error": { "message": "Passwords do not match.", "code": 400 } })
        );
        assert!(profiles.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sign_in_with_token_returns_session() {
        let (app, profiles) = app().await;

        let response = app
            .oneshot(post_json(
                "/auth/sign-in",
                json!({ "email": "seller@example.com", "password": "pw", "pushToken": "tok" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["message"], "Login successful!");
        assert_eq!(body["session"]["id_token"], GOOD_TOKEN);
        assert_eq!(body["push_registration"]["status"], "registered");

        let user_id = body["session"]["user_id"].as_str().unwrap();
        let profile = profiles.find_by_user(user_id).await.unwrap().unwrap();
        assert_eq!(profile.push_token.as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn test_sign_in_missing_fields() {
        let (app, _) = app().await;

        let response = app
            .oneshot(post_json("/auth/sign-in", json!({ "email": "seller@example.com" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await["error"]["message"],
            "Please enter both email and password."
        );
    }

    #[tokio::test]
    async fn test_me_requires_bearer_token() {
        let (app, _) = app().await;

        let anonymous = app
            .clone()
            .oneshot(Request::builder().uri("/auth/me").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

        let signed_in = app
            .oneshot(
                Request::builder()
                    .uri("/auth/me")
                    .header(header::AUTHORIZATION, format!("Bearer {}", GOOD_TOKEN))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(signed_in.status(), StatusCode::OK);
        assert_eq!(json_body(signed_in).await["email"], "seller@example.com");
    }
}

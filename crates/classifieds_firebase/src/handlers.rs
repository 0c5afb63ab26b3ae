//! HTTP handlers for the account flows
//!
//! Every failure answers with the shared JSON error shape; its message is
//! the alert text the app shows.

use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, Json};
use classifieds_common::models::{Identity, Session};
use classifieds_common::services::AuthProvider;
use classifieds_common::{require_session, ClassifiedsError};
use classifieds_db::ProfileRepository;
use classifieds_push::{ClientSuppliedToken, RegistrationOutcome, TokenRegistry};
use serde::Serialize;
use tracing::debug;

use crate::account::{
    self, PasswordResetRequest, SignInRequest, SignUpRequest, RESET_SUCCESS, SIGN_IN_SUCCESS,
    SIGN_UP_SUCCESS,
};

pub const SIGNED_OUT_MESSAGE: &str = "You are not signed in.";

/// Shared state for the account handlers
pub struct AccountState<A, P> {
    pub auth: Arc<A>,
    pub profiles: Arc<P>,
    pub registry: TokenRegistry<P>,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SignUpResponse {
    pub message: String,
    pub user_id: String,
    /// Screen the app should show next
    pub next_screen: String,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SignInResponse {
    pub message: String,
    pub session: Session,
    pub push_registration: RegistrationOutcome,
    /// Push registration alert, if any
    pub alert: Option<String>,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MessageResponse {
    pub message: String,
}

pub async fn sign_up_handler<A, P>(
    State(state): State<Arc<AccountState<A, P>>>,
    Json(payload): Json<SignUpRequest>,
) -> Result<Json<SignUpResponse>, ClassifiedsError>
where
    A: AuthProvider + 'static,
    P: ProfileRepository + 'static,
{
    debug!("Sign-up request for {}", payload.email);
    let identity = account::sign_up(state.auth.as_ref(), state.profiles.as_ref(), &payload).await?;

    Ok(Json(SignUpResponse {
        message: SIGN_UP_SUCCESS.to_string(),
        user_id: identity.user_id,
        next_screen: "LoginScreen".to_string(),
    }))
}

pub async fn sign_in_handler<A, P>(
    State(state): State<Arc<AccountState<A, P>>>,
    Json(payload): Json<SignInRequest>,
) -> Result<Json<SignInResponse>, ClassifiedsError>
where
    A: AuthProvider + 'static,
    P: ProfileRepository + 'static,
{
    debug!("Sign-in request for {}", payload.email);
    let source = ClientSuppliedToken::new(payload.push_token);
    let result = account::sign_in(
        state.auth.as_ref(),
        &state.registry,
        &source,
        &payload.email,
        &payload.password,
    )
    .await?;

    Ok(Json(SignInResponse {
        message: SIGN_IN_SUCCESS.to_string(),
        session: result.session,
        push_registration: result.push_registration,
        alert: result.alert,
    }))
}

pub async fn sign_out_handler<A, P>(
    State(state): State<Arc<AccountState<A, P>>>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, ClassifiedsError>
where
    A: AuthProvider + 'static,
    P: ProfileRepository + 'static,
{
    let session = require_session(state.auth.as_ref(), &headers, SIGNED_OUT_MESSAGE).await?;
    account::sign_out(state.auth.as_ref(), &session).await?;

    Ok(Json(MessageResponse {
        message: "Signed out.".to_string(),
    }))
}

pub async fn password_reset_handler<A, P>(
    State(state): State<Arc<AccountState<A, P>>>,
    Json(payload): Json<PasswordResetRequest>,
) -> Result<Json<MessageResponse>, ClassifiedsError>
where
    A: AuthProvider + 'static,
    P: ProfileRepository + 'static,
{
    account::request_password_reset(state.auth.as_ref(), &payload.email).await?;

    Ok(Json(MessageResponse {
        message: RESET_SUCCESS.to_string(),
    }))
}

/// The identity behind the caller's bearer token.
pub async fn current_user_handler<A, P>(
    State(state): State<Arc<AccountState<A, P>>>,
    headers: HeaderMap,
) -> Result<Json<Identity>, ClassifiedsError>
where
    A: AuthProvider + 'static,
    P: ProfileRepository + 'static,
{
    let session = require_session(state.auth.as_ref(), &headers, SIGNED_OUT_MESSAGE).await?;
    Ok(Json(session.identity()))
}

//! Account flows: sign-up, sign-in, sign-out and password reset.
//!
//! Form checks run before any provider call. Provider failures are logged
//! and turned into the alert text the app shows for that screen.

use classifieds_common::models::{Identity, Session, UserProfile};
use classifieds_common::services::{AuthFailure, AuthProvider, ClassifyAuthFailure};
use classifieds_common::validation::{require_all, require_valid_email};
use classifieds_common::{external_service_error, validation_error, ClassifiedsError};
use classifieds_db::ProfileRepository;
use classifieds_push::{PushTokenSource, RegistrationOutcome, TokenRegistry};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

pub const SIGN_UP_FIELDS_ALERT: &str = "Please fill in all fields.";
pub const PASSWORD_MISMATCH_ALERT: &str = "Passwords do not match.";
pub const SIGN_UP_SUCCESS: &str = "Signup successful! Redirecting to Login...";
pub const SIGN_UP_FAILED: &str = "An error occurred during signup.";

pub const SIGN_IN_FIELDS_ALERT: &str = "Please enter both email and password.";
pub const SIGN_IN_SUCCESS: &str = "Login successful!";
pub const SIGN_IN_FAILED: &str = "An error occurred during login.";
pub const NO_ACCOUNT_ALERT: &str = "No account found with this email.";
pub const WRONG_PASSWORD_ALERT: &str = "Incorrect password. Please try again.";
pub const BAD_EMAIL_ALERT: &str = "The email address is not valid.";

pub const RESET_FIELDS_ALERT: &str = "Please enter your email.";
pub const RESET_SUCCESS: &str = "Password reset link has been sent to your email.";
pub const RESET_FAILED: &str = "An error occurred.";
pub const RESET_BAD_EMAIL_ALERT: &str = "Invalid email address.";

#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SignUpRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, alias = "confirmPassword")]
    pub confirm_password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SignInRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// Device push token, sent only when the user allowed notifications
    #[serde(default, alias = "pushToken")]
    pub push_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PasswordResetRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SignInResult {
    pub session: Session,
    pub push_registration: RegistrationOutcome,
    /// Alert for the push registration, if it needs one
    pub alert: Option<String>,
}

fn provider_error<E: std::error::Error>(context: &str, err: &E, alert: &str) -> ClassifiedsError {
    error!("{}: {}", context, err);
    external_service_error("auth provider", alert)
}

/// Create an account and write its profile document.
///
/// The fresh session is ended again right away so the user signs in
/// explicitly afterwards.
pub async fn sign_up<A, P>(
    auth: &A,
    profiles: &P,
    request: &SignUpRequest,
) -> Result<Identity, ClassifiedsError>
where
    A: AuthProvider + ?Sized,
    P: ProfileRepository,
{
    require_all(
        &[
            request.email.as_str(),
            request.password.as_str(),
            request.confirm_password.as_str(),
        ],
        SIGN_UP_FIELDS_ALERT,
    )?;
    require_valid_email(&request.email)?;
    if request.password != request.confirm_password {
        return Err(validation_error(PASSWORD_MISMATCH_ALERT));
    }

    let session = auth
        .sign_up(&request.email, &request.password)
        .await
        .map_err(|e| match (e.auth_failure(), e.detail()) {
            (AuthFailure::InvalidEmail, _) => validation_error(BAD_EMAIL_ALERT),
            (_, Some(detail)) => {
                error!("Error signing up: {}", e);
                validation_error(detail)
            }
            (AuthFailure::EmailInUse, None) => {
                error!("Error signing up: {}", e);
                validation_error(SIGN_UP_FAILED)
            }
            _ => provider_error("Error signing up", &e, SIGN_UP_FAILED),
        })?;

    let profile = UserProfile::new(session.user_id.clone(), session.email.clone());
    profiles.put_profile(profile).await.map_err(|e| {
        error!("Error writing profile for {}: {}", session.user_id, e);
        ClassifiedsError::from(e)
    })?;

    if let Err(e) = auth.sign_out(&session).await {
        error!("Error signing out after sign-up: {}", e);
    }

    info!("Sign-up complete for {}", session.user_id);
    Ok(session.identity())
}

/// Authenticate and register the device for push notifications.
///
/// A failed push registration never fails the sign-in; it is reported in
/// the result instead.
pub async fn sign_in<A, P, S>(
    auth: &A,
    registry: &TokenRegistry<P>,
    token_source: &S,
    email: &str,
    password: &str,
) -> Result<SignInResult, ClassifiedsError>
where
    A: AuthProvider + ?Sized,
    P: ProfileRepository,
    S: PushTokenSource + ?Sized,
{
    require_all(&[email, password], SIGN_IN_FIELDS_ALERT)?;
    require_valid_email(email)?;

    let session = auth.sign_in(email, password).await.map_err(|e| {
        let alert = match e.auth_failure() {
            AuthFailure::UserNotFound => NO_ACCOUNT_ALERT,
            AuthFailure::WrongPassword => WRONG_PASSWORD_ALERT,
            AuthFailure::InvalidEmail => BAD_EMAIL_ALERT,
            _ => return provider_error("Login error", &e, SIGN_IN_FAILED),
        };
        info!("Login rejected: {}", e);
        ClassifiedsError::AuthError(alert.to_string())
    })?;

    let push_registration = registry.register(&session, token_source).await;
    Ok(SignInResult {
        alert: push_registration.alert().map(str::to_string),
        session,
        push_registration,
    })
}

pub async fn sign_out<A>(auth: &A, session: &Session) -> Result<(), ClassifiedsError>
where
    A: AuthProvider + ?Sized,
{
    auth.sign_out(session)
        .await
        .map_err(|e| provider_error("Sign-out error", &e, "An error occurred during sign-out."))
}

pub async fn request_password_reset<A>(auth: &A, email: &str) -> Result<(), ClassifiedsError>
where
    A: AuthProvider + ?Sized,
{
    require_all(&[email], RESET_FIELDS_ALERT)?;
    require_valid_email(email)?;

    auth.send_password_reset(email).await.map_err(|e| {
        let alert = match e.auth_failure() {
            AuthFailure::UserNotFound => NO_ACCOUNT_ALERT,
            AuthFailure::InvalidEmail => RESET_BAD_EMAIL_ALERT,
            _ => return provider_error("Password reset error", &e, RESET_FAILED),
        };
        info!("Password reset rejected: {}", e);
        ClassifiedsError::ValidationError(alert.to_string())
    })
}

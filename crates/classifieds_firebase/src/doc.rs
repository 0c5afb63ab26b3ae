#![allow(dead_code)]
use utoipa::OpenApi;

use crate::account::{PasswordResetRequest, SignInRequest, SignUpRequest};
use crate::handlers::{MessageResponse, SignInResponse, SignUpResponse};

#[utoipa::path(
    post,
    path = "/auth/sign-up",
    request_body(content = SignUpRequest, example = json!({
        "email": "seller@example.com",
        "password": "hunter22",
        "confirm_password": "hunter22"
    })),
    responses(
        (status = 200, description = "Account created; the client signs in next", body = SignUpResponse),
        (status = 400, description = "Validation failed",
         example = json!({ "error": { "message": "Passwords do not match.", "code": 400 } })
        ),
        (status = 502, description = "Auth provider failure")
    ),
    tag = "Account"
)]
fn doc_sign_up_handler() {}

#[utoipa::path(
    post,
    path = "/auth/sign-in",
    request_body(content = SignInRequest, example = json!({
        "email": "seller@example.com",
        "password": "hunter22",
        "push_token": "ExponentPushToken[xxxxxxxxxxxxxxxxxxxxxx]"
    })),
    responses(
        (status = 200, description = "Signed in", body = SignInResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Rejected credentials",
         example = json!({ "error": { "message": "Incorrect password. Please try again.", "code": 401 } })
        ),
        (status = 502, description = "Auth provider failure")
    ),
    tag = "Account"
)]
fn doc_sign_in_handler() {}

#[utoipa::path(
    post,
    path = "/auth/sign-out",
    responses(
        (status = 200, description = "Signed out", body = MessageResponse),
        (status = 401, description = "Missing or invalid bearer token")
    ),
    security(("bearer" = [])),
    tag = "Account"
)]
fn doc_sign_out_handler() {}

#[utoipa::path(
    post,
    path = "/auth/password-reset",
    request_body(content = PasswordResetRequest, example = json!({ "email": "seller@example.com" })),
    responses(
        (status = 200, description = "Reset email sent", body = MessageResponse),
        (status = 400, description = "Validation failed or unknown account")
    ),
    tag = "Account"
)]
fn doc_password_reset_handler() {}

#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "The caller's identity", body = classifieds_common::models::Identity),
        (status = 401, description = "Missing or invalid bearer token")
    ),
    security(("bearer" = [])),
    tag = "Account"
)]
fn doc_current_user_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_sign_up_handler,
        doc_sign_in_handler,
        doc_sign_out_handler,
        doc_password_reset_handler,
        doc_current_user_handler
    ),
    components(schemas(
        SignUpRequest,
        SignInRequest,
        PasswordResetRequest,
        SignUpResponse,
        SignInResponse,
        MessageResponse
    )),
    tags((name = "Account", description = "Sign-up, sign-in and password reset"))
)]
pub struct FirebaseApiDoc;

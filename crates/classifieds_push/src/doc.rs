#![allow(dead_code)]
use utoipa::OpenApi;

use crate::dispatcher::{DeliveryOutcome, DispatchReport, TokenResult};
use crate::handlers::{RegisterTokenRequest, RegisterTokenResponse, RouteResponse};
use crate::registry::RegistrationOutcome;
use crate::router::{NavigationCommand, RoutingMessage};

#[utoipa::path(
    post,
    path = "/push/token",
    request_body(content = RegisterTokenRequest, example = json!({
        "push_token": "ExponentPushToken[xxxxxxxxxxxxxxxxxxxxxx]"
    })),
    responses(
        (status = 200, description = "Registration attempted", body = RegisterTokenResponse,
         example = json!({
             "outcome": { "status": "registered", "token": "ExponentPushToken[xxxxxxxxxxxxxxxxxxxxxx]" },
             "alert": null
         })
        ),
        (status = 401, description = "Missing or invalid bearer token")
    ),
    security(("bearer" = [])),
    tag = "Push"
)]
fn doc_register_token_handler() {}

#[utoipa::path(
    post,
    path = "/push/route",
    request_body(content = RoutingMessage, example = json!({
        "screen": "Home"
    })),
    responses(
        (status = 200, description = "Navigation resolved", body = RouteResponse,
         example = json!({ "navigation": { "screen": "Home" } })
        )
    ),
    tag = "Push"
)]
fn doc_route_notification_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(doc_register_token_handler, doc_route_notification_handler),
    components(schemas(
        RegisterTokenRequest,
        RegisterTokenResponse,
        RegistrationOutcome,
        RouteResponse,
        RoutingMessage,
        NavigationCommand,
        DispatchReport,
        TokenResult,
        DeliveryOutcome
    )),
    tags((name = "Push", description = "Push token registration and notification routing"))
)]
pub struct PushApiDoc;

//! HTTP handlers for push registration and notification routing

use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, Json};
use classifieds_common::services::AuthProvider;
use classifieds_common::{require_session, ClassifiedsError};
use classifieds_db::ProfileRepository;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::registry::{ClientSuppliedToken, RegistrationOutcome, TokenRegistry};
use crate::router::{NavigationCommand, RoutingMessage};

pub const SIGNED_OUT_MESSAGE: &str = "You must be logged in to register for push notifications";

/// Shared state for the push handlers
pub struct PushState<A, P> {
    pub auth: Arc<A>,
    pub registry: TokenRegistry<P>,
}

#[derive(Debug, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RegisterTokenRequest {
    /// Device push token; absent when the user declined notifications
    #[serde(default, alias = "pushToken")]
    pub push_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RegisterTokenResponse {
    pub outcome: RegistrationOutcome,
    /// Alert to show the user, if any
    pub alert: Option<String>,
}

impl From<RegistrationOutcome> for RegisterTokenResponse {
    fn from(outcome: RegistrationOutcome) -> Self {
        Self {
            alert: outcome.alert().map(str::to_string),
            outcome,
        }
    }
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RouteResponse {
    /// Where the app should navigate, or null when the payload names no screen
    pub navigation: Option<NavigationCommand>,
}

/// Register the caller's device token on their profile.
///
/// Always answers 200 for a valid session; the outcome tells the client
/// whether to show an alert.
pub async fn register_token_handler<A, P>(
    State(state): State<Arc<PushState<A, P>>>,
    headers: HeaderMap,
    Json(payload): Json<RegisterTokenRequest>,
) -> Result<Json<RegisterTokenResponse>, ClassifiedsError>
where
    A: AuthProvider + 'static,
    P: ProfileRepository + 'static,
{
    let session = require_session(state.auth.as_ref(), &headers, SIGNED_OUT_MESSAGE).await?;

    let source = ClientSuppliedToken::new(payload.push_token);
    let outcome = state.registry.register(&session, &source).await;

    Ok(Json(outcome.into()))
}

/// Resolve the content data of a tapped notification into a navigation.
pub async fn route_notification_handler(Json(data): Json<Value>) -> Json<RouteResponse> {
    let navigation = RoutingMessage::from_data(&data).into_command();
    debug!("Resolved notification route: {:?}", navigation);
    Json(RouteResponse { navigation })
}

use axum::{routing::post, Router};
use classifieds_common::services::AuthProvider;
use classifieds_db::ProfileRepository;
use std::sync::Arc;
use tracing::info;

use crate::handlers::{register_token_handler, route_notification_handler, PushState};
use crate::registry::TokenRegistry;

/// Create the push routes for the API
///
/// * `POST /push/token` stores the caller's device token (bearer session required)
/// * `POST /push/route` resolves notification data into a navigation
pub fn routes<A, P>(auth: Arc<A>, profiles: Arc<P>) -> Router
where
    A: AuthProvider + 'static,
    P: ProfileRepository + 'static,
{
    let state = Arc::new(PushState {
        auth,
        registry: TokenRegistry::new(profiles),
    });

    info!("Push routes initialized");

    Router::new()
        .route("/push/token", post(register_token_handler::<A, P>))
        .route("/push/route", post(route_notification_handler))
        .with_state(state)
}

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use classifieds_common::services::{AuthProvider, ObjectStorage, PushRelay};
use classifieds_db::{AdRepository, ProfileRepository};
use std::sync::Arc;
use tracing::info;

use crate::handlers::{
    edit_ad_handler, get_ad_handler, list_ads_handler, list_own_ads_handler, post_ad_handler,
    AdsState,
};

/// Create the ad routes for the API
///
/// * `GET /ads` - the shared feed
/// * `POST /ads` - post an ad (bearer session required)
/// * `GET /ads/mine` - the caller's own ads
/// * `GET /ads/{id}` - one ad
/// * `PUT /ads/{id}` - edit one of the caller's ads
///
/// Request bodies may be up to `config.max_upload_bytes`, since photos
/// arrive base64 encoded inside the JSON.
pub fn routes<A, R, P, S, Y>(state: AdsState<A, R, P, S, Y>) -> Router
where
    A: AuthProvider + 'static,
    R: AdRepository + 'static,
    P: ProfileRepository + 'static,
    S: ObjectStorage + 'static,
    Y: PushRelay + 'static,
{
    info!(
        "Ad routes initialized (fan-out {})",
        if state.dispatcher.is_some() { "on" } else { "off" }
    );
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route(
            "/ads",
            get(list_ads_handler::<A, R, P, S, Y>).post(post_ad_handler::<A, R, P, S, Y>),
        )
        .route("/ads/mine", get(list_own_ads_handler::<A, R, P, S, Y>))
        .route(
            "/ads/{id}",
            get(get_ad_handler::<A, R, P, S, Y>).put(edit_ad_handler::<A, R, P, S, Y>),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(Arc::new(state))
}

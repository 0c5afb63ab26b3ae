// --- File: crates/classifieds_ads/src/handlers.rs ---
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use classifieds_common::models::{Ad, AdUpdate};
use classifieds_common::services::{AuthProvider, ObjectStorage, PushRelay};
use classifieds_common::{require_session, ClassifiedsError};
use classifieds_config::AdsConfig;
use classifieds_db::{AdRepository, ProfileRepository};
use classifieds_push::{spawn_fan_out, FanOutDispatcher};
use serde::Serialize;
use tracing::{debug, info};

use crate::logic::{self, CreateAdRequest, NOT_SIGNED_IN_ALERT};

pub const SIGNED_OUT_MESSAGE: &str = "You must be logged in.";

/// Shared state for the ad handlers
pub struct AdsState<A, R, P, S, Y> {
    pub auth: Arc<A>,
    pub ads: Arc<R>,
    pub profiles: Arc<P>,
    pub storage: Arc<S>,
    /// New-ad fan-out; `None` when push is switched off
    pub dispatcher: Option<Arc<FanOutDispatcher<Y>>>,
    pub config: AdsConfig,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PostAdResponse {
    pub message: String,
    pub ad: Ad,
}

pub async fn list_ads_handler<A, R, P, S, Y>(
    State(state): State<Arc<AdsState<A, R, P, S, Y>>>,
) -> Result<Json<Vec<Ad>>, ClassifiedsError>
where
    A: AuthProvider + 'static,
    R: AdRepository + 'static,
    P: ProfileRepository + 'static,
    S: ObjectStorage + 'static,
    Y: PushRelay + 'static,
{
    Ok(Json(logic::list_ads(state.ads.as_ref()).await?))
}

pub async fn list_own_ads_handler<A, R, P, S, Y>(
    State(state): State<Arc<AdsState<A, R, P, S, Y>>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Ad>>, ClassifiedsError>
where
    A: AuthProvider + 'static,
    R: AdRepository + 'static,
    P: ProfileRepository + 'static,
    S: ObjectStorage + 'static,
    Y: PushRelay + 'static,
{
    let session = require_session(state.auth.as_ref(), &headers, SIGNED_OUT_MESSAGE).await?;
    Ok(Json(logic::list_own_ads(state.ads.as_ref(), &session).await?))
}

pub async fn get_ad_handler<A, R, P, S, Y>(
    State(state): State<Arc<AdsState<A, R, P, S, Y>>>,
    Path(id): Path<String>,
) -> Result<Json<Ad>, ClassifiedsError>
where
    A: AuthProvider + 'static,
    R: AdRepository + 'static,
    P: ProfileRepository + 'static,
    S: ObjectStorage + 'static,
    Y: PushRelay + 'static,
{
    Ok(Json(logic::get_ad(state.ads.as_ref(), &id).await?))
}

/// Post an ad, then start the new-ad fan-out in the background.
///
/// The response does not wait for the fan-out; its report is only logged.
pub async fn post_ad_handler<A, R, P, S, Y>(
    State(state): State<Arc<AdsState<A, R, P, S, Y>>>,
    headers: HeaderMap,
    Json(payload): Json<CreateAdRequest>,
) -> Result<Json<PostAdResponse>, ClassifiedsError>
where
    A: AuthProvider + 'static,
    R: AdRepository + 'static,
    P: ProfileRepository + 'static,
    S: ObjectStorage + 'static,
    Y: PushRelay + 'static,
{
    logic::validate_new_ad(&payload)?;
    let session = require_session(state.auth.as_ref(), &headers, NOT_SIGNED_IN_ALERT).await?;

    let ad = logic::post_ad(
        state.ads.as_ref(),
        state.storage.as_ref(),
        &state.config,
        Some(&session),
        payload,
    )
    .await?;

    match &state.dispatcher {
        Some(dispatcher) => {
            spawn_fan_out(Arc::clone(dispatcher), Arc::clone(&state.profiles), ad.clone());
        }
        None => debug!("Push disabled, no fan-out for ad {}", ad.id),
    }

    info!("Ad posted successfully: {}", ad.id);
    Ok(Json(PostAdResponse {
        message: "Ad posted successfully!".to_string(),
        ad,
    }))
}

pub async fn edit_ad_handler<A, R, P, S, Y>(
    State(state): State<Arc<AdsState<A, R, P, S, Y>>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(update): Json<AdUpdate>,
) -> Result<Json<Ad>, ClassifiedsError>
where
    A: AuthProvider + 'static,
    R: AdRepository + 'static,
    P: ProfileRepository + 'static,
    S: ObjectStorage + 'static,
    Y: PushRelay + 'static,
{
    let session = require_session(state.auth.as_ref(), &headers, SIGNED_OUT_MESSAGE).await?;
    Ok(Json(logic::edit_ad(state.ads.as_ref(), &session, &id, update).await?))
}

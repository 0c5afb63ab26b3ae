// --- File: crates/classifieds_ads/src/logic.rs ---

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Utc;
use classifieds_common::models::{Ad, AdUpdate, NewAd, Session};
use classifieds_common::services::ObjectStorage;
use classifieds_common::{external_service_error, ClassifiedsError};
use classifieds_config::AdsConfig;
use classifieds_db::{AdRepository, DbError};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error, info};

pub const MISSING_FIELDS_ALERT: &str = "Please fill all the fields";
pub const NOT_SIGNED_IN_ALERT: &str = "You must be logged in to post an ad";
pub const NOT_OWNER_ALERT: &str = "You can only edit your own ads.";

const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

#[derive(Error, Debug)]
pub enum AdError {
    #[error("{}", MISSING_FIELDS_ALERT)]
    MissingFields,
    #[error("{}", NOT_SIGNED_IN_ALERT)]
    NotSignedIn,
    #[error("{}", NOT_OWNER_ALERT)]
    NotOwner,
    #[error("Ad not found: {0}")]
    NotFound(String),
    #[error("Image data is not valid base64: {0}")]
    InvalidImage(String),
    #[error("Image upload failed: {0}")]
    UploadFailed(String),
    #[error("Ad store error: {0}")]
    StoreError(#[from] DbError),
}

impl From<AdError> for ClassifiedsError {
    fn from(err: AdError) -> Self {
        match err {
            AdError::MissingFields => ClassifiedsError::ValidationError(err.to_string()),
            AdError::NotSignedIn => ClassifiedsError::AuthError(err.to_string()),
            AdError::NotOwner => ClassifiedsError::ForbiddenError(err.to_string()),
            AdError::NotFound(id) => ClassifiedsError::NotFoundError(format!("ad {}", id)),
            AdError::InvalidImage(_) => ClassifiedsError::ValidationError(err.to_string()),
            AdError::UploadFailed(msg) => external_service_error("Object storage", msg),
            AdError::StoreError(e) => e.into(),
        }
    }
}

/// A photo sent inline with the ad, base64 encoded.
///
/// `data` may also be a `data:<content type>;base64,<payload>` URL.
#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ImageUpload {
    pub data: String,
    pub content_type: Option<String>,
}

impl ImageUpload {
    /// Decoded bytes and content type.
    pub fn decode(&self) -> Result<(Vec<u8>, String), AdError> {
        let (content_type, payload) = match self
            .data
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(";base64,"))
        {
            Some((mime, payload)) => (Some(mime.to_string()), payload),
            None => (None, self.data.as_str()),
        };

        let bytes = BASE64
            .decode(payload.trim())
            .map_err(|e| AdError::InvalidImage(e.to_string()))?;
        let content_type = self
            .content_type
            .clone()
            .or(content_type)
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
        Ok((bytes, content_type))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateAdRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "desc")]
    pub description: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub image: Option<ImageUpload>,
}

/// Every listed field must be non-empty; checked before any backend call.
pub fn validate_new_ad(request: &CreateAdRequest) -> Result<(), AdError> {
    let fields = [
        &request.name,
        &request.description,
        &request.year,
        &request.price,
        &request.phone,
    ];
    if fields.iter().any(|field| field.is_empty()) {
        return Err(AdError::MissingFields);
    }
    Ok(())
}

/// Post a new ad for the session's user.
///
/// The photo, if any, is uploaded to `{image_prefix}/{unix millis}` first
/// and its download URL stored as the image reference; without one the
/// configured default reference is stored. Nothing is written when
/// validation fails.
pub async fn post_ad<R, S>(
    ads: &R,
    storage: &S,
    config: &AdsConfig,
    session: Option<&Session>,
    request: CreateAdRequest,
) -> Result<Ad, AdError>
where
    R: AdRepository,
    S: ObjectStorage + ?Sized,
{
    validate_new_ad(&request)?;
    let session = session.ok_or(AdError::NotSignedIn)?;

    let image = match &request.image {
        Some(upload) => {
            let (bytes, content_type) = upload.decode()?;
            let path = format!("{}/{}", config.image_prefix, Utc::now().timestamp_millis());
            debug!("Uploading ad image to {}", path);
            storage
                .upload(session, &path, bytes, &content_type)
                .await
                .map_err(|e| {
                    error!("Image upload failed: {}", e);
                    AdError::UploadFailed(e.to_string())
                })?
        }
        None => config.default_image_url.clone(),
    };

    let ad = ads
        .create(NewAd {
            name: request.name,
            description: request.description,
            year: request.year,
            price: request.price,
            phone: request.phone,
            image,
            owner_id: session.user_id.clone(),
        })
        .await?;

    info!("Ad {} posted by {}", ad.id, ad.owner_id);
    Ok(ad)
}

/// Change the editable fields of one of the session user's ads.
pub async fn edit_ad<R: AdRepository>(
    ads: &R,
    session: &Session,
    id: &str,
    update: AdUpdate,
) -> Result<Ad, AdError> {
    let existing = ads
        .find_by_id(id)
        .await?
        .ok_or_else(|| AdError::NotFound(id.to_string()))?;

    if existing.owner_id != session.user_id {
        info!("User {} may not edit ad {}", session.user_id, id);
        return Err(AdError::NotOwner);
    }

    let updated = ads
        .update(id, update)
        .await?
        .ok_or_else(|| AdError::NotFound(id.to_string()))?;

    info!("Ad {} updated", id);
    Ok(updated)
}

/// The shared feed, newest first.
pub async fn list_ads<R: AdRepository>(ads: &R) -> Result<Vec<Ad>, AdError> {
    Ok(ads.find_all().await?)
}

pub async fn list_own_ads<R: AdRepository>(ads: &R, session: &Session) -> Result<Vec<Ad>, AdError> {
    Ok(ads.find_by_owner(&session.user_id).await?)
}

pub async fn get_ad<R: AdRepository>(ads: &R, id: &str) -> Result<Ad, AdError> {
    ads.find_by_id(id)
        .await?
        .ok_or_else(|| AdError::NotFound(id.to_string()))
}

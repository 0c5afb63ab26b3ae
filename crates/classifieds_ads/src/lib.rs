//! Ads for the classifieds backend
//!
//! [`logic`] holds posting, editing and listing, generic over the ad store
//! and the object store. Posting an ad starts the new-ad fan-out from
//! `classifieds-push` in the background when a dispatcher is configured.
//!
//! # API Endpoints
//!
//! - `GET /ads` - The shared feed, newest first
//! - `POST /ads` - Post an ad
//! - `GET /ads/mine` - The caller's own ads
//! - `GET /ads/{id}` - One ad
//! - `PUT /ads/{id}` - Edit one of the caller's ads

#[cfg(feature = "openapi")]
pub mod doc;
pub mod handlers;
pub mod logic;
#[cfg(test)]
mod mock;
pub mod routes;

pub use handlers::AdsState;
pub use logic::AdError;
pub use routes::routes;

#[cfg(feature = "openapi")]
pub mod openapi {
    pub use crate::doc::AdsApiDoc;
}

//! Repository for ads

use crate::error::DbError;

pub use classifieds_common::models::{Ad, AdUpdate, NewAd};

/// Storage contract for ads.
pub trait AdRepository: Send + Sync {
    /// Create the backing table if it does not exist yet
    fn init_schema(&self) -> impl std::future::Future<Output = Result<(), DbError>> + Send;

    /// Store a new ad, assigning its id and creation timestamp
    fn create(&self, ad: NewAd) -> impl std::future::Future<Output = Result<Ad, DbError>> + Send;

    /// Find one ad by id
    fn find_by_id(
        &self,
        id: &str,
    ) -> impl std::future::Future<Output = Result<Option<Ad>, DbError>> + Send;

    /// The shared feed: every ad, newest first
    fn find_all(&self) -> impl std::future::Future<Output = Result<Vec<Ad>, DbError>> + Send;

    /// Every ad whose `owner_id` equals the given user id
    fn find_by_owner(
        &self,
        owner_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Ad>, DbError>> + Send;

    /// Overwrite the editable fields of an ad
    ///
    /// Returns the updated ad, or `None` if no ad has this id.
    fn update(
        &self,
        id: &str,
        update: AdUpdate,
    ) -> impl std::future::Future<Output = Result<Option<Ad>, DbError>> + Send;
}

//! Repository for user profiles
//!
//! A profile is keyed by user id and carries the account email plus the most
//! recently registered push token.

use crate::error::DbError;

pub use classifieds_common::models::UserProfile;

/// Storage contract for user profiles.
pub trait ProfileRepository: Send + Sync {
    /// Create the backing table if it does not exist yet
    fn init_schema(&self) -> impl std::future::Future<Output = Result<(), DbError>> + Send;

    /// Write a whole profile document, replacing any previous one for the same user
    fn put_profile(
        &self,
        profile: UserProfile,
    ) -> impl std::future::Future<Output = Result<(), DbError>> + Send;

    /// Merge a push token onto the user's profile
    ///
    /// Creates the profile when it does not exist; otherwise only the token
    /// column changes and every other field is kept.
    fn upsert_push_token(
        &self,
        user_id: &str,
        push_token: &str,
    ) -> impl std::future::Future<Output = Result<(), DbError>> + Send;

    /// Find the profile of one user
    fn find_by_user(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<UserProfile>, DbError>> + Send;

    /// Read every profile in the collection
    fn find_all(&self) -> impl std::future::Future<Output = Result<Vec<UserProfile>, DbError>> + Send;
}

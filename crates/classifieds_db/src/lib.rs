//! Document storage for the classifieds backend
//!
//! Holds the `profiles` collection (email and push token per user) and the
//! `ads` collection. Both live behind repository traits with SQL
//! implementations on SQLx's `Any` driver; SQLite is the default backend and
//! PostgreSQL is available through the `postgres` feature.
//!
//! # Example
//!
//! ```rust,no_run
//! use classifieds_db::{AdRepository, DbClient, SqlAdRepository};
//!
//! async fn feed() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DbClient::from_url("sqlite::memory:").await?;
//!     let ads = SqlAdRepository::new(client);
//!     ads.init_schema().await?;
//!     for ad in ads.find_all().await? {
//!         println!("{} - {}", ad.name, ad.price);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod factory;
pub mod repositories;
pub mod repository;

pub use client::DbClient;
pub use error::DbError;
pub use factory::DbClientFactory;
pub use repository::RepositoryFactory;

pub use repositories::{
    Ad, AdRepository, AdRepositoryFactory, AdUpdate, NewAd, ProfileRepository,
    ProfileRepositoryFactory, SqlAdRepository, SqlProfileRepository, UserProfile,
};

//! Factory for creating database clients

use crate::client::DbClient;
use crate::error::DbError;
use classifieds_config::AppConfig;
use std::sync::Arc;
use tracing::debug;

/// Factory for creating database clients from the different configuration sources
#[derive(Debug, Clone, Default)]
pub struct DbClientFactory;

impl DbClientFactory {
    pub fn new() -> Self {
        Self
    }

    /// Create a database client from the application configuration
    ///
    /// # Errors
    ///
    /// Fails when the database section is missing, its URL is empty or the
    /// connection cannot be established.
    pub async fn from_app_config(&self, config: &Arc<AppConfig>) -> Result<DbClient, DbError> {
        debug!("Creating database client from application configuration");
        DbClient::new(config).await
    }

    /// Create a database client from a bare URL
    pub async fn from_url(&self, db_url: &str) -> Result<DbClient, DbError> {
        debug!("Creating database client from URL");
        DbClient::from_url(db_url).await
    }
}

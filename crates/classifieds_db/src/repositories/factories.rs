//! Factories for the SQL repositories

use crate::repositories::ad_sql::SqlAdRepository;
use crate::repositories::profile_sql::SqlProfileRepository;
use crate::{DbClient, RepositoryFactory};

/// Builds profile repositories over a shared database client
#[derive(Debug, Clone, Default)]
pub struct ProfileRepositoryFactory;

impl ProfileRepositoryFactory {
    pub fn new() -> Self {
        Self
    }
}

impl RepositoryFactory<SqlProfileRepository, DbClient> for ProfileRepositoryFactory {
    fn create_repository(&self, db_client: DbClient) -> SqlProfileRepository {
        SqlProfileRepository::new(db_client)
    }
}

/// Builds ad repositories over a shared database client
#[derive(Debug, Clone, Default)]
pub struct AdRepositoryFactory;

impl AdRepositoryFactory {
    pub fn new() -> Self {
        Self
    }
}

impl RepositoryFactory<SqlAdRepository, DbClient> for AdRepositoryFactory {
    fn create_repository(&self, db_client: DbClient) -> SqlAdRepository {
        SqlAdRepository::new(db_client)
    }
}

//! SQL implementation of the profile repository

use crate::error::DbError;
use crate::repositories::{format_timestamp, parse_timestamp};
use crate::repositories::profile::{ProfileRepository, UserProfile};
use crate::DbClient;
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::{debug, error, info};

/// SQL implementation of the profile repository
#[derive(Debug, Clone)]
pub struct SqlProfileRepository {
    db_client: DbClient,
}

impl SqlProfileRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    fn map_row(row: AnyRow) -> Result<UserProfile, DbError> {
        let created_at: Option<String> = row.try_get("created_at")?;
        Ok(UserProfile {
            user_id: row.try_get("user_id")?,
            email: row.try_get("email")?,
            push_token: row.try_get("push_token")?,
            created_at: created_at.as_deref().map(parse_timestamp).transpose()?,
        })
    }
}

impl ProfileRepository for SqlProfileRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing profile schema");

        let query = r#"
            CREATE TABLE IF NOT EXISTS profiles (
                user_id TEXT PRIMARY KEY NOT NULL,
                email TEXT,
                push_token TEXT,
                created_at TEXT
            )
        "#;

        self.db_client.execute(query).await?;

        info!("Profile schema initialized successfully");
        Ok(())
    }

    async fn put_profile(&self, profile: UserProfile) -> Result<(), DbError> {
        debug!("Writing profile for user: {}", profile.user_id);

        let query = r#"
            INSERT INTO profiles (user_id, email, push_token, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO UPDATE SET
                email = excluded.email,
                push_token = excluded.push_token,
                created_at = excluded.created_at
        "#;

        sqlx::query(query)
            .bind(&profile.user_id)
            .bind(profile.email.clone())
            .bind(profile.push_token.clone())
            .bind(profile.created_at.map(format_timestamp))
            .execute(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to write profile: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        Ok(())
    }

    async fn upsert_push_token(&self, user_id: &str, push_token: &str) -> Result<(), DbError> {
        debug!("Storing push token for user: {}", user_id);

        let query = r#"
            INSERT INTO profiles (user_id, push_token)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET push_token = excluded.push_token
        "#;

        sqlx::query(query)
            .bind(user_id)
            .bind(push_token)
            .execute(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to store push token: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        Ok(())
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Option<UserProfile>, DbError> {
        let query = r#"
            SELECT user_id, email, push_token, created_at
            FROM profiles
            WHERE user_id = $1
        "#;

        let row = sqlx::query(query)
            .bind(user_id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to find profile: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        row.map(Self::map_row).transpose()
    }

    async fn find_all(&self) -> Result<Vec<UserProfile>, DbError> {
        debug!("Reading all profiles");

        let query = r#"
            SELECT user_id, email, push_token, created_at
            FROM profiles
        "#;

        let rows = sqlx::query(query)
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to read profiles: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        rows.into_iter().map(Self::map_row).collect()
    }
}

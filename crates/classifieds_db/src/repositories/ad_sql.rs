//! SQL implementation of the ad repository

use crate::error::DbError;
use crate::repositories::ad::{Ad, AdRepository, AdUpdate, NewAd};
use crate::repositories::{format_timestamp, parse_timestamp};
use crate::DbClient;
use chrono::Utc;
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::{debug, error, info};
use uuid::Uuid;

const AD_COLUMNS: &str = "id, name, description, year, price, phone, image, owner_id, created_at";

/// SQL implementation of the ad repository
#[derive(Debug, Clone)]
pub struct SqlAdRepository {
    db_client: DbClient,
}

impl SqlAdRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    fn map_row(row: AnyRow) -> Result<Ad, DbError> {
        let created_at: String = row.try_get("created_at")?;
        Ok(Ad {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            year: row.try_get("year")?,
            price: row.try_get("price")?,
            phone: row.try_get("phone")?,
            image: row.try_get("image")?,
            owner_id: row.try_get("owner_id")?,
            created_at: parse_timestamp(&created_at)?,
        })
    }

    async fn fetch_many(&self, query: &str, bind: Option<&str>) -> Result<Vec<Ad>, DbError> {
        let mut statement = sqlx::query(query);
        if let Some(value) = bind {
            statement = statement.bind(value);
        }

        let rows = statement
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to read ads: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        rows.into_iter().map(Self::map_row).collect()
    }
}

impl AdRepository for SqlAdRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing ad schema");

        let query = r#"
            CREATE TABLE IF NOT EXISTS ads (
                id TEXT PRIMARY KEY NOT NULL,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                year TEXT NOT NULL,
                price TEXT NOT NULL,
                phone TEXT NOT NULL,
                image TEXT NOT NULL,
                owner_id TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
        "#;
        self.db_client.execute(query).await?;

        self.db_client
            .execute("CREATE INDEX IF NOT EXISTS idx_ads_owner_id ON ads (owner_id)")
            .await?;

        info!("Ad schema initialized successfully");
        Ok(())
    }

    async fn create(&self, ad: NewAd) -> Result<Ad, DbError> {
        let stored = Ad {
            id: Uuid::new_v4().to_string(),
            name: ad.name,
            description: ad.description,
            year: ad.year,
            price: ad.price,
            phone: ad.phone,
            image: ad.image,
            owner_id: ad.owner_id,
            created_at: Utc::now(),
        };
        debug!("Creating ad {} for owner {}", stored.id, stored.owner_id);

        let query = format!(
            "INSERT INTO ads ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
            AD_COLUMNS
        );

        sqlx::query(&query)
            .bind(&stored.id)
            .bind(&stored.name)
            .bind(&stored.description)
            .bind(&stored.year)
            .bind(&stored.price)
            .bind(&stored.phone)
            .bind(&stored.image)
            .bind(&stored.owner_id)
            .bind(format_timestamp(stored.created_at))
            .execute(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to create ad: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        info!("Ad created: {}", stored.id);
        Ok(stored)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Ad>, DbError> {
        let query = format!("SELECT {} FROM ads WHERE id = $1", AD_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to find ad: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        row.map(Self::map_row).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Ad>, DbError> {
        let query = format!("SELECT {} FROM ads ORDER BY created_at DESC", AD_COLUMNS);
        self.fetch_many(&query, None).await
    }

    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<Ad>, DbError> {
        let query = format!(
            "SELECT {} FROM ads WHERE owner_id = $1 ORDER BY created_at DESC",
            AD_COLUMNS
        );
        self.fetch_many(&query, Some(owner_id)).await
    }

    async fn update(&self, id: &str, update: AdUpdate) -> Result<Option<Ad>, DbError> {
        debug!("Updating ad: {}", id);

        let query = r#"
            UPDATE ads
            SET name = $1, description = $2, price = $3, year = $4
            WHERE id = $5
        "#;

        let result = sqlx::query(query)
            .bind(&update.name)
            .bind(&update.description)
            .bind(&update.price)
            .bind(&update.year)
            .bind(id)
            .execute(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to update ad: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        if result.rows_affected() == 0 {
            debug!("No ad found to update: {}", id);
            return Ok(None);
        }

        self.find_by_id(id).await
    }
}

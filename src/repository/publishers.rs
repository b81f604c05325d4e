//! Publishers repository

use sqlx::{Pool, Postgres};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::publisher::{CreatePublisher, Publisher, UpdatePublisher},
};

#[derive(Clone)]
pub struct PublishersRepository {
    pool: Pool<Postgres>,
}

impl PublishersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all publishers ordered by name
    pub async fn list(&self) -> AppResult<Vec<Publisher>> {
        let rows = sqlx::query_as::<_, Publisher>("SELECT * FROM publishers ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Get publisher by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Publisher> {
        sqlx::query_as::<_, Publisher>("SELECT * FROM publishers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Publisher {} not found", id)))
    }

    /// Create a publisher
    pub async fn create(&self, publisher: &CreatePublisher) -> AppResult<Publisher> {
        publisher.validate()?;
        let row = sqlx::query_as::<_, Publisher>(
            "INSERT INTO publishers (name, website, city) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&publisher.name)
        .bind(&publisher.website)
        .bind(&publisher.city)
        .fetch_one(&self.pool)
        .await?;
        tracing::debug!("Created publisher id={} name={}", row.id, row.name);
        Ok(row)
    }

    /// Update a publisher
    pub async fn update(&self, id: i32, publisher: &UpdatePublisher) -> AppResult<Publisher> {
        publisher.validate()?;
        sqlx::query_as::<_, Publisher>(
            r#"
            UPDATE publishers
            SET name = COALESCE($1, name),
                website = COALESCE($2, website),
                city = COALESCE($3, city)
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(&publisher.name)
        .bind(&publisher.website)
        .bind(&publisher.city)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Publisher {} not found", id)))
    }

    /// Delete a publisher. Books referencing it keep existing with their
    /// publisher cleared (ON DELETE SET NULL).
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM publishers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Publisher {} not found", id)));
        }
        tracing::debug!("Deleted publisher id={}", id);
        Ok(())
    }
}

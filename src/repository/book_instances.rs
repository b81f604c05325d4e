//! Book instances (physical copies) repository

use sqlx::{Pool, Postgres};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book_instance::{BookInstance, CreateBookInstance, LoanStatus, UpdateBookInstance},
};

const SELECT_WITH_TITLE: &str = r#"
    SELECT bi.id, bi.book_id, bi.imprint, bi.due_back, bi.status,
           b.title as book_title
    FROM book_instances bi
    LEFT JOIN books b ON b.id = bi.book_id
"#;

#[derive(Clone)]
pub struct BookInstancesRepository {
    pool: Pool<Postgres>,
}

impl BookInstancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all copies ordered by due-back date (NULLs last, per PostgreSQL
    /// ascending order)
    pub async fn list(&self) -> AppResult<Vec<BookInstance>> {
        let rows = sqlx::query_as::<_, BookInstance>(&format!(
            "{} ORDER BY bi.due_back",
            SELECT_WITH_TITLE
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// List the copies of one book ordered by due-back date
    pub async fn list_for_book(&self, book_id: i32) -> AppResult<Vec<BookInstance>> {
        let rows = sqlx::query_as::<_, BookInstance>(&format!(
            "{} WHERE bi.book_id = $1 ORDER BY bi.due_back",
            SELECT_WITH_TITLE
        ))
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Get a copy by its UUID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<BookInstance> {
        sqlx::query_as::<_, BookInstance>(&format!("{} WHERE bi.id = $1", SELECT_WITH_TITLE))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }

    /// Register a new copy of a book. The UUID is generated here and is
    /// immutable afterwards; status defaults to Maintenance.
    pub async fn create(
        &self,
        book_id: i32,
        instance: &CreateBookInstance,
    ) -> AppResult<BookInstance> {
        instance.validate()?;

        let id = Uuid::new_v4();
        let status = instance.status.unwrap_or_default();

        sqlx::query(
            r#"
            INSERT INTO book_instances (id, book_id, imprint, due_back, status)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(id)
        .bind(book_id)
        .bind(&instance.imprint)
        .bind(instance.due_back)
        .bind(status.as_code())
        .execute(&self.pool)
        .await?;

        tracing::debug!("Created book instance id={} book_id={}", id, book_id);
        self.get_by_id(id).await
    }

    /// Update a copy's imprint and/or status. The UUID cannot change.
    pub async fn update(&self, id: Uuid, instance: &UpdateBookInstance) -> AppResult<BookInstance> {
        instance.validate()?;

        let updated = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE book_instances
            SET imprint = COALESCE($1, imprint),
                status = COALESCE($2, status)
            WHERE id = $3
            RETURNING id
            "#,
        )
        .bind(&instance.imprint)
        .bind(instance.status.map(|s| s.as_code()))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        if updated.is_none() {
            return Err(AppError::NotFound(format!("Book instance {} not found", id)));
        }
        self.get_by_id(id).await
    }

    /// Set or clear the due-back date of a copy
    pub async fn set_due_back(
        &self,
        id: Uuid,
        due_back: Option<chrono::NaiveDate>,
    ) -> AppResult<BookInstance> {
        let updated = sqlx::query_scalar::<_, Uuid>(
            "UPDATE book_instances SET due_back = $1 WHERE id = $2 RETURNING id",
        )
        .bind(due_back)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        if updated.is_none() {
            return Err(AppError::NotFound(format!("Book instance {} not found", id)));
        }
        self.get_by_id(id).await
    }

    /// Count the copies of a book, optionally only those in a given status
    pub async fn count_for_book(
        &self,
        book_id: i32,
        status: Option<LoanStatus>,
    ) -> AppResult<i64> {
        let count: i64 = if let Some(status) = status {
            sqlx::query_scalar(
                "SELECT COUNT(*)::bigint FROM book_instances WHERE book_id = $1 AND status = $2",
            )
            .bind(book_id)
            .bind(status.as_code())
            .fetch_one(&self.pool)
            .await?
        } else {
            sqlx::query_scalar("SELECT COUNT(*)::bigint FROM book_instances WHERE book_id = $1")
                .bind(book_id)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(count)
    }

    /// Remove a copy from the catalog
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM book_instances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book instance {} not found", id)));
        }
        Ok(())
    }
}

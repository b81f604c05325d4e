//! Books repository for database operations.
//!
//! Books relate to authors, genres and languages through junction tables;
//! relation lists are loaded with separate queries, ordered the way listings
//! present them (authors by name, genres and languages alphabetically).

use sqlx::{Pool, Postgres};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        author::Author,
        book::{Book, BookShort, CreateBook, UpdateBook},
        genre::Genre,
        language::Language,
        publisher::Publisher,
    },
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    // =========================================================================
    // READ
    // =========================================================================

    /// List books with publisher name and per-book copy counts, ordered by
    /// title
    pub async fn list(&self) -> AppResult<Vec<BookShort>> {
        let rows = sqlx::query_as::<_, BookShort>(
            r#"
            SELECT b.id, b.title, b.isbn,
                   p.name as publisher_name,
                   (SELECT COUNT(*) FROM book_instances bi WHERE bi.book_id = b.id) as nb_instances,
                   (SELECT COUNT(*) FROM book_instances bi
                    WHERE bi.book_id = b.id AND bi.status = 'a') as nb_available
            FROM books b
            LEFT JOIN publishers p ON p.id = b.publisher_id
            ORDER BY b.title
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Get a book by ID with its publisher, authors, genres and languages
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        let mut book = sqlx::query_as::<_, Book>(
            "SELECT id, title, summary, isbn, publisher_id FROM books WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;

        self.load_relations(&mut book).await?;
        Ok(book)
    }

    /// Get a book by ISBN
    pub async fn get_by_isbn(&self, isbn: &str) -> AppResult<Book> {
        let mut book = sqlx::query_as::<_, Book>(
            "SELECT id, title, summary, isbn, publisher_id FROM books WHERE isbn = $1",
        )
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with ISBN {} not found", isbn)))?;

        self.load_relations(&mut book).await?;
        Ok(book)
    }

    /// Check if ISBN already exists
    pub async fn isbn_exists(&self, isbn: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = if let Some(id) = exclude_id {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1 AND id != $2)")
                .bind(isbn)
                .bind(id)
                .fetch_one(&self.pool)
                .await?
        } else {
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1)")
                .bind(isbn)
                .fetch_one(&self.pool)
                .await?
        };
        Ok(exists)
    }

    async fn load_relations(&self, book: &mut Book) -> AppResult<()> {
        book.publisher = sqlx::query_as::<_, Publisher>(
            "SELECT * FROM publishers WHERE id = $1",
        )
        .bind(book.publisher_id)
        .fetch_optional(&self.pool)
        .await?;

        book.authors = sqlx::query_as::<_, Author>(
            r#"
            SELECT a.*
            FROM book_authors ba
            JOIN authors a ON a.id = ba.author_id
            WHERE ba.book_id = $1
            ORDER BY a.last_name, a.first_name
            "#,
        )
        .bind(book.id)
        .fetch_all(&self.pool)
        .await?;

        book.genres = sqlx::query_as::<_, Genre>(
            r#"
            SELECT g.*
            FROM book_genres bg
            JOIN genres g ON g.id = bg.genre_id
            WHERE bg.book_id = $1
            ORDER BY g.name
            "#,
        )
        .bind(book.id)
        .fetch_all(&self.pool)
        .await?;

        book.languages = sqlx::query_as::<_, Language>(
            r#"
            SELECT l.*
            FROM book_languages bl
            JOIN languages l ON l.id = bl.language_id
            WHERE bl.book_id = $1
            ORDER BY l.name
            "#,
        )
        .bind(book.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(())
    }

    // =========================================================================
    // WRITE
    // =========================================================================

    /// Create a book with its relations in one transaction
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        book.validate()?;

        let mut tx = self.pool.begin().await?;

        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO books (title, summary, isbn, publisher_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&book.title)
        .bind(&book.summary)
        .bind(&book.isbn)
        .bind(book.publisher_id)
        .fetch_one(&mut *tx)
        .await?;

        for author_id in &book.author_ids {
            sqlx::query("INSERT INTO book_authors (book_id, author_id) VALUES ($1, $2)")
                .bind(id)
                .bind(author_id)
                .execute(&mut *tx)
                .await?;
        }
        for genre_id in &book.genre_ids {
            sqlx::query("INSERT INTO book_genres (book_id, genre_id) VALUES ($1, $2)")
                .bind(id)
                .bind(genre_id)
                .execute(&mut *tx)
                .await?;
        }
        for language_id in &book.language_ids {
            sqlx::query("INSERT INTO book_languages (book_id, language_id) VALUES ($1, $2)")
                .bind(id)
                .bind(language_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::debug!("Created book id={} isbn={}", id, book.isbn);
        self.get_by_id(id).await
    }

    /// Update a book. Relation lists, when present, replace the existing
    /// junction rows in the same transaction.
    pub async fn update(&self, id: i32, book: &UpdateBook) -> AppResult<Book> {
        book.validate()?;

        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE books
            SET title = COALESCE($1, title),
                summary = COALESCE($2, summary),
                isbn = COALESCE($3, isbn),
                publisher_id = COALESCE($4, publisher_id)
            WHERE id = $5
            RETURNING id
            "#,
        )
        .bind(&book.title)
        .bind(&book.summary)
        .bind(&book.isbn)
        .bind(book.publisher_id)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }

        if let Some(ref author_ids) = book.author_ids {
            sqlx::query("DELETE FROM book_authors WHERE book_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            for author_id in author_ids {
                sqlx::query("INSERT INTO book_authors (book_id, author_id) VALUES ($1, $2)")
                    .bind(id)
                    .bind(author_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }
        if let Some(ref genre_ids) = book.genre_ids {
            sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            for genre_id in genre_ids {
                sqlx::query("INSERT INTO book_genres (book_id, genre_id) VALUES ($1, $2)")
                    .bind(id)
                    .bind(genre_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }
        if let Some(ref language_ids) = book.language_ids {
            sqlx::query("DELETE FROM book_languages WHERE book_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            for language_id in language_ids {
                sqlx::query("INSERT INTO book_languages (book_id, language_id) VALUES ($1, $2)")
                    .bind(id)
                    .bind(language_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;

        self.get_by_id(id).await
    }

    /// Clear the publisher reference of a book
    pub async fn clear_publisher(&self, id: i32) -> AppResult<Book> {
        let updated = sqlx::query_scalar::<_, i32>(
            "UPDATE books SET publisher_id = NULL WHERE id = $1 RETURNING id",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        if updated.is_none() {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        self.get_by_id(id).await
    }

    /// Delete a book. Blocked (ON DELETE RESTRICT) while copies of it exist;
    /// junction rows are removed with the book.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        tracing::debug!("Deleted book id={}", id);
        Ok(())
    }
}

/// Book model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE books (
///     uid UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     author VARCHAR(255) NOT NULL,
///     publisher VARCHAR(255) NOT NULL,
///     published_date DATE NOT NULL,
///     page_count INTEGER NOT NULL CHECK (page_count >= 0),
///     language VARCHAR(64) NOT NULL,
///     user_uid UUID REFERENCES users (uid) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use super::review::Review;
use super::tag::Tag;

const BOOK_COLUMNS: &str = "uid, title, author, publisher, published_date, page_count, \
                            language, user_uid, created_at, updated_at";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    pub uid: Uuid,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub published_date: NaiveDate,
    pub page_count: i32,
    pub language: String,

    /// Creator of the entry; cleared if that account is deleted
    pub user_uid: Option<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for adding a book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    #[validate(length(min = 1, max = 255))]
    pub author: String,

    #[validate(length(min = 1, max = 255))]
    pub publisher: String,

    pub published_date: NaiveDate,

    #[validate(range(min = 0))]
    pub page_count: i32,

    #[validate(length(min = 1, max = 64))]
    pub language: String,
}

/// Partial update of a book
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct UpdateBook {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub author: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub publisher: Option<String>,

    #[validate(range(min = 0))]
    pub page_count: Option<i32>,

    #[validate(length(min = 1, max = 64))]
    pub language: Option<String>,
}

/// A book with its reviews and tags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookDetail {
    #[serde(flatten)]
    pub book: Book,

    pub reviews: Vec<Review>,

    pub tags: Vec<Tag>,
}

impl BookDetail {
    /// Loads the reviews and tags of `book`
    pub async fn load(pool: &PgPool, book: Book) -> Result<Self, sqlx::Error> {
        let reviews = Review::list_for_book(pool, book.uid).await?;
        let tags = Tag::list_for_book(pool, book.uid).await?;

        Ok(Self {
            book,
            reviews,
            tags,
        })
    }
}

impl Book {
    pub async fn create(
        pool: &PgPool,
        user_uid: Uuid,
        data: CreateBook,
    ) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO books (title, author, publisher, published_date, page_count, language, user_uid)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {BOOK_COLUMNS}"
        );

        sqlx::query_as::<_, Book>(&query)
            .bind(data.title)
            .bind(data.author)
            .bind(data.publisher)
            .bind(data.published_date)
            .bind(data.page_count)
            .bind(data.language)
            .bind(user_uid)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_uid(pool: &PgPool, uid: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {BOOK_COLUMNS} FROM books WHERE uid = $1");

        sqlx::query_as::<_, Book>(&query)
            .bind(uid)
            .fetch_optional(pool)
            .await
    }

    /// All books, newest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!("SELECT {BOOK_COLUMNS} FROM books ORDER BY created_at DESC");

        sqlx::query_as::<_, Book>(&query).fetch_all(pool).await
    }

    /// Books created by `user_uid`, newest first
    pub async fn list_by_user(pool: &PgPool, user_uid: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE user_uid = $1 ORDER BY created_at DESC"
        );

        sqlx::query_as::<_, Book>(&query)
            .bind(user_uid)
            .fetch_all(pool)
            .await
    }

    /// Applies a partial update; `None` when the book does not exist
    pub async fn update(
        pool: &PgPool,
        uid: Uuid,
        data: UpdateBook,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query = format!(
            "UPDATE books SET
                title = COALESCE($2, title),
                author = COALESCE($3, author),
                publisher = COALESCE($4, publisher),
                page_count = COALESCE($5, page_count),
                language = COALESCE($6, language),
                updated_at = NOW()
             WHERE uid = $1
             RETURNING {BOOK_COLUMNS}"
        );

        sqlx::query_as::<_, Book>(&query)
            .bind(uid)
            .bind(data.title)
            .bind(data.author)
            .bind(data.publisher)
            .bind(data.page_count)
            .bind(data.language)
            .fetch_optional(pool)
            .await
    }

    /// Returns whether a row was deleted
    pub async fn delete(pool: &PgPool, uid: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM books WHERE uid = $1")
            .bind(uid)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

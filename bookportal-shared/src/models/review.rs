/// Review model and database operations
///
/// ```sql
/// CREATE TABLE reviews (
///     uid UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     rating INTEGER NOT NULL CHECK (rating BETWEEN 0 AND 5),
///     review_text TEXT NOT NULL,
///     user_uid UUID REFERENCES users (uid) ON DELETE SET NULL,
///     book_uid UUID REFERENCES books (uid) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

const REVIEW_COLUMNS: &str =
    "uid, rating, review_text, user_uid, book_uid, created_at, updated_at";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    pub uid: Uuid,
    pub rating: i32,
    pub review_text: String,
    pub user_uid: Option<Uuid>,
    pub book_uid: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewReview {
    #[validate(range(min = 0, max = 5))]
    pub rating: i32,

    #[validate(length(min = 1))]
    pub review_text: String,
}

impl Review {
    pub async fn create(
        pool: &PgPool,
        user_uid: Uuid,
        book_uid: Uuid,
        data: NewReview,
    ) -> Result<Self, sqlx::Error> {
        let query = format!(
            "INSERT INTO reviews (rating, review_text, user_uid, book_uid)
             VALUES ($1, $2, $3, $4)
             RETURNING {REVIEW_COLUMNS}"
        );

        sqlx::query_as::<_, Review>(&query)
            .bind(data.rating)
            .bind(data.review_text)
            .bind(user_uid)
            .bind(book_uid)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_uid(pool: &PgPool, uid: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {REVIEW_COLUMNS} FROM reviews WHERE uid = $1");

        sqlx::query_as::<_, Review>(&query)
            .bind(uid)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!("SELECT {REVIEW_COLUMNS} FROM reviews ORDER BY created_at DESC");

        sqlx::query_as::<_, Review>(&query).fetch_all(pool).await
    }

    pub async fn list_for_book(pool: &PgPool, book_uid: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE book_uid = $1 ORDER BY created_at DESC"
        );

        sqlx::query_as::<_, Review>(&query)
            .bind(book_uid)
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_user(pool: &PgPool, user_uid: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE user_uid = $1 ORDER BY created_at DESC"
        );

        sqlx::query_as::<_, Review>(&query)
            .bind(user_uid)
            .fetch_all(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, uid: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reviews WHERE uid = $1")
            .bind(uid)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

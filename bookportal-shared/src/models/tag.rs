/// Tag model and the book/tag link table
///
/// ```sql
/// CREATE TABLE tags (
///     uid UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(64) NOT NULL UNIQUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE TABLE book_tags (
///     book_uid UUID NOT NULL REFERENCES books (uid) ON DELETE CASCADE,
///     tag_uid UUID NOT NULL REFERENCES tags (uid) ON DELETE CASCADE,
///     PRIMARY KEY (book_uid, tag_uid)
/// );
/// ```
///
/// Queries take any `PgExecutor` so they can run inside a transaction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    pub uid: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TagCreate {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
}

/// Tags to attach to a book, by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TagAdd {
    #[validate(custom(function = "validate_tag_names"))]
    pub tags: Vec<TagCreate>,
}

fn validate_tag_names(tags: &[TagCreate]) -> Result<(), ValidationError> {
    if tags.iter().any(|tag| tag.validate().is_err()) {
        return Err(ValidationError::new("tag_name_length"));
    }
    Ok(())
}

impl Tag {
    pub async fn create<'e>(executor: impl PgExecutor<'e>, name: &str) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Tag>(
            "INSERT INTO tags (name) VALUES ($1) RETURNING uid, name, created_at",
        )
        .bind(name)
        .fetch_one(executor)
        .await
    }

    pub async fn find_by_uid<'e>(
        executor: impl PgExecutor<'e>,
        uid: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Tag>("SELECT uid, name, created_at FROM tags WHERE uid = $1")
            .bind(uid)
            .fetch_optional(executor)
            .await
    }

    pub async fn find_by_name<'e>(
        executor: impl PgExecutor<'e>,
        name: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Tag>("SELECT uid, name, created_at FROM tags WHERE name = $1")
            .bind(name)
            .fetch_optional(executor)
            .await
    }

    /// Returns the tag called `name`, creating it first if needed
    pub async fn find_or_create<'e>(
        executor: impl PgExecutor<'e>,
        name: &str,
    ) -> Result<Self, sqlx::Error> {
        // The no-op update makes RETURNING yield the existing row on conflict
        sqlx::query_as::<_, Tag>(
            "INSERT INTO tags (name) VALUES ($1)
             ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
             RETURNING uid, name, created_at",
        )
        .bind(name)
        .fetch_one(executor)
        .await
    }

    pub async fn list<'e>(executor: impl PgExecutor<'e>) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Tag>("SELECT uid, name, created_at FROM tags ORDER BY created_at DESC")
            .fetch_all(executor)
            .await
    }

    pub async fn list_for_book<'e>(
        executor: impl PgExecutor<'e>,
        book_uid: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Tag>(
            "SELECT t.uid, t.name, t.created_at
             FROM tags t
             JOIN book_tags bt ON bt.tag_uid = t.uid
             WHERE bt.book_uid = $1
             ORDER BY t.name",
        )
        .bind(book_uid)
        .fetch_all(executor)
        .await
    }

    pub async fn rename<'e>(
        executor: impl PgExecutor<'e>,
        uid: Uuid,
        name: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Tag>(
            "UPDATE tags SET name = $2 WHERE uid = $1 RETURNING uid, name, created_at",
        )
        .bind(uid)
        .bind(name)
        .fetch_optional(executor)
        .await
    }

    pub async fn delete<'e>(executor: impl PgExecutor<'e>, uid: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tags WHERE uid = $1")
            .bind(uid)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Links the tag to a book; linking twice is a no-op
    pub async fn attach_to_book<'e>(
        executor: impl PgExecutor<'e>,
        book_uid: Uuid,
        tag_uid: Uuid,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO book_tags (book_uid, tag_uid) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(book_uid)
        .bind(tag_uid)
        .execute(executor)
        .await?;

        Ok(())
    }
}

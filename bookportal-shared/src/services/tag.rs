use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::is_unique_violation;
use crate::error::{AppError, AppResult};
use crate::models::book::{Book, BookDetail};
use crate::models::tag::{Tag, TagAdd, TagCreate};

#[async_trait]
pub trait TagService: Send + Sync {
    async fn get_tags(&self) -> AppResult<Vec<Tag>>;

    /// # Errors
    ///
    /// `TagAlreadyExists` if the name is taken.
    async fn add_tag(&self, tag: TagCreate) -> AppResult<Tag>;

    /// Attaches tags to a book by name, creating missing tags
    ///
    /// Attaching an already-attached tag is a no-op.
    async fn add_tags_to_book(&self, book_uid: Uuid, tags: TagAdd) -> AppResult<BookDetail>;

    async fn get_tag(&self, tag_uid: Uuid) -> AppResult<Tag>;

    async fn update_tag(&self, tag_uid: Uuid, update: TagCreate) -> AppResult<Tag>;

    async fn delete_tag(&self, tag_uid: Uuid) -> AppResult<()>;
}

pub type TagServiceArc = Arc<dyn TagService>;

#[derive(Debug, Clone)]
pub struct PgTagService {
    pool: PgPool,
}

impl PgTagService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_tag_conflict(err: sqlx::Error) -> AppError {
    if is_unique_violation(&err) {
        AppError::TagAlreadyExists
    } else {
        AppError::Database(err)
    }
}

#[async_trait]
impl TagService for PgTagService {
    async fn get_tags(&self) -> AppResult<Vec<Tag>> {
        Ok(Tag::list(&self.pool).await?)
    }

    async fn add_tag(&self, tag: TagCreate) -> AppResult<Tag> {
        if Tag::find_by_name(&self.pool, &tag.name).await?.is_some() {
            return Err(AppError::TagAlreadyExists);
        }

        // A concurrent insert can still win the race
        Tag::create(&self.pool, &tag.name)
            .await
            .map_err(map_tag_conflict)
    }

    async fn add_tags_to_book(&self, book_uid: Uuid, tags: TagAdd) -> AppResult<BookDetail> {
        let book = Book::find_by_uid(&self.pool, book_uid)
            .await?
            .ok_or(AppError::BookNotFound)?;

        let mut tx = self.pool.begin().await?;
        for tag in &tags.tags {
            let tag = Tag::find_or_create(&mut *tx, &tag.name).await?;
            Tag::attach_to_book(&mut *tx, book_uid, tag.uid).await?;
        }
        tx.commit().await?;

        tracing::info!(%book_uid, count = tags.tags.len(), "Tags attached to book");
        Ok(BookDetail::load(&self.pool, book).await?)
    }

    async fn get_tag(&self, tag_uid: Uuid) -> AppResult<Tag> {
        Tag::find_by_uid(&self.pool, tag_uid)
            .await?
            .ok_or(AppError::TagNotFound)
    }

    async fn update_tag(&self, tag_uid: Uuid, update: TagCreate) -> AppResult<Tag> {
        Tag::rename(&self.pool, tag_uid, &update.name)
            .await
            .map_err(map_tag_conflict)?
            .ok_or(AppError::TagNotFound)
    }

    async fn delete_tag(&self, tag_uid: Uuid) -> AppResult<()> {
        if !Tag::delete(&self.pool, tag_uid).await? {
            return Err(AppError::TagNotFound);
        }
        Ok(())
    }
}

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::authorization::require_ownership;
use crate::error::{AppError, AppResult};
use crate::models::book::Book;
use crate::models::review::{NewReview, Review};

#[async_trait]
pub trait ReviewService: Send + Sync {
    /// # Errors
    ///
    /// `BookNotFound` if the book does not exist.
    async fn add_review_to_book(
        &self,
        user_uid: Uuid,
        book_uid: Uuid,
        review: NewReview,
    ) -> AppResult<Review>;

    async fn get_review(&self, review_uid: Uuid) -> AppResult<Review>;

    async fn get_all_reviews(&self) -> AppResult<Vec<Review>>;

    /// Deletes a review written by `user_uid`
    ///
    /// # Errors
    ///
    /// `ReviewNotFound` if it does not exist, `InsufficientPermission` if
    /// someone else wrote it.
    async fn delete_review_from_book(&self, review_uid: Uuid, user_uid: Uuid) -> AppResult<()>;
}

pub type ReviewServiceArc = Arc<dyn ReviewService>;

#[derive(Debug, Clone)]
pub struct PgReviewService {
    pool: PgPool,
}

impl PgReviewService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewService for PgReviewService {
    async fn add_review_to_book(
        &self,
        user_uid: Uuid,
        book_uid: Uuid,
        review: NewReview,
    ) -> AppResult<Review> {
        if Book::find_by_uid(&self.pool, book_uid).await?.is_none() {
            return Err(AppError::BookNotFound);
        }

        let review = Review::create(&self.pool, user_uid, book_uid, review).await?;
        tracing::info!(review_uid = %review.uid, %book_uid, user_id = %user_uid, "Review added");
        Ok(review)
    }

    async fn get_review(&self, review_uid: Uuid) -> AppResult<Review> {
        Review::find_by_uid(&self.pool, review_uid)
            .await?
            .ok_or(AppError::ReviewNotFound)
    }

    async fn get_all_reviews(&self) -> AppResult<Vec<Review>> {
        Ok(Review::list(&self.pool).await?)
    }

    async fn delete_review_from_book(&self, review_uid: Uuid, user_uid: Uuid) -> AppResult<()> {
        let review = self.get_review(review_uid).await?;

        require_ownership(user_uid, review.user_uid).map_err(|e| {
            tracing::warn!(%review_uid, user_id = %user_uid, "Refused to delete another user's review");
            e
        })?;

        Review::delete(&self.pool, review_uid).await?;
        Ok(())
    }
}

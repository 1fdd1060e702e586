/// Review endpoints
///
/// - `GET    /api/v1/reviews` - All reviews (admin only)
/// - `GET    /api/v1/reviews/:review_uid` - One review
/// - `POST   /api/v1/reviews/book/:book_uid` - Review a book
/// - `DELETE /api/v1/reviews/:review_uid` - Delete one of the caller's reviews

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{Path, ValidatedJson},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use bookportal_shared::{
    auth::{
        authorization::{require_role, ADMIN_ONLY, ALL_ROLES},
        middleware::AuthContext,
    },
    models::review::{NewReview, Review},
};
use uuid::Uuid;

pub async fn get_all_reviews(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Review>>> {
    require_role(&auth.user, ADMIN_ONLY)?;

    Ok(Json(state.reviews.get_all_reviews().await?))
}

pub async fn get_review(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(review_uid): Path<Uuid>,
) -> ApiResult<Json<Review>> {
    require_role(&auth.user, ALL_ROLES)?;

    Ok(Json(state.reviews.get_review(review_uid).await?))
}

/// Review a book as the caller
///
/// # Errors
///
/// - `404 book_not_found`
/// - `422 validation_error`: rating outside 0..=5 or empty text
pub async fn add_review(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(book_uid): Path<Uuid>,
    ValidatedJson(review): ValidatedJson<NewReview>,
) -> ApiResult<(StatusCode, Json<Review>)> {
    require_role(&auth.user, ALL_ROLES)?;

    let review = state
        .reviews
        .add_review_to_book(auth.user_id(), book_uid, review)
        .await?;

    Ok((StatusCode::CREATED, Json(review)))
}

/// Delete a review written by the caller
///
/// Someone else's review is `401 insufficient_permissions`; a missing one is
/// `404 review_not_found`.
pub async fn delete_review(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(review_uid): Path<Uuid>,
) -> ApiResult<StatusCode> {
    require_role(&auth.user, ALL_ROLES)?;

    state
        .reviews
        .delete_review_from_book(review_uid, auth.user_id())
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

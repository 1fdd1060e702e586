/// Tag endpoints
///
/// Every route requires an access token and a verified `admin` or `user`.
///
/// - `GET    /api/v1/tags` - All tags
/// - `POST   /api/v1/tags` - Create a tag
/// - `POST   /api/v1/tags/book/:book_uid/tags` - Attach tags to a book by name
/// - `PUT    /api/v1/tags/:tag_uid` - Rename
/// - `DELETE /api/v1/tags/:tag_uid` - Delete

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{Path, ValidatedJson},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use bookportal_shared::{
    auth::{
        authorization::{require_role, ALL_ROLES},
        middleware::AuthContext,
    },
    models::{
        book::BookDetail,
        tag::{Tag, TagAdd, TagCreate},
    },
};
use uuid::Uuid;

pub async fn get_all_tags(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Tag>>> {
    require_role(&auth.user, ALL_ROLES)?;

    Ok(Json(state.tags.get_tags().await?))
}

/// Create a tag, `403 tag_exists` if the name is taken
pub async fn add_tag(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ValidatedJson(tag): ValidatedJson<TagCreate>,
) -> ApiResult<(StatusCode, Json<Tag>)> {
    require_role(&auth.user, ALL_ROLES)?;

    let tag = state.tags.add_tag(tag).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

/// Attach tags to a book
///
/// Unknown names are created, known ones reused; attaching a tag twice is a
/// no-op. Returns the book with its reviews and updated tags.
pub async fn add_tags_to_book(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(book_uid): Path<Uuid>,
    ValidatedJson(tags): ValidatedJson<TagAdd>,
) -> ApiResult<Json<BookDetail>> {
    require_role(&auth.user, ALL_ROLES)?;

    let detail = state.tags.add_tags_to_book(book_uid, tags).await?;

    tracing::debug!(%book_uid, tags = detail.tags.len(), "Tags attached");
    Ok(Json(detail))
}

pub async fn update_tag(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(tag_uid): Path<Uuid>,
    ValidatedJson(update): ValidatedJson<TagCreate>,
) -> ApiResult<Json<Tag>> {
    require_role(&auth.user, ALL_ROLES)?;

    Ok(Json(state.tags.update_tag(tag_uid, update).await?))
}

pub async fn delete_tag(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(tag_uid): Path<Uuid>,
) -> ApiResult<StatusCode> {
    require_role(&auth.user, ALL_ROLES)?;

    state.tags.delete_tag(tag_uid).await?;
    Ok(StatusCode::NO_CONTENT)
}

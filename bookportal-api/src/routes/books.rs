/// Book endpoints
///
/// Every route requires an access token and a verified account with the
/// `admin` or `user` role.
///
/// # Endpoints
///
/// - `GET    /api/v1/books` - All books, newest first
/// - `GET    /api/v1/books/user/:user_uid` - Books created by a user
/// - `POST   /api/v1/books` - Create a book owned by the caller
/// - `GET    /api/v1/books/:book_uid` - Book with its reviews and tags
/// - `PATCH  /api/v1/books/:book_uid` - Partial update
/// - `DELETE /api/v1/books/:book_uid` - Delete

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
    models::book::{Book, BookDetail, CreateBook, UpdateBook},
};
use uuid::Uuid;

pub async fn get_all_books(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Book>>> {
    require_role(&auth.user, ALL_ROLES)?;

    Ok(Json(state.books.get_all_books().await?))
}

pub async fn get_user_books(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(user_uid): Path<Uuid>,
) -> ApiResult<Json<Vec<Book>>> {
    require_role(&auth.user, ALL_ROLES)?;

    Ok(Json(state.books.get_user_books(user_uid).await?))
}

/// Create a book
///
/// # Endpoint
///
/// ```text
/// POST /api/v1/books
/// Authorization: Bearer <access token>
///
/// {
///   "title": "Dune",
///   "author": "Frank Herbert",
///   "publisher": "Chilton",
///   "published_date": "1965-08-01",
///   "page_count": 412,
///   "language": "English"
/// }
/// ```
///
/// # Response
///
/// `201 Created` with the book; `user_uid` is the caller.
pub async fn create_book(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    ValidatedJson(data): ValidatedJson<CreateBook>,
) -> ApiResult<(StatusCode, Json<Book>)> {
    require_role(&auth.user, ALL_ROLES)?;

    let book = state.books.create_book(auth.user_id(), data).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Book with its reviews and tags, `404 book_not_found` if missing
pub async fn get_book(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(book_uid): Path<Uuid>,
) -> ApiResult<Json<BookDetail>> {
    require_role(&auth.user, ALL_ROLES)?;

    Ok(Json(state.books.get_book_detail(book_uid).await?))
}

/// Update the fields present in the body
pub async fn update_book(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(book_uid): Path<Uuid>,
    ValidatedJson(update): ValidatedJson<UpdateBook>,
) -> ApiResult<Json<Book>> {
    require_role(&auth.user, ALL_ROLES)?;

    Ok(Json(state.books.update_book(book_uid, update).await?))
}

pub async fn delete_book(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(book_uid): Path<Uuid>,
) -> ApiResult<StatusCode> {
    require_role(&auth.user, ALL_ROLES)?;

    state.books.delete_book(book_uid).await?;
    Ok(StatusCode::NO_CONTENT)
}

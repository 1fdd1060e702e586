use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::book::{Book, BookDetail, CreateBook, UpdateBook};

/// Book catalogue operations
#[async_trait]
pub trait BookService: Send + Sync {
    /// All books, newest first
    async fn get_all_books(&self) -> AppResult<Vec<Book>>;

    /// Books added by one user, newest first
    async fn get_user_books(&self, user_uid: Uuid) -> AppResult<Vec<Book>>;

    async fn create_book(&self, user_uid: Uuid, data: CreateBook) -> AppResult<Book>;

    async fn get_book(&self, book_uid: Uuid) -> AppResult<Book>;

    async fn get_book_detail(&self, book_uid: Uuid) -> AppResult<BookDetail>;

    async fn update_book(&self, book_uid: Uuid, update: UpdateBook) -> AppResult<Book>;

    async fn delete_book(&self, book_uid: Uuid) -> AppResult<()>;
}

pub type BookServiceArc = Arc<dyn BookService>;

#[derive(Debug, Clone)]
pub struct PgBookService {
    pool: PgPool,
}

impl PgBookService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookService for PgBookService {
    async fn get_all_books(&self) -> AppResult<Vec<Book>> {
        Ok(Book::list(&self.pool).await?)
    }

    async fn get_user_books(&self, user_uid: Uuid) -> AppResult<Vec<Book>> {
        Ok(Book::list_by_user(&self.pool, user_uid).await?)
    }

    async fn create_book(&self, user_uid: Uuid, data: CreateBook) -> AppResult<Book> {
        let book = Book::create(&self.pool, user_uid, data).await?;
        tracing::info!(book_uid = %book.uid, user_id = %user_uid, "Book created");
        Ok(book)
    }

    async fn get_book(&self, book_uid: Uuid) -> AppResult<Book> {
        Book::find_by_uid(&self.pool, book_uid)
            .await?
            .ok_or(AppError::BookNotFound)
    }

    async fn get_book_detail(&self, book_uid: Uuid) -> AppResult<BookDetail> {
        let book = self.get_book(book_uid).await?;
        Ok(BookDetail::load(&self.pool, book).await?)
    }

    async fn update_book(&self, book_uid: Uuid, update: UpdateBook) -> AppResult<Book> {
        Book::update(&self.pool, book_uid, update)
            .await?
            .ok_or(AppError::BookNotFound)
    }

    async fn delete_book(&self, book_uid: Uuid) -> AppResult<()> {
        if !Book::delete(&self.pool, book_uid).await? {
            return Err(AppError::BookNotFound);
        }

        tracing::info!(%book_uid, "Book deleted");
        Ok(())
    }
}

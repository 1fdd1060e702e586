/// Database models for Book Portal
///
/// Each model owns its SQL. Services combine them into the operations the API
/// exposes.
///
/// # Models
///
/// - `user`: Accounts, roles, signup payload and profile view
/// - `book`: Books and the book detail view
/// - `review`: Reviews of books
/// - `tag`: Tags and their many-to-many link to books

pub mod book;
pub mod review;
pub mod tag;
pub mod user;

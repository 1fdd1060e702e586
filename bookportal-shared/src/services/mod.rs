/// Service layer consumed by the HTTP handlers
///
/// Each service is an `async_trait` so handlers depend on behavior rather than
/// on PostgreSQL. The `Pg*` implementations run against the database; tests
/// substitute in-memory fakes.
///
/// Services translate "row not found" and constraint violations into domain
/// errors (`BookNotFound`, `UserAlreadyExists`, ...). Everything else from
/// sqlx surfaces as `AppError::Database`.

pub mod book;
pub mod review;
pub mod tag;
pub mod user;

pub use book::{BookService, BookServiceArc, PgBookService};
pub use review::{PgReviewService, ReviewService, ReviewServiceArc};
pub use tag::{PgTagService, TagService, TagServiceArc};
pub use user::{PgUserService, UserService, UserServiceArc};

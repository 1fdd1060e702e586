/// Domain error taxonomy
///
/// Every failure a service or auth primitive can report is a variant of
/// [`AppError`]. Each variant carries a stable `error_code` that the API layer
/// puts in the JSON error envelope, so clients can branch on it without parsing
/// messages.
///
/// Infrastructure failures (database, Redis, mail, hashing) are wrapped so the
/// cause chain survives for logging, but they all report `server_error`.

use crate::auth::jwt::JwtError;
use crate::auth::password::PasswordError;
use crate::mail::MailError;
use crate::redis::RedisClientError;

/// Result alias used across the service layer
pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Token is invalid or expired")]
    InvalidToken,

    #[error("Token is invalid or has been revoked")]
    RevokedToken,

    #[error("Please provide a valid access token")]
    AccessTokenRequired,

    #[error("Please provide a valid refresh token")]
    RefreshTokenRequired,

    #[error("User with email already exists")]
    UserAlreadyExists,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("You do not have enough permissions to perform this action")]
    InsufficientPermission,

    #[error("Book not found")]
    BookNotFound,

    #[error("Review not found")]
    ReviewNotFound,

    #[error("Tag not found")]
    TagNotFound,

    #[error("Tag already exists")]
    TagAlreadyExists,

    #[error("User not found")]
    UserNotFound,

    #[error("Account not verified")]
    AccountNotVerified,

    #[error("Passwords do not match")]
    PasswordsDoNotMatch,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Token could not be produced (signing failure)
    #[error(transparent)]
    Token(JwtError),

    #[error(transparent)]
    Cache(#[from] RedisClientError),

    #[error(transparent)]
    Mail(#[from] MailError),
}

impl AppError {
    /// Machine-readable code sent to clients
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidToken => "invalid_token",
            AppError::RevokedToken => "token_revoked",
            AppError::AccessTokenRequired => "access_token_required",
            AppError::RefreshTokenRequired => "refresh_token_required",
            AppError::UserAlreadyExists => "user_exists",
            AppError::InvalidCredentials => "invalid_email_or_password",
            AppError::InsufficientPermission => "insufficient_permissions",
            AppError::BookNotFound => "book_not_found",
            AppError::ReviewNotFound => "review_not_found",
            AppError::TagNotFound => "tag_not_found",
            AppError::TagAlreadyExists => "tag_exists",
            AppError::UserNotFound => "user_not_found",
            AppError::AccountNotVerified => "account_not_verified",
            AppError::PasswordsDoNotMatch => "passwords_do_not_match",
            AppError::Database(_)
            | AppError::Password(_)
            | AppError::Token(_)
            | AppError::Cache(_)
            | AppError::Mail(_) => "server_error",
        }
    }

    /// Hint telling the client how to recover, when there is one
    pub fn resolution(&self) -> Option<&'static str> {
        match self {
            AppError::InvalidToken | AppError::RevokedToken => Some("Please get new token"),
            AppError::AccessTokenRequired => Some("Please get an access token"),
            AppError::AccountNotVerified => {
                Some("Please check your email for verification details")
            }
            _ => None,
        }
    }

    /// Whether the error is an infrastructure failure rather than a client mistake
    pub fn is_internal(&self) -> bool {
        self.error_code() == "server_error"
    }
}

impl From<JwtError> for AppError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::CreateError(_) => AppError::Token(err),
            _ => AppError::InvalidToken,
        }
    }
}

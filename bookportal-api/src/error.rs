/// Error handling for the API server
///
/// Every handler returns `ApiResult<T>`. Domain failures arrive as
/// [`AppError`] and are mapped to a status code here; the JSON body always has
/// the same envelope:
///
/// ```json
/// {
///   "message": "Book not found",
///   "error_code": "book_not_found",
///   "resolution": "...",      // only when there is one
///   "details": [...]          // only for validation errors
/// }
/// ```
///
/// [`register_all_errors`] extends the same envelope to unknown routes and to
/// handler panics.
///
/// # Example
///
/// ```
/// use bookportal_api::error::ApiResult;
/// use bookportal_shared::error::AppError;
/// use axum::Json;
///
/// async fn handler() -> ApiResult<Json<()>> {
///     Err(AppError::BookNotFound.into())
/// }
/// ```

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::{header, StatusCode},
    middleware::map_response,
    response::{IntoResponse, Response},
    Json, Router,
};
use bookportal_shared::{
    auth::{jwt::JwtError, password::PasswordError},
    error::AppError,
    redis::RedisClientError,
};
use serde::{Deserialize, Serialize};
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

const INTERNAL_MESSAGE: &str = "Oops! Something went wrong";

/// Unified API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A domain or infrastructure failure from the service layer
    #[error(transparent)]
    App(#[from] AppError),

    /// Unprocessable entity (422)
    #[error("Validation failed: {} errors", .0.len())]
    ValidationError(Vec<ValidationErrorDetail>),

    /// Bad request (400), e.g. malformed JSON or a disallowed host
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// No route matched (404)
    #[error("Not found")]
    NotFound,

    /// The path exists but not for this method (405)
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Internal server error (500); the message is logged, never returned
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub message: String,

    /// Machine-readable code (e.g., "book_not_found", "invalid_token")
    pub error_code: String,

    /// How the client can recover, when there is a known way
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,

    /// Validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

/// Status code for a service-layer error
pub fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::InvalidToken
        | AppError::RevokedToken
        | AppError::AccessTokenRequired
        | AppError::InsufficientPermission => StatusCode::UNAUTHORIZED,
        AppError::RefreshTokenRequired
        | AppError::UserAlreadyExists
        | AppError::TagAlreadyExists
        | AppError::AccountNotVerified => StatusCode::FORBIDDEN,
        AppError::InvalidCredentials | AppError::PasswordsDoNotMatch => StatusCode::BAD_REQUEST,
        AppError::BookNotFound
        | AppError::ReviewNotFound
        | AppError::TagNotFound
        | AppError::UserNotFound => StatusCode::NOT_FOUND,
        AppError::Database(_)
        | AppError::Password(_)
        | AppError::Token(_)
        | AppError::Cache(_)
        | AppError::Mail(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::App(err) => {
                let status = status_for(&err);
                let message = if err.is_internal() {
                    tracing::error!(error = %err, "Internal error");
                    INTERNAL_MESSAGE.to_string()
                } else {
                    err.to_string()
                };

                (
                    status,
                    ErrorResponse {
                        message,
                        error_code: err.error_code().to_string(),
                        resolution: err.resolution().map(str::to_string),
                        details: None,
                    },
                )
            }
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse {
                    message: "Request validation failed".to_string(),
                    error_code: "validation_error".to_string(),
                    resolution: None,
                    details: Some(errors),
                },
            ),
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    message,
                    error_code: "bad_request".to_string(),
                    resolution: None,
                    details: None,
                },
            ),
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    message: "Resource not found".to_string(),
                    error_code: "not_found".to_string(),
                    resolution: None,
                    details: None,
                },
            ),
            ApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                ErrorResponse {
                    message: "Method not allowed".to_string(),
                    error_code: "method_not_allowed".to_string(),
                    resolution: None,
                    details: None,
                },
            ),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        message: INTERNAL_MESSAGE.to_string(),
                        error_code: "server_error".to_string(),
                        resolution: None,
                        details: None,
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<ValidationErrorDetail> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({})", error.code)),
                })
            })
            .collect();
        details.sort_by(|a, b| a.field.cmp(&b.field));

        ApiError::ValidationError(details)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::UNPROCESSABLE_ENTITY {
            ApiError::ValidationError(vec![ValidationErrorDetail {
                field: "body".to_string(),
                message: rejection.body_text(),
            }])
        } else {
            ApiError::BadRequest(rejection.body_text())
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        ApiError::App(err.into())
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::App(err.into())
    }
}

impl From<RedisClientError> for ApiError {
    fn from(err: RedisClientError) -> Self {
        ApiError::App(err.into())
    }
}

/// Fallback handler for unmatched routes
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    ApiError::InternalError(format!("Handler panicked: {}", detail)).into_response()
}

/// Rewrites the router's bare 405 into the envelope, keeping `Allow`
async fn method_not_allowed(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }

    let allow = response.headers().get(header::ALLOW).cloned();
    let mut enveloped = ApiError::MethodNotAllowed.into_response();
    if let Some(allow) = allow {
        enveloped.headers_mut().insert(header::ALLOW, allow);
    }
    enveloped
}

/// Routes every error path through the JSON envelope
///
/// Installs a 404 fallback for unknown routes, wraps `405` answers for a
/// known path with the wrong method and turns handler panics into
/// `500 server_error` responses.
pub fn register_all_errors<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .fallback(not_found)
        .layer(map_response(method_not_allowed))
        .layer(CatchPanicLayer::custom(panic_response))
}

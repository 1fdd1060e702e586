/// Token authentication for request layers
///
/// The API server's auth layers call [`bearer_token`] to pull the token out of
/// the `Authorization` header and [`authenticate`] to turn it into trusted
/// claims. Authentication checks, in order:
///
/// 1. Signature, expiry and issuer
/// 2. Token type (an access token is refused where a refresh token is required
///    and vice versa)
/// 3. The `jti` is not on the blocklist (i.e. the user has not logged out)
///
/// After a successful check the layer loads the user and stores an
/// [`AuthContext`] in the request extensions.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use bookportal_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("Hello, {}!", auth.user.username)
/// }
/// ```

use axum::http::{header, HeaderMap};

use super::jwt::{validate_token_of_type, Claims, JwtError, TokenType};
use crate::error::{AppError, AppResult};
use crate::models::user::User;
use crate::redis::blocklist::TokenBlocklist;

/// Authentication context added to request extensions
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Validated token claims
    pub claims: Claims,

    /// The user the token was issued to, loaded fresh for this request
    pub user: User,
}

impl AuthContext {
    pub fn new(claims: Claims, user: User) -> Self {
        Self { claims, user }
    }

    /// Authenticated user uid
    pub fn user_id(&self) -> uuid::Uuid {
        self.user.uid
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header
///
/// Returns `None` when the header is missing, not valid UTF-8, not a bearer
/// credential, or empty.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Validates `token` as a token of type `expected` that has not been revoked
///
/// # Errors
///
/// - `AccessTokenRequired` / `RefreshTokenRequired` when the token has the other type
/// - `RevokedToken` when the token's `jti` is blocklisted
/// - `InvalidToken` for any other validation failure
/// - `Cache` when the blocklist cannot be reached
pub async fn authenticate(
    token: &str,
    secret: &str,
    expected: TokenType,
    blocklist: &dyn TokenBlocklist,
) -> AppResult<Claims> {
    let claims = validate_token_of_type(token, secret, expected).map_err(|e| match e {
        JwtError::WrongType { .. } => missing_token_error(expected),
        _ => AppError::InvalidToken,
    })?;

    if blocklist.contains(claims.jti).await? {
        tracing::debug!(jti = %claims.jti, "Rejected revoked token");
        return Err(AppError::RevokedToken);
    }

    Ok(claims)
}

/// The error reported when a token of type `expected` is absent or of the wrong type
pub fn missing_token_error(expected: TokenType) -> AppError {
    match expected {
        TokenType::Access => AppError::AccessTokenRequired,
        TokenType::Refresh => AppError::RefreshTokenRequired,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::create_token;
    use crate::models::user::Role;
    use crate::redis::blocklist::MemoryTokenBlocklist;
    use axum::http::HeaderValue;
    use std::time::Duration;
    use uuid::Uuid;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn token(token_type: TokenType) -> (Claims, String) {
        let claims = Claims::new(Uuid::new_v4(), "reader@example.com", Role::User, token_type);
        let token = create_token(&claims, SECRET).unwrap();
        (claims, token)
    }

    #[test]
    fn test_bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_none());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(bearer_token(&headers).is_none());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert!(bearer_token(&headers).is_none());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));
    }

    #[tokio::test]
    async fn test_authenticate_access_token() {
        let blocklist = MemoryTokenBlocklist::new();
        let (claims, token) = token(TokenType::Access);

        let validated = authenticate(&token, SECRET, TokenType::Access, &blocklist)
            .await
            .unwrap();
        assert_eq!(validated.jti, claims.jti);
    }

    #[tokio::test]
    async fn test_authenticate_wrong_type() {
        let blocklist = MemoryTokenBlocklist::new();

        let (_, refresh) = token(TokenType::Refresh);
        let err = authenticate(&refresh, SECRET, TokenType::Access, &blocklist)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AccessTokenRequired));

        let (_, access) = token(TokenType::Access);
        let err = authenticate(&access, SECRET, TokenType::Refresh, &blocklist)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::RefreshTokenRequired));
    }

    #[tokio::test]
    async fn test_authenticate_revoked_token() {
        let blocklist = MemoryTokenBlocklist::new();
        let (claims, token) = token(TokenType::Access);

        blocklist
            .add(claims.jti, Duration::from_secs(60))
            .await
            .unwrap();

        let err = authenticate(&token, SECRET, TokenType::Access, &blocklist)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::RevokedToken));
    }

    #[tokio::test]
    async fn test_authenticate_garbage() {
        let blocklist = MemoryTokenBlocklist::new();
        let err = authenticate("not-a-token", SECRET, TokenType::Access, &blocklist)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidToken));
    }
}

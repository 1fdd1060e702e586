/// Authentication endpoints
///
/// This module provides the account lifecycle:
/// - Signup with email verification
/// - Login and token refresh
/// - Profile and logout
/// - Password reset by email
///
/// # Endpoints
///
/// - `POST /api/v1/auth/signup` - Create an account
/// - `GET  /api/v1/auth/verify/:token` - Confirm the email address
/// - `POST /api/v1/auth/login` - Login and get tokens
/// - `GET  /api/v1/auth/refresh_token` - New access token from a refresh token
/// - `GET  /api/v1/auth/me` - Current user's profile
/// - `GET  /api/v1/auth/logout` - Revoke the current access token
/// - `POST /api/v1/auth/password-reset-request` - Email a reset link
/// - `POST /api/v1/auth/password-reset-confirm/:token` - Set a new password
/// - `POST /api/v1/auth/send_mail` - Send the welcome email

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{Path, ValidatedJson},
    routes::MessageResponse,
};
use axum::{extract::State, http::HeaderMap, http::StatusCode, Extension, Json};
use bookportal_shared::{
    auth::{
        authorization::{require_role, ALL_ROLES},
        jwt::{self, Claims, TokenType},
        middleware::{authenticate, bearer_token, missing_token_error, AuthContext},
        password,
        url_token::{self, TokenPurpose},
    },
    error::AppError,
    mail::{self, templates},
    models::user::{NewUser, UpdateUser, User, UserProfile},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;
use validator::{Validate, ValidateEmail, ValidationError};

/// Signup response
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub message: String,

    /// The created account (never includes the password hash)
    pub user: User,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Identity part of the login response
#[derive(Debug, Serialize)]
pub struct LoginUser {
    pub email: String,
    pub uid: Uuid,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,

    /// Access token (1h by default)
    pub access_token: String,

    /// Refresh token (2d by default)
    pub refresh_token: String,

    pub user: LoginUser,
}

/// Refresh token response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// New access token
    pub access_token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PasswordResetRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PasswordResetConfirm {
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_password: String,

    pub confirm_new_password: String,
}

/// Recipients of the welcome email
#[derive(Debug, Deserialize, Validate)]
pub struct EmailRequest {
    #[validate(
        length(min = 1, message = "At least one address is required"),
        custom(function = "validate_addresses")
    )]
    pub addresses: Vec<String>,
}

fn validate_addresses(addresses: &[String]) -> Result<(), ValidationError> {
    if addresses.iter().any(|address| !address.validate_email()) {
        return Err(ValidationError::new("email").with_message("Invalid email address".into()));
    }
    Ok(())
}

/// Issues a token of `token_type` for `user` with the configured lifetime
fn issue_token(state: &AppState, user: &User, token_type: TokenType) -> ApiResult<String> {
    let expires_in = match token_type {
        TokenType::Access => state.config.access_token_ttl(),
        TokenType::Refresh => state.config.refresh_token_ttl(),
    };

    let claims = Claims::with_expiration(user.uid, &user.email, user.role, token_type, expires_in);
    Ok(jwt::create_token(&claims, state.jwt_secret())?)
}

/// Create an account
///
/// # Endpoint
///
/// ```text
/// POST /api/v1/auth/signup
/// Content-Type: application/json
///
/// {
///   "username": "ada",
///   "email": "ada@example.com",
///   "first_name": "Ada",
///   "last_name": "Lovelace",
///   "password": "secret-pass"
/// }
/// ```
///
/// # Response
///
/// `201 Created` with `{"message": "...", "user": {...}}`. A verification
/// link is emailed in the background.
///
/// # Errors
///
/// - `403 user_exists`: Email already registered
/// - `422 validation_error`: Field rules violated
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(new_user): ValidatedJson<NewUser>,
) -> ApiResult<(StatusCode, Json<SignupResponse>)> {
    if state.users.user_exists(&new_user.email).await? {
        return Err(AppError::UserAlreadyExists.into());
    }

    let user = state.users.create_user(new_user).await?;

    let token = url_token::create_url_safe_token(
        &user.email,
        TokenPurpose::EmailVerification,
        state.jwt_secret(),
        url_token::default_lifetime(),
    )?;
    mail::send_in_background(
        state.mailer.clone(),
        templates::verification_email(&user.email, &state.config.api.domain, &token),
    );

    tracing::info!(user_id = %user.uid, "User signed up");

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "Account Created! Check email to verify your account".to_string(),
            user,
        }),
    ))
}

/// Confirm an email address from the emailed link
///
/// # Errors
///
/// - `401 invalid_token`: Bad, expired or wrong-purpose token
/// - `404 user_not_found`: The account no longer exists
pub async fn verify_account(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let email =
        url_token::decode_url_safe_token(&token, TokenPurpose::EmailVerification, state.jwt_secret())?;

    let user = state
        .users
        .get_user_by_email(&email)
        .await?
        .ok_or(AppError::UserNotFound)?;

    state
        .users
        .update_user(
            user.uid,
            UpdateUser {
                is_verified: Some(true),
                ..Default::default()
            },
        )
        .await?;

    tracing::info!(user_id = %user.uid, "Account verified");
    Ok(Json(MessageResponse::new("Account verified successfully")))
}

/// Login with email and password
///
/// Unknown email and wrong password produce the same error.
///
/// # Errors
///
/// - `400 invalid_email_or_password`
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = state
        .users
        .get_user_by_email(&req.email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let valid = password::verify_password_blocking(req.password, user.password_hash.clone()).await?;
    if !valid {
        tracing::debug!(user_id = %user.uid, "Login with wrong password");
        return Err(AppError::InvalidCredentials.into());
    }

    let access_token = issue_token(&state, &user, TokenType::Access)?;
    let refresh_token = issue_token(&state, &user, TokenType::Refresh)?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        access_token,
        refresh_token,
        user: LoginUser {
            email: user.email,
            uid: user.uid,
        },
    }))
}

/// Exchange a refresh token for a new access token
///
/// Reads the refresh token from `Authorization: Bearer <token>`.
///
/// # Errors
///
/// - `403 refresh_token_required`: Header missing or an access token was sent
/// - `401 token_revoked` / `401 invalid_token`
pub async fn refresh_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<RefreshResponse>> {
    let token =
        bearer_token(&headers).ok_or_else(|| missing_token_error(TokenType::Refresh))?;

    let claims = authenticate(
        token,
        state.jwt_secret(),
        TokenType::Refresh,
        state.blocklist.as_ref(),
    )
    .await?;

    let access_token =
        jwt::refresh_access_token(&claims, state.jwt_secret(), state.config.access_token_ttl())?;

    Ok(Json(RefreshResponse { access_token }))
}

/// Current user with their books and reviews
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<UserProfile>> {
    require_role(&auth.user, ALL_ROLES)?;

    let profile = state.users.get_user_profile(auth.user).await?;
    Ok(Json(profile))
}

/// Revoke the access token used for this request
///
/// The `jti` stays on the blocklist until the token would have expired anyway.
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<MessageResponse>> {
    let ttl = auth
        .claims
        .time_until_expiration()
        .and_then(|remaining| remaining.to_std().ok())
        .unwrap_or(Duration::from_secs(1));

    state.blocklist.add(auth.claims.jti, ttl).await?;

    tracing::info!(user_id = %auth.user_id(), "User logged out");
    Ok(Json(MessageResponse::new("Logged Out Successfully")))
}

/// Email a password reset link
///
/// Answers the same way whether or not an account uses the address.
pub async fn password_reset_request(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<PasswordResetRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let token = url_token::create_url_safe_token(
        &req.email,
        TokenPurpose::PasswordReset,
        state.jwt_secret(),
        url_token::default_lifetime(),
    )?;

    mail::send_in_background(
        state.mailer.clone(),
        templates::password_reset_email(&req.email, &state.config.api.domain, &token),
    );

    Ok(Json(MessageResponse::new(
        "Please check your email for instructions to reset your password",
    )))
}

/// Set a new password from the emailed link
///
/// # Errors
///
/// - `400 passwords_do_not_match`
/// - `401 invalid_token`
/// - `404 user_not_found`
pub async fn password_reset_confirm(
    State(state): State<AppState>,
    Path(token): Path<String>,
    ValidatedJson(req): ValidatedJson<PasswordResetConfirm>,
) -> ApiResult<Json<MessageResponse>> {
    if req.new_password != req.confirm_new_password {
        return Err(AppError::PasswordsDoNotMatch.into());
    }

    let email =
        url_token::decode_url_safe_token(&token, TokenPurpose::PasswordReset, state.jwt_secret())?;

    let user = state
        .users
        .get_user_by_email(&email)
        .await?
        .ok_or(AppError::UserNotFound)?;

    let password_hash = password::hash_password_blocking(req.new_password).await?;
    state
        .users
        .update_user(
            user.uid,
            UpdateUser {
                password_hash: Some(password_hash),
                ..Default::default()
            },
        )
        .await?;

    tracing::info!(user_id = %user.uid, "Password reset");
    Ok(Json(MessageResponse::new("Password reset Successfully")))
}

/// Send the welcome email to a list of addresses
pub async fn send_mail(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<EmailRequest>,
) -> ApiResult<Json<MessageResponse>> {
    mail::send_in_background(state.mailer.clone(), templates::welcome_email(req.addresses));

    Ok(Json(MessageResponse::new("Email sent successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_request_validation() {
        let ok = EmailRequest {
            addresses: vec!["a@example.com".to_string(), "b@example.com".to_string()],
        };
        assert!(ok.validate().is_ok());

        let empty = EmailRequest { addresses: vec![] };
        assert!(empty.validate().is_err());

        let bad = EmailRequest {
            addresses: vec!["a@example.com".to_string(), "nope".to_string()],
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_password_reset_confirm_requires_length() {
        let short = PasswordResetConfirm {
            new_password: "123".to_string(),
            confirm_new_password: "123".to_string(),
        };
        assert!(short.validate().is_err());
    }
}

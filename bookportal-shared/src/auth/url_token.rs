/// Signed, time-limited tokens embedded in emailed links
///
/// Account verification and password reset links carry the user's email in a
/// token signed with the JWT secret. Each token is bound to a [`TokenPurpose`]
/// so a verification link cannot be replayed as a password reset link.
///
/// JWTs only use the URL-safe base64 alphabet plus `.`, so the token can be
/// placed in a path segment as is.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::jwt::{JwtError, ISSUER};

/// Default lifetime of an emailed link
pub fn default_lifetime() -> Duration {
    Duration::hours(1)
}

/// What an emailed token may be used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    EmailVerification,
    PasswordReset,
}

#[derive(Debug, Serialize, Deserialize)]
struct UrlTokenClaims {
    email: String,
    purpose: TokenPurpose,
    iss: String,
    iat: i64,
    exp: i64,
}

/// Creates a token for `email` usable for `purpose` until `expires_in` elapses
pub fn create_url_safe_token(
    email: &str,
    purpose: TokenPurpose,
    secret: &str,
    expires_in: Duration,
) -> Result<String, JwtError> {
    let now = Utc::now();
    let claims = UrlTokenClaims {
        email: email.to_string(),
        purpose,
        iss: ISSUER.to_string(),
        iat: now.timestamp(),
        exp: (now + expires_in).timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Decodes a token and returns the email it was issued for
///
/// Fails when the signature is wrong, the token expired, or it was minted for
/// another purpose.
pub fn decode_url_safe_token(
    token: &str,
    purpose: TokenPurpose,
    secret: &str,
) -> Result<String, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.leeway = 0;

    let data = decode::<UrlTokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    if data.claims.purpose != purpose {
        return Err(JwtError::ValidationError(format!(
            "Token was issued for {:?}",
            data.claims.purpose
        )));
    }

    Ok(data.claims.email)
}

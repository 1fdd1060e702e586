/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Access/refresh token generation and validation
/// - [`url_token`]: Signed tokens for emailed verification and reset links
/// - [`middleware`]: Bearer extraction and token authentication for request layers
/// - [`authorization`]: Role checks on the authenticated user
///
/// # Example
///
/// ```no_run
/// use bookportal_shared::auth::password::{hash_password, verify_password};
/// use bookportal_shared::auth::jwt::{create_token, Claims, TokenType};
/// use bookportal_shared::models::user::Role;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new(Uuid::new_v4(), "reader@example.com", Role::User, TokenType::Access);
/// let token = create_token(&claims, "secret-key")?;
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod url_token;

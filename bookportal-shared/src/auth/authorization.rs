/// Role-based authorization
///
/// Protected routes declare which roles may call them. A user passes the check
/// when their account is verified and their role is in the allowed set.
/// Unverified accounts are rejected before the role is even looked at.
///
/// # Example
///
/// ```no_run
/// use bookportal_shared::auth::authorization::{require_role, ALL_ROLES};
/// use bookportal_shared::models::user::User;
///
/// # fn example(user: &User) -> bookportal_shared::error::AppResult<()> {
/// require_role(user, ALL_ROLES)?;
/// # Ok(())
/// # }
/// ```

use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::user::{Role, User};

/// Every role; used by routes open to any signed-in, verified user
pub const ALL_ROLES: &[Role] = &[Role::Admin, Role::User];

/// Administrator-only routes
pub const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// Checks that `user` is verified and holds one of `allowed`
///
/// # Errors
///
/// - `AccountNotVerified` if the email address was never confirmed
/// - `InsufficientPermission` if the role is not allowed
pub fn require_role(user: &User, allowed: &[Role]) -> AppResult<()> {
    if !user.is_verified {
        return Err(AppError::AccountNotVerified);
    }

    if !allowed.contains(&user.role) {
        return Err(AppError::InsufficientPermission);
    }

    Ok(())
}

/// Checks that `user_uid` is the owner recorded on a resource
///
/// Resources whose owner was deleted (`None`) belong to nobody.
pub fn require_ownership(user_uid: Uuid, owner_uid: Option<Uuid>) -> AppResult<()> {
    if owner_uid != Some(user_uid) {
        return Err(AppError::InsufficientPermission);
    }

    Ok(())
}

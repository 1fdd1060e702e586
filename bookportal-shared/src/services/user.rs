use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::password::hash_password_blocking;
use crate::db::is_unique_violation;
use crate::error::{AppError, AppResult};
use crate::models::book::Book;
use crate::models::review::Review;
use crate::models::user::{CreateUser, NewUser, Role, UpdateUser, User, UserProfile};

/// Account operations
#[async_trait]
pub trait UserService: Send + Sync {
    async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn user_exists(&self, email: &str) -> AppResult<bool>;

    /// Registers an unverified account with the `user` role
    ///
    /// # Errors
    ///
    /// `UserAlreadyExists` if the email is taken.
    async fn create_user(&self, new_user: NewUser) -> AppResult<User>;

    /// # Errors
    ///
    /// `UserNotFound` if there is no user `uid`.
    async fn update_user(&self, uid: Uuid, update: UpdateUser) -> AppResult<User>;

    async fn get_user_profile(&self, user: User) -> AppResult<UserProfile>;
}

pub type UserServiceArc = Arc<dyn UserService>;

#[derive(Debug, Clone)]
pub struct PgUserService {
    pool: PgPool,
}

impl PgUserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserService for PgUserService {
    async fn get_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }

    async fn user_exists(&self, email: &str) -> AppResult<bool> {
        Ok(User::exists_by_email(&self.pool, email).await?)
    }

    async fn create_user(&self, new_user: NewUser) -> AppResult<User> {
        let password_hash = hash_password_blocking(new_user.password).await?;

        let data = CreateUser {
            username: new_user.username,
            email: new_user.email,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            password_hash,
            role: Role::User,
        };

        let user = User::create(&self.pool, data).await.map_err(|e| {
            if is_unique_violation(&e) {
                AppError::UserAlreadyExists
            } else {
                AppError::Database(e)
            }
        })?;

        tracing::info!(user_id = %user.uid, "User created");
        Ok(user)
    }

    async fn update_user(&self, uid: Uuid, update: UpdateUser) -> AppResult<User> {
        User::update(&self.pool, uid, update)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    async fn get_user_profile(&self, user: User) -> AppResult<UserProfile> {
        let books = Book::list_by_user(&self.pool, user.uid).await?;
        let reviews = Review::list_by_user(&self.pool, user.uid).await?;

        Ok(UserProfile {
            user,
            books,
            reviews,
        })
    }
}

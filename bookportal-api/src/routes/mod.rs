/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Root liveness message and health check
/// - `auth`: Signup, verification, login, tokens and password reset
/// - `books`: Book CRUD
/// - `reviews`: Book reviews
/// - `tags`: Tags and book tagging

pub mod auth;
pub mod books;
pub mod health;
pub mod reviews;
pub mod tags;

use serde::Serialize;

/// `{"message": ...}` body returned by endpoints with nothing else to say
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

//! # Book Portal Shared Library
//!
//! This crate contains the domain types, persistence and service layer used by
//! the Book Portal API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and their queries
//! - `services`: Service traits consumed by route handlers, with PostgreSQL implementations
//! - `auth`: Password hashing, JWTs, URL-safe tokens and role checks
//! - `db`: Connection pool and migrations
//! - `redis`: Redis client and the token blocklist
//! - `mail`: Outgoing email delivery
//! - `error`: Domain error taxonomy

pub mod auth;
pub mod db;
pub mod error;
pub mod mail;
pub mod models;
pub mod redis;
pub mod services;

/// Current version of the Book Portal shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

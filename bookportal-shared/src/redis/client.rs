/// Redis client with automatic reconnection
///
/// Wraps a `redis::aio::ConnectionManager`, which reconnects transparently
/// after connection loss. The manager is cheap to clone; every command works on
/// its own clone.
///
/// Settings come from the API server's configuration (`REDIS_URL`,
/// `REDIS_COMMAND_TIMEOUT_SECS`).

use redis::aio::ConnectionManager;
use redis::{Client, RedisError};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors from Redis operations
#[derive(Error, Debug)]
pub enum RedisClientError {
    #[error("Redis connection error: {0}")]
    ConnectionError(String),

    #[error("Redis command error: {0}")]
    CommandError(String),

    #[error("Redis configuration error: {0}")]
    ConfigError(String),

    #[error("Redis command timed out")]
    Timeout,
}

impl From<RedisError> for RedisClientError {
    fn from(err: RedisError) -> Self {
        match err.kind() {
            redis::ErrorKind::IoError => {
                RedisClientError::ConnectionError(format!("IO error: {}", err))
            }
            _ => RedisClientError::CommandError(err.to_string()),
        }
    }
}

/// Redis connection settings
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,

    pub command_timeout_secs: u64,
}

/// Shared Redis client
#[derive(Clone)]
pub struct RedisClient {
    manager: ConnectionManager,
    config: Arc<RedisConfig>,
}

impl RedisClient {
    /// Connects to Redis
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the first connection fails.
    pub async fn new(config: RedisConfig) -> Result<Self, RedisClientError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| RedisClientError::ConfigError(format!("Invalid Redis URL: {}", e)))?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            RedisClientError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        tracing::info!(url = %sanitize_url(&config.url), "Redis client connected");

        Ok(Self {
            manager,
            config: Arc::new(config),
        })
    }

    /// Returns a connection handle for issuing commands
    pub fn connection(&self) -> ConnectionManager {
        self.manager.clone()
    }

    /// Per-command timeout
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.config.command_timeout_secs)
    }

    /// Sends `PING` and reports whether `PONG` came back
    pub async fn ping(&self) -> Result<bool, RedisClientError> {
        let mut conn = self.connection();

        let pong: String = tokio::time::timeout(
            self.command_timeout(),
            redis::cmd("PING").query_async(&mut conn),
        )
        .await
        .map_err(|_| RedisClientError::Timeout)??;

        Ok(pong == "PONG")
    }
}

/// Hides credentials in a Redis URL before it is logged
fn sanitize_url(url: &str) -> String {
    if let (Some(at_pos), Some(scheme_end)) = (url.find('@'), url.find("://")) {
        let scheme = &url[..scheme_end + 3];
        let host = &url[at_pos + 1..];
        return format!("{}***:***@{}", scheme, host);
    }
    url.to_string()
}

/// Revoked-token blocklist
///
/// Logging out revokes the presented access token by storing its `jti` until
/// the moment the token would have expired anyway. After that the entry is
/// useless and disappears on its own.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::client::{RedisClient, RedisClientError};

/// Key prefix for blocklist entries
const KEY_PREFIX: &str = "blocklist";

/// Storage for revoked token IDs
#[async_trait]
pub trait TokenBlocklist: Send + Sync {
    /// Revokes `jti` for `ttl`
    async fn add(&self, jti: Uuid, ttl: Duration) -> Result<(), RedisClientError>;

    /// Whether `jti` is currently revoked
    async fn contains(&self, jti: Uuid) -> Result<bool, RedisClientError>;
}

/// Redis-backed blocklist
#[derive(Clone)]
pub struct RedisTokenBlocklist {
    client: RedisClient,
}

impl RedisTokenBlocklist {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    fn key(jti: Uuid) -> String {
        format!("{}:{}", KEY_PREFIX, jti)
    }
}

#[async_trait]
impl TokenBlocklist for RedisTokenBlocklist {
    async fn add(&self, jti: Uuid, ttl: Duration) -> Result<(), RedisClientError> {
        let mut conn = self.client.connection();
        // EX 0 is rejected by Redis
        let seconds = ttl.as_secs().max(1);

        let _: () = tokio::time::timeout(
            self.client.command_timeout(),
            redis::cmd("SET")
                .arg(Self::key(jti))
                .arg("")
                .arg("EX")
                .arg(seconds)
                .query_async(&mut conn),
        )
        .await
        .map_err(|_| RedisClientError::Timeout)??;

        tracing::debug!(%jti, ttl_secs = seconds, "Token added to blocklist");
        Ok(())
    }

    async fn contains(&self, jti: Uuid) -> Result<bool, RedisClientError> {
        let mut conn = self.client.connection();

        let exists: bool = tokio::time::timeout(
            self.client.command_timeout(),
            redis::cmd("EXISTS").arg(Self::key(jti)).query_async(&mut conn),
        )
        .await
        .map_err(|_| RedisClientError::Timeout)??;

        Ok(exists)
    }
}

/// In-process blocklist for tests and single-instance development setups
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenBlocklist {
    entries: Arc<RwLock<HashMap<Uuid, Instant>>>,
}

impl MemoryTokenBlocklist {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenBlocklist for MemoryTokenBlocklist {
    async fn add(&self, jti: Uuid, ttl: Duration) -> Result<(), RedisClientError> {
        let mut entries = self.entries.write().await;
        let now = Instant::now();
        entries.retain(|_, expires_at| *expires_at > now);
        entries.insert(jti, now + ttl);
        Ok(())
    }

    async fn contains(&self, jti: Uuid) -> Result<bool, RedisClientError> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(&jti)
            .is_some_and(|expires_at| *expires_at > Instant::now()))
    }
}

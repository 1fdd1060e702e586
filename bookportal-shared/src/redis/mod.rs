/// Redis integration
///
/// Redis holds short-lived auth state: the blocklist of revoked token IDs.
/// Entries expire on their own once the token they revoke would have expired.
///
/// ```text
/// GET /logout ──SET blocklist:{jti} "" EX ttl──> Redis
/// any protected request ──EXISTS blocklist:{jti}──> Redis
/// ```
///
/// # Example
///
/// ```no_run
/// use bookportal_shared::redis::{RedisClient, RedisConfig, RedisTokenBlocklist};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = RedisClient::new(RedisConfig {
///     url: "redis://localhost:6379".to_string(),
///     command_timeout_secs: 5,
/// })
/// .await?;
/// let blocklist = RedisTokenBlocklist::new(client);
/// # Ok(())
/// # }
/// ```

pub mod blocklist;
pub mod client;

pub use blocklist::{MemoryTokenBlocklist, RedisTokenBlocklist, TokenBlocklist};
pub use client::{RedisClient, RedisClientError, RedisConfig};

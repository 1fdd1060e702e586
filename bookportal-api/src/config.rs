/// Configuration management for the API server
///
/// This module loads configuration from environment variables (and a `.env`
/// file when present) into a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8000)
/// - `API_CORS_ORIGINS`: Comma-separated allowed origins, `*` for any (default: *)
/// - `API_ALLOWED_HOSTS`: Comma-separated accepted `Host` values, `*` for any
///   (default: localhost,127.0.0.1)
/// - `DOMAIN`: Public host used in emailed links (default: localhost:8000)
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `RUN_MIGRATIONS`: Apply migrations on startup (default: true)
/// - `JWT_SECRET`: Secret key for JWT signing, at least 32 characters (required)
/// - `ACCESS_TOKEN_EXPIRY_SECS`: Access token lifetime (default: 3600)
/// - `REFRESH_TOKEN_EXPIRY_SECS`: Refresh token lifetime (default: 172800)
/// - `REDIS_URL`: Redis connection string for the token blocklist (required)
/// - `REDIS_COMMAND_TIMEOUT_SECS`: Per-command Redis timeout (default: 5)
/// - `MAIL_PROVIDER`: `log` or `http` (default: log)
/// - `MAIL_FROM`: Sender address (default: noreply@bookportal.local)
/// - `MAIL_API_URL` / `MAIL_API_TOKEN`: Email API endpoint and token (required for `http`)
/// - `MAIL_TIMEOUT_MS`: Email API request timeout (default: 10000)
/// - `RUST_LOG`: Log filter (default: bookportal_api=debug,tower_http=debug)
///
/// # Example
///
/// ```no_run
/// use bookportal_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,

    pub database: DatabaseConfig,

    pub jwt: JwtConfig,

    pub redis: RedisConfig,

    pub mail: MailConfig,
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub host: String,

    pub port: u16,

    /// Allowed CORS origins; `*` allows any origin
    pub cors_origins: Vec<String>,

    /// Accepted `Host` header values; `*` disables the check
    pub allowed_hosts: Vec<String>,

    /// Host (and port) placed in links sent by email
    pub domain: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,

    /// Whether pending migrations run at startup
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for JWT signing
    ///
    /// Must be kept secret and be at least 32 bytes.
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,

    pub access_token_expiry_secs: i64,

    pub refresh_token_expiry_secs: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    pub url: String,

    pub command_timeout_secs: u64,
}

/// How outgoing email is delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailProvider {
    /// Write emails to the log
    Log,

    /// POST to an email HTTP API
    Http,
}

impl FromStr for MailProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "log" => Ok(MailProvider::Log),
            "http" => Ok(MailProvider::Http),
            other => anyhow::bail!("Unknown MAIL_PROVIDER '{}', expected 'log' or 'http'", other),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    pub provider: MailProvider,

    pub from: String,

    pub api_url: String,

    pub api_token: String,

    pub timeout_ms: u64,
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value does not
    /// parse.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let api = ApiConfig {
            host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env_or("API_PORT", "8000").parse::<u16>()?,
            cors_origins: parse_list(&env_or("API_CORS_ORIGINS", "*")),
            allowed_hosts: parse_list(&env_or("API_ALLOWED_HOSTS", "localhost,127.0.0.1")),
            domain: env_or("DOMAIN", "localhost:8000"),
        };

        let database = DatabaseConfig {
            url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?,
            max_connections: env_or("DATABASE_MAX_CONNECTIONS", "10").parse::<u32>()?,
            run_migrations: env_or("RUN_MIGRATIONS", "true").parse::<bool>()?,
        };

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let jwt = JwtConfig {
            secret: jwt_secret,
            access_token_expiry_secs: env_or("ACCESS_TOKEN_EXPIRY_SECS", "3600").parse()?,
            refresh_token_expiry_secs: env_or("REFRESH_TOKEN_EXPIRY_SECS", "172800").parse()?,
        };

        let redis = RedisConfig {
            url: env::var("REDIS_URL")
                .map_err(|_| anyhow::anyhow!("REDIS_URL environment variable is required"))?,
            command_timeout_secs: env_or("REDIS_COMMAND_TIMEOUT_SECS", "5").parse()?,
        };

        let mail = MailConfig {
            provider: env_or("MAIL_PROVIDER", "log").parse()?,
            from: env_or("MAIL_FROM", "noreply@bookportal.local"),
            api_url: env_or("MAIL_API_URL", ""),
            api_token: env_or("MAIL_API_TOKEN", ""),
            timeout_ms: env_or("MAIL_TIMEOUT_MS", "10000").parse()?,
        };

        if mail.provider == MailProvider::Http && mail.api_url.is_empty() {
            anyhow::bail!("MAIL_API_URL is required when MAIL_PROVIDER=http");
        }

        Ok(Self {
            api,
            database,
            jwt,
            redis,
            mail,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    pub fn access_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.jwt.access_token_expiry_secs)
    }

    pub fn refresh_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.jwt.refresh_token_expiry_secs)
    }

    /// Connection settings for the blocklist's Redis client
    pub fn redis_client_config(&self) -> bookportal_shared::redis::RedisConfig {
        bookportal_shared::redis::RedisConfig {
            url: self.redis.url.clone(),
            command_timeout_secs: self.redis.command_timeout_secs,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Splits a comma-separated list, dropping blanks
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

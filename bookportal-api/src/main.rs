//! # Book Portal API Server
//!
//! REST backend for the Book Portal book-review service: accounts, books,
//! reviews and tags under `/api/v1`.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://... REDIS_URL=redis://... JWT_SECRET=... \
//!     cargo run -p bookportal-api
//! ```

use anyhow::Context;
use bookportal_api::{
    app::{build_router, AppState},
    config::{Config, MailProvider},
};
use bookportal_shared::{
    db::{migrations, pool},
    mail::{HttpMailer, HttpMailerConfig, LogMailer, Mailer},
    redis::{RedisClient, RedisTokenBlocklist},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    tracing::info!(
        "Book Portal API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env().context("Failed to load configuration")?;

    if config.database.run_migrations {
        migrations::ensure_database_exists(&config.database.url)
            .await
            .context("Failed to create database")?;
    }

    let db = pool::create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await
    .context("Failed to connect to PostgreSQL")?;

    let stats = pool::get_pool_stats(&db);
    tracing::info!(
        connections = stats.total_connections,
        idle = stats.idle_connections,
        "Database pool ready"
    );

    if config.database.run_migrations {
        migrations::run_migrations(&db)
            .await
            .context("Failed to run database migrations")?;
    }

    let status = migrations::get_migration_status(&db).await?;
    if !status.is_up_to_date {
        tracing::warn!(
            applied = status.applied_migrations,
            embedded = migrations::embedded_migration_count(),
            "Database schema is behind this build; set RUN_MIGRATIONS=true"
        );
    }

    let redis = RedisClient::new(config.redis_client_config())
        .await
        .context("Failed to connect to Redis")?;
    let blocklist = Arc::new(RedisTokenBlocklist::new(redis));

    let mailer: Arc<dyn Mailer> = match config.mail.provider {
        MailProvider::Log => Arc::new(LogMailer),
        MailProvider::Http => Arc::new(HttpMailer::new(HttpMailerConfig {
            api_url: config.mail.api_url.clone(),
            api_token: config.mail.api_token.clone(),
            sender: config.mail.from.clone(),
            timeout_ms: config.mail.timeout_ms,
        })?),
    };

    let bind_address = config.bind_address();
    let state = AppState::new(db.clone(), config, blocklist, mailer);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool::close_pool(db).await;
    tracing::info!("Server stopped");

    Ok(())
}

/// Logs go to stdout; `LOG_FORMAT=json` switches to one JSON object per line
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bookportal_api=debug,bookportal_shared=debug,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT").map(|v| v == "json").unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Resolves on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections...");
}

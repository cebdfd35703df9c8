//! VibeNest API server binary.

use std::time::Duration;

use clap::Parser;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use vibenest_api::config::{ApiConfig, DEFAULT_BIND_ADDR};
use vibenest_core::auth::handoff;
use vibenest_core::db::{DEFAULT_DATABASE_URL, PoolSettings};

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "vibenest_server", about = "VibeNest API server")]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "BIND_ADDR", default_value = DEFAULT_BIND_ADDR)]
    bind_addr: String,

    /// PostgreSQL connection URL.
    #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    database_url: String,

    /// Maximum number of database connections in the pool.
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 10)]
    max_connections: u32,

    /// Seconds between sweeps of expired mobile handoff tokens (0 disables).
    #[arg(long, env = "HANDOFF_SWEEP_SECS", default_value_t = 300)]
    handoff_sweep_secs: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new("info,vibenest_api=debug,vibenest_core=debug")
                }),
        )
        .init();

    let args = Args::parse();

    info!(bind_addr = %args.bind_addr, "starting vibenest_server");

    info!(max_connections = args.max_connections, "configuring connection pool");
    let pool = PoolSettings::new(args.database_url.clone())
        .max_connections(args.max_connections)
        .connect()
        .await?;

    let config = ApiConfig {
        bind_addr: args.bind_addr,
        database_url: args.database_url,
        ..ApiConfig::from_env()
    };

    let shutdown = CancellationToken::new();

    let sweeper = (args.handoff_sweep_secs > 0).then(|| {
        tokio::spawn(sweep_handoffs(
            pool.clone(),
            Duration::from_secs(args.handoff_sweep_secs),
            shutdown.clone(),
        ))
    });

    let state = vibenest_api::AppState {
        pool,
        config: config.clone(),
    };
    let app = vibenest_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "REST API listening");

    let api_result = axum::serve(listener, app)
        .with_graceful_shutdown({
            let shutdown = shutdown.clone();
            async move {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => info!("interrupt received, shutting down"),
                    _ = shutdown.cancelled() => {}
                }
            }
        })
        .await;

    // When the REST API exits, also stop the sweeper.
    shutdown.cancel();
    if let Some(handle) = sweeper {
        let _ = handle.await;
    }

    api_result?;

    Ok(())
}

/// Periodically delete expired handoff rows until `shutdown` fires.
async fn sweep_handoffs(pool: PgPool, every: Duration, shutdown: CancellationToken) {
    let mut ticker = tokio::time::interval(every);
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => match handoff::purge_expired(&pool).await {
                Ok(0) => {}
                Ok(n) => info!(purged = n, "expired mobile handoffs removed"),
                Err(e) => warn!("handoff sweep failed: {e}"),
            },
        }
    }
}

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinedex_api::config::{DbConfig, ServerConfig};
use cinedex_api::router::build_app_router;
use cinedex_api::state::AppState;
use cinedex_db::store::PgMovieStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    // LOG_FORMAT=json switches to one JSON object per line.
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cinedex_api=debug,cinedex_db=debug,tower_http=debug".into()),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    let db_config = DbConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        environment = %config.environment,
        "Loaded server configuration"
    );

    // --- Database ---
    let pool = cinedex_db::create_pool(&db_config.url, &db_config.pool)
        .await
        .expect("Failed to connect to database");
    tracing::info!(
        max_connections = db_config.pool.max_connections,
        "Database connection pool created"
    );

    cinedex_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    cinedex_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        movies: Arc::new(PgMovieStore::new(pool.clone())),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    let shutdown = Arc::new(Notify::new());
    let server = {
        let shutdown = Arc::clone(&shutdown);
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { shutdown.notified().await })
                .await
        })
    };

    shutdown_signal().await;
    shutdown.notify_one();

    // --- Drain in-flight requests ---
    let drain = Duration::from_secs(config.shutdown_timeout_secs);
    match tokio::time::timeout(drain, server).await {
        Ok(Ok(Ok(()))) => tracing::info!("Server stopped accepting connections"),
        Ok(Ok(Err(e))) => tracing::error!(error = %e, "Server error"),
        Ok(Err(e)) => tracing::error!(error = %e, "Server task failed"),
        Err(_) => tracing::warn!(
            timeout_secs = config.shutdown_timeout_secs,
            "In-flight requests did not finish before the shutdown timeout"
        ),
    }

    pool.close().await;
    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}

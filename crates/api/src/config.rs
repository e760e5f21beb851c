use std::time::Duration;

use cinedex_db::PoolConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `4000`).
    pub port: u16,
    /// Deployment environment reported by `/health` (default: `development`).
    pub environment: String,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long in-flight requests may drain after a shutdown signal (default: `30`).
    pub shutdown_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `4000`                     |
    /// | `APP_ENV`              | `development`              |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "4000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let environment = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            environment,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
        }
    }
}

/// Database connection settings.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub pool: PoolConfig,
}

impl DbConfig {
    /// Load database settings from environment variables.
    ///
    /// | Env Var                | Default     |
    /// |------------------------|-------------|
    /// | `DATABASE_URL`         | (required)  |
    /// | `DB_MAX_CONNECTIONS`   | `25`        |
    /// | `DB_MIN_CONNECTIONS`   | `0`         |
    /// | `DB_IDLE_TIMEOUT_SECS` | `900`       |
    pub fn from_env() -> Self {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let defaults = PoolConfig::default();

        let max_connections: u32 = std::env::var("DB_MAX_CONNECTIONS")
            .map(|v| v.parse().expect("DB_MAX_CONNECTIONS must be a valid u32"))
            .unwrap_or(defaults.max_connections);

        let min_connections: u32 = std::env::var("DB_MIN_CONNECTIONS")
            .map(|v| v.parse().expect("DB_MIN_CONNECTIONS must be a valid u32"))
            .unwrap_or(defaults.min_connections);

        let idle_timeout = std::env::var("DB_IDLE_TIMEOUT_SECS")
            .map(|v| {
                Duration::from_secs(v.parse().expect("DB_IDLE_TIMEOUT_SECS must be a valid u64"))
            })
            .unwrap_or(defaults.idle_timeout);

        Self {
            url,
            pool: PoolConfig {
                max_connections,
                min_connections,
                idle_timeout,
                ..defaults
            },
        }
    }
}

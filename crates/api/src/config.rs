use presensi_core::countdown::DEFAULT_LOW_TIME_SECS;
use presensi_core::token::{TokenPolicy, DEFAULT_TTL_SECS};

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Lifetime of newly issued QR tokens.
    pub token_policy: TokenPolicy,
    /// Remaining seconds at which a QR countdown enters the low band.
    pub low_time_secs: i64,
    /// PostgreSQL URL. Without it the server keeps state in memory.
    pub database_url: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `QR_TOKEN_TTL_SECS`    | `120`                      |
    /// | `QR_LOW_TIME_SECS`     | `30`                       |
    /// | `DATABASE_URL`         | unset (in-memory store)    |
    ///
    /// Panics on unparsable values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let ttl_secs: i64 = std::env::var("QR_TOKEN_TTL_SECS")
            .unwrap_or_else(|_| DEFAULT_TTL_SECS.to_string())
            .parse()
            .expect("QR_TOKEN_TTL_SECS must be a valid integer");
        let token_policy =
            TokenPolicy::new(ttl_secs).unwrap_or_else(|e| panic!("QR_TOKEN_TTL_SECS: {e}"));

        let low_time_secs: i64 = std::env::var("QR_LOW_TIME_SECS")
            .unwrap_or_else(|_| DEFAULT_LOW_TIME_SECS.to_string())
            .parse()
            .expect("QR_LOW_TIME_SECS must be a valid integer");

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            token_policy,
            low_time_secs,
            database_url,
        }
    }
}

/// Split a comma-separated origin list, dropping blanks.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

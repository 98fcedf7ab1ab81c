use std::time::Duration;

use vitrine_core::preview::DEFAULT_TTL_SECS;
use vitrine_sites::SiteServiceConfig;

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
    /// Time allowed for draining the pool after the listener stops (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Default preview grant lifetime in seconds (default: `86400`).
    pub preview_ttl_secs: i64,
    /// Base URL of the refinement engine. Refinement is disabled when unset.
    pub refinement_url: Option<String>,
    /// Budget for one refinement engine call in seconds (default: `60`).
    pub refinement_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                 |
    /// |---------------------------|-------------------------|
    /// | `HOST`                    | `0.0.0.0`               |
    /// | `PORT`                    | `3000`                  |
    /// | `CORS_ORIGINS`            | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`   | `30`                    |
    /// | `PREVIEW_TTL_SECS`        | `86400`                 |
    /// | `REFINEMENT_URL`          | unset                   |
    /// | `REFINEMENT_TIMEOUT_SECS` | `60`                    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

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

        let preview_ttl_secs: i64 = std::env::var("PREVIEW_TTL_SECS")
            .unwrap_or_else(|_| DEFAULT_TTL_SECS.to_string())
            .parse()
            .expect("PREVIEW_TTL_SECS must be a valid i64");

        let refinement_url = std::env::var("REFINEMENT_URL")
            .ok()
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());

        let refinement_timeout_secs: u64 = std::env::var("REFINEMENT_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("REFINEMENT_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            preview_ttl_secs,
            refinement_url,
            refinement_timeout_secs,
        }
    }

    /// The refinement call budget as a [`Duration`].
    pub fn refinement_timeout(&self) -> Duration {
        Duration::from_secs(self.refinement_timeout_secs)
    }

    /// Service-layer settings derived from this configuration.
    pub fn site_service_config(&self) -> SiteServiceConfig {
        SiteServiceConfig {
            preview_ttl_secs: self.preview_ttl_secs,
            refinement_timeout: self.refinement_timeout(),
        }
    }
}

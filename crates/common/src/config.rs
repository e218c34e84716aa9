//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config. Provider settings live in
//! `soudan_llm::LlmConfig`.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// Default bearer token lifetime
const DEFAULT_JWT_TTL_HOURS: i64 = 24;

/// Default HTTP port
const DEFAULT_PORT: u16 = 3000;

#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database connection URL (PostgreSQL)
    pub database_url: String,

    /// HS256 signing secret for bearer tokens
    pub jwt_secret: String,
    /// Token lifetime in hours
    pub jwt_ttl_hours: i64,

    /// Allowed browser origin for CORS; permissive when unset
    pub cors_allowed_origin: Option<String>,
    /// Apply embedded migrations at startup
    pub run_migrations: bool,

    /// Runtime configuration
    pub rust_log: String,
    pub log_format: String,
    pub port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_ttl_hours", &self.jwt_ttl_hours)
            .field("cors_allowed_origin", &self.cors_allowed_origin)
            .field("run_migrations", &self.run_migrations)
            .field("rust_log", &self.rust_log)
            .field("log_format", &self.log_format)
            .field("port", &self.port)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow::anyhow!("{} is required", key))
        };

        let jwt_ttl_hours = match lookup("JWT_TTL_HOURS") {
            Some(raw) => {
                let hours: i64 = raw
                    .parse()
                    .map_err(|_| anyhow::anyhow!("JWT_TTL_HOURS must be an integer"))?;
                if hours < 1 {
                    anyhow::bail!("JWT_TTL_HOURS must be at least 1");
                }
                hours
            }
            None => DEFAULT_JWT_TTL_HOURS,
        };

        let config = Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_ttl_hours,
            cors_allowed_origin: lookup("CORS_ALLOWED_ORIGIN").filter(|v| !v.is_empty()),
            run_migrations: lookup("RUN_MIGRATIONS")
                .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "no"))
                .unwrap_or(true),
            rust_log: lookup("RUST_LOG")
                .unwrap_or_else(|| "soudan=info,tower_http=info".to_string()),
            log_format: lookup("LOG_FORMAT").unwrap_or_else(|| "pretty".to_string()),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
        };

        Ok(config)
    }
}

//! Server configuration read from the environment.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `DATABASE_URL` | `postgres://localhost/recollect` |
//! | `DATABASE_MAX_CONNECTIONS` | 10 |
//! | `DATABASE_ACQUIRE_TIMEOUT_SECS` | 10 |
//! | `HOST` | `0.0.0.0` |
//! | `PORT` | 8080 |
//! | `RATE_LIMIT_ENABLED` | `true` |
//! | `RATE_LIMIT_REQUESTS` | 100 |
//! | `RATE_LIMIT_PERIOD_SECS` | 60 |
//! | `ALLOWED_ORIGINS` | (none) |
//! | `REQUEST_TIMEOUT_SECS` | 30 |
//! | `MAX_BODY_SIZE_BYTES` | 65536 |
//! | `PREFERRED_OG_HOSTS` | (none, added to the built-in list) |

use std::time::Duration;

use recollect_core::defaults::{
    MAX_BODY_SIZE_BYTES, RATE_LIMIT_PERIOD_SECS, RATE_LIMIT_REQUESTS, REQUEST_TIMEOUT_SECS,
    SERVER_PORT,
};
use recollect_core::{Error, Result};
use recollect_db::pool::{DEFAULT_ACQUIRE_TIMEOUT_SECS, DEFAULT_MAX_CONNECTIONS};

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    /// Bounds how long a store lookup waits for a pooled connection.
    pub database_acquire_timeout: Duration,
    pub host: String,
    pub port: u16,
    pub rate_limit_enabled: bool,
    pub rate_limit_requests: u32,
    pub rate_limit_period: Duration,
    /// Origins allowed by CORS; empty disables cross-origin access.
    pub allowed_origins: Vec<String>,
    pub request_timeout: Duration,
    pub max_body_size: usize,
    pub extra_preferred_hosts: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            database_url: "postgres://localhost/recollect".to_string(),
            database_max_connections: DEFAULT_MAX_CONNECTIONS,
            database_acquire_timeout: Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS),
            host: "0.0.0.0".to_string(),
            port: SERVER_PORT,
            rate_limit_enabled: true,
            rate_limit_requests: RATE_LIMIT_REQUESTS as u32,
            rate_limit_period: Duration::from_secs(RATE_LIMIT_PERIOD_SECS),
            allowed_origins: Vec::new(),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            max_body_size: MAX_BODY_SIZE_BYTES,
            extra_preferred_hosts: Vec::new(),
        }
    }
}

impl ApiConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    ///
    /// Unset or blank variables keep their defaults. A set but malformed
    /// numeric value is an error rather than a silent default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let rate_limit_requests: u32 =
            parse_or(&get, "RATE_LIMIT_REQUESTS", defaults.rate_limit_requests)?;
        let rate_limit_period_secs: u64 = parse_or(
            &get,
            "RATE_LIMIT_PERIOD_SECS",
            defaults.rate_limit_period.as_secs(),
        )?;
        if rate_limit_requests == 0 || rate_limit_period_secs == 0 {
            return Err(Error::Config(
                "RATE_LIMIT_REQUESTS and RATE_LIMIT_PERIOD_SECS must be non-zero".to_string(),
            ));
        }
        let rate_limit_period = Duration::from_secs(rate_limit_period_secs);
        if rate_limit_period / rate_limit_requests == Duration::ZERO {
            return Err(Error::Config(format!(
                "RATE_LIMIT_REQUESTS ({}) is too large for RATE_LIMIT_PERIOD_SECS ({})",
                rate_limit_requests, rate_limit_period_secs
            )));
        }

        Ok(Self {
            database_url: get("DATABASE_URL").unwrap_or(defaults.database_url),
            database_max_connections: parse_or(
                &get,
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            )?,
            database_acquire_timeout: Duration::from_secs(parse_or(
                &get,
                "DATABASE_ACQUIRE_TIMEOUT_SECS",
                defaults.database_acquire_timeout.as_secs(),
            )?),
            host: get("HOST").unwrap_or(defaults.host),
            port: parse_or(&get, "PORT", defaults.port)?,
            rate_limit_enabled: get("RATE_LIMIT_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.rate_limit_enabled),
            rate_limit_requests,
            rate_limit_period,
            allowed_origins: get("ALLOWED_ORIGINS")
                .map(|v| split_list(&v))
                .unwrap_or_default(),
            request_timeout: Duration::from_secs(parse_or(
                &get,
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )?),
            max_body_size: parse_or(&get, "MAX_BODY_SIZE_BYTES", defaults.max_body_size)?,
            extra_preferred_hosts: get("PREFERRED_OG_HOSTS")
                .map(|v| split_list(&v))
                .unwrap_or_default(),
        })
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("{} has invalid value '{}': {}", key, raw, e))),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    // Blank values count as unset so `.env` templates with `KEY=` stay harmless.
    let optional = |var: &str| -> Option<String> {
        lookup(var).ok().filter(|v| !v.trim().is_empty())
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let parse = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let google_api_key = require("GOOGLE_API_KEY")?;
    let yelp_api_key = optional("YELP_API_KEY");
    let tripadvisor_api_key = optional("TRIPADVISOR_API_KEY");
    let openai_api_key = optional("OPENAI_API_KEY");
    let database_url = optional("DATABASE_URL");

    let env = parse_environment(&or_default("PLATEWISE_ENV", "development"));
    let bind_addr = parse("PLATEWISE_BIND_ADDR", "0.0.0.0:2000")?;
    let log_level = or_default("PLATEWISE_LOG_LEVEL", "info");
    let openai_model = or_default("PLATEWISE_OPENAI_MODEL", "gpt-3.5-turbo");

    let max_reviews = parse_usize("PLATEWISE_MAX_REVIEWS", "25")?;
    if max_reviews == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "PLATEWISE_MAX_REVIEWS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let provider_timeout_secs = parse_u64("PLATEWISE_PROVIDER_TIMEOUT_SECS", "10")?;
    let provider_max_retries = parse_u32("PLATEWISE_PROVIDER_MAX_RETRIES", "2")?;
    let provider_retry_backoff_ms = parse_u64("PLATEWISE_PROVIDER_RETRY_BACKOFF_MS", "500")?;
    let cache_ttl_secs = parse_u64("PLATEWISE_CACHE_TTL_SECS", "604800")?;

    let db_max_connections = parse_u32("PLATEWISE_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("PLATEWISE_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("PLATEWISE_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        database_url,
        google_api_key,
        yelp_api_key,
        tripadvisor_api_key,
        openai_api_key,
        openai_model,
        max_reviews,
        provider_timeout_secs,
        provider_max_retries,
        provider_retry_backoff_ms,
        cache_ttl_secs,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

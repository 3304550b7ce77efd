use crate::app_config::{AppConfig, QikinkSettings};
use crate::ConfigError;

const DEFAULT_TOKEN_URL: &str = "https://api.qikink.com/api/token";
const DEFAULT_PRODUCTS_URL: &str = "https://api.qikink.com/api/products";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a recognized env var holds an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a recognized env var holds an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let port = or_default("PORT", "3000")
        .parse::<u16>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "PORT".to_string(),
            reason: e.to_string(),
        })?;
    let bind_addr = SocketAddr::from(([0, 0, 0, 0], port));

    let log_level = or_default("QSYNC_LOG_LEVEL", "info");

    let qikink = QikinkSettings {
        client_id: lookup("QIK_CLIENT_ID").ok(),
        client_secret: lookup("QIK_CLIENT_SECRET").ok(),
        token_url: or_default("QIK_TOKEN_URL", DEFAULT_TOKEN_URL),
        products_url: or_default("QIK_PRODUCTS_URL", DEFAULT_PRODUCTS_URL),
        token_timeout_secs: parse_u64("QIK_TOKEN_TIMEOUT_SECS", "15")?,
        products_timeout_secs: parse_u64("QIK_PRODUCTS_TIMEOUT_SECS", "30")?,
    };

    Ok(AppConfig {
        bind_addr,
        log_level,
        qikink,
    })
}

use std::path::PathBuf;

use crate::app_config::ImportConfig;
use crate::ConfigError;

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = "brokerdb/0.1 (catalog-import)";

/// Load import configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_import_config() -> Result<ImportConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_import_config_from_env()
}

/// Load import configuration from environment variables already in the process.
///
/// Unlike [`load_import_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_import_config_from_env() -> Result<ImportConfig, ConfigError> {
    build_import_config(|key| std::env::var(key))
}

/// Build import configuration using the provided env-var lookup function.
fn build_import_config<F>(lookup: F) -> Result<ImportConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: u64| -> Result<u64, ConfigError> {
        match lookup(var) {
            Err(_) => Ok(default),
            Ok(raw) => raw.trim().parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            }),
        }
    };

    let log_level = or_default("BROKERDB_LOG_LEVEL", DEFAULT_LOG_LEVEL);
    let user_agent = or_default("BROKERDB_USER_AGENT", DEFAULT_USER_AGENT);

    let request_timeout_secs =
        parse_u64("BROKERDB_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "BROKERDB_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let catalog_path = lookup("BROKERDB_CATALOG_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    Ok(ImportConfig {
        log_level,
        request_timeout_secs,
        user_agent,
        catalog_path,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

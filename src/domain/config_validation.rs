//! Configuration validation.
//!
//! Checks the ledger settings before any backend is opened.

use crate::domain::error::JournalError;
use crate::ports::config_port::ConfigPort;

pub const BACKENDS: [&str; 3] = ["file", "sqlite", "memory"];
pub const DEFAULT_BACKEND: &str = "file";
pub const DEFAULT_DATA_DIR: &str = ".tradejournal";
pub const DEFAULT_LOG_LEVEL: &str = "warn";
pub const DEFAULT_POOL_SIZE: i64 = 4;
pub const MAX_POOL_SIZE: i64 = 64;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

pub fn validate_ledger_config(config: &dyn ConfigPort) -> Result<(), JournalError> {
    validate_backend(config)?;
    validate_key(config)?;
    validate_sqlite(config)?;
    validate_log_level(config)?;
    Ok(())
}

fn validate_backend(config: &dyn ConfigPort) -> Result<(), JournalError> {
    let backend = config.get_string_or("ledger", "backend", DEFAULT_BACKEND);
    if !BACKENDS.contains(&backend.to_lowercase().as_str()) {
        return Err(JournalError::ConfigInvalid {
            section: "ledger".to_string(),
            key: "backend".to_string(),
            reason: format!("unknown backend '{}' (expected {})", backend, BACKENDS.join(", ")),
        });
    }
    Ok(())
}

fn validate_key(config: &dyn ConfigPort) -> Result<(), JournalError> {
    if let Some(key) = config.get_string("ledger", "key") {
        let key = key.trim();
        if key.is_empty() {
            return Err(JournalError::ConfigInvalid {
                section: "ledger".to_string(),
                key: "key".to_string(),
                reason: "key must not be empty".to_string(),
            });
        }
        if key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(JournalError::ConfigInvalid {
                section: "ledger".to_string(),
                key: "key".to_string(),
                reason: "key must be a plain name".to_string(),
            });
        }
    }
    Ok(())
}

fn validate_sqlite(config: &dyn ConfigPort) -> Result<(), JournalError> {
    let backend = config.get_string_or("ledger", "backend", DEFAULT_BACKEND);
    if !backend.eq_ignore_ascii_case("sqlite") {
        return Ok(());
    }
    config.require_string("sqlite", "path")?;
    pool_size(config)?;
    Ok(())
}

/// `[sqlite] pool_size`, checked to lie in `1..=MAX_POOL_SIZE`.
pub fn pool_size(config: &dyn ConfigPort) -> Result<u32, JournalError> {
    let value = config.get_int("sqlite", "pool_size", DEFAULT_POOL_SIZE);
    if !(1..=MAX_POOL_SIZE).contains(&value) {
        return Err(JournalError::ConfigInvalid {
            section: "sqlite".to_string(),
            key: "pool_size".to_string(),
            reason: format!("pool_size must be between 1 and {}", MAX_POOL_SIZE),
        });
    }
    u32::try_from(value).map_err(|e| JournalError::ConfigInvalid {
        section: "sqlite".to_string(),
        key: "pool_size".to_string(),
        reason: e.to_string(),
    })
}

fn validate_log_level(config: &dyn ConfigPort) -> Result<(), JournalError> {
    let level = config.get_string_or("logging", "level", DEFAULT_LOG_LEVEL);
    if !LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
        return Err(JournalError::ConfigInvalid {
            section: "logging".to_string(),
            key: "level".to_string(),
            reason: format!("unknown level '{}'", level),
        });
    }
    Ok(())
}

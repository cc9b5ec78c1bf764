use crate::error::{ErrorContext, Result};
use crate::types::{Config, SubbruteError};
use crate::utils;
use log::{debug, warn};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const ENV_WORDLIST: &str = "SUBBRUTE_WORDLIST";
pub const ENV_RECURSIVE: &str = "SUBBRUTE_RECURSIVE";
pub const ENV_BRUTE_FORCING: &str = "SUBBRUTE_BRUTE_FORCING";

pub fn load_config(config_path_str: &str) -> Result<Config> {
    let mut config = Config::default();

    if Path::new(config_path_str).exists() {
        let contents = fs::read_to_string(config_path_str)
            .with_context(|| format!("Failed to read config file {}", config_path_str))?;
        apply_toml(&mut config, &contents)?;
    } else {
        debug!("Config file {} not found, using defaults", config_path_str);
    }

    apply_env_overrides(&mut config)?;
    validate_config(&config)?;

    Ok(config)
}

/// Defaults plus environment overrides, for runs without a config file.
pub fn load_default_config() -> Result<Config> {
    let mut config = Config::default();
    apply_env_overrides(&mut config)?;
    validate_config(&config)?;
    Ok(config)
}

/// Read and clean a wordlist file.
pub fn load_wordlist(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let lines = utils::read_lines(path).map_err(|e| {
        SubbruteError::WordlistError(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let words = utils::clean_wordlist(lines);
    debug!("Loaded {} words from {}", words.len(), path.display());
    Ok(words)
}

fn apply_toml(config: &mut Config, contents: &str) -> Result<()> {
    let toml_config: toml::Value =
        toml::from_str(contents).with_context(|| "Failed to parse config file".to_string())?;

    let Some(table) = toml_config.as_table() else {
        return Ok(());
    };

    if let Some(value) = table.get("brute_forcing") {
        config.brute_forcing = expect_bool("brute_forcing", value)?;
    }
    if let Some(value) = table.get("recursive") {
        config.recursive = expect_bool("recursive", value)?;
    }
    if let Some(value) = table.get("wordlist") {
        let words = value.as_array().ok_or_else(|| {
            SubbruteError::ConfigError("wordlist must be an array of strings".to_string())
        })?;
        config.wordlist = utils::clean_wordlist(words.iter().filter_map(|v| v.as_str()));
    }
    if let Some(value) = table.get("wordlist_file") {
        let path = value.as_str().ok_or_else(|| {
            SubbruteError::ConfigError("wordlist_file must be a string".to_string())
        })?;
        let mut words = config.wordlist.clone();
        words.extend(load_wordlist(path)?);
        config.wordlist = utils::clean_wordlist(words);
    }
    if let Some(value) = table.get("idle_timeout_secs") {
        config.idle_timeout = Duration::from_secs(expect_count("idle_timeout_secs", value)? as u64);
    }
    if let Some(value) = table.get("max_in_flight") {
        config.max_in_flight = expect_count("max_in_flight", value)?;
    }
    if let Some(value) = table.get("max_pending_deliveries") {
        config.max_pending_deliveries = expect_count("max_pending_deliveries", value)?;
    }
    if let Some(value) = table.get("channel_capacity") {
        config.channel_capacity = expect_count("channel_capacity", value)?;
    }

    Ok(())
}

fn expect_bool(key: &str, value: &toml::Value) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| SubbruteError::ConfigError(format!("{} must be a boolean", key)))
}

fn expect_count(key: &str, value: &toml::Value) -> Result<usize> {
    value
        .as_integer()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| SubbruteError::ConfigError(format!("{} must be a non-negative integer", key)))
}

fn apply_env_overrides(config: &mut Config) -> Result<()> {
    if let Ok(path) = env::var(ENV_WORDLIST) {
        config.wordlist = load_wordlist(path.trim())?;
    }
    if let Ok(value) = env::var(ENV_RECURSIVE) {
        config.recursive = parse_bool(ENV_RECURSIVE, &value)?;
    }
    if let Ok(value) = env::var(ENV_BRUTE_FORCING) {
        config.brute_forcing = parse_bool(ENV_BRUTE_FORCING, &value)?;
    }
    Ok(())
}

pub fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(SubbruteError::ConfigError(format!(
            "{} must be a boolean, got {:?}",
            key, other
        ))),
    }
}

pub fn validate_config(config: &Config) -> Result<()> {
    if config.idle_timeout.is_zero() {
        return Err(SubbruteError::ConfigError("idle timeout must be greater than 0".to_string()));
    }
    if config.max_in_flight == 0 {
        return Err(SubbruteError::ConfigError("max_in_flight must be greater than 0".to_string()));
    }
    if config.max_pending_deliveries == 0 {
        return Err(SubbruteError::ConfigError(
            "max_pending_deliveries must be greater than 0".to_string(),
        ));
    }
    if config.channel_capacity == 0 {
        return Err(SubbruteError::ConfigError("channel_capacity must be greater than 0".to_string()));
    }
    if config.brute_forcing && config.wordlist.is_empty() {
        warn!("Brute forcing is enabled but the wordlist is empty");
    }
    Ok(())
}

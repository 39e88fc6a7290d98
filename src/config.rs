use crate::constants::{DEFAULT_API_URL, DEFAULT_CHAT_PATH, ENV_API_URL, ENV_LOG_LEVEL};
use crate::errors::{DocentError, DocentResult};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub chat_path: String,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            chat_path: DEFAULT_CHAT_PATH.to_string(),
            log_level: "info".to_string(),
            log_dir: None,
        }
    }
}

impl Config {
    /// Full URL of the chat endpoint, e.g. `http://localhost:8000/chat/`.
    pub fn chat_endpoint(&self) -> String {
        format!("{}{}", self.api_url.trim_end_matches('/'), self.chat_path)
    }

    pub fn resolved_log_dir(&self) -> DocentResult<PathBuf> {
        match &self.log_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join("docent").join("logs"))
                .ok_or_else(|| DocentError::config_error("Could not determine data directory")),
        }
    }
}

/// Loads the config file (writing defaults on first run), applies
/// environment overrides and validates the result.
pub fn initialize_config() -> DocentResult<Config> {
    let config_path = get_config_path()?;
    let mut config = load_or_create(&config_path)?;
    apply_env_overrides(&mut config, |key| env::var(key).ok());
    validate_config(&config)?;
    Ok(config)
}

pub fn load_or_create(config_path: &Path) -> DocentResult<Config> {
    if config_path.exists() {
        let config_str = fs::read_to_string(config_path).map_err(|e| {
            DocentError::config_error(format!("Failed to read config file: {}", e))
        })?;

        return serde_json::from_str(&config_str)
            .map_err(|e| DocentError::config_error(format!("Failed to parse config: {}", e)));
    }

    let config = Config::default();
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            DocentError::config_error(format!("Failed to create config directory: {}", e))
        })?;
    }

    let config_str = serde_json::to_string_pretty(&config)
        .map_err(|e| DocentError::config_error(format!("Failed to serialize config: {}", e)))?;

    fs::write(config_path, config_str)
        .map_err(|e| DocentError::config_error(format!("Failed to write config file: {}", e)))?;

    Ok(config)
}

pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
        config.api_url = url.trim().to_string();
    }
    if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|v| !v.trim().is_empty()) {
        config.log_level = level.trim().to_lowercase();
    }
}

fn get_config_path() -> DocentResult<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| DocentError::config_error("Could not determine home directory"))?;

    Ok(home_dir.join(".config").join("docent").join("config.json"))
}

pub fn validate_config(config: &Config) -> DocentResult<()> {
    let url = reqwest::Url::parse(&config.api_url)
        .map_err(|e| DocentError::config_error(format!("Invalid api_url: {}", e)))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(DocentError::config_error(
            "api_url must use http or https",
        ));
    }

    if !config.chat_path.starts_with('/') {
        return Err(DocentError::config_error("chat_path must start with '/'"));
    }

    if !LOG_LEVELS.contains(&config.log_level.as_str()) {
        return Err(DocentError::config_error(format!(
            "log_level must be one of {}",
            LOG_LEVELS.join(", ")
        )));
    }

    Ok(())
}

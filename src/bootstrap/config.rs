//! # Configuration Loader / 配置加载器
//!
//! Reads `sportsfest.toml` into the [`AppConfig`] DTO and applies the
//! environment overrides. Empty facts in the file are filled in here, not
//! in the DTO.
//! 读取配置文件并应用环境变量覆盖。

use anyhow::Context;
use std::path::{Path, PathBuf};

use sf_core::config::AppConfig;

pub const CONFIG_ENV: &str = "SPORTSFEST_CONFIG";
pub const API_BASE_URL_ENV: &str = "SPORTSFEST_API_BASE_URL";
pub const CONFIG_FILE_NAME: &str = "sportsfest.toml";
const APP_DIR_NAME: &str = "sportsfest";

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// Missing sections result in empty values; nothing is validated here.
pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
}

/// Application data directory, `~/.local/share/sportsfest` on Linux.
pub fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}

/// `SPORTSFEST_CONFIG` when set, else `sportsfest.toml` in the data dir.
pub fn resolve_config_path() -> PathBuf {
    match std::env::var(CONFIG_ENV) {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => data_dir().join(CONFIG_FILE_NAME),
    }
}

/// Load the config file if it exists, then fill empty paths and apply env
/// overrides.
/// 配置文件不存在时使用系统默认值。
pub fn load_or_default(config_path: &Path) -> anyhow::Result<AppConfig> {
    let mut config = if config_path.exists() {
        load_config(config_path)?
    } else {
        tracing::debug!(path = %config_path.display(), "config file not found, using defaults");
        AppConfig::with_system_defaults(data_dir())
    };

    fill_empty_paths(&mut config, &data_dir());
    apply_env_overrides(&mut config, std::env::var(API_BASE_URL_ENV).ok());
    Ok(config)
}

fn fill_empty_paths(config: &mut AppConfig, data_dir: &Path) {
    let defaults = AppConfig::with_system_defaults(data_dir.to_path_buf());
    if config.storage_path.as_os_str().is_empty() {
        config.storage_path = defaults.storage_path;
    }
    if config.log_dir.as_os_str().is_empty() {
        config.log_dir = defaults.log_dir;
    }
}

fn apply_env_overrides(config: &mut AppConfig, api_base_url: Option<String>) {
    if let Some(url) = api_base_url.filter(|url| !url.trim().is_empty()) {
        config.api_base_url = url;
    }
}

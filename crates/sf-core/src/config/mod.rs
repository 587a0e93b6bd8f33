//! # Pure Data Module / 纯数据模块
//!
//! Configuration DTO mapped from `sportsfest.toml`.
//!
//! This module holds data only: no validation, no default value calculation.
//! A missing key is an empty fact (empty string, `0`, empty path); deciding
//! what an empty fact means is the bootstrap layer's job.
//! 此模块只包含数据结构定义，禁止验证逻辑和默认值计算。

use std::path::PathBuf;

/// Application configuration DTO (pure data, no logic)
/// 应用配置 DTO（纯数据，无逻辑）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// API root including the version prefix, e.g. `https://fest.example.org/api/v1`
    pub api_base_url: String,

    /// Per-request timeout in seconds; `0` means none
    pub request_timeout_secs: u64,

    /// Durable client storage file (path only, no existence check)
    /// 客户端存储文件路径（仅路径信息，不检查文件是否存在）
    pub storage_path: PathBuf,

    /// Directory for rolling log files
    pub log_dir: PathBuf,

    /// Default `tracing` directives when `RUST_LOG` is unset
    pub log_level: String,

    /// Fee schedule in minor units; `0` / empty mean "not configured"
    pub base_fee: u64,
    pub per_sport_fee: u64,
    pub currency: String,
}

fn str_at<'a>(value: &'a toml::Value, table: &str, key: &str) -> &'a str {
    value
        .get(table)
        .and_then(|t| t.get(key))
        .and_then(|v| v.as_str())
        .unwrap_or("")
}

fn u64_at(value: &toml::Value, table: &str, key: &str) -> u64 {
    value
        .get(table)
        .and_then(|t| t.get(key))
        .and_then(|v| v.as_integer())
        .unwrap_or(0)
        .max(0) as u64
}

impl AppConfig {
    /// Create AppConfig from TOML value
    /// 从 TOML 值创建 AppConfig
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        Ok(Self {
            api_base_url: str_at(toml_value, "api", "base_url").to_string(),
            request_timeout_secs: u64_at(toml_value, "api", "timeout_secs"),
            storage_path: PathBuf::from(str_at(toml_value, "storage", "path")),
            log_dir: PathBuf::from(str_at(toml_value, "logging", "dir")),
            log_level: str_at(toml_value, "logging", "level").to_string(),
            base_fee: u64_at(toml_value, "fees", "base"),
            per_sport_fee: u64_at(toml_value, "fees", "per_sport"),
            currency: str_at(toml_value, "fees", "currency").to_string(),
        })
    }

    /// Create empty AppConfig (all empty/default values)
    /// 创建空的 AppConfig（所有字段为空/默认值）
    pub fn empty() -> Self {
        Self {
            api_base_url: String::new(),
            request_timeout_secs: 0,
            storage_path: PathBuf::new(),
            log_dir: PathBuf::new(),
            log_level: String::new(),
            base_fee: 0,
            per_sport_fee: 0,
            currency: String::new(),
        }
    }

    /// Paths rooted at `data_dir`, everything else empty.
    /// The caller computes `data_dir` (e.g. with the `dirs` crate).
    pub fn with_system_defaults(data_dir: PathBuf) -> Self {
        Self {
            storage_path: data_dir.join("client_storage.json"),
            log_dir: data_dir.join("logs"),
            ..Self::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toml::Value;

    #[test]
    fn test_from_toml_reads_all_sections() {
        let toml_str = r#"
            [api]
            base_url = "https://fest.example.org/api/v1"
            timeout_secs = 15

            [storage]
            path = "/var/lib/sportsfest/storage.json"

            [logging]
            dir = "/var/log/sportsfest"
            level = "debug"

            [fees]
            base = 7500
            per_sport = 3000
            currency = "INR"
        "#;
        let toml_value: Value = toml::from_str(toml_str).unwrap();

        let config = AppConfig::from_toml(&toml_value).unwrap();

        assert_eq!(config.api_base_url, "https://fest.example.org/api/v1");
        assert_eq!(config.request_timeout_secs, 15);
        assert_eq!(config.storage_path, PathBuf::from("/var/lib/sportsfest/storage.json"));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.base_fee, 7500);
        assert_eq!(config.per_sport_fee, 3000);
        assert_eq!(config.currency, "INR");
    }

    #[test]
    fn test_missing_keys_are_empty_facts() {
        let toml_value: Value = toml::from_str("[api]\n").unwrap();

        let config = AppConfig::from_toml(&toml_value).unwrap();

        assert_eq!(config, AppConfig::empty());
    }

    #[test]
    fn test_negative_numbers_are_not_validated_just_clamped() {
        let toml_value: Value = toml::from_str("[fees]\nbase = -10\n").unwrap();

        let config = AppConfig::from_toml(&toml_value).unwrap();

        assert_eq!(config.base_fee, 0);
    }

    #[test]
    fn test_with_system_defaults_creates_paths() {
        let config = AppConfig::with_system_defaults(PathBuf::from("/tmp/test"));

        assert_eq!(config.storage_path, PathBuf::from("/tmp/test/client_storage.json"));
        assert_eq!(config.log_dir, PathBuf::from("/tmp/test/logs"));
        assert_eq!(config.api_base_url, "");
    }
}

//! # Dependency Injection / 依赖注入模块
//!
//! The only place that names the concrete adapters from `sf-infra`. It
//! assembles them into [`AppDeps`] and makes no decisions beyond turning
//! empty config facts into defaults.
//! 仅用于"组装"，不用于"决策"。

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use sf_app::{AppDeps, UseCases};
use sf_core::admin::AdminDataStore;
use sf_core::config::AppConfig;
use sf_core::ports::{ApiTransportPort, ClientStoragePort, ClockPort};
use sf_core::registration::FeeSchedule;
use sf_infra::{FileClientStorage, ReqwestApiClient, SystemClock};

/// Fee schedule from config; zero or empty values keep the defaults.
pub fn fee_schedule(config: &AppConfig) -> FeeSchedule {
    let mut fees = FeeSchedule::default();
    if config.base_fee > 0 {
        fees.base_fee = config.base_fee;
    }
    if config.per_sport_fee > 0 {
        fees.per_sport_fee = config.per_sport_fee;
    }
    if !config.currency.trim().is_empty() {
        fees.currency = config.currency.trim().to_uppercase();
    }
    fees
}

fn request_timeout(config: &AppConfig) -> Option<Duration> {
    (config.request_timeout_secs > 0).then(|| Duration::from_secs(config.request_timeout_secs))
}

/// Wire every port to its adapter.
/// 将所有端口连接到其适配器。
pub fn wire_dependencies(config: &AppConfig) -> anyhow::Result<UseCases> {
    let storage: Arc<dyn ClientStoragePort> =
        Arc::new(FileClientStorage::new(config.storage_path.clone()));
    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock);

    let api: Arc<dyn ApiTransportPort> = Arc::new(
        ReqwestApiClient::new(
            config.api_base_url.clone(),
            request_timeout(config),
            storage.clone(),
        )
        .context("Failed to build HTTP client")?,
    );

    let deps = AppDeps {
        api,
        storage,
        admin_store: Arc::new(AdminDataStore::new(clock.clone())),
        clock,
        fees: fee_schedule(config),
    };

    tracing::debug!(
        api_base_url = %config.api_base_url,
        storage = %config.storage_path.display(),
        "dependencies wired"
    );
    Ok(UseCases::new(Arc::new(deps)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_fee_schedule_defaults_for_empty_config() {
        assert_eq!(fee_schedule(&AppConfig::empty()), FeeSchedule::default());
    }

    #[test]
    fn test_fee_schedule_uses_configured_values() {
        let mut config = AppConfig::empty();
        config.base_fee = 7500;
        config.currency = "inr".to_string();

        let fees = fee_schedule(&config);
        assert_eq!(fees.base_fee, 7500);
        assert_eq!(fees.per_sport_fee, FeeSchedule::default().per_sport_fee);
        assert_eq!(fees.currency, "INR");
    }

    #[test]
    fn test_zero_timeout_means_none() {
        let mut config = AppConfig::empty();
        assert_eq!(request_timeout(&config), None);
        config.request_timeout_secs = 30;
        assert_eq!(request_timeout(&config), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_wire_dependencies_builds_use_cases() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::with_system_defaults(dir.path().to_path_buf());

        let usecases = wire_dependencies(&config).unwrap();

        assert_eq!(usecases.deps().fees, FeeSchedule::default());
        assert!(usecases.deps().admin_store.institutions().is_empty());
    }
}

//! # Application Dependencies / 应用依赖
//!
//! Parameter grouping for use case construction. Not a builder: no build
//! steps, no defaults, no hidden logic.
//! 仅用于参数打包，不是 Builder 模式。

use std::sync::Arc;

use sf_core::admin::AdminDataStore;
use sf_core::ports::{ApiTransportPort, ClientStoragePort, ClockPort};
use sf_core::registration::FeeSchedule;

/// Application dependency grouping (non-Builder, just parameter grouping)
/// 应用依赖分组（非 Builder，仅参数打包）
pub struct AppDeps {
    // Backend / 后端
    pub api: Arc<dyn ApiTransportPort>,

    // Durable client storage / 客户端存储
    pub storage: Arc<dyn ClientStoragePort>,

    // Shared admin records / 管理端共享数据
    pub admin_store: Arc<AdminDataStore>,

    // System / 系统
    pub clock: Arc<dyn ClockPort>,
    pub fees: FeeSchedule,
}

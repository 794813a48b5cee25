// ==========================================
// 学生名册管理系统 - 配置层
// ==========================================
// 职责: GPA 阈值的持久化与默认值
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod error;
pub mod thresholds;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use error::{ConfigError, ConfigResult};
pub use thresholds::{
    InMemoryThresholdStore, ThresholdConfig, ThresholdKind, ThresholdStore, TOP_PERFORMER_CUTOFF,
};

// ==========================================
// 学生名册管理系统 - GPA 阈值配置
// ==========================================
// 职责: 阈值种类、默认值、取值校验、读写端口
// 约束: 调用方在使用时读取当前值，不跨调用缓存
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::error::ValidationError;
use crate::domain::student::{GPA_MAX, GPA_MIN};
use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// 优秀学生（Top performer）固定分界线，不属于可配置项
pub const TOP_PERFORMER_CUTOFF: f64 = 3.5;

pub const DEFAULT_INACTIVE_THRESHOLD: f64 = 1.5;
pub const DEFAULT_AT_RISK_THRESHOLD: f64 = 1.5;
pub const DEFAULT_EXCELLENT_THRESHOLD: f64 = 3.5;

// ==========================================
// ThresholdKind - 阈值种类
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdKind {
    Inactive,  // 低于此值 → Inactive
    AtRisk,    // 低于此值 → 预警
    Excellent, // 不低于此值 → 优秀（图表分桶）
}

impl ThresholdKind {
    pub const ALL: [ThresholdKind; 3] = [
        ThresholdKind::Inactive,
        ThresholdKind::AtRisk,
        ThresholdKind::Excellent,
    ];

    /// config_kv 中的键名
    pub fn key(&self) -> &'static str {
        match self {
            ThresholdKind::Inactive => crate::config::config_keys::INACTIVE_THRESHOLD,
            ThresholdKind::AtRisk => crate::config::config_keys::AT_RISK_THRESHOLD,
            ThresholdKind::Excellent => crate::config::config_keys::EXCELLENT_THRESHOLD,
        }
    }

    pub fn default_value(&self) -> f64 {
        match self {
            ThresholdKind::Inactive => DEFAULT_INACTIVE_THRESHOLD,
            ThresholdKind::AtRisk => DEFAULT_AT_RISK_THRESHOLD,
            ThresholdKind::Excellent => DEFAULT_EXCELLENT_THRESHOLD,
        }
    }

    /// 校验阈值取值: 有限值且位于 [0.0, 4.0]
    pub fn validate(&self, value: f64) -> Result<(), ValidationError> {
        if value.is_finite() && (GPA_MIN..=GPA_MAX).contains(&value) {
            Ok(())
        } else {
            Err(ValidationError::InvalidThreshold {
                key: self.key().to_string(),
                value,
            })
        }
    }
}

// ==========================================
// ThresholdConfig - 阈值快照
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    pub inactive_threshold: f64,
    pub at_risk_threshold: f64,
    pub excellent_threshold: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            inactive_threshold: DEFAULT_INACTIVE_THRESHOLD,
            at_risk_threshold: DEFAULT_AT_RISK_THRESHOLD,
            excellent_threshold: DEFAULT_EXCELLENT_THRESHOLD,
        }
    }
}

impl ThresholdConfig {
    pub fn get(&self, kind: ThresholdKind) -> f64 {
        match kind {
            ThresholdKind::Inactive => self.inactive_threshold,
            ThresholdKind::AtRisk => self.at_risk_threshold,
            ThresholdKind::Excellent => self.excellent_threshold,
        }
    }

    fn set(&mut self, kind: ThresholdKind, value: f64) {
        match kind {
            ThresholdKind::Inactive => self.inactive_threshold = value,
            ThresholdKind::AtRisk => self.at_risk_threshold = value,
            ThresholdKind::Excellent => self.excellent_threshold = value,
        }
    }
}

// ==========================================
// ThresholdStore Trait - 阈值读写端口
// ==========================================
// 实现者: ConfigManager（config_kv 持久化）/ InMemoryThresholdStore
pub trait ThresholdStore: Send + Sync {
    /// 读取当前阈值（未配置时返回默认值）
    fn get_threshold(&self, kind: ThresholdKind) -> ConfigResult<f64>;

    /// 校验并写入阈值
    fn set_threshold(&self, kind: ThresholdKind, value: f64) -> ConfigResult<()>;

    /// 读取全部阈值
    fn load(&self) -> ConfigResult<ThresholdConfig> {
        Ok(ThresholdConfig {
            inactive_threshold: self.get_threshold(ThresholdKind::Inactive)?,
            at_risk_threshold: self.get_threshold(ThresholdKind::AtRisk)?,
            excellent_threshold: self.get_threshold(ThresholdKind::Excellent)?,
        })
    }
}

/// 进程内阈值存储（不持久化）
#[derive(Debug, Default)]
pub struct InMemoryThresholdStore {
    values: RwLock<ThresholdConfig>,
}

impl InMemoryThresholdStore {
    pub fn new(config: ThresholdConfig) -> Self {
        Self {
            values: RwLock::new(config),
        }
    }
}

impl ThresholdStore for InMemoryThresholdStore {
    fn get_threshold(&self, kind: ThresholdKind) -> ConfigResult<f64> {
        let values = self
            .values
            .read()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;
        Ok(values.get(kind))
    }

    fn set_threshold(&self, kind: ThresholdKind, value: f64) -> ConfigResult<()> {
        kind.validate(value)?;
        let mut values = self
            .values
            .write()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;
        values.set(kind, value);
        Ok(())
    }
}

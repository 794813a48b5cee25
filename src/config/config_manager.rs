// ==========================================
// 学生名册管理系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::thresholds::{ThresholdKind, ThresholdStore};
use crate::db::open_sqlite_connection;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// 全局作用域
const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| ConfigError::LockError(e.to_string()))?;
            crate::db::configure_sqlite_connection(&guard)?;
        }

        Ok(Self { conn })
    }

    fn get_conn(&self) -> ConfigResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.get_conn()?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![GLOBAL_SCOPE, key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        self.get_config_value(key)
    }

    /// 读取浮点配置，缺失或格式错误时返回默认值
    fn get_f64_or_default(&self, key: &str, default: f64) -> ConfigResult<f64> {
        let Some(raw) = self.get_config_value(key)? else {
            return Ok(default);
        };

        match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => {
                tracing::warn!(
                    config_key = key,
                    raw_value = %raw,
                    default,
                    "配置值格式错误，使用默认值"
                );
                Ok(default)
            }
        }
    }

    /// 写入 global scope 配置（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at)
             VALUES (?1, ?2, ?3, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;
        tracing::debug!(config_key = key, value, "配置已写入");
        Ok(())
    }

    /// 列出全部 global 配置（按键排序）
    pub fn list_global_configs(&self) -> ConfigResult<BTreeMap<String, String>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;

        let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut configs = BTreeMap::new();
        for row in rows {
            let (key, value) = row?;
            configs.insert(key, value);
        }
        Ok(configs)
    }

    /// 获取所有配置的快照（JSON格式，用于诊断）
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let configs = self.list_global_configs()?;
        Ok(serde_json::to_string(&json!(configs))?)
    }
}

// ==========================================
// ThresholdStore Trait 实现
// ==========================================
impl ThresholdStore for ConfigManager {
    fn get_threshold(&self, kind: ThresholdKind) -> ConfigResult<f64> {
        self.get_f64_or_default(kind.key(), kind.default_value())
    }

    fn set_threshold(&self, kind: ThresholdKind, value: f64) -> ConfigResult<()> {
        kind.validate(value)?;
        self.set_config_value(kind.key(), &value.to_string())
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 状态派生
    pub const INACTIVE_THRESHOLD: &str = "inactive_threshold";

    // 报表分桶
    pub const AT_RISK_THRESHOLD: &str = "at_risk_threshold";
    pub const EXCELLENT_THRESHOLD: &str = "excellent_threshold";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ensure_schema;

    fn setup_manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_threshold_defaults_when_absent() {
        let manager = setup_manager();
        let cfg = manager.load().unwrap();
        assert_eq!(cfg.inactive_threshold, 1.5);
        assert_eq!(cfg.at_risk_threshold, 1.5);
        assert_eq!(cfg.excellent_threshold, 3.5);
    }

    #[test]
    fn test_set_threshold_persists_and_overwrites() {
        let manager = setup_manager();
        manager.set_threshold(ThresholdKind::AtRisk, 2.0).unwrap();
        manager.set_threshold(ThresholdKind::AtRisk, 2.25).unwrap();

        assert_eq!(manager.get_threshold(ThresholdKind::AtRisk).unwrap(), 2.25);
        assert_eq!(
            manager.get_global_config_value("at_risk_threshold").unwrap(),
            Some("2.25".to_string())
        );
    }

    #[test]
    fn test_set_threshold_rejects_out_of_range() {
        let manager = setup_manager();
        let err = manager
            .set_threshold(ThresholdKind::Inactive, -1.0)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert_eq!(manager.get_global_config_value("inactive_threshold").unwrap(), None);
    }

    #[test]
    fn test_malformed_value_falls_back_to_default() {
        let manager = setup_manager();
        manager
            .set_config_value(config_keys::EXCELLENT_THRESHOLD, "abc")
            .unwrap();
        assert_eq!(
            manager.get_threshold(ThresholdKind::Excellent).unwrap(),
            3.5
        );
    }

    #[test]
    fn test_config_snapshot_json() {
        let manager = setup_manager();
        manager.set_threshold(ThresholdKind::Inactive, 2.0).unwrap();

        let snapshot = manager.get_config_snapshot().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&snapshot).unwrap();
        assert_eq!(parsed["inactive_threshold"], "2");
    }
}

// ==========================================
// 学生名册管理系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::api::{ConfigApi, ImportApi, ReportApi, StudentApi};
use crate::config::config_manager::ConfigManager;
use crate::config::thresholds::ThresholdStore;
use crate::db::{ensure_schema, open_sqlite_connection, read_schema_version};
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::student_repo::StudentRepository;
use crate::repository::student_repo_impl::SqliteStudentRepository;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "STUDENT_ROSTER_DB";

/// 应用状态
///
/// 所有仓储共享同一个 SQLite 连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 学生业务规则服务
    pub student_api: Arc<StudentApi>,

    /// 报表API
    pub report_api: Arc<ReportApi>,

    /// 导入导出API
    pub import_api: Arc<ImportApi>,

    /// 阈值配置API
    pub config_api: Arc<ConfigApi>,

    /// 配置管理器（诊断用）
    pub config_manager: Arc<ConfigManager>,

    /// 操作日志仓储
    pub action_log_repo: Arc<ActionLogRepository>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径（":memory:" 表示内存库）
    ///
    /// # 返回
    /// - Ok(AppState): 成功创建
    /// - Err(String): 初始化错误
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        // 创建数据库连接（共享连接）
        let conn =
            open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        ensure_schema(&conn).map_err(|e| format!("无法初始化数据库结构: {}", e))?;
        let schema_version =
            read_schema_version(&conn).map_err(|e| format!("无法读取 schema_version: {}", e))?;
        tracing::debug!(?schema_version, "数据库结构就绪");
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let student_repo: Arc<dyn StudentRepository> =
            Arc::new(SqliteStudentRepository::from_connection(conn.clone()));
        let action_log_repo = Arc::new(ActionLogRepository::new(conn.clone()));
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn)
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );
        let thresholds: Arc<dyn ThresholdStore> = config_manager.clone();

        // ==========================================
        // 初始化API层
        // ==========================================
        let student_api = Arc::new(
            StudentApi::new(student_repo.clone(), thresholds.clone())
                .with_action_log(action_log_repo.clone()),
        );
        let report_api = Arc::new(
            ReportApi::new(student_repo, thresholds.clone())
                .with_action_log(action_log_repo.clone()),
        );
        let import_api = Arc::new(
            ImportApi::new(student_api.clone()).with_action_log(action_log_repo.clone()),
        );
        let config_api = Arc::new(
            ConfigApi::new(thresholds, student_api.clone())
                .with_action_log(action_log_repo.clone()),
        );

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            student_api,
            report_api,
            import_api,
            config_api,
            config_manager,
            action_log_repo,
        })
    }

    /// 获取数据库路径
    pub fn get_db_path(&self) -> &str {
        &self.db_path
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 STUDENT_ROSTER_DB → <data_dir>/student-roster/students.db → ./students.db
pub fn get_default_db_path() -> String {
    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./students.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("student-roster");
        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("students.db");
        }
    }

    path.to_string_lossy().to_string()
}

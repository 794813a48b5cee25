// ==========================================
// 学生名册管理系统 - 应用层
// ==========================================
// 职责: 组装仓储与 API，供界面层或命令行使用
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState, DB_PATH_ENV};

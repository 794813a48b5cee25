// ==========================================
// 学生名册管理系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供界面层调用
// 红线: 所有写操作经 StudentApi 校验后落库
// ==========================================

mod audit;
pub mod config_api;
pub mod error;
pub mod import_api;
pub mod report_api;
pub mod student_api;
pub mod validator;

// 重导出核心类型
pub use config_api::ConfigApi;
pub use error::{ApiError, ApiResult, ErrorKind};
pub use import_api::ImportApi;
pub use report_api::ReportApi;
pub use student_api::StudentApi;
pub use validator::StudentValidator;

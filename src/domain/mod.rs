// ==========================================
// 学生名册管理系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、字段级不变量
// 红线: 不含数据访问逻辑
// ==========================================

pub mod action_log;
pub mod error;
pub mod report;
pub mod student;
pub mod types;

// 重导出核心类型
pub use action_log::{ActionLog, ActionType, ACTOR_SYSTEM, ACTOR_USER};
pub use error::ValidationError;
pub use report::{DashboardSnapshot, GpaDistribution, LevelCount, SummaryStatistics};
pub use student::{
    generate_email, validate_gpa, Student, StudentDraft, GPA_MAX, GPA_MIN, MIN_STUDENT_ID_LEN,
};
pub use types::{derive_status, Level, StudentStatus};

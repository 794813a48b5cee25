// ==========================================
// 学生名册管理系统 - 引擎层
// ==========================================
// 职责: 实现业务规则计算,不拼 SQL
// 红线: Engine 不访问数据库，输入均为 list_all 快照
// ==========================================

pub mod reporting;
pub mod status_derivation;

// 重导出核心引擎
pub use reporting::ReportEngine;
pub use status_derivation::{
    derive_status, ReconciliationOutcome, StatusChange, StatusReconciler,
};

// ==========================================
// 学生名册管理系统 - 核心库
// ==========================================
// 范围: 记录校验 / 状态对账 / 持久化契约 / 报表派生
// 技术栈: Rust + SQLite
// 红线: UI 层只通过 api 模块调用核心
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 状态派生与报表计算
pub mod engine;

// 导入层 - 文本导入/导出
pub mod importer;

// 配置层 - 阈值配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{Level, StudentStatus};

// 领域实体
pub use domain::{
    ActionLog, ActionType, DashboardSnapshot, GpaDistribution, LevelCount, Student, StudentDraft,
    SummaryStatistics, ValidationError,
};

// 配置
pub use config::{ThresholdConfig, ThresholdKind, ThresholdStore};

// 引擎
pub use engine::{derive_status, ReconciliationOutcome, ReportEngine, StatusReconciler};

// 导入导出
pub use importer::{ColumnLayout, ImportReport};

// API
pub use api::{ApiError, ApiResult, ConfigApi, ErrorKind, ImportApi, ReportApi, StudentApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "学生名册管理系统";

// 数据库版本
pub const DB_VERSION: &str = "v0.1";

// ==========================================
// 学生名册管理系统 - 字段校验错误
// ==========================================
// 工具: thiserror 派生宏
// 约定: 每个变体都能通过 field() 指出出错字段
// ==========================================

use thiserror::Error;

/// 字段校验错误（永不落库）
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("学号无效: '{student_id}'（长度至少 {min_len} 个字符）")]
    InvalidId { student_id: String, min_len: usize },

    #[error("姓名无效: '{full_name}'（{reason}）")]
    InvalidName { full_name: String, reason: String },

    #[error("GPA 无效: {gpa}（必须在 0.0 到 4.0 之间）")]
    InvalidGpa { gpa: f64 },

    #[error("年级无效: {level}（仅允许 100/200/300/400/500/600/700）")]
    InvalidLevel { level: i64 },

    #[error("阈值无效 (key={key}): {value}（必须在 0.0 到 4.0 之间）")]
    InvalidThreshold { key: String, value: f64 },
}

impl ValidationError {
    /// 出错字段名（与数据库列名一致）
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::InvalidId { .. } => "student_id",
            ValidationError::InvalidName { .. } => "full_name",
            ValidationError::InvalidGpa { .. } => "gpa",
            ValidationError::InvalidLevel { .. } => "level",
            ValidationError::InvalidThreshold { .. } => "threshold",
        }
    }
}

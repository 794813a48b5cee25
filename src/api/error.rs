// ==========================================
// 学生名册管理系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换下层错误为用户友好的错误消息
// 约定: 调用方按 kind() 分支，不做字符串匹配
// ==========================================

use crate::config::error::ConfigError;
use crate::domain::error::ValidationError;
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use serde::Serialize;
use thiserror::Error;

/// 错误分类（调用方分支依据）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    Validation,
    DuplicateKey,
    NotFound,
    Storage,
    Parse,
}

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("数据验证失败: {0}")]
    Validation(#[from] ValidationError),

    #[error("学号已存在: {0}")]
    DuplicateKey(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("存储失败: {0}")]
    Storage(String),

    // ==========================================
    // 导入导出错误
    // ==========================================
    #[error("解析失败: {0}")]
    Parse(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Validation(_) => ErrorKind::Validation,
            ApiError::DuplicateKey(_) => ErrorKind::DuplicateKey,
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::Parse(_) => ErrorKind::Parse,
            ApiError::Storage(_) | ApiError::Other(_) => ErrorKind::Storage,
        }
    }

    /// 校验错误对应的字段名
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ApiError::Validation(e) => Some(e.field()),
            _ => None,
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DuplicateKey { id, .. } => ApiError::DuplicateKey(id),
            RepositoryError::UniqueConstraintViolation(msg) => ApiError::DuplicateKey(msg),
            RepositoryError::LockError(msg) => {
                ApiError::Storage(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::Storage(format!("字段{}错误: {}", field, message))
            }
            RepositoryError::Other(err) => ApiError::Other(err),
            other => ApiError::Storage(other.to_string()),
        }
    }
}

// ==========================================
// 从 ConfigError 转换
// ==========================================
impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation(e) => ApiError::Validation(e),
            other => ApiError::Storage(other.to_string()),
        }
    }
}

// ==========================================
// 从 ImportError 转换（整体失败的导入导出）
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::FileNotFound(path) => ApiError::NotFound(format!("文件 {}", path)),
            ImportError::FileRead(_) | ImportError::FileWrite(_) => {
                ApiError::Storage(err.to_string())
            }
            ImportError::Other(e) => ApiError::Other(e),
            other => ApiError::Parse(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_kinds() {
        let not_found: ApiError = RepositoryError::student_not_found("S001").into();
        assert_eq!(not_found.kind(), ErrorKind::NotFound);

        let dup: ApiError = RepositoryError::duplicate_student("S001").into();
        assert_eq!(dup.kind(), ErrorKind::DuplicateKey);

        let storage: ApiError = RepositoryError::DatabaseQueryError("disk I/O error".into()).into();
        assert_eq!(storage.kind(), ErrorKind::Storage);
        assert!(storage.to_string().contains("disk I/O error"));
    }

    #[test]
    fn test_validation_error_field() {
        let err: ApiError = ValidationError::InvalidGpa { gpa: 5.0 }.into();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.field(), Some("gpa"));
    }

    #[test]
    fn test_import_error_kinds() {
        let err: ApiError = ImportError::UnknownLayout { column_count: 3 }.into();
        assert_eq!(err.kind(), ErrorKind::Parse);

        let err: ApiError = ImportError::FileWrite("denied".into()).into();
        assert_eq!(err.kind(), ErrorKind::Storage);
    }
}

// ==========================================
// 学生名册管理系统 - 配置层错误类型
// ==========================================

use crate::domain::error::ValidationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置值非法: {0}")]
    Validation(#[from] ValidationError),

    #[error("配置锁获取失败: {0}")]
    LockError(String),

    #[error("配置存储失败: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("配置序列化失败: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

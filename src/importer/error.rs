// ==========================================
// 学生名册管理系统 - 导入导出错误类型
// ==========================================
// 工具: thiserror 派生宏
// 约定: 行级错误携带 1 起始的文件行号（表头为第 1 行）
// ==========================================

use thiserror::Error;

/// 导入导出错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误（整体失败）=====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件读取失败: {0}")]
    FileRead(String),

    #[error("文件写入失败: {0}")]
    FileWrite(String),

    #[error("CSV 解析失败: {0}")]
    CsvParse(String),

    #[error("无法识别的列布局: 表头共 {column_count} 列（支持 5/6/8/9 列）")]
    UnknownLayout { column_count: usize },

    // ===== 行级错误（跳过该行）=====
    #[error("列数不符 (行 {row}): 期望 {expected} 列，实际 {actual} 列")]
    FieldCount {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("行格式错误 (行 {row}): {message}")]
    MalformedRow { row: usize, message: String },

    #[error("编码错误 (行 {row}): 不是合法的 UTF-8 文本")]
    Encoding { row: usize },

    #[error("类型转换失败 (行 {row}, 字段 {field}): {message}")]
    TypeConversion {
        row: usize,
        field: String,
        message: String,
    },

    #[error("日期格式错误 (行 {row}, 字段 {field}): 期望 YYYY-MM-DD，实际 {value}")]
    DateFormat {
        row: usize,
        field: String,
        value: String,
    },

    #[error("状态值非法 (行 {row}): {value}（仅允许 Active/Inactive）")]
    InvalidStatus { row: usize, value: String },

    #[error("年级值非法 (行 {row}): {value}")]
    InvalidLevel { row: usize, value: i64 },

    #[error("保存失败 (行 {row}): {message}")]
    Rejected { row: usize, message: String },

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// 行级错误返回行号；整体错误返回 None
    pub fn row(&self) -> Option<usize> {
        match self {
            ImportError::FieldCount { row, .. }
            | ImportError::MalformedRow { row, .. }
            | ImportError::Encoding { row }
            | ImportError::TypeConversion { row, .. }
            | ImportError::DateFormat { row, .. }
            | ImportError::InvalidStatus { row, .. }
            | ImportError::InvalidLevel { row, .. }
            | ImportError::Rejected { row, .. } => Some(*row),
            _ => None,
        }
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileRead(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParse(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

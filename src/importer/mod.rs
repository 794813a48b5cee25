// ==========================================
// 学生名册管理系统 - 导入导出层
// ==========================================
// 职责: 文本 ⇄ 学生记录的批量桥接
// 红线: 导入行必须经过 StudentApi::save_student，不走校验捷径
// ==========================================

pub mod error;
pub mod exporter;
pub mod field_mapper;
pub mod file_parser;
pub mod report;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use exporter::{export_to_string, write_students};
pub use field_mapper::{Column, ColumnLayout, FieldMapper};
pub use file_parser::{CsvParser, ParsedTable, RawRow};
pub use report::{ImportFailure, ImportReport};

// ==========================================
// 学生名册管理系统 - 导入结果
// ==========================================

use crate::importer::error::ImportError;
use crate::importer::field_mapper::ColumnLayout;
use serde::Serialize;

/// 单行失败明细
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportFailure {
    pub line: usize,
    pub student_id: Option<String>,
    pub reason: String,
}

impl ImportFailure {
    pub fn from_error(err: &ImportError, student_id: Option<String>) -> Self {
        Self {
            line: err.row().unwrap_or(0),
            student_id,
            reason: err.to_string(),
        }
    }
}

// ==========================================
// ImportReport - 导入汇总
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub batch_id: String,
    pub layout: ColumnLayout,
    pub imported: usize,
    pub failures: Vec<ImportFailure>,
}

impl ImportReport {
    pub fn new(layout: ColumnLayout) -> Self {
        Self {
            batch_id: uuid::Uuid::new_v4().to_string(),
            layout,
            imported: 0,
            failures: Vec::new(),
        }
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// 汇总文本: 成功数 + 逐行失败清单
    pub fn summary(&self) -> String {
        let mut text = format!("成功导入 {} 名学生", self.imported);
        if self.has_failures() {
            text.push_str(&format!("，失败 {} 行:", self.failed()));
            for f in &self.failures {
                text.push_str(&format!("\n  第 {} 行: {}", f.line, f.reason));
            }
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_lists_failures() {
        let mut report = ImportReport::new(ColumnLayout::Standard);
        report.imported = 2;
        assert_eq!(report.summary(), "成功导入 2 名学生");

        let err = ImportError::TypeConversion {
            row: 3,
            field: "gpa".to_string(),
            message: "'x': invalid float literal".to_string(),
        };
        report.failures.push(ImportFailure::from_error(&err, Some("S003".to_string())));

        let summary = report.summary();
        assert!(summary.starts_with("成功导入 2 名学生，失败 1 行:"));
        assert!(summary.contains("第 3 行"));
        assert!(summary.contains("gpa"));
    }
}

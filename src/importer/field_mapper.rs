// ==========================================
// 学生名册管理系统 - 列布局与字段映射
// ==========================================
// 职责: 显式列布局 → StudentDraft 映射 + 类型转换
// 约束: 只按已登记的布局取列，不做位置猜测
// ==========================================

use crate::domain::student::StudentDraft;
use crate::domain::types::{Level, StudentStatus};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawRow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 日期列格式
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ==========================================
// Column - 逻辑列
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    StudentId,
    FullName,
    Programme,
    Level,
    Gpa,
    Email,
    PhoneNumber,
    DateAdded,
    Status,
}

impl Column {
    /// 导出表头文字
    pub fn header(&self) -> &'static str {
        match self {
            Column::StudentId => "Student ID",
            Column::FullName => "Full Name",
            Column::Programme => "Programme",
            Column::Level => "Level",
            Column::Gpa => "GPA",
            Column::Email => "Email",
            Column::PhoneNumber => "Phone Number",
            Column::DateAdded => "Date Added",
            Column::Status => "Status",
        }
    }

    /// 错误信息中的字段名
    pub fn field_name(&self) -> &'static str {
        match self {
            Column::StudentId => "student_id",
            Column::FullName => "full_name",
            Column::Programme => "programme",
            Column::Level => "level",
            Column::Gpa => "gpa",
            Column::Email => "email",
            Column::PhoneNumber => "phone_number",
            Column::DateAdded => "date_added",
            Column::Status => "status",
        }
    }
}

// ==========================================
// ColumnLayout - 列布局
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnLayout {
    /// id, name, programme, gpa, status（导出默认）
    Standard,
    /// Standard + email
    StandardWithEmail,
    /// id, name, email, level, gpa, phone, programme, status
    Roster,
    /// 全部列，按表结构顺序
    Full,
}

impl ColumnLayout {
    pub const ALL: [ColumnLayout; 4] = [
        ColumnLayout::Standard,
        ColumnLayout::StandardWithEmail,
        ColumnLayout::Roster,
        ColumnLayout::Full,
    ];

    pub fn columns(&self) -> &'static [Column] {
        use Column::*;
        match self {
            ColumnLayout::Standard => &[StudentId, FullName, Programme, Gpa, Status],
            ColumnLayout::StandardWithEmail => {
                &[StudentId, FullName, Programme, Gpa, Status, Email]
            }
            ColumnLayout::Roster => &[
                StudentId,
                FullName,
                Email,
                Level,
                Gpa,
                PhoneNumber,
                Programme,
                Status,
            ],
            ColumnLayout::Full => &[
                StudentId,
                FullName,
                Programme,
                Level,
                Gpa,
                Email,
                PhoneNumber,
                DateAdded,
                Status,
            ],
        }
    }

    pub fn column_count(&self) -> usize {
        self.columns().len()
    }

    pub fn headers(&self) -> Vec<&'static str> {
        self.columns().iter().map(|c| c.header()).collect()
    }

    /// 列在本布局中的下标
    pub fn index_of(&self, column: Column) -> Option<usize> {
        self.columns().iter().position(|c| *c == column)
    }

    /// 按表头列数识别布局
    pub fn detect(column_count: usize) -> ImportResult<ColumnLayout> {
        Self::ALL
            .iter()
            .copied()
            .find(|l| l.column_count() == column_count)
            .ok_or(ImportError::UnknownLayout { column_count })
    }
}

// ==========================================
// FieldMapper - 行 → StudentDraft
// ==========================================
pub struct FieldMapper {
    layout: ColumnLayout,
}

impl FieldMapper {
    pub fn new(layout: ColumnLayout) -> Self {
        Self { layout }
    }

    /// 映射单行
    ///
    /// # 返回
    /// - Err: 列数不符 / 数值、日期、状态无法解析 / 年级不在枚举内
    pub fn map_row(&self, row: &RawRow) -> ImportResult<StudentDraft> {
        let expected = self.layout.column_count();
        if row.fields.len() != expected {
            return Err(ImportError::FieldCount {
                row: row.line_number,
                expected,
                actual: row.fields.len(),
            });
        }

        // status 必须可解析，但落库值由 GPA 重新派生
        if let Some(raw) = self.get(row, Column::Status) {
            if StudentStatus::parse(raw).is_none() {
                return Err(ImportError::InvalidStatus {
                    row: row.line_number,
                    value: raw.to_string(),
                });
            }
        }

        let level = match self.get(row, Column::Level) {
            Some(raw) => self.parse_level(raw, row.line_number)?,
            None => Level::L100.as_i64(),
        };

        let gpa = match self.get(row, Column::Gpa) {
            Some(raw) => raw.parse::<f64>().map_err(|e| ImportError::TypeConversion {
                row: row.line_number,
                field: Column::Gpa.field_name().to_string(),
                message: format!("'{}': {}", raw, e),
            })?,
            None => 0.0,
        };

        let date_added = match self.get(row, Column::DateAdded) {
            Some(raw) if !raw.is_empty() => Some(
                NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| {
                    ImportError::DateFormat {
                        row: row.line_number,
                        field: Column::DateAdded.field_name().to_string(),
                        value: raw.to_string(),
                    }
                })?,
            ),
            _ => None,
        };

        Ok(StudentDraft {
            student_id: self.get_string(row, Column::StudentId),
            full_name: self.get_string(row, Column::FullName),
            programme: self.get_string(row, Column::Programme),
            level,
            gpa,
            email: self
                .get(row, Column::Email)
                .filter(|v| !v.is_empty())
                .map(str::to_string),
            phone_number: self.get_string(row, Column::PhoneNumber),
            date_added,
        })
    }

    fn get<'a>(&self, row: &'a RawRow, column: Column) -> Option<&'a str> {
        self.layout
            .index_of(column)
            .and_then(|idx| row.fields.get(idx))
            .map(String::as_str)
    }

    fn get_string(&self, row: &RawRow, column: Column) -> String {
        self.get(row, column).unwrap_or_default().to_string()
    }

    fn parse_level(&self, raw: &str, line: usize) -> ImportResult<i64> {
        let value = raw
            .parse::<i64>()
            .map_err(|e| ImportError::TypeConversion {
                row: line,
                field: Column::Level.field_name().to_string(),
                message: format!("'{}': {}", raw, e),
            })?;

        if Level::from_i64(value).is_none() {
            return Err(ImportError::InvalidLevel { row: line, value });
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(line: usize, fields: &[&str]) -> RawRow {
        RawRow {
            line_number: line,
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    #[test]
    fn test_detect_layout() {
        assert_eq!(ColumnLayout::detect(5).unwrap(), ColumnLayout::Standard);
        assert_eq!(ColumnLayout::detect(6).unwrap(), ColumnLayout::StandardWithEmail);
        assert_eq!(ColumnLayout::detect(8).unwrap(), ColumnLayout::Roster);
        assert_eq!(ColumnLayout::detect(9).unwrap(), ColumnLayout::Full);
        assert!(matches!(
            ColumnLayout::detect(7),
            Err(ImportError::UnknownLayout { column_count: 7 })
        ));
    }

    #[test]
    fn test_standard_headers() {
        assert_eq!(
            ColumnLayout::Standard.headers().join(","),
            "Student ID,Full Name,Programme,GPA,Status"
        );
    }

    #[test]
    fn test_map_standard_row_defaults() {
        let mapper = FieldMapper::new(ColumnLayout::Standard);
        let draft = mapper
            .map_row(&row(2, &["S001", "Ama Owusu", "Biology", "3.25", "active"]))
            .unwrap();

        assert_eq!(draft.student_id, "S001");
        assert_eq!(draft.programme, "Biology");
        assert_eq!(draft.level, 100);
        assert_eq!(draft.gpa, 3.25);
        assert_eq!(draft.email, None);
        assert_eq!(draft.phone_number, "");
        assert_eq!(draft.date_added, None);
    }

    #[test]
    fn test_map_roster_row() {
        let mapper = FieldMapper::new(ColumnLayout::Roster);
        let draft = mapper
            .map_row(&row(
                3,
                &[
                    "S002",
                    "Kofi Mensah",
                    "kofi@uni.edu",
                    "300",
                    "2.10",
                    "0201234567",
                    "Physics",
                    "Active",
                ],
            ))
            .unwrap();

        assert_eq!(draft.email.as_deref(), Some("kofi@uni.edu"));
        assert_eq!(draft.level, 300);
        assert_eq!(draft.phone_number, "0201234567");
        assert_eq!(draft.programme, "Physics");
    }

    #[test]
    fn test_map_full_row_with_date() {
        let mapper = FieldMapper::new(ColumnLayout::Full);
        let fields = [
            "S003", "Esi Addo", "Law", "200", "3.00", "", "024", "2024-09-01", "Active",
        ];
        let draft = mapper.map_row(&row(2, &fields)).unwrap();
        assert_eq!(draft.date_added, NaiveDate::from_ymd_opt(2024, 9, 1));
        assert_eq!(draft.email, None);

        let mut bad = fields;
        bad[7] = "01/09/2024";
        assert!(matches!(
            mapper.map_row(&row(2, &bad)),
            Err(ImportError::DateFormat { row: 2, .. })
        ));
    }

    #[test]
    fn test_map_row_errors() {
        let mapper = FieldMapper::new(ColumnLayout::Standard);

        let err = mapper
            .map_row(&row(4, &["S001", "Ama", "Bio", "abc", "Active"]))
            .unwrap_err();
        assert!(matches!(err, ImportError::TypeConversion { row: 4, .. }));

        let err = mapper
            .map_row(&row(5, &["S001", "Ama", "Bio", "3.0"]))
            .unwrap_err();
        assert!(matches!(
            err,
            ImportError::FieldCount {
                expected: 5,
                actual: 4,
                ..
            }
        ));

        let err = mapper
            .map_row(&row(6, &["S001", "Ama", "Bio", "3.0", "Graduated"]))
            .unwrap_err();
        assert!(matches!(err, ImportError::InvalidStatus { row: 6, .. }));

        let roster = FieldMapper::new(ColumnLayout::Roster);
        let err = roster
            .map_row(&row(7, &["S001", "Ama", "", "150", "3.0", "", "Bio", "Active"]))
            .unwrap_err();
        assert!(matches!(err, ImportError::InvalidLevel { value: 150, .. }));
    }
}

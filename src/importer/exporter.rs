// ==========================================
// 学生名册管理系统 - 文本导出器
// ==========================================
// 输出: 表头 + 每名学生一行，GPA 保留两位小数
// ==========================================

use crate::domain::student::Student;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::{Column, ColumnLayout, DATE_FORMAT};
use csv::{Terminator, WriterBuilder};
use std::io::Write;

/// 按布局写出学生列表
pub fn write_students<W: Write>(
    writer: W,
    students: &[Student],
    layout: ColumnLayout,
) -> ImportResult<()> {
    let mut wtr = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    wtr.write_record(layout.headers()).map_err(write_error)?;
    for student in students {
        let record: Vec<String> = layout
            .columns()
            .iter()
            .map(|c| render_field(student, *c))
            .collect();
        wtr.write_record(&record).map_err(write_error)?;
    }

    wtr.flush()
        .map_err(|e| ImportError::FileWrite(e.to_string()))?;
    Ok(())
}

/// 导出为字符串
pub fn export_to_string(students: &[Student], layout: ColumnLayout) -> ImportResult<String> {
    let mut buf = Vec::new();
    write_students(&mut buf, students, layout)?;
    String::from_utf8(buf).map_err(|e| ImportError::Other(e.into()))
}

fn write_error(err: csv::Error) -> ImportError {
    ImportError::FileWrite(err.to_string())
}

fn render_field(student: &Student, column: Column) -> String {
    match column {
        Column::StudentId => student.student_id().to_string(),
        Column::FullName => student.full_name.clone(),
        Column::Programme => student.programme.clone(),
        Column::Level => student.level.as_i64().to_string(),
        Column::Gpa => format!("{:.2}", student.gpa()),
        Column::Email => student.email.clone(),
        Column::PhoneNumber => student.phone_number.clone(),
        Column::DateAdded => student.date_added.format(DATE_FORMAT).to_string(),
        Column::Status => student.status().as_str().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::student::StudentDraft;
    use chrono::NaiveDate;

    fn sample() -> Vec<Student> {
        let draft = StudentDraft {
            student_id: "S001".to_string(),
            full_name: "Owusu, Ama".to_string(),
            programme: "Biology".to_string(),
            level: 200,
            gpa: 3.456,
            phone_number: "0241112222".to_string(),
            date_added: NaiveDate::from_ymd_opt(2024, 9, 2),
            ..Default::default()
        };
        vec![Student::create(draft, 1.5, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()).unwrap()]
    }

    #[test]
    fn test_export_standard() {
        let text = export_to_string(&sample(), ColumnLayout::Standard).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Student ID,Full Name,Programme,GPA,Status");
        assert_eq!(lines[1], "S001,\"Owusu, Ama\",Biology,3.46,Active");
    }

    #[test]
    fn test_export_full_and_empty() {
        let text = export_to_string(&sample(), ColumnLayout::Full).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert!(row.contains(",200,3.46,"));
        assert!(row.contains("2024-09-02"));

        let empty = export_to_string(&[], ColumnLayout::StandardWithEmail).unwrap();
        assert_eq!(empty, "Student ID,Full Name,Programme,GPA,Status,Email\n");
    }
}

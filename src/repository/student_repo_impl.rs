// ==========================================
// 学生名册管理系统 - 学生数据仓储 (rusqlite 实现)
// ==========================================
// 对齐: students 表
// 红线: Repository 不含业务逻辑，只负责数据访问
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::student::Student;
use crate::domain::types::{Level, StudentStatus};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::student_repo::StudentRepository;
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};

const SELECT_COLUMNS: &str = r#"
    SELECT
        student_id, full_name, programme, level, gpa,
        email, phone_number, date_added, status
    FROM students
"#;

// ==========================================
// SqliteStudentRepository - 学生仓储
// ==========================================
pub struct SqliteStudentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStudentRepository {
    /// 创建新的 SqliteStudentRepository 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

impl StudentRepository for SqliteStudentRepository {
    fn create(&self, student: &Student) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let result = conn.execute(
            r#"
            INSERT INTO students (
                student_id, full_name, programme, level, gpa,
                email, phone_number, date_added, status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                student.student_id(),
                student.full_name,
                student.programme,
                student.level.as_i64(),
                student.gpa(),
                student.email,
                student.phone_number,
                student.date_added.format("%Y-%m-%d").to_string(),
                student.status().as_str(),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(e) => match RepositoryError::from(e) {
                RepositoryError::UniqueConstraintViolation(_) => {
                    Err(RepositoryError::duplicate_student(student.student_id()))
                }
                other => Err(other),
            },
        }
    }

    fn list_all(&self) -> RepositoryResult<Vec<Student>> {
        let conn = self.get_conn()?;
        let sql = format!("{} ORDER BY student_id ASC", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;

        let students = stmt
            .query_map([], map_student_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(students)
    }

    fn update(&self, student: &Student) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            r#"
            UPDATE students
            SET full_name = ?1, programme = ?2, gpa = ?3, phone_number = ?4, status = ?5
            WHERE student_id = ?6
            "#,
            params![
                student.full_name,
                student.programme,
                student.gpa(),
                student.phone_number,
                student.status().as_str(),
                student.student_id(),
            ],
        )?;

        if rows == 0 {
            return Err(RepositoryError::student_not_found(student.student_id()));
        }
        Ok(())
    }

    fn update_status(&self, student_id: &str, status: StudentStatus) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "UPDATE students SET status = ?1 WHERE student_id = ?2",
            params![status.as_str(), student_id],
        )?;

        if rows == 0 {
            return Err(RepositoryError::student_not_found(student_id));
        }
        Ok(())
    }

    fn delete(&self, student_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            "DELETE FROM students WHERE student_id = ?1",
            params![student_id],
        )?;

        if rows == 0 {
            return Err(RepositoryError::student_not_found(student_id));
        }
        Ok(())
    }
}

// ==========================================
// 行映射
// ==========================================

fn map_student_row(row: &Row<'_>) -> rusqlite::Result<Student> {
    let level_raw: i64 = row.get(3)?;
    let level = Level::from_i64(level_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            Type::Integer,
            format!("非法年级: {}", level_raw).into(),
        )
    })?;

    let date_raw: String = row.get(7)?;
    let date_added = NaiveDate::parse_from_str(&date_raw, "%Y-%m-%d")
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e)))?;

    let status_raw: String = row.get(8)?;
    let status = StudentStatus::parse(&status_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            8,
            Type::Text,
            format!("非法状态: {}", status_raw).into(),
        )
    })?;

    Ok(Student::from_storage(
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        level,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        date_added,
        status,
    ))
}

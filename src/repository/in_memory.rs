// ==========================================
// 学生名册管理系统 - 内存学生仓储
// ==========================================
// 用途: 无 SQLite 环境下的服务层测试 / 界面预览
// 语义与 SqliteStudentRepository 保持一致（按 student_id 排序）
// ==========================================

use crate::domain::student::Student;
use crate::domain::types::StudentStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::student_repo::StudentRepository;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// 内存学生仓储
#[derive(Default)]
pub struct InMemoryStudentRepository {
    students: Mutex<BTreeMap<String, Student>>,
}

impl InMemoryStudentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置记录（主键重复时后者覆盖前者）
    pub fn with_students(students: Vec<Student>) -> Self {
        let map = students
            .into_iter()
            .map(|s| (s.student_id().to_string(), s))
            .collect();
        Self {
            students: Mutex::new(map),
        }
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, BTreeMap<String, Student>>> {
        self.students
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

impl StudentRepository for InMemoryStudentRepository {
    fn create(&self, student: &Student) -> RepositoryResult<()> {
        let mut map = self.lock()?;
        if map.contains_key(student.student_id()) {
            return Err(RepositoryError::duplicate_student(student.student_id()));
        }
        map.insert(student.student_id().to_string(), student.clone());
        Ok(())
    }

    fn list_all(&self) -> RepositoryResult<Vec<Student>> {
        Ok(self.lock()?.values().cloned().collect())
    }

    fn update(&self, student: &Student) -> RepositoryResult<()> {
        let mut map = self.lock()?;
        let existing = map
            .get_mut(student.student_id())
            .ok_or_else(|| RepositoryError::student_not_found(student.student_id()))?;

        // 与 UPDATE 语句覆盖的列保持一致，其余列沿用已存储值
        *existing = Student::from_storage(
            existing.student_id().to_string(),
            student.full_name.clone(),
            student.programme.clone(),
            existing.level,
            student.gpa(),
            existing.email.clone(),
            student.phone_number.clone(),
            existing.date_added,
            student.status(),
        );
        Ok(())
    }

    fn update_status(&self, student_id: &str, status: StudentStatus) -> RepositoryResult<()> {
        let mut map = self.lock()?;
        let existing = map
            .get_mut(student_id)
            .ok_or_else(|| RepositoryError::student_not_found(student_id))?;

        *existing = Student::from_storage(
            existing.student_id().to_string(),
            existing.full_name.clone(),
            existing.programme.clone(),
            existing.level,
            existing.gpa(),
            existing.email.clone(),
            existing.phone_number.clone(),
            existing.date_added,
            status,
        );
        Ok(())
    }

    fn delete(&self, student_id: &str) -> RepositoryResult<()> {
        self.lock()?
            .remove(student_id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::student_not_found(student_id))
    }
}

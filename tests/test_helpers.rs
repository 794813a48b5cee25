// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库、测试数据构建、仓储调用计数
// ==========================================

#![allow(dead_code)]

use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use tempfile::NamedTempFile;

use student_roster::app::AppState;
use student_roster::config::{InMemoryThresholdStore, ThresholdConfig, ThresholdStore};
use student_roster::db::{ensure_schema, open_sqlite_connection};
use student_roster::domain::{Student, StudentDraft, StudentStatus};
use student_roster::logging;
use student_roster::repository::{
    ActionLogRepository, InMemoryStudentRepository, RepositoryError, RepositoryResult, StudentRepository,
};
use student_roster::StudentApi;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是合法 UTF-8")?
        .to_string();

    let conn = open_sqlite_connection(&db_path)?;
    ensure_schema(&conn)?;

    Ok((temp_file, db_path))
}

// ==========================================
// TestEnv - 基于临时 SQLite 文件的完整应用
// ==========================================
pub struct TestEnv {
    pub state: AppState,
    pub db_path: String,
    _temp_file: NamedTempFile,
}

impl TestEnv {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        logging::init_test();
        let (temp_file, db_path) = create_test_db()?;
        let state = AppState::new(db_path.clone())?;
        Ok(Self {
            state,
            db_path,
            _temp_file: temp_file,
        })
    }

    /// 在同一数据库文件上重新打开（模拟进程重启）
    pub fn reopen(&self) -> Result<AppState, Box<dyn Error>> {
        Ok(AppState::new(self.db_path.clone())?)
    }
}

// ==========================================
// StudentDraftBuilder
// ==========================================
pub struct StudentDraftBuilder {
    draft: StudentDraft,
}

impl StudentDraftBuilder {
    pub fn new(student_id: &str) -> Self {
        Self {
            draft: StudentDraft {
                student_id: student_id.to_string(),
                full_name: "Adwoa Sarpong".to_string(),
                programme: "Computer Science".to_string(),
                level: 100,
                gpa: 3.0,
                email: None,
                phone_number: "0244000000".to_string(),
                date_added: None,
            },
        }
    }

    pub fn name(mut self, full_name: &str) -> Self {
        self.draft.full_name = full_name.to_string();
        self
    }

    pub fn programme(mut self, programme: &str) -> Self {
        self.draft.programme = programme.to_string();
        self
    }

    pub fn level(mut self, level: i64) -> Self {
        self.draft.level = level;
        self
    }

    pub fn gpa(mut self, gpa: f64) -> Self {
        self.draft.gpa = gpa;
        self
    }

    pub fn email(mut self, email: &str) -> Self {
        self.draft.email = Some(email.to_string());
        self
    }

    pub fn date_added(mut self, date: NaiveDate) -> Self {
        self.draft.date_added = Some(date);
        self
    }

    pub fn build(self) -> StudentDraft {
        self.draft
    }
}

// ==========================================
// RecordingRepository - 统计持久化调用次数
// ==========================================
#[derive(Default)]
pub struct CallCounts {
    pub create: AtomicUsize,
    pub list_all: AtomicUsize,
    pub update: AtomicUsize,
    pub update_status: AtomicUsize,
    pub delete: AtomicUsize,
}

pub struct RecordingRepository {
    inner: Arc<dyn StudentRepository>,
    pub calls: CallCounts,
    pub status_writes: Mutex<Vec<(String, StudentStatus)>>,
    fail_writes: bool,
    fail_reads: bool,
}

impl RecordingRepository {
    pub fn new(inner: Arc<dyn StudentRepository>) -> Self {
        Self {
            inner,
            calls: CallCounts::default(),
            status_writes: Mutex::new(Vec::new()),
            fail_writes: false,
            fail_reads: false,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStudentRepository::new()))
    }

    /// 所有写操作返回存储故障
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::in_memory()
        }
    }

    /// list_all 返回存储故障
    pub fn failing_reads() -> Self {
        Self {
            fail_reads: true,
            ..Self::in_memory()
        }
    }

    pub fn creates(&self) -> usize {
        self.calls.create.load(Ordering::SeqCst)
    }

    pub fn status_updates(&self) -> usize {
        self.calls.update_status.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.creates()
            + self.calls.update.load(Ordering::SeqCst)
            + self.status_updates()
            + self.calls.delete.load(Ordering::SeqCst)
    }

    fn check_fail(&self) -> RepositoryResult<()> {
        if self.fail_writes {
            return Err(RepositoryError::DatabaseQueryError("disk I/O error".to_string()));
        }
        Ok(())
    }
}

impl StudentRepository for RecordingRepository {
    fn create(&self, student: &Student) -> RepositoryResult<()> {
        self.calls.create.fetch_add(1, Ordering::SeqCst);
        self.check_fail()?;
        self.inner.create(student)
    }

    fn list_all(&self) -> RepositoryResult<Vec<Student>> {
        self.calls.list_all.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads {
            return Err(RepositoryError::DatabaseQueryError("disk I/O error".to_string()));
        }
        self.inner.list_all()
    }

    fn update(&self, student: &Student) -> RepositoryResult<()> {
        self.calls.update.fetch_add(1, Ordering::SeqCst);
        self.check_fail()?;
        self.inner.update(student)
    }

    fn update_status(&self, student_id: &str, status: StudentStatus) -> RepositoryResult<()> {
        self.calls.update_status.fetch_add(1, Ordering::SeqCst);
        self.check_fail()?;
        self.status_writes
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?
            .push((student_id.to_string(), status));
        self.inner.update_status(student_id, status)
    }

    fn delete(&self, student_id: &str) -> RepositoryResult<()> {
        self.calls.delete.fetch_add(1, Ordering::SeqCst);
        self.check_fail()?;
        self.inner.delete(student_id)
    }
}

/// 基于临时数据库的操作日志仓储
pub fn action_log_repo(db_path: &str) -> Result<Arc<ActionLogRepository>, Box<dyn Error>> {
    let conn = open_sqlite_connection(db_path)?;
    Ok(Arc::new(ActionLogRepository::new(Arc::new(Mutex::new(conn)))))
}

/// 以记录仓储 + 内存阈值构建 StudentApi
pub fn recording_api(
    repo: Arc<RecordingRepository>,
    config: ThresholdConfig,
) -> (StudentApi, Arc<dyn ThresholdStore>) {
    let thresholds: Arc<dyn ThresholdStore> = Arc::new(InMemoryThresholdStore::new(config));
    (StudentApi::new(repo, thresholds.clone()), thresholds)
}

// ==========================================
// 学生名册管理系统 - 学生业务规则服务
// ==========================================
// 职责: 所有写操作的唯一入口（校验 → 持久化），阈值对账
// 红线: 校验失败零写入；status 只经派生写入；阈值使用时读取
// ==========================================

use std::sync::Arc;

use chrono::Local;
use serde_json::json;
use tracing::{debug, info, instrument};

use crate::api::audit;
use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::StudentValidator;
use crate::config::thresholds::{ThresholdKind, ThresholdStore};
use crate::domain::action_log::{ActionLog, ActionType, ACTOR_SYSTEM, ACTOR_USER};
use crate::domain::student::{Student, StudentDraft};
use crate::engine::reporting::ReportEngine;
use crate::engine::status_derivation::{ReconciliationOutcome, StatusReconciler};
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::student_repo::StudentRepository;

// ==========================================
// StudentApi - 学生业务规则服务
// ==========================================
pub struct StudentApi {
    student_repo: Arc<dyn StudentRepository>,
    thresholds: Arc<dyn ThresholdStore>,
    action_log_repo: Option<Arc<ActionLogRepository>>,
    validator: StudentValidator,
}

impl StudentApi {
    /// 创建新的 StudentApi 实例
    ///
    /// # 参数
    /// - student_repo: 学生持久化端口
    /// - thresholds: 阈值读写端口
    pub fn new(student_repo: Arc<dyn StudentRepository>, thresholds: Arc<dyn ThresholdStore>) -> Self {
        Self {
            student_repo,
            thresholds,
            action_log_repo: None,
            validator: StudentValidator::new(),
        }
    }

    /// 挂载操作日志仓储
    pub fn with_action_log(mut self, action_log_repo: Arc<ActionLogRepository>) -> Self {
        self.action_log_repo = Some(action_log_repo);
        self
    }

    // ==========================================
    // 写操作
    // ==========================================

    /// 新增学生
    ///
    /// # 返回
    /// - Ok(Student): 已落库的记录（含派生 status、生成的 email）
    /// - Err(Validation): 学号/姓名/GPA/年级非法，未写库
    /// - Err(DuplicateKey): 学号已存在
    #[instrument(skip(self, draft), fields(student_id = %draft.student_id))]
    pub fn save_student(&self, draft: StudentDraft) -> ApiResult<Student> {
        self.validator.validate_new(&draft)?;

        let threshold = self.threshold(ThresholdKind::Inactive, "save_student")?;
        let student = Student::create(draft, threshold, Local::now().date_naive())?;

        self.student_repo
            .create(&student)
            .map_err(|e| self.storage_failure("save_student", Some(student.student_id()), e))?;

        debug!(status = %student.status(), "学生已新增");
        self.record(
            ActionLog::new(ActionType::AddStudent, ACTOR_USER)
                .with_student(student.student_id())
                .with_payload(json!({
                    "gpa": student.gpa(),
                    "level": student.level.as_i64(),
                    "status": student.status().as_str(),
                })),
        );
        Ok(student)
    }

    /// 修改学生
    ///
    /// 只复核 GPA；status 按当前阈值重新派生后整体覆写
    /// 调用方经 Student::set_gpa 改分
    #[instrument(skip(self, student), fields(student_id = %student.student_id()))]
    pub fn modify_student(&self, mut student: Student) -> ApiResult<Student> {
        let threshold = self.threshold(ThresholdKind::Inactive, "modify_student")?;
        let gpa = student.gpa();
        student.set_gpa(gpa, threshold)?;

        self.student_repo
            .update(&student)
            .map_err(|e| self.storage_failure("modify_student", Some(student.student_id()), e))?;

        self.record(
            ActionLog::new(ActionType::UpdateStudent, ACTOR_USER)
                .with_student(student.student_id())
                .with_payload(json!({
                    "gpa": student.gpa(),
                    "status": student.status().as_str(),
                })),
        );
        Ok(student)
    }

    /// 删除学生
    ///
    /// # 返回
    /// - Err(NotFound): 学号不存在（重复删除同样返回该错误）
    #[instrument(skip(self))]
    pub fn remove_student(&self, student_id: &str) -> ApiResult<()> {
        self.student_repo
            .delete(student_id)
            .map_err(|e| self.storage_failure("remove_student", Some(student_id), e))?;

        self.record(ActionLog::new(ActionType::DeleteStudent, ACTOR_USER).with_student(student_id));
        Ok(())
    }

    // ==========================================
    // 阈值对账
    // ==========================================

    /// 设置非活跃阈值并立即全量对账
    #[instrument(skip(self))]
    pub fn set_inactive_threshold(&self, value: f64) -> ApiResult<ReconciliationOutcome> {
        self.thresholds
            .set_threshold(ThresholdKind::Inactive, value)
            .map_err(|e| self.storage_failure("set_inactive_threshold", None, e))?;

        info!(threshold = value, "非活跃阈值已更新");
        self.record(
            ActionLog::new(ActionType::UpdateThreshold, ACTOR_USER).with_payload(json!({
                "key": ThresholdKind::Inactive.key(),
                "value": value,
            })),
        );

        self.sweep()
    }

    /// 按当前存储的阈值重新对账
    #[instrument(skip(self))]
    pub fn reconcile_statuses(&self) -> ApiResult<ReconciliationOutcome> {
        self.sweep()
    }

    pub fn get_inactive_threshold(&self) -> ApiResult<f64> {
        self.threshold(ThresholdKind::Inactive, "get_inactive_threshold")
    }

    /// 全量扫描，只对状态变化的记录调用 update_status
    fn sweep(&self) -> ApiResult<ReconciliationOutcome> {
        // 对账开始时重新读取阈值
        let threshold = self.threshold(ThresholdKind::Inactive, "reconcile_statuses")?;
        let students = self.list_students()?;
        let outcome = StatusReconciler::plan(&students, threshold);

        for change in &outcome.changes {
            self.student_repo
                .update_status(&change.student_id, change.to)
                .map_err(|e| {
                    self.storage_failure("reconcile_statuses", Some(change.student_id.as_str()), e)
                })?;
        }

        info!(
            threshold,
            scanned = outcome.scanned,
            changed = outcome.changed_count(),
            "状态对账完成"
        );
        if !outcome.changes.is_empty() {
            self.record(
                ActionLog::new(ActionType::StatusSweep, ACTOR_SYSTEM).with_payload(json!({
                    "threshold": threshold,
                    "scanned": outcome.scanned,
                    "changes": outcome.changes,
                })),
            );
        }
        Ok(outcome)
    }

    // ==========================================
    // 查询
    // ==========================================

    /// 全部学生（每次调用都重新读取）
    pub fn list_students(&self) -> ApiResult<Vec<Student>> {
        self.student_repo
            .list_all()
            .map_err(|e| self.storage_failure("list_students", None, e))
    }

    /// 按姓名或学号搜索
    pub fn search_students(&self, query: &str) -> ApiResult<Vec<Student>> {
        Ok(ReportEngine::search(&self.list_students()?, query))
    }

    /// GPA >= 3.5 的学生
    pub fn get_top_performers(&self) -> ApiResult<Vec<Student>> {
        Ok(ReportEngine::top_performers(&self.list_students()?))
    }

    /// GPA 低于预警阈值的学生
    pub fn get_at_risk_students(&self) -> ApiResult<Vec<Student>> {
        let threshold = self.threshold(ThresholdKind::AtRisk, "get_at_risk_students")?;
        Ok(ReportEngine::at_risk(&self.list_students()?, threshold))
    }

    // ==========================================
    // 内部辅助
    // ==========================================

    /// 使用时读取阈值（不缓存）
    fn threshold(&self, kind: ThresholdKind, operation: &str) -> ApiResult<f64> {
        self.thresholds
            .get_threshold(kind)
            .map_err(|e| self.storage_failure(operation, None, e))
    }

    /// 转换下层错误；存储类故障额外写入错误日志与操作日志
    fn storage_failure(
        &self,
        operation: &str,
        student_id: Option<&str>,
        err: impl Into<ApiError>,
    ) -> ApiError {
        audit::storage_failure(
            self.action_log_repo.as_deref(),
            operation,
            student_id,
            err.into(),
        )
    }

    fn record(&self, log: ActionLog) {
        if let Some(repo) = &self.action_log_repo {
            repo.record_best_effort(&log);
        }
    }
}

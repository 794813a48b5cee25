// ==========================================
// 学生名册管理系统 - 报表 API
// ==========================================
// 职责: 每次调用重新读取全量学生，交由 ReportEngine 聚合
// 红线: 只读，不缓存；存储故障同样写入操作日志
// ==========================================

use std::sync::Arc;

use tracing::instrument;

use crate::api::audit;
use crate::api::error::{ApiError, ApiResult};
use crate::config::thresholds::{ThresholdConfig, ThresholdKind, ThresholdStore};
use crate::domain::report::{DashboardSnapshot, GpaDistribution, LevelCount, SummaryStatistics};
use crate::domain::student::Student;
use crate::engine::reporting::ReportEngine;
use crate::repository::action_log_repo::ActionLogRepository;
use crate::repository::student_repo::StudentRepository;

pub struct ReportApi {
    student_repo: Arc<dyn StudentRepository>,
    thresholds: Arc<dyn ThresholdStore>,
    action_log_repo: Option<Arc<ActionLogRepository>>,
}

impl ReportApi {
    pub fn new(student_repo: Arc<dyn StudentRepository>, thresholds: Arc<dyn ThresholdStore>) -> Self {
        Self {
            student_repo,
            thresholds,
            action_log_repo: None,
        }
    }

    /// 挂载操作日志仓储
    pub fn with_action_log(mut self, action_log_repo: Arc<ActionLogRepository>) -> Self {
        self.action_log_repo = Some(action_log_repo);
        self
    }

    fn snapshot(&self, operation: &str) -> ApiResult<Vec<Student>> {
        self.student_repo
            .list_all()
            .map_err(|e| self.failure(operation, e))
    }

    fn threshold(&self, kind: ThresholdKind, operation: &str) -> ApiResult<f64> {
        self.thresholds
            .get_threshold(kind)
            .map_err(|e| self.failure(operation, e))
    }

    fn load_thresholds(&self, operation: &str) -> ApiResult<ThresholdConfig> {
        self.thresholds.load().map_err(|e| self.failure(operation, e))
    }

    fn failure(&self, operation: &str, err: impl Into<ApiError>) -> ApiError {
        audit::storage_failure(self.action_log_repo.as_deref(), operation, None, err.into())
    }

    /// 汇总统计（空名册平均 GPA 为 0.0）
    #[instrument(skip(self))]
    pub fn get_summary_statistics(&self) -> ApiResult<SummaryStatistics> {
        Ok(ReportEngine::summary(&self.snapshot("get_summary_statistics")?))
    }

    /// GPA 三档分布（阈值取当前配置）
    #[instrument(skip(self))]
    pub fn get_gpa_distribution(&self) -> ApiResult<GpaDistribution> {
        let at_risk = self.threshold(ThresholdKind::AtRisk, "get_gpa_distribution")?;
        let excellent = self.threshold(ThresholdKind::Excellent, "get_gpa_distribution")?;
        let students = self.snapshot("get_gpa_distribution")?;
        Ok(ReportEngine::distribution(&students, at_risk, excellent))
    }

    /// 各年级人数
    #[instrument(skip(self))]
    pub fn get_level_breakdown(&self) -> ApiResult<Vec<LevelCount>> {
        Ok(ReportEngine::level_breakdown(&self.snapshot("get_level_breakdown")?))
    }

    /// 驾驶舱（同一快照计算全部指标）
    #[instrument(skip(self))]
    pub fn get_dashboard(&self) -> ApiResult<DashboardSnapshot> {
        let thresholds = self.load_thresholds("get_dashboard")?;
        Ok(ReportEngine::dashboard(&self.snapshot("get_dashboard")?, &thresholds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::thresholds::{InMemoryThresholdStore, ThresholdConfig};
    use crate::domain::student::StudentDraft;
    use crate::repository::in_memory::InMemoryStudentRepository;
    use chrono::NaiveDate;

    fn student(id: &str, level: i64, gpa: f64) -> Student {
        let draft = StudentDraft {
            student_id: id.to_string(),
            full_name: "Nana Yeboah".to_string(),
            level,
            gpa,
            ..Default::default()
        };
        Student::create(draft, 1.5, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()).unwrap()
    }

    #[test]
    fn test_empty_roster() {
        let api = ReportApi::new(
            Arc::new(InMemoryStudentRepository::new()),
            Arc::new(InMemoryThresholdStore::default()),
        );
        let summary = api.get_summary_statistics().unwrap();
        assert_eq!(summary.total, 0);
        assert_eq!(summary.average_gpa, 0.0);
    }

    #[test]
    fn test_dashboard_uses_configured_thresholds() {
        let repo = InMemoryStudentRepository::with_students(vec![
            student("S001", 100, 1.8),
            student("S002", 200, 3.0),
            student("S003", 200, 3.9),
        ]);
        let thresholds = InMemoryThresholdStore::new(ThresholdConfig {
            inactive_threshold: 1.5,
            at_risk_threshold: 2.0,
            excellent_threshold: 3.0,
        });
        let api = ReportApi::new(Arc::new(repo), Arc::new(thresholds));

        let dash = api.get_dashboard().unwrap();
        assert_eq!(dash.summary.total, 3);
        assert_eq!(dash.distribution.at_risk, 1);
        assert_eq!(dash.distribution.excellent, 2);
        assert_eq!(dash.distribution.normal, 0);
        assert_eq!(dash.levels[1].count, 2);

        assert_eq!(api.get_gpa_distribution().unwrap(), dash.distribution);
        assert_eq!(api.get_level_breakdown().unwrap(), dash.levels);
    }
}

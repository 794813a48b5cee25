// ==========================================
// 学生名册管理系统 - 配置 API
// ==========================================
// 职责: 阈值查询与修改；非活跃阈值变化触发状态对账
// ==========================================

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use crate::api::audit;
use crate::api::error::{ApiError, ApiResult};
use crate::api::student_api::StudentApi;
use crate::config::thresholds::{ThresholdConfig, ThresholdKind, ThresholdStore};
use crate::domain::action_log::{ActionLog, ActionType, ACTOR_USER};
use crate::engine::status_derivation::ReconciliationOutcome;
use crate::repository::action_log_repo::ActionLogRepository;

pub struct ConfigApi {
    thresholds: Arc<dyn ThresholdStore>,
    student_api: Arc<StudentApi>,
    action_log_repo: Option<Arc<ActionLogRepository>>,
}

impl ConfigApi {
    pub fn new(thresholds: Arc<dyn ThresholdStore>, student_api: Arc<StudentApi>) -> Self {
        Self {
            thresholds,
            student_api,
            action_log_repo: None,
        }
    }

    pub fn with_action_log(mut self, action_log_repo: Arc<ActionLogRepository>) -> Self {
        self.action_log_repo = Some(action_log_repo);
        self
    }

    /// 当前全部阈值
    pub fn get_thresholds(&self) -> ApiResult<ThresholdConfig> {
        self.thresholds
            .load()
            .map_err(|e| self.failure("get_thresholds", e))
    }

    pub fn get_threshold(&self, kind: ThresholdKind) -> ApiResult<f64> {
        self.thresholds
            .get_threshold(kind)
            .map_err(|e| self.failure("get_threshold", e))
    }

    /// 修改阈值
    ///
    /// # 返回
    /// - Some(outcome): 非活跃阈值，附带对账结果
    /// - None: 仅影响报表的阈值
    pub fn set_threshold(
        &self,
        kind: ThresholdKind,
        value: f64,
    ) -> ApiResult<Option<ReconciliationOutcome>> {
        if kind == ThresholdKind::Inactive {
            return self.student_api.set_inactive_threshold(value).map(Some);
        }

        self.thresholds
            .set_threshold(kind, value)
            .map_err(|e| self.failure("set_threshold", e))?;
        info!(key = kind.key(), value, "阈值已更新");

        if let Some(repo) = &self.action_log_repo {
            repo.record_best_effort(
                &ActionLog::new(ActionType::UpdateThreshold, ACTOR_USER)
                    .with_payload(json!({ "key": kind.key(), "value": value })),
            );
        }
        Ok(None)
    }

    /// 阈值快照（JSON）
    pub fn get_config_snapshot(&self) -> ApiResult<String> {
        let cfg = self.get_thresholds()?;
        serde_json::to_string(&cfg).map_err(|e| anyhow::Error::from(e).into())
    }

    fn failure(&self, operation: &str, err: impl Into<ApiError>) -> ApiError {
        audit::storage_failure(self.action_log_repo.as_deref(), operation, None, err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::ErrorKind;
    use crate::config::thresholds::InMemoryThresholdStore;
    use crate::domain::student::StudentDraft;
    use crate::repository::in_memory::InMemoryStudentRepository;

    fn setup() -> (ConfigApi, Arc<StudentApi>) {
        let thresholds: Arc<dyn ThresholdStore> = Arc::new(InMemoryThresholdStore::default());
        let student_api = Arc::new(StudentApi::new(
            Arc::new(InMemoryStudentRepository::new()),
            thresholds.clone(),
        ));
        (ConfigApi::new(thresholds, student_api.clone()), student_api)
    }

    #[test]
    fn test_set_inactive_triggers_sweep() {
        let (config_api, student_api) = setup();
        student_api
            .save_student(StudentDraft {
                student_id: "S001".to_string(),
                full_name: "Abena Osei".to_string(),
                gpa: 1.8,
                ..Default::default()
            })
            .unwrap();

        let outcome = config_api
            .set_threshold(ThresholdKind::Inactive, 2.0)
            .unwrap()
            .unwrap();
        assert_eq!(outcome.changed_count(), 1);
        assert!(!student_api.list_students().unwrap()[0].is_active());
    }

    #[test]
    fn test_set_report_threshold_no_sweep() {
        let (config_api, _) = setup();
        let outcome = config_api
            .set_threshold(ThresholdKind::Excellent, 3.8)
            .unwrap();
        assert!(outcome.is_none());
        assert_eq!(config_api.get_threshold(ThresholdKind::Excellent).unwrap(), 3.8);

        let snapshot = config_api.get_config_snapshot().unwrap();
        assert!(snapshot.contains("\"excellent_threshold\":3.8"));
    }

    #[test]
    fn test_set_threshold_out_of_range() {
        let (config_api, _) = setup();
        let err = config_api
            .set_threshold(ThresholdKind::AtRisk, 4.2)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}

// ==========================================
// 学生名册管理系统 - 状态派生与对账引擎
// ==========================================
// 职责: 由 GPA 与当前阈值派生 status；阈值变化后规划对账写入
// 红线: 引擎不访问数据库，写入由 StudentApi 经仓储完成
// ==========================================

pub use crate::domain::types::derive_status;

use crate::domain::student::Student;
use crate::domain::types::StudentStatus;
use serde::Serialize;

/// 单条状态变更
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    pub student_id: String,
    pub from: StudentStatus,
    pub to: StudentStatus,
}

/// 一次对账的结果
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconciliationOutcome {
    pub threshold: f64,
    pub scanned: usize,
    pub changes: Vec<StatusChange>,
}

impl ReconciliationOutcome {
    pub fn changed_count(&self) -> usize {
        self.changes.len()
    }
}

// ==========================================
// StatusReconciler - 阈值对账
// ==========================================
pub struct StatusReconciler;

impl StatusReconciler {
    /// 规划一次全量对账
    ///
    /// # 参数
    /// - students: 最新一次 list_all 的结果
    /// - inactive_threshold: 当前生效阈值
    ///
    /// # 返回
    /// 仅包含状态确实发生变化的记录
    pub fn plan(students: &[Student], inactive_threshold: f64) -> ReconciliationOutcome {
        let changes = students
            .iter()
            .filter_map(|s| {
                let derived = derive_status(s.gpa(), inactive_threshold);
                (derived != s.status()).then(|| StatusChange {
                    student_id: s.student_id().to_string(),
                    from: s.status(),
                    to: derived,
                })
            })
            .collect();

        ReconciliationOutcome {
            threshold: inactive_threshold,
            scanned: students.len(),
            changes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::student::StudentDraft;
    use chrono::NaiveDate;

    fn roster(gpas: &[f64], threshold: f64) -> Vec<Student> {
        gpas.iter()
            .enumerate()
            .map(|(i, gpa)| {
                let draft = StudentDraft {
                    student_id: format!("STU{:03}", i + 1),
                    full_name: "Kofi Mensah".to_string(),
                    gpa: *gpa,
                    ..Default::default()
                };
                Student::create(draft, threshold, NaiveDate::from_ymd_opt(2025, 1, 6).unwrap())
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_plan_no_changes_when_consistent() {
        let students = roster(&[1.0, 1.6, 2.0, 3.9], 1.5);
        let outcome = StatusReconciler::plan(&students, 1.5);
        assert_eq!(outcome.scanned, 4);
        assert!(outcome.changes.is_empty());
    }

    #[test]
    fn test_plan_raising_threshold() {
        let students = roster(&[1.0, 1.6, 2.0, 3.9], 1.5);
        let outcome = StatusReconciler::plan(&students, 2.5);

        let ids: Vec<&str> = outcome.changes.iter().map(|c| c.student_id.as_str()).collect();
        assert_eq!(ids, vec!["STU002", "STU003"]);
        assert!(outcome
            .changes
            .iter()
            .all(|c| c.from == StudentStatus::Active && c.to == StudentStatus::Inactive));
    }

    #[test]
    fn test_plan_lowering_threshold_reactivates() {
        let students = roster(&[1.0, 1.6, 2.0, 3.9], 2.5);
        let outcome = StatusReconciler::plan(&students, 1.5);
        assert_eq!(outcome.changed_count(), 2);
        assert!(outcome.changes.iter().all(|c| c.to == StudentStatus::Active));
    }

    #[test]
    fn test_boundary_equal_threshold_is_active() {
        assert_eq!(derive_status(1.5, 1.5), StudentStatus::Active);
        assert_eq!(derive_status(1.49, 1.5), StudentStatus::Inactive);
    }
}

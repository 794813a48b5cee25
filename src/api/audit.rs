// ==========================================
// 学生名册管理系统 - 故障记录
// ==========================================
// 职责: 各 API 的错误出口
// 红线: 存储类故障必须写错误日志 + STORAGE_ERROR 操作日志（尽力而为）
// ==========================================

use tracing::{error, warn};

use crate::api::error::{ApiError, ErrorKind};
use crate::domain::action_log::{ActionLog, ActionType, ACTOR_SYSTEM};
use crate::repository::action_log_repo::ActionLogRepository;

/// 记录失败并原样返回错误
///
/// # 参数
/// - action_log_repo: 未挂载时只写 tracing 日志
/// - operation: 出错的 API 操作名
/// - student_id: 关联学号（批量/只读操作为 None）
pub(crate) fn storage_failure(
    action_log_repo: Option<&ActionLogRepository>,
    operation: &str,
    student_id: Option<&str>,
    err: ApiError,
) -> ApiError {
    if err.kind() != ErrorKind::Storage {
        warn!(operation, student_id, error = %err, "操作被拒绝");
        return err;
    }

    error!(operation, student_id, error = %err, "存储操作失败");
    if let Some(repo) = action_log_repo {
        let mut log = ActionLog::new(ActionType::StorageError, ACTOR_SYSTEM)
            .with_detail(format!("{}: {}", operation, err));
        if let Some(id) = student_id {
            log = log.with_student(id);
        }
        repo.record_best_effort(&log);
    }
    err
}

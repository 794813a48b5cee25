// ==========================================
// 学生名册管理系统 - 操作日志领域模型
// ==========================================
// 红线: 所有写入必须记录（尽力而为，记录失败不影响主流程）
// 对齐: action_log 表
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// 用户直接操作
pub const ACTOR_USER: &str = "user";

/// 系统自动操作（阈值对账等）
pub const ACTOR_SYSTEM: &str = "system";

// ==========================================
// ActionLog - 操作日志
// ==========================================
// 用途: 审计追踪 + 存储故障记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLog {
    pub action_id: String,              // 日志ID (UUID)
    pub action_type: String,            // 操作类型 (ActionType::as_str)
    pub action_ts: NaiveDateTime,       // 操作时间戳
    pub actor: String,                  // 操作人
    pub student_id: Option<String>,     // 关联学号 (批量操作为 None)
    pub payload_json: Option<JsonValue>, // 操作参数 (JSON)
    pub detail: Option<String>,         // 详细描述
}

impl ActionLog {
    /// 创建一条当前时刻的操作日志
    pub fn new(action_type: ActionType, actor: &str) -> Self {
        Self {
            action_id: uuid::Uuid::new_v4().to_string(),
            action_type: action_type.as_str().to_string(),
            action_ts: chrono::Local::now().naive_local(),
            actor: actor.to_string(),
            student_id: None,
            payload_json: None,
            detail: None,
        }
    }

    pub fn with_student(mut self, student_id: &str) -> Self {
        self.student_id = Some(student_id.to_string());
        self
    }

    pub fn with_payload(mut self, payload: JsonValue) -> Self {
        self.payload_json = Some(payload);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

// ==========================================
// ActionType - 操作类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    AddStudent,      // 新增学生
    UpdateStudent,   // 修改学生
    DeleteStudent,   // 删除学生
    StatusSweep,     // 阈值对账（状态批量重算）
    UpdateThreshold, // 修改阈值
    Import,          // 文本导入
    Export,          // 文本导出
    StorageError,    // 存储故障
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::AddStudent => "ADD_STUDENT",
            ActionType::UpdateStudent => "UPDATE_STUDENT",
            ActionType::DeleteStudent => "DELETE_STUDENT",
            ActionType::StatusSweep => "STATUS_SWEEP",
            ActionType::UpdateThreshold => "UPDATE_THRESHOLD",
            ActionType::Import => "IMPORT",
            ActionType::Export => "EXPORT",
            ActionType::StorageError => "STORAGE_ERROR",
        }
    }
}

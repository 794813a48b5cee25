// ==========================================
// 学生名册管理系统 - 新建学生校验器
// ==========================================
// 校验顺序: 学号 → 姓名 → GPA，首个失败即返回
// 红线: 校验失败不得产生任何持久化写入
// ==========================================

use crate::domain::error::ValidationError;
use crate::domain::student::{validate_gpa, StudentDraft, MIN_STUDENT_ID_LEN};

#[derive(Debug, Clone, Copy, Default)]
pub struct StudentValidator;

impl StudentValidator {
    pub fn new() -> Self {
        Self
    }

    /// 校验新建学生草稿
    pub fn validate_new(&self, draft: &StudentDraft) -> Result<(), ValidationError> {
        self.validate_student_id(&draft.student_id)?;
        self.validate_full_name(&draft.full_name)?;
        validate_gpa(draft.gpa)
    }

    pub fn validate_student_id(&self, student_id: &str) -> Result<(), ValidationError> {
        if student_id.trim().chars().count() < MIN_STUDENT_ID_LEN {
            return Err(ValidationError::InvalidId {
                student_id: student_id.to_string(),
                min_len: MIN_STUDENT_ID_LEN,
            });
        }
        Ok(())
    }

    pub fn validate_full_name(&self, full_name: &str) -> Result<(), ValidationError> {
        if full_name.trim().is_empty() {
            return Err(ValidationError::InvalidName {
                full_name: full_name.to_string(),
                reason: "姓名不能为空".to_string(),
            });
        }
        if full_name.chars().any(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidName {
                full_name: full_name.to_string(),
                reason: "姓名不能包含数字".to_string(),
            });
        }
        Ok(())
    }
}

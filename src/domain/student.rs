// ==========================================
// 学生名册管理系统 - 学生领域模型
// ==========================================
// 对齐: students 表 (student_id 主键)
// 红线: student_id 创建后不可变; status 只能经 derive_status 写入
// ==========================================

use crate::domain::error::ValidationError;
use crate::domain::types::{derive_status, Level, StudentStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 学号最小长度
pub const MIN_STUDENT_ID_LEN: usize = 4;

/// GPA 下限（闭区间）
pub const GPA_MIN: f64 = 0.0;

/// GPA 上限（闭区间）
pub const GPA_MAX: f64 = 4.0;

/// 自动生成邮箱的域名
pub const EMAIL_DOMAIN: &str = "school.edu";

/// 校验 GPA 位于 [0.0, 4.0]（NaN/无穷视为越界）
pub fn validate_gpa(gpa: f64) -> Result<(), ValidationError> {
    if gpa.is_finite() && (GPA_MIN..=GPA_MAX).contains(&gpa) {
        Ok(())
    } else {
        Err(ValidationError::InvalidGpa { gpa })
    }
}

/// 由姓名生成邮箱: 小写 + 空白替换为点
///
/// 例: "Ama Owusu" → "ama.owusu@school.edu"
pub fn generate_email(full_name: &str) -> String {
    let local = full_name
        .split_whitespace()
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join(".");
    format!("{}@{}", local, EMAIL_DOMAIN)
}

// ==========================================
// StudentDraft - 新建学生输入
// ==========================================
// 用途: 界面录入 / 文本导入的中间产物，尚未校验
// 生命周期: 仅在 save_student 流程内
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentDraft {
    pub student_id: String,
    pub full_name: String,
    pub programme: String,
    pub level: i64,                    // 原始年级值（校验后转为 Level）
    pub gpa: f64,
    pub email: Option<String>,         // None/空串 → 按姓名自动生成
    pub phone_number: String,
    pub date_added: Option<NaiveDate>, // None → 创建当天
}

impl Default for StudentDraft {
    fn default() -> Self {
        Self {
            student_id: String::new(),
            full_name: String::new(),
            programme: String::new(),
            level: Level::L100.as_i64(),
            gpa: 0.0,
            email: None,
            phone_number: String::new(),
            date_added: None,
        }
    }
}

// ==========================================
// Student - 学生记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Student {
    // ===== 主键（不可变）=====
    student_id: String,

    // ===== 可变信息 =====
    pub full_name: String,
    pub programme: String,
    pub level: Level,
    pub email: String,
    pub phone_number: String,

    // ===== 创建时写入，之后不再变化 =====
    pub date_added: NaiveDate,

    // ===== GPA 与派生状态（只能经 set_gpa 同步修改）=====
    gpa: f64,
    status: StudentStatus,
}

impl Student {
    /// 由输入草稿创建学生记录（学号去除首尾空白后存储）
    ///
    /// # 参数
    /// - draft: 输入草稿
    /// - inactive_threshold: 当前非活跃阈值
    /// - today: 创建日期（草稿未指定 date_added 时使用）
    ///
    /// # 返回
    /// - Err(ValidationError): GPA 越界或年级不在枚举集合内
    pub fn create(
        draft: StudentDraft,
        inactive_threshold: f64,
        today: NaiveDate,
    ) -> Result<Self, ValidationError> {
        validate_gpa(draft.gpa)?;
        let level = Level::try_from(draft.level)?;

        let email = match draft.email {
            Some(e) if !e.trim().is_empty() => e.trim().to_string(),
            _ => generate_email(&draft.full_name),
        };

        Ok(Self {
            student_id: draft.student_id.trim().to_string(),
            full_name: draft.full_name,
            programme: draft.programme,
            level,
            gpa: draft.gpa,
            email,
            phone_number: draft.phone_number,
            date_added: draft.date_added.unwrap_or(today),
            status: derive_status(draft.gpa, inactive_threshold),
        })
    }

    /// 从存储行还原（信任 schema 约束，保留已存储的 email 与 status）
    #[allow(clippy::too_many_arguments)]
    pub fn from_storage(
        student_id: String,
        full_name: String,
        programme: String,
        level: Level,
        gpa: f64,
        email: String,
        phone_number: String,
        date_added: NaiveDate,
        status: StudentStatus,
    ) -> Self {
        Self {
            student_id,
            full_name,
            programme,
            level,
            gpa,
            email,
            phone_number,
            date_added,
            status,
        }
    }

    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    pub fn gpa(&self) -> f64 {
        self.gpa
    }

    pub fn status(&self) -> StudentStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == StudentStatus::Active
    }

    /// 修改 GPA 并按当前阈值重新派生状态
    pub fn set_gpa(&mut self, gpa: f64, inactive_threshold: f64) -> Result<(), ValidationError> {
        validate_gpa(gpa)?;
        self.gpa = gpa;
        self.refresh_status(inactive_threshold);
        Ok(())
    }

    /// 按阈值重新派生状态
    ///
    /// # 返回
    /// - true: 状态发生变化
    pub fn refresh_status(&mut self, inactive_threshold: f64) -> bool {
        let derived = derive_status(self.gpa, inactive_threshold);
        let changed = derived != self.status;
        self.status = derived;
        changed
    }
}

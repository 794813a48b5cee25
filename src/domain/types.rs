// ==========================================
// 学生名册管理系统 - 领域类型定义
// ==========================================
// 红线: status 为派生字段,唯一来源是 derive_status
// ==========================================

use crate::domain::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 年级 (Level)
// ==========================================
// 枚举集合: 100/200/300/400/500/600/700
// 序列化格式: 整数 (与数据库一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Level {
    L100,
    L200,
    L300,
    L400,
    L500,
    L600,
    L700,
}

impl Level {
    /// 全部年级（升序）
    pub const ALL: [Level; 7] = [
        Level::L100,
        Level::L200,
        Level::L300,
        Level::L400,
        Level::L500,
        Level::L600,
        Level::L700,
    ];

    /// 转换为数据库整数值
    pub fn as_i64(self) -> i64 {
        match self {
            Level::L100 => 100,
            Level::L200 => 200,
            Level::L300 => 300,
            Level::L400 => 400,
            Level::L500 => 500,
            Level::L600 => 600,
            Level::L700 => 700,
        }
    }

    /// 从整数值解析（不在枚举集合内返回 None）
    pub fn from_i64(value: i64) -> Option<Self> {
        Level::ALL.iter().copied().find(|l| l.as_i64() == value)
    }
}

impl TryFrom<i64> for Level {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Level::from_i64(value).ok_or(ValidationError::InvalidLevel { level: value })
    }
}

impl From<Level> for i64 {
    fn from(level: Level) -> Self {
        level.as_i64()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i64())
    }
}

// ==========================================
// 在读状态 (Student Status)
// ==========================================
// 序列化格式: Active / Inactive (与数据库 CHECK 约束一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StudentStatus {
    Active,   // 在读
    Inactive, // 非活跃（GPA 低于阈值）
}

impl StudentStatus {
    /// 数据库存储值
    pub fn as_str(&self) -> &'static str {
        match self {
            StudentStatus::Active => "Active",
            StudentStatus::Inactive => "Inactive",
        }
    }

    /// 解析状态文本（忽略大小写与首尾空白）
    pub fn parse(value: &str) -> Option<Self> {
        let v = value.trim();
        if v.eq_ignore_ascii_case("active") {
            Some(StudentStatus::Active)
        } else if v.eq_ignore_ascii_case("inactive") {
            Some(StudentStatus::Inactive)
        } else {
            None
        }
    }
}

impl fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==========================================
// 状态派生规则
// ==========================================

/// 由 GPA 与非活跃阈值派生在读状态
///
/// 规则: `gpa < threshold` → Inactive，否则 Active（阈值本身算 Active）
pub fn derive_status(gpa: f64, inactive_threshold: f64) -> StudentStatus {
    if gpa < inactive_threshold {
        StudentStatus::Inactive
    } else {
        StudentStatus::Active
    }
}

// ==========================================
// 学生名册管理系统 - 报表值对象
// ==========================================
// 用途: ReportEngine 输出，供界面图表展示
// ==========================================

use crate::domain::types::Level;
use serde::Serialize;

/// 汇总统计
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub total: usize,
    pub active: usize,
    pub inactive: usize, // total - active
    pub average_gpa: f64, // 空集合为 0.0
}

/// GPA 分布（三档互斥，合计等于总数）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GpaDistribution {
    pub excellent: usize, // gpa >= excellent_threshold
    pub normal: usize,    // 其余
    pub at_risk: usize,   // gpa < at_risk_threshold
}

/// 年级人数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelCount {
    pub level: Level,
    pub count: usize,
}

/// 驾驶舱快照（同一次 list_all 计算）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub summary: SummaryStatistics,
    pub distribution: GpaDistribution,
    pub levels: Vec<LevelCount>,
}

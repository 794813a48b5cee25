// ==========================================
// 学生名册管理系统 - 报表聚合引擎
// ==========================================
// 职责: 基于一次 list_all 快照做只读聚合
// 红线: 纯函数，不读库、不缓存；阈值由调用方传入
// ==========================================

use crate::config::thresholds::{ThresholdConfig, TOP_PERFORMER_CUTOFF};
use crate::domain::report::{DashboardSnapshot, GpaDistribution, LevelCount, SummaryStatistics};
use crate::domain::student::Student;
use crate::domain::types::Level;

// ==========================================
// ReportEngine - 报表聚合引擎
// ==========================================
pub struct ReportEngine;

impl ReportEngine {
    /// 汇总统计
    ///
    /// active 取自已存储的 status；inactive = total - active
    pub fn summary(students: &[Student]) -> SummaryStatistics {
        let total = students.len();
        let active = students.iter().filter(|s| s.is_active()).count();
        let average_gpa = if total == 0 {
            0.0
        } else {
            students.iter().map(|s| s.gpa()).sum::<f64>() / total as f64
        };

        SummaryStatistics {
            total,
            active,
            inactive: total - active,
            average_gpa,
        }
    }

    /// GPA 三档分布
    ///
    /// 判定顺序: at_risk → excellent → normal（阈值交叉时预警优先）
    pub fn distribution(
        students: &[Student],
        at_risk_threshold: f64,
        excellent_threshold: f64,
    ) -> GpaDistribution {
        let mut dist = GpaDistribution {
            excellent: 0,
            normal: 0,
            at_risk: 0,
        };

        for s in students {
            if s.gpa() < at_risk_threshold {
                dist.at_risk += 1;
            } else if s.gpa() >= excellent_threshold {
                dist.excellent += 1;
            } else {
                dist.normal += 1;
            }
        }
        dist
    }

    /// 各年级人数（包含 0 人年级，按年级升序）
    pub fn level_breakdown(students: &[Student]) -> Vec<LevelCount> {
        Level::ALL
            .iter()
            .map(|&level| LevelCount {
                level,
                count: students.iter().filter(|s| s.level == level).count(),
            })
            .collect()
    }

    /// 优秀学生: gpa >= 3.5（固定分界线）
    pub fn top_performers(students: &[Student]) -> Vec<Student> {
        students
            .iter()
            .filter(|s| s.gpa() >= TOP_PERFORMER_CUTOFF)
            .cloned()
            .collect()
    }

    /// 预警学生: gpa < at_risk_threshold
    pub fn at_risk(students: &[Student], at_risk_threshold: f64) -> Vec<Student> {
        students
            .iter()
            .filter(|s| s.gpa() < at_risk_threshold)
            .cloned()
            .collect()
    }

    /// 按姓名或学号模糊搜索（大小写不敏感；空串返回全部）
    pub fn search(students: &[Student], query: &str) -> Vec<Student> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return students.to_vec();
        }

        students
            .iter()
            .filter(|s| {
                s.full_name.to_lowercase().contains(&needle)
                    || s.student_id().to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    /// 驾驶舱快照
    pub fn dashboard(students: &[Student], thresholds: &ThresholdConfig) -> DashboardSnapshot {
        DashboardSnapshot {
            summary: Self::summary(students),
            distribution: Self::distribution(
                students,
                thresholds.at_risk_threshold,
                thresholds.excellent_threshold,
            ),
            levels: Self::level_breakdown(students),
        }
    }
}

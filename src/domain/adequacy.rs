// ==========================================
// 人员配置预测系统 - 人员配置评估领域模型
// ==========================================
// 规则: 需求人数 = ceil(次月总产量 / 本月最优产能)
//       实际 > 需求 → 超配; 实际 < 需求 → 欠配; 相等 → 适当
//       产能未定义或 ≤ 0 → 无法判定, 需求人数为空
// ==========================================

use crate::domain::types::{AdequacyLabel, YearMonth};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// ==========================================
// AdequacyRecord - 相邻月份评估记录
// ==========================================
// year/month 为"本月"(提供产能), next_* 为次月实际
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdequacyRecord {
    pub year: i32,
    pub month: u32,
    pub optimal_capacity: Option<u64>,
    pub next_total_production: u64,
    pub next_real_workers: u64,
    pub next_required_workers: Option<u64>,
    pub label: AdequacyLabel,
}

impl AdequacyRecord {
    pub fn period(&self) -> YearMonth {
        YearMonth::new(self.year, self.month)
    }

    /// 分类器特征向量: [年, 月, 最优产能, 次月总产量]
    ///
    /// 产能未定义时返回 None (此类记录同时也是 Indeterminate)
    pub fn feature_vector(&self) -> Option<[f64; 4]> {
        self.optimal_capacity.map(|cap| {
            staffing_features(self.year, self.month, cap, self.next_total_production)
        })
    }
}

/// 构造分类器特征 (训练与预测共用同一口径)
pub fn staffing_features(year: i32, month: u32, capacity: u64, next_production: u64) -> [f64; 4] {
    [
        f64::from(year),
        f64::from(month),
        capacity as f64,
        next_production as f64,
    ]
}

// ==========================================
// StaffingAssessment - 规则评估结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffingAssessment {
    pub required_workers: Option<u64>,
    pub label: AdequacyLabel,
}

impl StaffingAssessment {
    /// 以本月产能评估次月人员配置
    ///
    /// # 参数
    /// - `capacity`: 本月最优产能 (None 表示无有效人员)
    /// - `next_total_production`: 次月总产量
    /// - `next_real_workers`: 次月实际有效人数
    pub fn evaluate(
        capacity: Option<u64>,
        next_total_production: u64,
        next_real_workers: u64,
    ) -> Self {
        let Some(required) = required_workers(next_total_production, capacity) else {
            return Self {
                required_workers: None,
                label: AdequacyLabel::Indeterminate,
            };
        };

        let label = match next_real_workers.cmp(&required) {
            Ordering::Greater => AdequacyLabel::Overstaffed,
            Ordering::Less => AdequacyLabel::Understaffed,
            Ordering::Equal => AdequacyLabel::Adequate,
        };

        Self {
            required_workers: Some(required),
            label,
        }
    }
}

/// 需求人数: 产量按产能向上取整
pub fn required_workers(total_production: u64, capacity: Option<u64>) -> Option<u64> {
    capacity
        .filter(|cap| *cap > 0)
        .map(|cap| total_production.div_ceil(cap))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_workers_ceiling() {
        assert_eq!(required_workers(100, Some(20)), Some(5));
        assert_eq!(required_workers(101, Some(20)), Some(6));
        assert_eq!(required_workers(0, Some(20)), Some(0));
        assert_eq!(required_workers(100, Some(0)), None);
        assert_eq!(required_workers(100, None), None);
    }

    #[test]
    fn test_evaluate_three_way() {
        assert_eq!(
            StaffingAssessment::evaluate(Some(20), 100, 6).label,
            AdequacyLabel::Overstaffed
        );
        assert_eq!(
            StaffingAssessment::evaluate(Some(20), 100, 4).label,
            AdequacyLabel::Understaffed
        );
        assert_eq!(
            StaffingAssessment::evaluate(Some(20), 100, 5).label,
            AdequacyLabel::Adequate
        );
    }

    #[test]
    fn test_evaluate_without_capacity() {
        let assessment = StaffingAssessment::evaluate(None, 100, 5);
        assert_eq!(assessment.label, AdequacyLabel::Indeterminate);
        assert_eq!(assessment.required_workers, None);

        let assessment = StaffingAssessment::evaluate(Some(0), 100, 5);
        assert_eq!(assessment.label, AdequacyLabel::Indeterminate);
    }

    #[test]
    fn test_feature_vector() {
        let record = AdequacyRecord {
            year: 2024,
            month: 3,
            optimal_capacity: Some(20),
            next_total_production: 100,
            next_real_workers: 6,
            next_required_workers: Some(5),
            label: AdequacyLabel::Overstaffed,
        };
        assert_eq!(record.feature_vector(), Some([2024.0, 3.0, 20.0, 100.0]));

        let record = AdequacyRecord {
            optimal_capacity: None,
            next_required_workers: None,
            label: AdequacyLabel::Indeterminate,
            ..record
        };
        assert_eq!(record.feature_vector(), None);
    }
}

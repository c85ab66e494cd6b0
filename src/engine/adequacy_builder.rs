// ==========================================
// 人员配置预测系统 - 配置评估数据集构建
// ==========================================
// 输入: MonthlyCapacity 序列 (年月升序)
// 输出: 长度 max(0, N-1) 的 AdequacyRecord 序列
// 规则: 第 i 月提供产能, 第 i+1 月提供产量与人数
// ==========================================

use crate::domain::adequacy::{AdequacyRecord, StaffingAssessment};
use crate::domain::capacity::MonthlyCapacity;
use tracing::instrument;

#[derive(Debug, Clone, Default)]
pub struct AdequacyDatasetBuilder;

impl AdequacyDatasetBuilder {
    pub fn new() -> Self {
        Self
    }

    /// 构建相邻月份评估数据集 (纯函数, 可重复执行)
    #[instrument(skip(self, monthly), fields(months = monthly.len()))]
    pub fn build(&self, monthly: &[MonthlyCapacity]) -> Vec<AdequacyRecord> {
        let dataset: Vec<AdequacyRecord> = monthly
            .windows(2)
            .map(|pair| Self::assess_pair(&pair[0], &pair[1]))
            .collect();

        tracing::debug!(records = dataset.len(), "配置评估数据集构建完成");
        dataset
    }

    fn assess_pair(current: &MonthlyCapacity, next: &MonthlyCapacity) -> AdequacyRecord {
        let assessment = StaffingAssessment::evaluate(
            current.optimal_capacity,
            next.total_production,
            next.real_workers,
        );

        AdequacyRecord {
            year: current.year,
            month: current.month,
            optimal_capacity: current.optimal_capacity,
            next_total_production: next.total_production,
            next_real_workers: next.real_workers,
            next_required_workers: assessment.required_workers,
            label: assessment.label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::AdequacyLabel;

    fn month(month: u32, capacity: Option<u64>, production: u64, workers: u64) -> MonthlyCapacity {
        MonthlyCapacity {
            year: 2024,
            month,
            optimal_capacity: capacity,
            max_productivity: capacity,
            min_productivity: capacity,
            active_workers: workers,
            total_production: production,
            real_workers: workers,
        }
    }

    #[test]
    fn test_build_pairs_consecutive_months() {
        let monthly = vec![
            month(3, Some(20), 60, 3),
            month(4, Some(25), 100, 6),
            month(5, Some(25), 100, 3),
        ];

        let dataset = AdequacyDatasetBuilder::new().build(&monthly);

        assert_eq!(dataset.len(), 2);
        // 3月产能 20, 4月产量 100 → 需求 5, 实际 6 → 超配
        assert_eq!(dataset[0].month, 3);
        assert_eq!(dataset[0].optimal_capacity, Some(20));
        assert_eq!(dataset[0].next_total_production, 100);
        assert_eq!(dataset[0].next_real_workers, 6);
        assert_eq!(dataset[0].next_required_workers, Some(5));
        assert_eq!(dataset[0].label, AdequacyLabel::Overstaffed);
        // 4月产能 25, 5月产量 100 → 需求 4, 实际 3 → 欠配
        assert_eq!(dataset[1].next_required_workers, Some(4));
        assert_eq!(dataset[1].label, AdequacyLabel::Understaffed);
    }

    #[test]
    fn test_build_indeterminate_when_capacity_missing() {
        let monthly = vec![month(7, None, 0, 0), month(8, Some(10), 50, 5)];

        let dataset = AdequacyDatasetBuilder::new().build(&monthly);

        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset[0].label, AdequacyLabel::Indeterminate);
        assert_eq!(dataset[0].next_required_workers, None);
        assert_eq!(dataset[0].optimal_capacity, None);
    }

    #[test]
    fn test_build_indeterminate_when_capacity_zero() {
        let monthly = vec![month(7, Some(0), 0, 2), month(8, Some(10), 50, 5)];

        let dataset = AdequacyDatasetBuilder::new().build(&monthly);

        assert_eq!(dataset[0].label, AdequacyLabel::Indeterminate);
        assert_eq!(dataset[0].optimal_capacity, Some(0));
    }

    #[test]
    fn test_build_short_series() {
        let builder = AdequacyDatasetBuilder::new();
        assert!(builder.build(&[]).is_empty());
        assert!(builder.build(&[month(1, Some(10), 10, 1)]).is_empty());
    }
}

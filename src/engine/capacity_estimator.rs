// ==========================================
// 人员配置预测系统 - 月度产能估算引擎
// ==========================================
// 输入: 归一化生产记录 (全量)
// 输出: 每个 (年, 月) 一行 MonthlyCapacity, 按年月升序
// ==========================================
// 红线: 无有效人员的月份不报错, 产能字段为 None, active_workers = 0
// ==========================================

use crate::domain::capacity::{midpoint_capacity, MonthlyCapacity};
use crate::domain::production::ProductionRecord;
use crate::domain::types::YearMonth;
use std::collections::{BTreeMap, BTreeSet};
use tracing::instrument;

// ==========================================
// CapacityEstimator - 月度产能估算引擎
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct CapacityEstimator {
    // 无状态引擎
}

impl CapacityEstimator {
    pub fn new() -> Self {
        Self {}
    }

    /// 按月估算最优产能
    ///
    /// # 规则
    /// 1) 有效人员 = 未休假且未请假
    /// 2) 按用户汇总有效产量, 取最高值与最低正值 (无正值时回退为最高值)
    /// 3) 最优产能 = 两者中点, 四舍五入远离零
    /// 4) 总产量统计当月全部记录 (含休假/请假)
    #[instrument(skip(self, records), fields(records_count = records.len()))]
    pub fn estimate(&self, records: &[ProductionRecord]) -> Vec<MonthlyCapacity> {
        let mut by_month: BTreeMap<YearMonth, Vec<&ProductionRecord>> = BTreeMap::new();
        for record in records {
            by_month.entry(record.period()).or_default().push(record);
        }

        let rows: Vec<MonthlyCapacity> = by_month
            .into_iter()
            .map(|(period, month_records)| self.estimate_month(period, &month_records))
            .collect();

        tracing::info!(months = rows.len(), "月度产能估算完成");
        rows
    }

    fn estimate_month(&self, period: YearMonth, records: &[&ProductionRecord]) -> MonthlyCapacity {
        // 1. 有效人员按用户汇总
        let mut per_user: BTreeMap<&str, u64> = BTreeMap::new();
        for record in records.iter().filter(|r| r.is_eligible()) {
            let sum = per_user.entry(record.user.as_str()).or_insert(0);
            *sum = sum.saturating_add(record.folio_count);
        }

        // 2. 当月总量 (不区分是否有效)
        let total_production = records
            .iter()
            .fold(0u64, |acc, r| acc.saturating_add(r.folio_count));
        let real_workers = Self::count_real_workers(records);

        let Some(max_productivity) = per_user.values().copied().max() else {
            tracing::debug!(period = %period, "当月无有效人员, 产能置空");
            return MonthlyCapacity {
                year: period.year,
                month: period.month,
                optimal_capacity: None,
                max_productivity: None,
                min_productivity: None,
                active_workers: 0,
                total_production,
                real_workers,
            };
        };

        let min_productivity = per_user
            .values()
            .copied()
            .filter(|sum| *sum > 0)
            .min()
            .unwrap_or(max_productivity);

        let optimal_capacity = midpoint_capacity(max_productivity, min_productivity);
        let active_workers = per_user.len() as u64;

        if active_workers != real_workers {
            tracing::warn!(
                period = %period,
                active_workers,
                real_workers,
                "有效人数与实际人数不一致"
            );
        }

        MonthlyCapacity {
            year: period.year,
            month: period.month,
            optimal_capacity: Some(optimal_capacity),
            max_productivity: Some(max_productivity),
            min_productivity: Some(min_productivity),
            active_workers,
            total_production,
            real_workers,
        }
    }

    /// 实际人数: 当月有效用户去重计数 (独立于产能口径重新统计)
    fn count_real_workers(records: &[&ProductionRecord]) -> u64 {
        records
            .iter()
            .filter(|r| !r.is_on_vacation && !r.is_on_leave)
            .map(|r| r.user.as_str())
            .collect::<BTreeSet<_>>()
            .len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(year: i32, month: u32, user: &str, vac: bool, lic: bool, folios: u64) -> ProductionRecord {
        ProductionRecord {
            year,
            month,
            user: user.to_string(),
            is_on_vacation: vac,
            is_on_leave: lic,
            folio_count: folios,
        }
    }

    #[test]
    fn test_estimate_basic_midpoint() {
        let records = vec![
            record(2024, 3, "ana", false, false, 10),
            record(2024, 3, "bruno", false, false, 20),
            record(2024, 3, "carla", false, false, 30),
        ];

        let rows = CapacityEstimator::new().estimate(&records);

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.optimal_capacity, Some(20));
        assert_eq!(row.max_productivity, Some(30));
        assert_eq!(row.min_productivity, Some(10));
        assert_eq!(row.active_workers, 3);
        assert_eq!(row.real_workers, 3);
        assert_eq!(row.total_production, 60);
    }

    #[test]
    fn test_estimate_ineligible_counted_in_total_only() {
        let records = vec![
            record(2024, 3, "ana", false, false, 10),
            record(2024, 3, "bruno", false, false, 30),
            record(2024, 3, "carla", true, false, 500),
            record(2024, 3, "diego", false, true, 7),
        ];

        let row = &CapacityEstimator::new().estimate(&records)[0];

        assert_eq!(row.optimal_capacity, Some(20));
        assert_eq!(row.active_workers, 2);
        assert_eq!(row.real_workers, 2);
        assert_eq!(row.total_production, 547);
    }

    #[test]
    fn test_estimate_sums_per_user_across_records() {
        // 同一用户在月内既有有效记录又有休假记录: 仅有效部分计入产能
        let records = vec![
            record(2024, 5, "ana", false, false, 8),
            record(2024, 5, "ana", true, false, 4),
            record(2024, 5, "bruno", false, false, 12),
        ];

        let row = &CapacityEstimator::new().estimate(&records)[0];

        assert_eq!(row.max_productivity, Some(12));
        assert_eq!(row.min_productivity, Some(8));
        assert_eq!(row.optimal_capacity, Some(10));
        assert_eq!(row.real_workers, 2);
        assert_eq!(row.total_production, 24);
    }

    #[test]
    fn test_estimate_min_falls_back_to_max() {
        let records = vec![
            record(2024, 6, "ana", false, false, 0),
            record(2024, 6, "bruno", false, false, 0),
        ];

        let row = &CapacityEstimator::new().estimate(&records)[0];

        assert_eq!(row.max_productivity, Some(0));
        assert_eq!(row.min_productivity, Some(0));
        assert_eq!(row.optimal_capacity, Some(0));
        assert_eq!(row.active_workers, 2);
    }

    #[test]
    fn test_estimate_zero_output_ignored_for_min() {
        let records = vec![
            record(2024, 6, "ana", false, false, 0),
            record(2024, 6, "bruno", false, false, 40),
        ];

        let row = &CapacityEstimator::new().estimate(&records)[0];

        assert_eq!(row.min_productivity, Some(40));
        assert_eq!(row.optimal_capacity, Some(40));
        assert_eq!(row.active_workers, 2);
    }

    #[test]
    fn test_estimate_everyone_absent() {
        let records = vec![
            record(2024, 8, "ana", true, false, 10),
            record(2024, 8, "bruno", false, true, 15),
        ];

        let row = &CapacityEstimator::new().estimate(&records)[0];

        assert_eq!(row.optimal_capacity, None);
        assert_eq!(row.max_productivity, None);
        assert_eq!(row.min_productivity, None);
        assert_eq!(row.active_workers, 0);
        assert_eq!(row.real_workers, 0);
        assert_eq!(row.total_production, 25);
    }

    #[test]
    fn test_estimate_sorted_by_period() {
        let records = vec![
            record(2024, 2, "ana", false, false, 10),
            record(2023, 12, "ana", false, false, 10),
            record(2024, 1, "ana", false, false, 10),
        ];

        let periods: Vec<_> = CapacityEstimator::new()
            .estimate(&records)
            .iter()
            .map(|r| r.period())
            .collect();

        assert_eq!(
            periods,
            vec![
                YearMonth::new(2023, 12),
                YearMonth::new(2024, 1),
                YearMonth::new(2024, 2)
            ]
        );
    }

    #[test]
    fn test_estimate_empty_input() {
        assert!(CapacityEstimator::new().estimate(&[]).is_empty());
    }

    #[test]
    fn test_estimate_saturates_huge_counts() {
        let records = vec![
            record(2024, 3, "ana", false, false, u64::MAX),
            record(2024, 3, "ana", false, false, 5),
            record(2024, 3, "bruno", true, false, 10),
        ];

        let rows = CapacityEstimator::new().estimate(&records);

        assert_eq!(rows[0].max_productivity, Some(u64::MAX));
        assert_eq!(rows[0].total_production, u64::MAX);
        assert_eq!(rows[0].optimal_capacity, Some(u64::MAX / 2 + 1));
    }
}

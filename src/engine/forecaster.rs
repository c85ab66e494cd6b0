// ==========================================
// 人员配置预测系统 - 缺失月趋势预测引擎
// ==========================================
// 目标月: 最后一个有数据年份中, 从该年首个有报表月份起连续段之后的首个缺失月
//         (连续到 12 月时为次年 1 月)
// 外推: 产量 = 基准月总产量 + 窗口内环比增量均值, 四舍五入, 不小于 0
// 评估: 需求人数 = ceil(外推产量 / 基准月最优产能), 对比基准月实际人数
// ==========================================
// 红线: 指定月份已有报表或越过缺失月时报错, 不做静默改写
// ==========================================

use crate::domain::adequacy::StaffingAssessment;
use crate::domain::capacity::MonthlyCapacity;
use crate::domain::projection::{BaseMonth, Forecast, ForecastMonth};
use crate::domain::types::YearMonth;
use crate::engine::error::{ProjectionError, ProjectionResult};
use tracing::instrument;

/// 默认趋势窗口 (月数)
pub const DEFAULT_TREND_WINDOW: usize = 3;

// ==========================================
// TrendForecaster - 趋势预测引擎
// ==========================================
#[derive(Debug, Clone)]
pub struct TrendForecaster {
    window: usize,
}

impl Default for TrendForecaster {
    fn default() -> Self {
        Self::new(DEFAULT_TREND_WINDOW)
    }
}

impl TrendForecaster {
    /// 窗口至少为 1
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
        }
    }

    /// 预测首个缺失月份
    ///
    /// # 参数
    /// - `monthly`: 月度产能序列 (无需有序)
    /// - `target`: 指定目标月 (None 表示取首个缺失月)
    ///
    /// # 返回
    /// - Err(EmptySeries): 无月度数据
    /// - Err(TargetMonthHasReport): 指定月份已有报表
    /// - Err(TargetMonthOutOfReach): 指定月份不是首个缺失月
    #[instrument(skip(self, monthly), fields(months = monthly.len()))]
    pub fn forecast(
        &self,
        monthly: &[MonthlyCapacity],
        target: Option<YearMonth>,
    ) -> ProjectionResult<Forecast> {
        let mut ordered: Vec<&MonthlyCapacity> = monthly.iter().collect();
        ordered.sort_by_key(|row| row.period());

        let expected = Self::first_missing_month(&ordered)?;

        if let Some(requested) = target {
            if ordered.iter().any(|row| row.period() == requested) {
                return Err(ProjectionError::TargetMonthHasReport(requested));
            }
            if requested != expected {
                return Err(ProjectionError::TargetMonthOutOfReach {
                    requested,
                    expected,
                });
            }
        }

        // 基准月为目标月前一个月, 连续段保证其存在
        let base_index = ordered
            .iter()
            .rposition(|row| row.period().succ() == expected)
            .ok_or(ProjectionError::EmptySeries)?;
        let base_row = ordered[base_index];

        let window_start = (base_index + 1).saturating_sub(self.window);
        let window = &ordered[window_start..=base_index];
        let (moving_average, trend) = Self::trend(window);

        let projected = (base_row.total_production as f64 + trend).round().max(0.0);
        let total_production = projected as u64;

        let assessment = StaffingAssessment::evaluate(
            base_row.optimal_capacity,
            total_production,
            base_row.real_workers,
        );

        tracing::info!(
            base = %base_row.period(),
            target = %expected,
            total_production,
            rule_label = %assessment.label,
            "缺失月趋势预测完成"
        );

        Ok(Forecast {
            base_month: BaseMonth {
                year: base_row.year,
                month: base_row.month,
                optimal_capacity: base_row.optimal_capacity,
            },
            forecast_month: ForecastMonth {
                year: expected.year,
                month: expected.month,
                moving_average,
                trend,
                total_production,
                baseline_workers: base_row.real_workers,
                required_workers: assessment.required_workers,
                rule_label: assessment.label,
            },
        })
    }

    fn first_missing_month(ordered: &[&MonthlyCapacity]) -> ProjectionResult<YearMonth> {
        let Some(last) = ordered.last() else {
            return Err(ProjectionError::EmptySeries);
        };
        let last_year = last.year;

        let mut cursor = ordered
            .iter()
            .find(|row| row.year == last_year)
            .map(|row| row.period())
            .ok_or(ProjectionError::EmptySeries)?;

        while ordered.iter().any(|row| row.period() == cursor) {
            cursor = cursor.succ();
        }
        Ok(cursor)
    }

    /// (窗口均值, 环比增量均值)
    fn trend(window: &[&MonthlyCapacity]) -> (f64, f64) {
        let totals: Vec<f64> = window.iter().map(|row| row.total_production as f64).collect();
        let moving_average = totals.iter().sum::<f64>() / totals.len() as f64;

        let deltas: Vec<f64> = totals.windows(2).map(|pair| pair[1] - pair[0]).collect();
        let trend = if deltas.is_empty() {
            0.0
        } else {
            deltas.iter().sum::<f64>() / deltas.len() as f64
        };

        (moving_average, trend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::AdequacyLabel;

    fn month(year: i32, month: u32, capacity: Option<u64>, production: u64, workers: u64) -> MonthlyCapacity {
        MonthlyCapacity {
            year,
            month,
            optimal_capacity: capacity,
            max_productivity: capacity,
            min_productivity: capacity,
            active_workers: workers,
            total_production: production,
            real_workers: workers,
        }
    }

    fn series() -> Vec<MonthlyCapacity> {
        vec![
            month(2024, 1, Some(20), 80, 4),
            month(2024, 2, Some(20), 90, 4),
            month(2024, 3, Some(20), 100, 5),
            month(2024, 4, Some(20), 120, 5),
        ]
    }

    #[test]
    fn test_forecast_first_missing_month() {
        let forecast = TrendForecaster::default().forecast(&series(), None).unwrap();

        assert_eq!(forecast.target_period(), YearMonth::new(2024, 5));
        assert_eq!(forecast.base_month.month, 4);
        // 窗口 2-4 月: 90, 100, 120 → 均值 103.33, 增量均值 15
        assert_eq!(forecast.forecast_month.trend, 15.0);
        assert!((forecast.forecast_month.moving_average - 103.333).abs() < 0.01);
        assert_eq!(forecast.forecast_month.total_production, 135);
        // ceil(135 / 20) = 7, 基准实际 5
        assert_eq!(forecast.forecast_month.required_workers, Some(7));
        assert_eq!(forecast.forecast_month.baseline_workers, 5);
        assert_eq!(forecast.forecast_month.rule_label, AdequacyLabel::Understaffed);
    }

    #[test]
    fn test_forecast_fills_gap_before_later_months() {
        let mut monthly = series();
        monthly.remove(2); // 缺 3 月

        let forecast = TrendForecaster::default().forecast(&monthly, None).unwrap();

        assert_eq!(forecast.target_period(), YearMonth::new(2024, 3));
        assert_eq!(forecast.base_month.month, 2);
        // 窗口 1-2 月: 80 → 90
        assert_eq!(forecast.forecast_month.total_production, 100);
    }

    #[test]
    fn test_forecast_rolls_over_to_next_year() {
        let monthly: Vec<_> = (1..=12).map(|m| month(2023, m, Some(10), 50, 5)).collect();

        let forecast = TrendForecaster::default().forecast(&monthly, None).unwrap();

        assert_eq!(forecast.target_period(), YearMonth::new(2024, 1));
        assert_eq!(forecast.forecast_month.trend, 0.0);
        assert_eq!(forecast.forecast_month.rule_label, AdequacyLabel::Adequate);
    }

    #[test]
    fn test_forecast_starts_from_first_month_of_last_year() {
        let monthly = vec![
            month(2023, 11, Some(10), 40, 4),
            month(2024, 6, Some(10), 40, 4),
            month(2024, 7, Some(10), 40, 4),
        ];

        let forecast = TrendForecaster::default().forecast(&monthly, None).unwrap();

        assert_eq!(forecast.target_period(), YearMonth::new(2024, 8));
    }

    #[test]
    fn test_forecast_declining_trend_never_negative() {
        let monthly = vec![
            month(2024, 1, Some(10), 100, 5),
            month(2024, 2, Some(10), 10, 5),
        ];

        let forecast = TrendForecaster::default().forecast(&monthly, None).unwrap();

        assert_eq!(forecast.forecast_month.total_production, 0);
        assert_eq!(forecast.forecast_month.required_workers, Some(0));
        assert_eq!(forecast.forecast_month.rule_label, AdequacyLabel::Overstaffed);
    }

    #[test]
    fn test_forecast_rejects_month_with_report() {
        let result = TrendForecaster::default().forecast(&series(), Some(YearMonth::new(2024, 2)));
        assert_eq!(
            result,
            Err(ProjectionError::TargetMonthHasReport(YearMonth::new(2024, 2)))
        );
    }

    #[test]
    fn test_forecast_rejects_skipping_missing_month() {
        let result = TrendForecaster::default().forecast(&series(), Some(YearMonth::new(2024, 7)));
        assert_eq!(
            result,
            Err(ProjectionError::TargetMonthOutOfReach {
                requested: YearMonth::new(2024, 7),
                expected: YearMonth::new(2024, 5),
            })
        );
    }

    #[test]
    fn test_forecast_without_base_capacity() {
        let monthly = vec![month(2024, 1, None, 30, 0)];

        let forecast = TrendForecaster::default().forecast(&monthly, None).unwrap();

        assert_eq!(forecast.forecast_month.total_production, 30);
        assert_eq!(forecast.forecast_month.required_workers, None);
        assert_eq!(forecast.forecast_month.rule_label, AdequacyLabel::Indeterminate);
    }

    #[test]
    fn test_forecast_empty_series() {
        let result = TrendForecaster::default().forecast(&[], None);
        assert_eq!(result, Err(ProjectionError::EmptySeries));
    }
}

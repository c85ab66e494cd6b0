// ==========================================
// 人员配置预测系统 - 次月预测结果
// ==========================================
// 规则估计为权威结果且必定存在; 模型估计仅供参考, 可为空
// 趋势预测: 对首个缺失报表的月份外推产量, 按基准月产能推算需求人数
// ==========================================

use crate::domain::types::{AdequacyLabel, YearMonth};
use serde::{Deserialize, Serialize};

/// 基准月 (提供产能)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseMonth {
    pub year: i32,
    pub month: u32,
    pub optimal_capacity: Option<u64>,
}

/// 被评估的次月
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextMonthEvaluation {
    pub year: i32,
    pub month: u32,
    pub total_production: u64,
    pub real_workers: u64,
    pub required_workers: Option<u64>,
    pub rule_label: AdequacyLabel,
    pub model_label: Option<AdequacyLabel>,
}

/// 次月预测
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    pub base_month: BaseMonth,
    pub next_month: NextMonthEvaluation,
    /// 模型路径失败原因 (如模型文件不兼容); 不影响规则估计
    pub model_error: Option<String>,
}

impl Projection {
    pub fn base_period(&self) -> YearMonth {
        YearMonth::new(self.base_month.year, self.base_month.month)
    }

    pub fn next_period(&self) -> YearMonth {
        YearMonth::new(self.next_month.year, self.next_month.month)
    }
}

/// 趋势预测的目标月 (尚无报表)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastMonth {
    pub year: i32,
    pub month: u32,
    /// 窗口内月总产量均值
    pub moving_average: f64,
    /// 窗口内月环比增量均值
    pub trend: f64,
    /// 外推产量 = 基准月总产量 + trend, 四舍五入且不小于 0
    pub total_production: u64,
    /// 沿用基准月实际人数
    pub baseline_workers: u64,
    pub required_workers: Option<u64>,
    pub rule_label: AdequacyLabel,
}

/// 首个缺失月份的趋势预测
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub base_month: BaseMonth,
    pub forecast_month: ForecastMonth,
}

impl Forecast {
    pub fn target_period(&self) -> YearMonth {
        YearMonth::new(self.forecast_month.year, self.forecast_month.month)
    }
}

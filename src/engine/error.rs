// ==========================================
// 人员配置预测系统 - 引擎层错误类型
// ==========================================

use crate::domain::types::YearMonth;
use thiserror::Error;

/// 次月预测 / 趋势预测错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProjectionError {
    #[error("无月度数据, 无法预测")]
    EmptySeries,

    #[error("基准月不存在: {0}")]
    BaseMonthNotFound(YearMonth),

    #[error("基准月 {0} 为数据中最后一个月, 没有可评估的次月")]
    NoSuccessorMonth(YearMonth),

    #[error("{0} 已有报表, 无需预测")]
    TargetMonthHasReport(YearMonth),

    #[error("无法预测 {requested}: 需先补齐 {expected} 的报表")]
    TargetMonthOutOfReach {
        requested: YearMonth,
        expected: YearMonth,
    },
}

/// Result 类型别名
pub type ProjectionResult<T> = Result<T, ProjectionError>;

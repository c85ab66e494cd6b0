// ==========================================
// 人员配置预测系统 - 引擎层
// ==========================================
// 职责: 月度产能估算 → 配置评估数据集 → 次月预测 / 缺失月趋势预测
// 红线: 引擎为纯计算, 不做文件解析, 不访问数据库
// ==========================================

pub mod adequacy_builder;
pub mod capacity_estimator;
pub mod error;
pub mod forecaster;
pub mod projector;

// 重导出核心引擎
pub use adequacy_builder::AdequacyDatasetBuilder;
pub use capacity_estimator::CapacityEstimator;
pub use error::{ProjectionError, ProjectionResult};
pub use forecaster::{TrendForecaster, DEFAULT_TREND_WINDOW};
pub use projector::NextMonthProjector;

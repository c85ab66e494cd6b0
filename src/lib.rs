// ==========================================
// 人员配置预测系统 - 核心库
// ==========================================
// 主流程: 月度报表 → 生产记录 → 月度产能 → 配置评估数据集 → 分类器 / 次月预测 / 缺失月预测
// 系统定位: 决策支持工具 (人员配置建议, 人工最终决策)
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 月度产能历史
pub mod repository;

// 引擎层 - 产能估算/数据集/次月预测
pub mod engine;

// 分类器层 - 可选的配置状态分类能力
pub mod classifier;

// 导入层 - 月度报表
pub mod importer;

// 配置层 - 运行配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 对外操作
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{AdequacyLabel, YearMonth};

// 领域实体
pub use domain::{AdequacyRecord, Forecast, MonthlyCapacity, ProductionRecord, Projection};

// 引擎
pub use engine::{AdequacyDatasetBuilder, CapacityEstimator, NextMonthProjector, TrendForecaster};

// API
pub use api::{ForecastReport, PredictReport, StaffingApi, SummaryReport, TrainReport};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "人员配置预测系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}

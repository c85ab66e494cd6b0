// ==========================================
// 人员配置预测系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、评估规则
// 红线: 不含数据访问逻辑, 不含文件解析逻辑
// ==========================================

pub mod adequacy;
pub mod capacity;
pub mod production;
pub mod projection;
pub mod types;

// 重导出核心类型
pub use adequacy::{required_workers, staffing_features, AdequacyRecord, StaffingAssessment};
pub use capacity::{midpoint_capacity, MonthlyCapacity};
pub use production::ProductionRecord;
pub use projection::{BaseMonth, Forecast, ForecastMonth, NextMonthEvaluation, Projection};
pub use types::{AdequacyLabel, YearMonth};

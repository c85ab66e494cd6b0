// ==========================================
// 人员配置预测系统 - API 层
// ==========================================
// 职责: 对外操作入口 (CLI 调用), 组合导入层/引擎层/分类器/仓储层
// ==========================================

pub mod error;
pub mod staffing_api;

pub use error::{ApiError, ApiResult};
pub use staffing_api::{
    describe_forecast, describe_projection, EmployeeSeries, ForecastReport, PredictReport,
    StaffingApi, SummaryReport, TrainReport,
};

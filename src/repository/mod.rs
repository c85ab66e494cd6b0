// ==========================================
// 人员配置预测系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: 月度产能历史的持久化 (可选, 配置 db_path 时启用)
// 约束: 所有查询使用参数化
// ==========================================

pub mod error;
pub mod monthly_capacity_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use monthly_capacity_repo::MonthlyCapacityRepository;

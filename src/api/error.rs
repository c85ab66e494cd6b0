// ==========================================
// 人员配置预测系统 - API层错误类型
// ==========================================
// 职责: 将导入/预测/仓储层错误转换为带显式原因的错误消息
// 说明: 训练失败 (数据不足/后端不可用) 属软失败, 以 ok=false 报告返回, 不经此类型
// ==========================================

use crate::engine::ProjectionError;
use crate::importer::ImportError;
use crate::repository::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 数据源错误
    // ==========================================
    #[error("无可导入数据: {0}")]
    NoSourceData(String),

    #[error("报表表头不符: {0}")]
    SchemaMismatch(String),

    #[error("文件导入失败: {0}")]
    ImportError(String),

    // ==========================================
    // 预测错误
    // ==========================================
    #[error("基准月不存在: {0}")]
    BaseMonthNotFound(String),

    #[error("基准月无后继月份: {0}")]
    NoSuccessorMonth(String),

    #[error("目标月已有报表: {0}")]
    TargetMonthHasReport(String),

    #[error("目标月不可预测: {0}")]
    TargetMonthOutOfReach(String),

    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库事务失败: {0}")]
    DatabaseTransactionError(String),
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::NoSourceData(msg) => ApiError::NoSourceData(msg),
            err @ ImportError::SchemaMismatch { .. } => ApiError::SchemaMismatch(err.to_string()),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

// ==========================================
// 从 ProjectionError 转换
// ==========================================
impl From<ProjectionError> for ApiError {
    fn from(err: ProjectionError) -> Self {
        match err {
            ProjectionError::BaseMonthNotFound(period) => {
                ApiError::BaseMonthNotFound(format!("{} 不在月度序列中", period))
            }
            ProjectionError::NoSuccessorMonth(period) => {
                ApiError::NoSuccessorMonth(format!("{} 为最后一个月份, 无法评估次月", period))
            }
            ProjectionError::TargetMonthHasReport(period) => {
                ApiError::TargetMonthHasReport(format!("{} 已有报表, 无需预测", period))
            }
            ProjectionError::TargetMonthOutOfReach {
                requested,
                expected,
            } => ApiError::TargetMonthOutOfReach(format!(
                "{} 之前缺少 {} 的报表, 仅可预测 {}",
                requested, expected, expected
            )),
            ProjectionError::EmptySeries => ApiError::InvalidInput("月度序列为空".to_string()),
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseTransactionError(msg) => {
                ApiError::DatabaseTransactionError(msg)
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("字段{}错误: {}", field, message))
            }
            other => ApiError::DatabaseError(other.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

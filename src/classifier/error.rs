// ==========================================
// 人员配置预测系统 - 分类器模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 分类器模块错误类型
#[derive(Error, Debug)]
pub enum ClassifierError {
    // ===== 训练相关 (软失败, 由上层转为 ok=false 结果) =====
    #[error("训练数据不足: 过滤无法判定记录后为空")]
    InsufficientData,

    #[error("分类后端不可用 (未启用 forest 特性)")]
    ModelUnavailable,

    #[error("训练数据不一致: {0}")]
    InvalidTrainingSet(String),

    // ===== 模型文件相关 =====
    #[error("模型文件不存在: {0}")]
    ArtifactNotFound(String),

    #[error("模型文件不兼容: {0}")]
    ArtifactIncompatible(String),

    #[error("特征维度不匹配: 期望 {expected}, 实际 {actual}")]
    FeatureMismatch { expected: usize, actual: usize },

    // ===== IO / 序列化 =====
    #[error("模型文件读写失败: {0}")]
    Io(String),

    #[error("模型序列化失败: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for ClassifierError {
    fn from(err: std::io::Error) -> Self {
        ClassifierError::Io(err.to_string())
    }
}

/// Result 类型别名
pub type ClassifierResult<T> = Result<T, ClassifierError>;

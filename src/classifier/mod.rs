// ==========================================
// 人员配置预测系统 - 分类器层
// ==========================================
// 职责: 定义分类能力接口, 训练/预测次月人员配置状态
// 说明: 分类后端为可选能力 (forest 特性), 规则评估不依赖本层
// ==========================================

pub mod error;
pub mod forest;
pub mod model;
pub mod store;
pub mod trainer;

use std::sync::Arc;

pub use error::{ClassifierError, ClassifierResult};
pub use forest::ForestConfig;
#[cfg(feature = "forest")]
pub use forest::RandomForestClassifier;
pub use model::{DecisionTree, TrainedModel, TreeNode};
pub use store::{JsonModelStore, ModelStore, ARTIFACT_FORMAT};
pub use trainer::{train_and_save, TrainSummary, TrainingSet};

// ==========================================
// Classifier Trait
// ==========================================
// 实现者: RandomForestClassifier
pub trait Classifier: Send + Sync {
    /// 后端名称
    fn name(&self) -> &str;

    /// 训练模型
    ///
    /// # 参数
    /// - features: 特征矩阵 (每行等长)
    /// - labels: 类别编码, 与特征行一一对应
    fn train(&self, features: &[Vec<f64>], labels: &[String]) -> ClassifierResult<TrainedModel>;

    /// 预测单条样本的类别编码
    fn predict(&self, model: &TrainedModel, features: &[f64]) -> ClassifierResult<String>;
}

/// 可选的分类器包装
///
/// 简化 Option<Arc<dyn Classifier>> 的使用; 未配置后端时训练与预测返回 ModelUnavailable
#[derive(Clone)]
pub struct OptionalClassifier {
    inner: Option<Arc<dyn Classifier>>,
}

impl OptionalClassifier {
    /// 创建带后端的实例
    pub fn with_backend(backend: Arc<dyn Classifier>) -> Self {
        Self {
            inner: Some(backend),
        }
    }

    /// 创建空实例 (无分类能力)
    pub fn none() -> Self {
        Self { inner: None }
    }

    /// 按编译特性选择默认后端
    pub fn from_build(config: &ForestConfig) -> Self {
        #[cfg(feature = "forest")]
        {
            Self::with_backend(Arc::new(RandomForestClassifier::new(config.clone())))
        }

        #[cfg(not(feature = "forest"))]
        {
            let _ = config;
            tracing::debug!("未启用 forest 特性, 分类能力不可用");
            Self::none()
        }
    }

    /// 检查是否配置了后端
    pub fn is_available(&self) -> bool {
        self.inner.is_some()
    }

    pub fn backend_name(&self) -> Option<&str> {
        self.inner.as_deref().map(|c| c.name())
    }

    pub fn train(&self, features: &[Vec<f64>], labels: &[String]) -> ClassifierResult<TrainedModel> {
        match &self.inner {
            Some(backend) => backend.train(features, labels),
            None => Err(ClassifierError::ModelUnavailable),
        }
    }

    pub fn predict(&self, model: &TrainedModel, features: &[f64]) -> ClassifierResult<String> {
        match &self.inner {
            Some(backend) => backend.predict(model, features),
            None => Err(ClassifierError::ModelUnavailable),
        }
    }
}

impl Default for OptionalClassifier {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for OptionalClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionalClassifier")
            .field("backend", &self.backend_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_classifier_none() {
        let classifier = OptionalClassifier::none();
        assert!(!classifier.is_available());
        assert!(matches!(
            classifier.train(&[vec![1.0]], &["ok".to_string()]),
            Err(ClassifierError::ModelUnavailable)
        ));
    }

    #[cfg(feature = "forest")]
    #[test]
    fn test_optional_classifier_from_build() {
        let classifier = OptionalClassifier::from_build(&ForestConfig::default());
        assert!(classifier.is_available());
        assert_eq!(classifier.backend_name(), Some("random_forest"));
    }
}

// ==========================================
// 人员配置预测系统 - 配置状态分类器训练
// ==========================================
// 输入: AdequacyRecord 序列 + 模型输出路径
// 过滤: 仅保留 Adequate / Overstaffed / Understaffed
// 特征: [年, 月, 最优产能, 次月总产量]; 标签: sobre / sub / ok
// ==========================================

use crate::classifier::error::{ClassifierError, ClassifierResult};
use crate::classifier::store::ModelStore;
use crate::classifier::OptionalClassifier;
use crate::domain::adequacy::AdequacyRecord;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::instrument;

// ==========================================
// TrainingSet - 训练样本
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingSet {
    pub features: Vec<Vec<f64>>,
    pub labels: Vec<String>,
}

impl TrainingSet {
    /// 由评估记录构建训练集 (剔除 Indeterminate)
    pub fn from_records(records: &[AdequacyRecord]) -> Self {
        let mut set = Self::default();
        for record in records.iter().filter(|r| r.label.is_trainable()) {
            let Some(features) = record.feature_vector() else {
                continue;
            };
            set.features.push(features.to_vec());
            set.labels.push(record.label.code().to_string());
        }
        set
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// 训练数据中实际出现的类别 (升序)
    pub fn distinct_labels(&self) -> Vec<String> {
        self.labels
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// 训练结果摘要
#[derive(Debug, Clone, PartialEq)]
pub struct TrainSummary {
    pub classes: Vec<String>,
    pub samples: usize,
    pub trained_at: DateTime<Utc>,
}

/// 训练并保存模型 (覆盖已有模型文件)
///
/// # 返回
/// - Err(ModelUnavailable): 未配置分类后端, 不写文件
/// - Err(InsufficientData): 过滤后无可训练记录, 不写文件
#[instrument(skip(dataset, classifier, store), fields(records = dataset.len(), path = %model_path.display()))]
pub fn train_and_save(
    dataset: &[AdequacyRecord],
    model_path: &Path,
    classifier: &OptionalClassifier,
    store: &dyn ModelStore,
) -> ClassifierResult<TrainSummary> {
    if !classifier.is_available() {
        tracing::warn!("分类后端不可用, 跳过训练");
        return Err(ClassifierError::ModelUnavailable);
    }

    let training_set = TrainingSet::from_records(dataset);
    if training_set.is_empty() {
        tracing::warn!("过滤后无可训练记录, 跳过训练");
        return Err(ClassifierError::InsufficientData);
    }

    let model = classifier.train(&training_set.features, &training_set.labels)?;
    store.save(&model, model_path)?;

    Ok(TrainSummary {
        classes: training_set.distinct_labels(),
        samples: training_set.len(),
        trained_at: model.trained_at,
    })
}

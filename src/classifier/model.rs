// ==========================================
// 人员配置预测系统 - 已训练模型结构
// ==========================================
// 结构: 决策树集合 (随机森林), 节点以数组存储, 子节点索引总是大于父节点
// 预测: 各树叶节点类别概率取平均, 取最大者 (并列取类别序最小者)
// ==========================================

use crate::classifier::error::{ClassifierError, ClassifierResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 决策树节点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    /// 叶节点: 各类别概率 (与 TrainedModel::classes 对齐)
    Leaf { distribution: Vec<f64> },
    /// 分裂节点: x[feature] <= threshold 走左子树
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// 单棵决策树 (根节点为 nodes[0])
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// 返回样本落入叶节点的类别概率
    fn leaf_distribution(&self, features: &[f64]) -> &[f64] {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Leaf { distribution } => return distribution,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    /// 结构校验: 子节点索引前向且越界检查, 保证遍历必然终止
    fn validate(&self, n_features: usize, n_classes: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("决策树无节点".to_string());
        }
        for (index, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Leaf { distribution } => {
                    if distribution.len() != n_classes {
                        return Err(format!(
                            "叶节点 {} 类别数 {} 与模型类别数 {} 不一致",
                            index,
                            distribution.len(),
                            n_classes
                        ));
                    }
                    if distribution.iter().any(|p| !p.is_finite()) {
                        return Err(format!("叶节点 {} 概率非法", index));
                    }
                }
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(format!("节点 {} 特征索引 {} 越界", index, feature));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("节点 {} 阈值非法", index));
                    }
                    for child in [*left, *right] {
                        if child <= index || child >= self.nodes.len() {
                            return Err(format!("节点 {} 子节点索引 {} 非法", index, child));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

// ==========================================
// TrainedModel - 已训练模型 (持久化对象)
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    /// 训练后端名称
    pub backend: String,
    /// 类别编码 (升序)
    pub classes: Vec<String>,
    /// 特征维度
    pub n_features: usize,
    /// 训练样本数
    pub samples: usize,
    pub trained_at: DateTime<Utc>,
    pub trees: Vec<DecisionTree>,
}

impl TrainedModel {
    /// 校验模型结构, 防止误读外来或损坏的模型文件
    pub fn validate(&self) -> ClassifierResult<()> {
        if self.classes.is_empty() {
            return Err(ClassifierError::ArtifactIncompatible(
                "模型无类别".to_string(),
            ));
        }
        if self.n_features == 0 {
            return Err(ClassifierError::ArtifactIncompatible(
                "模型特征维度为 0".to_string(),
            ));
        }
        if self.trees.is_empty() {
            return Err(ClassifierError::ArtifactIncompatible(
                "模型无决策树".to_string(),
            ));
        }
        for (index, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features, self.classes.len())
                .map_err(|reason| {
                    ClassifierError::ArtifactIncompatible(format!("第 {} 棵树: {}", index, reason))
                })?;
        }
        Ok(())
    }

    /// 各类别平均概率
    pub fn predict_proba(&self, features: &[f64]) -> ClassifierResult<Vec<f64>> {
        if features.len() != self.n_features {
            return Err(ClassifierError::FeatureMismatch {
                expected: self.n_features,
                actual: features.len(),
            });
        }

        let mut totals = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            for (total, p) in totals.iter_mut().zip(tree.leaf_distribution(features)) {
                *total += p;
            }
        }
        let n_trees = self.trees.len() as f64;
        Ok(totals.into_iter().map(|t| t / n_trees).collect())
    }

    /// 预测类别编码
    pub fn predict(&self, features: &[f64]) -> ClassifierResult<String> {
        let proba = self.predict_proba(features)?;
        let mut best = 0;
        for (index, p) in proba.iter().enumerate() {
            if *p > proba[best] {
                best = index;
            }
        }
        Ok(self.classes[best].clone())
    }
}

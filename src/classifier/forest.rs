// ==========================================
// 人员配置预测系统 - 随机森林分类后端
// ==========================================
// 算法: CART 决策树 (Gini 不纯度) + 自助采样 + 每次分裂随机取 sqrt(特征数) 个特征
// 可复现: 固定随机种子, 树按顺序生长共用同一随机数发生器
// 特性: 训练实现需启用 `forest` 特性 (依赖 rand)
// ==========================================

use serde::{Deserialize, Serialize};

/// 随机森林参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestConfig {
    #[serde(default = "default_n_trees")]
    pub n_trees: usize,
    #[serde(default)]
    pub max_depth: Option<usize>,
    #[serde(default = "default_min_samples_split")]
    pub min_samples_split: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_n_trees() -> usize {
    300
}

fn default_min_samples_split() -> usize {
    2
}

fn default_seed() -> u64 {
    42
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: default_n_trees(),
            max_depth: None,
            min_samples_split: default_min_samples_split(),
            seed: default_seed(),
        }
    }
}

#[cfg(feature = "forest")]
pub use backend::RandomForestClassifier;

#[cfg(feature = "forest")]
mod backend {
    use super::ForestConfig;
    use crate::classifier::error::{ClassifierError, ClassifierResult};
    use crate::classifier::model::{DecisionTree, TrainedModel, TreeNode};
    use crate::classifier::Classifier;
    use chrono::Utc;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::BTreeSet;

    pub const BACKEND_NAME: &str = "random_forest";

    // ==========================================
    // RandomForestClassifier - 随机森林后端
    // ==========================================
    #[derive(Debug, Clone, Default)]
    pub struct RandomForestClassifier {
        config: ForestConfig,
    }

    impl RandomForestClassifier {
        pub fn new(config: ForestConfig) -> Self {
            Self { config }
        }
    }

    impl Classifier for RandomForestClassifier {
        fn name(&self) -> &str {
            BACKEND_NAME
        }

        fn train(&self, features: &[Vec<f64>], labels: &[String]) -> ClassifierResult<TrainedModel> {
            if features.is_empty() {
                return Err(ClassifierError::InsufficientData);
            }
            if features.len() != labels.len() {
                return Err(ClassifierError::InvalidTrainingSet(format!(
                    "特征行数 {} 与标签数 {} 不一致",
                    features.len(),
                    labels.len()
                )));
            }
            let n_features = features[0].len();
            if n_features == 0 || features.iter().any(|row| row.len() != n_features) {
                return Err(ClassifierError::InvalidTrainingSet(
                    "特征维度不一致".to_string(),
                ));
            }

            // 类别编码: 升序
            let classes: Vec<String> = labels
                .iter()
                .cloned()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();
            let targets: Vec<usize> = labels
                .iter()
                .map(|label| classes.binary_search(label).unwrap_or(0))
                .collect();

            let n_trees = self.config.n_trees.max(1);
            let mut grower = TreeGrower {
                features,
                targets: &targets,
                n_classes: classes.len(),
                n_features,
                max_features: ((n_features as f64).sqrt().floor() as usize).max(1),
                max_depth: self.config.max_depth,
                min_samples_split: self.config.min_samples_split.max(2),
                rng: StdRng::seed_from_u64(self.config.seed),
            };

            let trees: Vec<DecisionTree> = (0..n_trees).map(|_| grower.grow()).collect();

            tracing::info!(
                backend = BACKEND_NAME,
                n_trees,
                samples = features.len(),
                classes = ?classes,
                "随机森林训练完成"
            );

            Ok(TrainedModel {
                backend: BACKEND_NAME.to_string(),
                classes,
                n_features,
                samples: features.len(),
                trained_at: Utc::now(),
                trees,
            })
        }

        fn predict(&self, model: &TrainedModel, features: &[f64]) -> ClassifierResult<String> {
            model.predict(features)
        }
    }

    // ==========================================
    // TreeGrower - 单棵 CART 树生长
    // ==========================================
    struct TreeGrower<'a> {
        features: &'a [Vec<f64>],
        targets: &'a [usize],
        n_classes: usize,
        n_features: usize,
        max_features: usize,
        max_depth: Option<usize>,
        min_samples_split: usize,
        rng: StdRng,
    }

    /// 最优分裂候选
    struct SplitCandidate {
        feature: usize,
        threshold: f64,
        impurity: f64,
    }

    impl TreeGrower<'_> {
        fn grow(&mut self) -> DecisionTree {
            let n = self.features.len();
            let sample: Vec<usize> = (0..n).map(|_| self.rng.gen_range(0..n)).collect();

            let mut nodes = Vec::new();
            self.build_node(&mut nodes, sample, 0);
            DecisionTree { nodes }
        }

        fn build_node(&mut self, nodes: &mut Vec<TreeNode>, indices: Vec<usize>, depth: usize) -> usize {
            let counts = self.class_counts(&indices);
            let id = nodes.len();
            nodes.push(Self::leaf(&counts, indices.len()));

            let is_pure = counts.iter().filter(|c| **c > 0).count() <= 1;
            let depth_reached = self.max_depth.is_some_and(|max| depth >= max);
            if is_pure || depth_reached || indices.len() < self.min_samples_split {
                return id;
            }

            let Some(split) = self.find_best_split(&indices) else {
                return id;
            };

            let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
                .into_iter()
                .partition(|&i| self.features[i][split.feature] <= split.threshold);

            tracing::trace!(
                depth,
                feature = split.feature,
                threshold = split.threshold,
                impurity = split.impurity,
                "决策树分裂"
            );

            let left = self.build_node(nodes, left_indices, depth + 1);
            let right = self.build_node(nodes, right_indices, depth + 1);
            nodes[id] = TreeNode::Split {
                feature: split.feature,
                threshold: split.threshold,
                left,
                right,
            };
            id
        }

        /// 在随机特征子集上寻找最优分裂; 子集内全部为常量特征时退回全部特征
        fn find_best_split(&mut self, indices: &[usize]) -> Option<SplitCandidate> {
            let candidates =
                rand::seq::index::sample(&mut self.rng, self.n_features, self.max_features).into_vec();

            let best = self.best_split_among(indices, &candidates);
            if best.is_some() {
                return best;
            }

            let remaining: Vec<usize> = (0..self.n_features)
                .filter(|f| !candidates.contains(f))
                .collect();
            self.best_split_among(indices, &remaining)
        }

        fn best_split_among(&self, indices: &[usize], features: &[usize]) -> Option<SplitCandidate> {
            let total = indices.len() as f64;
            let parent_counts = self.class_counts(indices);
            let mut best: Option<SplitCandidate> = None;

            for &feature in features {
                let mut sorted: Vec<usize> = indices.to_vec();
                sorted.sort_by(|a, b| self.features[*a][feature].total_cmp(&self.features[*b][feature]));

                let mut left_counts = vec![0usize; self.n_classes];
                let mut right_counts = parent_counts.clone();

                for position in 1..sorted.len() {
                    let moved = sorted[position - 1];
                    left_counts[self.targets[moved]] += 1;
                    right_counts[self.targets[moved]] -= 1;

                    let previous = self.features[moved][feature];
                    let current = self.features[sorted[position]][feature];
                    if previous >= current {
                        continue;
                    }

                    let n_left = position as f64;
                    let n_right = total - n_left;
                    let impurity = (n_left * gini(&left_counts, position)
                        + n_right * gini(&right_counts, sorted.len() - position))
                        / total;

                    if best.as_ref().map_or(true, |b| impurity < b.impurity) {
                        best = Some(SplitCandidate {
                            feature,
                            threshold: previous + (current - previous) / 2.0,
                            impurity,
                        });
                    }
                }
            }

            best
        }

        fn class_counts(&self, indices: &[usize]) -> Vec<usize> {
            let mut counts = vec![0usize; self.n_classes];
            for &i in indices {
                counts[self.targets[i]] += 1;
            }
            counts
        }

        fn leaf(counts: &[usize], total: usize) -> TreeNode {
            let total = total.max(1) as f64;
            TreeNode::Leaf {
                distribution: counts.iter().map(|c| *c as f64 / total).collect(),
            }
        }
    }

    fn gini(counts: &[usize], total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }
        let total = total as f64;
        1.0 - counts
            .iter()
            .map(|c| {
                let p = *c as f64 / total;
                p * p
            })
            .sum::<f64>()
    }

}

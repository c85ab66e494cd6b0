// ==========================================
// 人员配置预测系统 - 次月人员配置预测引擎
// ==========================================
// 基准月选择:
//   - 未指定: 倒数第二个月为基准, 最后一个月为次月 (仅一个月时两者相同)
//   - 指定: 必须存在且不是最后一个月
// 输出: 规则估计 (必有) + 模型估计 (有模型文件且有分类后端时)
// ==========================================
// 红线: 模型路径任何失败都不影响规则估计
// ==========================================

use crate::classifier::{ClassifierError, JsonModelStore, ModelStore, OptionalClassifier};
use crate::domain::adequacy::{staffing_features, StaffingAssessment};
use crate::domain::capacity::MonthlyCapacity;
use crate::domain::projection::{BaseMonth, NextMonthEvaluation, Projection};
use crate::domain::types::{AdequacyLabel, YearMonth};
use crate::engine::error::{ProjectionError, ProjectionResult};
use std::path::Path;
use std::sync::Arc;
use tracing::instrument;

// ==========================================
// NextMonthProjector - 次月预测引擎
// ==========================================
#[derive(Clone)]
pub struct NextMonthProjector {
    classifier: OptionalClassifier,
    store: Arc<dyn ModelStore>,
}

/// 模型估计结果
struct ModelEstimate {
    label: Option<AdequacyLabel>,
    error: Option<String>,
}

impl ModelEstimate {
    fn absent() -> Self {
        Self {
            label: None,
            error: None,
        }
    }

    fn failed(error: String) -> Self {
        Self {
            label: None,
            error: Some(error),
        }
    }
}

impl NextMonthProjector {
    pub fn new(classifier: OptionalClassifier, store: Arc<dyn ModelStore>) -> Self {
        Self { classifier, store }
    }

    /// 仅规则估计 (不加载模型)
    pub fn rule_only() -> Self {
        Self::new(OptionalClassifier::none(), Arc::new(JsonModelStore::new()))
    }

    /// 预测次月人员配置状态
    ///
    /// # 参数
    /// - `monthly`: 月度产能序列
    /// - `base`: 指定基准月 (None 表示取最近可用月份)
    /// - `model_path`: 模型文件路径 (None 或文件不存在时不做模型估计)
    ///
    /// # 返回
    /// - Err(BaseMonthNotFound): 指定基准月不存在
    /// - Err(NoSuccessorMonth): 指定基准月为最后一个月
    #[instrument(skip(self, monthly), fields(months = monthly.len()))]
    pub fn project(
        &self,
        monthly: &[MonthlyCapacity],
        base: Option<YearMonth>,
        model_path: Option<&Path>,
    ) -> ProjectionResult<Projection> {
        let mut ordered: Vec<&MonthlyCapacity> = monthly.iter().collect();
        ordered.sort_by_key(|row| row.period());

        let (base_row, next_row) = Self::select_pair(&ordered, base)?;

        // 1. 规则估计 (权威)
        let assessment = StaffingAssessment::evaluate(
            base_row.optimal_capacity,
            next_row.total_production,
            next_row.real_workers,
        );

        // 2. 模型估计 (参考)
        let estimate = self.estimate_with_model(base_row, next_row, model_path);

        tracing::info!(
            base = %base_row.period(),
            next = %next_row.period(),
            rule_label = %assessment.label,
            model_label = ?estimate.label,
            "次月预测完成"
        );

        Ok(Projection {
            base_month: BaseMonth {
                year: base_row.year,
                month: base_row.month,
                optimal_capacity: base_row.optimal_capacity,
            },
            next_month: NextMonthEvaluation {
                year: next_row.year,
                month: next_row.month,
                total_production: next_row.total_production,
                real_workers: next_row.real_workers,
                required_workers: assessment.required_workers,
                rule_label: assessment.label,
                model_label: estimate.label,
            },
            model_error: estimate.error,
        })
    }

    fn select_pair<'a>(
        ordered: &[&'a MonthlyCapacity],
        base: Option<YearMonth>,
    ) -> ProjectionResult<(&'a MonthlyCapacity, &'a MonthlyCapacity)> {
        let Some(last) = ordered.last().copied() else {
            return Err(ProjectionError::EmptySeries);
        };

        match base {
            None => {
                let base_row = if ordered.len() >= 2 {
                    ordered[ordered.len() - 2]
                } else {
                    tracing::warn!(period = %last.period(), "仅有一个月数据, 基准月与次月相同");
                    last
                };
                Ok((base_row, last))
            }
            Some(period) => {
                let index = ordered
                    .iter()
                    .position(|row| row.period() == period)
                    .ok_or(ProjectionError::BaseMonthNotFound(period))?;
                let next_row = ordered
                    .get(index + 1)
                    .copied()
                    .ok_or(ProjectionError::NoSuccessorMonth(period))?;
                Ok((ordered[index], next_row))
            }
        }
    }

    /// 模型估计: 启动时一次性加载模型文件, 失败仅记录原因
    fn estimate_with_model(
        &self,
        base_row: &MonthlyCapacity,
        next_row: &MonthlyCapacity,
        model_path: Option<&Path>,
    ) -> ModelEstimate {
        let Some(path) = model_path.filter(|p| p.exists()) else {
            tracing::debug!("无模型文件, 跳过模型估计");
            return ModelEstimate::absent();
        };
        if !self.classifier.is_available() {
            tracing::debug!("分类后端不可用, 跳过模型估计");
            return ModelEstimate::absent();
        }
        let Some(capacity) = base_row.optimal_capacity else {
            tracing::debug!(base = %base_row.period(), "基准月无产能, 跳过模型估计");
            return ModelEstimate::absent();
        };

        let model = match self.store.load(path) {
            Ok(model) => model,
            Err(ClassifierError::ArtifactNotFound(_)) => return ModelEstimate::absent(),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "模型加载失败, 仅返回规则估计");
                return ModelEstimate::failed(err.to_string());
            }
        };

        let features = staffing_features(
            base_row.year,
            base_row.month,
            capacity,
            next_row.total_production,
        );

        match self.classifier.predict(&model, &features) {
            Ok(code) => match AdequacyLabel::from_code(&code) {
                Some(label) => ModelEstimate {
                    label: Some(label),
                    error: None,
                },
                None => ModelEstimate::failed(
                    ClassifierError::ArtifactIncompatible(format!("未知类别编码: {}", code))
                        .to_string(),
                ),
            },
            Err(err) => {
                tracing::warn!(error = %err, "模型预测失败, 仅返回规则估计");
                ModelEstimate::failed(err.to_string())
            }
        }
    }
}

impl std::fmt::Debug for NextMonthProjector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NextMonthProjector")
            .field("classifier", &self.classifier)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(year: i32, month: u32, capacity: Option<u64>, production: u64, workers: u64) -> MonthlyCapacity {
        MonthlyCapacity {
            year,
            month,
            optimal_capacity: capacity,
            max_productivity: capacity,
            min_productivity: capacity,
            active_workers: workers,
            total_production: production,
            real_workers: workers,
        }
    }

    fn series() -> Vec<MonthlyCapacity> {
        vec![
            month(2024, 10, Some(25), 90, 4),
            month(2024, 11, Some(20), 80, 4),
            month(2024, 12, Some(20), 100, 6),
        ]
    }

    #[test]
    fn test_project_latest_pair_by_default() {
        let projection = NextMonthProjector::rule_only()
            .project(&series(), None, None)
            .unwrap();

        assert_eq!(projection.base_period(), YearMonth::new(2024, 11));
        assert_eq!(projection.next_period(), YearMonth::new(2024, 12));
        assert_eq!(projection.base_month.optimal_capacity, Some(20));
        assert_eq!(projection.next_month.required_workers, Some(5));
        assert_eq!(projection.next_month.rule_label, AdequacyLabel::Overstaffed);
        assert_eq!(projection.next_month.model_label, None);
        assert_eq!(projection.model_error, None);
    }

    #[test]
    fn test_project_explicit_base() {
        let projection = NextMonthProjector::rule_only()
            .project(&series(), Some(YearMonth::new(2024, 10)), None)
            .unwrap();

        // 10月产能 25, 11月产量 80 → 需求 4, 实际 4
        assert_eq!(projection.next_period(), YearMonth::new(2024, 11));
        assert_eq!(projection.next_month.required_workers, Some(4));
        assert_eq!(projection.next_month.rule_label, AdequacyLabel::Adequate);
    }

    #[test]
    fn test_project_unsorted_input() {
        let mut monthly = series();
        monthly.reverse();

        let projection = NextMonthProjector::rule_only()
            .project(&monthly, None, None)
            .unwrap();

        assert_eq!(projection.base_period(), YearMonth::new(2024, 11));
    }

    #[test]
    fn test_project_base_not_found() {
        let result = NextMonthProjector::rule_only().project(
            &series(),
            Some(YearMonth::new(2023, 1)),
            None,
        );
        assert_eq!(
            result,
            Err(ProjectionError::BaseMonthNotFound(YearMonth::new(2023, 1)))
        );
    }

    #[test]
    fn test_project_no_successor() {
        let result = NextMonthProjector::rule_only().project(
            &series(),
            Some(YearMonth::new(2024, 12)),
            None,
        );
        assert_eq!(
            result,
            Err(ProjectionError::NoSuccessorMonth(YearMonth::new(2024, 12)))
        );
    }

    #[test]
    fn test_project_single_month() {
        let monthly = vec![month(2024, 1, Some(10), 30, 3)];

        let projection = NextMonthProjector::rule_only()
            .project(&monthly, None, None)
            .unwrap();

        assert_eq!(projection.base_period(), projection.next_period());
        assert_eq!(projection.next_month.required_workers, Some(3));
        assert_eq!(projection.next_month.rule_label, AdequacyLabel::Adequate);
    }

    #[test]
    fn test_project_empty_series() {
        let result = NextMonthProjector::rule_only().project(&[], None, None);
        assert_eq!(result, Err(ProjectionError::EmptySeries));
    }

    #[test]
    fn test_project_base_without_capacity() {
        let monthly = vec![month(2024, 7, None, 10, 0), month(2024, 8, Some(10), 50, 5)];

        let projection = NextMonthProjector::rule_only()
            .project(&monthly, None, None)
            .unwrap();

        assert_eq!(projection.base_month.optimal_capacity, None);
        assert_eq!(projection.next_month.required_workers, None);
        assert_eq!(projection.next_month.rule_label, AdequacyLabel::Indeterminate);
    }
}

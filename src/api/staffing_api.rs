// ==========================================
// 人员配置预测系统 - 人员配置 API
// ==========================================
// 职责: 汇总 (Summarize) / 训练 (Train) / 预测 (Predict) / 缺失月预测 (Forecast)
// 流程: 记录来源 → 月度产能 → 配置数据集 → 分类器 / 次月预测 / 趋势外推
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::classifier::{
    train_and_save, ClassifierError, JsonModelStore, ModelStore, OptionalClassifier,
};
use crate::config::PipelineConfig;
use crate::domain::adequacy::AdequacyRecord;
use crate::domain::capacity::MonthlyCapacity;
use crate::domain::projection::{
    BaseMonth, Forecast, ForecastMonth, NextMonthEvaluation, Projection,
};
use crate::domain::types::YearMonth;
use crate::engine::{AdequacyDatasetBuilder, CapacityEstimator, NextMonthProjector, TrendForecaster};
use crate::i18n::{t, t_with_args};
use crate::importer::{DirectoryRecordSource, RecordSource};
use crate::repository::MonthlyCapacityRepository;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

// ==========================================
// 响应结构
// ==========================================

/// 人员曲线 (按月对齐)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeSeries {
    /// 月份标签 "YYYY-MM"
    pub labels: Vec<String>,
    /// 实际有效人数
    pub real_workers: Vec<u64>,
    /// 以上月产能推算的需求人数 (首月及无产能基准时为 None)
    pub required_workers: Vec<Option<u64>>,
    /// 末尾追加的预测点标签 (仅缺失月预测)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projected: Option<String>,
}

impl EmployeeSeries {
    /// 由月度产能与配置数据集构建
    ///
    /// 数据集第 i 条对应 (i, i+1) 月份对, 其需求人数落在第 i+1 个月
    pub fn from_series(monthly: &[MonthlyCapacity], dataset: &[AdequacyRecord]) -> Self {
        let labels = monthly.iter().map(|m| m.period().to_string()).collect();
        let real_workers = monthly.iter().map(|m| m.real_workers).collect();

        let mut required_workers = Vec::with_capacity(monthly.len());
        if !monthly.is_empty() {
            required_workers.push(None);
        }
        required_workers.extend(dataset.iter().map(|r| r.next_required_workers));

        Self {
            labels,
            real_workers,
            required_workers,
            projected: None,
        }
    }

    /// 追加趋势预测点 (实际人数取基准月人数)
    pub fn push_forecast(&mut self, forecast: &ForecastMonth) {
        let label = YearMonth::new(forecast.year, forecast.month).to_string();
        self.labels.push(label.clone());
        self.real_workers.push(forecast.baseline_workers);
        self.required_workers.push(forecast.required_workers);
        self.projected = Some(label);
    }
}

/// 汇总结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryReport {
    pub monthly: Vec<MonthlyCapacity>,
    pub dataset: Vec<AdequacyRecord>,
    pub employee_series: EmployeeSeries,
}

/// 训练结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainReport {
    pub ok: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub samples: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trained_at: Option<DateTime<Utc>>,
}

impl TrainReport {
    fn failed(message: String) -> Self {
        Self {
            ok: false,
            message,
            classes: None,
            samples: None,
            trained_at: None,
        }
    }
}

/// 预测结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictReport {
    pub base_month: BaseMonth,
    pub next_month: NextMonthEvaluation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_error: Option<String>,
    /// 可读结论 (按当前语言)
    pub summary: String,
}

impl From<Projection> for PredictReport {
    fn from(projection: Projection) -> Self {
        let summary = describe_projection(&projection);
        Self {
            base_month: projection.base_month,
            next_month: projection.next_month,
            model_error: projection.model_error,
            summary,
        }
    }
}

/// 缺失月预测结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub base_month: BaseMonth,
    pub forecast_month: ForecastMonth,
    /// 历史 + 预测点
    pub employee_series: EmployeeSeries,
    pub summary: String,
}

/// 生成缺失月预测文案
pub fn describe_forecast(forecast: &Forecast) -> String {
    let target = &forecast.forecast_month;
    let required = target
        .required_workers
        .map(|r| r.to_string())
        .unwrap_or_else(|| "-".to_string());

    t_with_args(
        "forecast.summary",
        &[
            ("period", &forecast.target_period().to_string()),
            ("production", &target.total_production.to_string()),
            ("required", &required),
            ("actual", &target.baseline_workers.to_string()),
            ("state", &t(target.rule_label.message_key())),
        ],
    )
}

/// 生成预测结论文案
pub fn describe_projection(projection: &Projection) -> String {
    let next = &projection.next_month;
    let required = next
        .required_workers
        .map(|r| r.to_string())
        .unwrap_or_else(|| "-".to_string());

    let mut text = t_with_args(
        "predict.summary",
        &[
            ("period", &projection.next_period().to_string()),
            ("production", &next.total_production.to_string()),
            ("required", &required),
            ("actual", &next.real_workers.to_string()),
            ("state", &t(next.rule_label.message_key())),
        ],
    );

    if let Some(model_label) = next.model_label {
        text.push_str(&t_with_args(
            "predict.model_advice",
            &[("state", &t(model_label.message_key()))],
        ));
    }

    text
}

// ==========================================
// StaffingApi
// ==========================================
pub struct StaffingApi {
    config: PipelineConfig,
    source: Arc<dyn RecordSource>,
    classifier: OptionalClassifier,
    store: Arc<dyn ModelStore>,
}

impl StaffingApi {
    /// 按编译特性选择分类后端, 模型以 JSON 存储
    pub fn new(config: PipelineConfig) -> Self {
        let classifier = OptionalClassifier::from_build(&config.forest);
        Self::with_components(config, classifier, Arc::new(JsonModelStore::new()))
    }

    /// 显式注入分类后端与模型存储 (记录来源为配置的数据目录)
    pub fn with_components(
        config: PipelineConfig,
        classifier: OptionalClassifier,
        store: Arc<dyn ModelStore>,
    ) -> Self {
        let source = Arc::new(DirectoryRecordSource::new(
            &config.data_dir,
            config.import.clone(),
        ));
        Self {
            config,
            source,
            classifier,
            store,
        }
    }

    /// 替换记录来源
    pub fn with_source(mut self, source: Arc<dyn RecordSource>) -> Self {
        self.source = source;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// 加载记录并计算月度产能
    fn load_monthly(&self) -> ApiResult<Vec<MonthlyCapacity>> {
        let records = self.source.load_records()?;
        Ok(CapacityEstimator::new().estimate(&records))
    }

    /// 汇总: 月度产能 + 配置数据集 + 人员曲线
    ///
    /// 配置了历史库 (db_path 或 persist_history) 时, 同步写入月度产能
    #[instrument(skip(self), fields(data_dir = %self.config.data_dir.display()))]
    pub fn summarize(&self) -> ApiResult<SummaryReport> {
        let monthly = self.load_monthly()?;
        let dataset = AdequacyDatasetBuilder::new().build(&monthly);
        let employee_series = EmployeeSeries::from_series(&monthly, &dataset);

        if let Some(db_path) = self.config.resolved_db_path() {
            let repo = MonthlyCapacityRepository::new(&db_path.to_string_lossy())?;
            let written = repo.upsert_batch(&monthly)?;
            info!(db = %db_path.display(), written = written, "月度产能已写入历史库");
        }

        info!(
            months = monthly.len(),
            pairs = dataset.len(),
            "汇总完成"
        );

        Ok(SummaryReport {
            monthly,
            dataset,
            employee_series,
        })
    }

    /// 训练并保存模型
    ///
    /// 数据不足/后端不可用/保存失败均以 ok=false 返回
    #[instrument(skip(self), fields(data_dir = %self.config.data_dir.display()))]
    pub fn train(&self) -> ApiResult<TrainReport> {
        let monthly = self.load_monthly()?;
        let dataset = AdequacyDatasetBuilder::new().build(&monthly);
        let model_path = self.config.resolved_model_path();

        let report = match train_and_save(&dataset, &model_path, &self.classifier, self.store.as_ref()) {
            Ok(summary) => {
                info!(
                    samples = summary.samples,
                    classes = ?summary.classes,
                    model = %model_path.display(),
                    "模型训练完成"
                );
                TrainReport {
                    ok: true,
                    message: t("train.trained"),
                    classes: Some(summary.classes),
                    samples: Some(summary.samples),
                    trained_at: Some(summary.trained_at),
                }
            }
            Err(ClassifierError::InsufficientData) => {
                TrainReport::failed(t("train.insufficient_data"))
            }
            Err(ClassifierError::ModelUnavailable) => {
                TrainReport::failed(t("train.model_unavailable"))
            }
            Err(e) => {
                warn!(error = %e, "模型训练或保存失败");
                TrainReport::failed(t_with_args("train.save_failed", &[("reason", &e.to_string())]))
            }
        };

        Ok(report)
    }

    /// 预测次月人员配置
    ///
    /// # 参数
    /// - base: 基准月 (None 表示取倒数第二个月)
    #[instrument(skip(self), fields(data_dir = %self.config.data_dir.display()))]
    pub fn predict(&self, base: Option<YearMonth>) -> ApiResult<PredictReport> {
        let monthly = self.load_monthly()?;
        let model_path = self.config.resolved_model_path();

        let projector = NextMonthProjector::new(self.classifier.clone(), Arc::clone(&self.store));
        let projection = projector.project(&monthly, base, Some(&model_path))?;

        if let Some(error) = &projection.model_error {
            warn!(error = %error, "模型估计不可用, 仅返回规则估计");
        }

        Ok(PredictReport::from(projection))
    }

    /// 预测首个缺失报表的月份 (产量按近月趋势外推)
    ///
    /// # 参数
    /// - target: 目标月 (None 表示首个缺失月; 指定时必须等于首个缺失月)
    #[instrument(skip(self), fields(data_dir = %self.config.data_dir.display()))]
    pub fn forecast(&self, target: Option<YearMonth>) -> ApiResult<ForecastReport> {
        let monthly = self.load_monthly()?;
        let dataset = AdequacyDatasetBuilder::new().build(&monthly);

        let forecast = TrendForecaster::default().forecast(&monthly, target)?;

        let mut employee_series = EmployeeSeries::from_series(&monthly, &dataset);
        employee_series.push_forecast(&forecast.forecast_month);
        let summary = describe_forecast(&forecast);

        Ok(ForecastReport {
            base_month: forecast.base_month,
            forecast_month: forecast.forecast_month,
            employee_series,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::production::ProductionRecord;
    use crate::domain::types::AdequacyLabel;
    use crate::importer::{ImportError, ImportResult};

    fn month(month: u32, real_workers: u64) -> MonthlyCapacity {
        MonthlyCapacity {
            year: 2024,
            month,
            optimal_capacity: Some(20),
            max_productivity: Some(30),
            min_productivity: Some(10),
            active_workers: real_workers,
            total_production: 100,
            real_workers,
        }
    }

    #[test]
    fn test_employee_series_alignment() {
        let monthly = vec![month(1, 4), month(2, 6), month(3, 5)];
        let dataset = AdequacyDatasetBuilder::new().build(&monthly);

        let series = EmployeeSeries::from_series(&monthly, &dataset);

        assert_eq!(series.labels, vec!["2024-01", "2024-02", "2024-03"]);
        assert_eq!(series.real_workers, vec![4, 6, 5]);
        assert_eq!(series.required_workers, vec![None, Some(5), Some(5)]);
    }

    #[test]
    fn test_employee_series_with_forecast_point() {
        let monthly = vec![month(1, 4), month(2, 6)];
        let dataset = AdequacyDatasetBuilder::new().build(&monthly);
        let forecast = TrendForecaster::default().forecast(&monthly, None).unwrap();

        let mut series = EmployeeSeries::from_series(&monthly, &dataset);
        series.push_forecast(&forecast.forecast_month);

        assert_eq!(series.labels, vec!["2024-01", "2024-02", "2024-03"]);
        assert_eq!(series.real_workers, vec![4, 6, 6]);
        assert_eq!(series.required_workers, vec![None, Some(5), Some(5)]);
        assert_eq!(series.projected.as_deref(), Some("2024-03"));
    }

    struct FixedSource(Vec<ProductionRecord>);

    impl RecordSource for FixedSource {
        fn load_records(&self) -> ImportResult<Vec<ProductionRecord>> {
            if self.0.is_empty() {
                return Err(ImportError::NoSourceData("sin registros".to_string()));
            }
            Ok(self.0.clone())
        }
    }

    fn record(month: u32, user: &str, folio_count: u64) -> ProductionRecord {
        ProductionRecord {
            year: 2024,
            month,
            user: user.to_string(),
            folio_count,
            is_on_vacation: false,
            is_on_leave: false,
        }
    }

    #[test]
    fn test_api_reads_through_record_source() {
        let source = FixedSource(vec![
            record(1, "ana", 10),
            record(1, "bruno", 30),
            record(2, "ana", 30),
            record(2, "bruno", 30),
            record(2, "carla", 30),
        ]);
        let api = StaffingApi::new(PipelineConfig::for_data_dir("/no/existe"))
            .with_source(Arc::new(source));

        let summary = api.summarize().unwrap();
        assert_eq!(summary.monthly.len(), 2);
        assert_eq!(summary.employee_series.required_workers, vec![None, Some(5)]);

        let forecast = api.forecast(None).unwrap();
        assert_eq!(forecast.forecast_month.month, 3);
        assert_eq!(forecast.employee_series.labels.len(), 3);

        let empty = StaffingApi::new(PipelineConfig::for_data_dir("/no/existe"))
            .with_source(Arc::new(FixedSource(Vec::new())));
        assert!(matches!(empty.summarize(), Err(ApiError::NoSourceData(_))));
    }

    #[test]
    fn test_employee_series_empty() {
        let series = EmployeeSeries::from_series(&[], &[]);
        assert!(series.labels.is_empty());
        assert!(series.required_workers.is_empty());
    }

    #[test]
    fn test_describe_projection_mentions_figures() {
        let projection = Projection {
            base_month: BaseMonth {
                year: 2024,
                month: 1,
                optimal_capacity: Some(20),
            },
            next_month: NextMonthEvaluation {
                year: 2024,
                month: 2,
                total_production: 100,
                real_workers: 6,
                required_workers: Some(5),
                rule_label: AdequacyLabel::Overstaffed,
                model_label: None,
            },
            model_error: None,
        };

        let text = describe_projection(&projection);

        assert!(text.contains("2024-02"));
        assert!(text.contains("100"));
        assert!(text.contains('5'));
        assert!(text.contains('6'));
    }
}

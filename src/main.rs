// ==========================================
// 人员配置预测系统 - 命令行入口
// ==========================================
// 默认: 汇总 (summary)
// --train: 训练并保存模型
// --predict [--year Y --month M]: 次月预测
// --forecast [--year Y --month M]: 首个缺失月的趋势预测
// 输出: stdout 一个 JSON 文档 {"step": ..., "result": ...}; 日志走 stderr
// ==========================================

use anyhow::{Context, Result};
use clap::Parser;
use dotacion_forecast::config::{env_keys, PipelineConfig};
use dotacion_forecast::{i18n, logging, StaffingApi, YearMonth};
use serde::Serialize;
use std::path::PathBuf;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "dotacion-forecast")]
#[command(about = "Monthly capacity estimation and next-month staffing projection")]
#[command(version)]
struct Args {
    /// Directory containing the monthly spreadsheets
    #[arg(short, long, env = env_keys::DATA_DIR)]
    data_dir: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Model artifact path (default: <data-dir>/model.json)
    #[arg(long, env = env_keys::MODEL_PATH)]
    model_path: Option<PathBuf>,

    /// SQLite history database for monthly summaries
    #[arg(long = "db", env = env_keys::DB_PATH)]
    db_path: Option<PathBuf>,

    /// Persist monthly summaries to the default history database
    #[arg(long)]
    persist: bool,

    /// Train the classifier and save the model
    #[arg(long, conflicts_with_all = ["predict", "forecast"])]
    train: bool,

    /// Project the month following the base month
    #[arg(long, conflicts_with = "forecast")]
    predict: bool,

    /// Forecast the first month without a report
    #[arg(long)]
    forecast: bool,

    /// Base (or forecast target) month year (with --month)
    #[arg(long, requires = "month")]
    year: Option<i32>,

    /// Base (or forecast target) month (1-12, with --year)
    #[arg(long, requires = "year", value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,

    /// Message language (en, es)
    #[arg(long, default_value = "en")]
    locale: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

#[derive(Serialize)]
struct StepOutput<T: Serialize> {
    step: &'static str,
    result: T,
}

fn emit<T: Serialize>(step: &'static str, result: T) -> Result<()> {
    let json = serde_json::to_string_pretty(&StepOutput { step, result })
        .context("无法序列化输出")?;
    println!("{}", json);
    Ok(())
}

fn build_config(args: &Args) -> Result<PipelineConfig> {
    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_json_file(path)
            .with_context(|| format!("无法加载配置文件 {}", path.display()))?,
        None => PipelineConfig::for_data_dir("."),
    }
    .apply_env_overrides();

    if let Some(dir) = &args.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(path) = &args.model_path {
        config.model_path = Some(path.clone());
    }
    if let Some(path) = &args.db_path {
        config.db_path = Some(path.clone());
    }
    if args.persist {
        config.persist_history = true;
    }

    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.log_json {
        logging::init_json();
    } else {
        logging::init();
    }
    i18n::set_locale(&args.locale);

    tracing::info!(
        "{} v{} (locale={})",
        dotacion_forecast::APP_NAME,
        dotacion_forecast::VERSION,
        i18n::current_locale()
    );

    let config = build_config(&args)?;
    tracing::info!(
        data_dir = %config.data_dir.display(),
        model = %config.resolved_model_path().display(),
        "配置加载完成"
    );

    let api = StaffingApi::new(config);
    let period = match (args.year, args.month) {
        (Some(year), Some(month)) => Some(YearMonth::new(year, month)),
        _ => None,
    };

    if args.train {
        let report = api.train().context("训练失败")?;
        emit("train", report)
    } else if args.predict {
        let report = api.predict(period).context("预测失败")?;
        emit("predict", report)
    } else if args.forecast {
        let report = api.forecast(period).context("缺失月预测失败")?;
        emit("forecast", report)
    } else {
        let report = api.summarize().context("汇总失败")?;
        emit("summary", report)
    }
}

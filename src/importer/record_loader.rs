// ==========================================
// 人员配置预测系统 - 目录记录加载器
// ==========================================
// 主流程: 文件发现 → 年月解析 → 文件解析 → 表头解析 → 行映射 → 汇总
// 汇总粒度: (年, 月, 用户, 休假, 请假), 件数求和, 按键升序
// ==========================================

use crate::config::ImportConfig;
use crate::domain::production::ProductionRecord;
use crate::importer::data_cleaner::normalize_text;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::SchemaMapper;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::importer_trait::RecordSource;
use crate::importer::period::parse_period_from_file_name;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

type AggregationKey = (i32, u32, String, bool, bool);

/// 发现目录下的源报表文件 (按文件名排序)
pub fn discover_source_files(dir: &Path, config: &ImportConfig) -> ImportResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ImportError::NoSourceData(format!(
            "数据目录不存在: {}",
            dir.display()
        )));
    }

    let pattern = config
        .file_name_pattern
        .as_deref()
        .map(normalize_text)
        .filter(|p| !p.is_empty());
    let extensions: Vec<String> = config.extensions.iter().map(|e| e.to_lowercase()).collect();

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }

        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => continue,
        };
        // Excel 打开时生成的锁文件
        if name.starts_with("~$") {
            continue;
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if !extensions.contains(&ext) {
            continue;
        }

        if let Some(pattern) = &pattern {
            if !normalize_text(name).contains(pattern.as_str()) {
                debug!(file = %name, "文件名不匹配, 跳过");
                continue;
            }
        }

        files.push(path);
    }

    if files.is_empty() {
        return Err(ImportError::NoSourceData(format!(
            "目录中无匹配的报表文件: {}",
            dir.display()
        )));
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// 加载并汇总目录下所有报表
#[instrument(skip(dir, config), fields(dir = %dir.display()))]
pub fn load_normalized_records(dir: &Path, config: &ImportConfig) -> ImportResult<Vec<ProductionRecord>> {
    let files = discover_source_files(dir, config)?;
    info!(count = files.len(), "开始加载月度报表");

    let parser = UniversalFileParser;
    let mapper = SchemaMapper::new(config);
    let mut totals: BTreeMap<AggregationKey, u64> = BTreeMap::new();

    for path in &files {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        let period = parse_period_from_file_name(&file_name)?;
        let sheet = parser.parse(path)?;
        let schema = mapper.resolve(&file_name, &sheet.headers)?;
        debug!(file = %file_name, period = %period, ?schema, "表头解析完成");

        let mut mapped = 0usize;
        let mut skipped = 0usize;
        for (idx, row) in sheet.rows.iter().enumerate() {
            // 行号从 2 开始 (第 1 行为表头)
            match mapper.map_row(&schema, &file_name, period, row, idx + 2)? {
                Some(record) => {
                    let key = (
                        record.year,
                        record.month,
                        record.user,
                        record.is_on_vacation,
                        record.is_on_leave,
                    );
                    let entry = totals.entry(key).or_insert(0);
                    *entry = entry.saturating_add(record.folio_count);
                    mapped += 1;
                }
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            warn!(file = %file_name, skipped = skipped, "存在用户为空的行, 已跳过");
        }
        info!(file = %file_name, period = %period, rows = mapped, "报表加载完成");
    }

    if totals.is_empty() {
        return Err(ImportError::NoSourceData(format!(
            "报表中无有效记录: {}",
            dir.display()
        )));
    }

    let records: Vec<ProductionRecord> = totals
        .into_iter()
        .map(
            |((year, month, user, is_on_vacation, is_on_leave), folio_count)| ProductionRecord {
                year,
                month,
                user,
                is_on_vacation,
                is_on_leave,
                folio_count,
            },
        )
        .collect();

    info!(records = records.len(), "记录汇总完成");
    Ok(records)
}

// ==========================================
// DirectoryRecordSource - 目录记录来源
// ==========================================
pub struct DirectoryRecordSource {
    dir: PathBuf,
    config: ImportConfig,
}

impl DirectoryRecordSource {
    pub fn new<P: AsRef<Path>>(dir: P, config: ImportConfig) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            config,
        }
    }
}

impl RecordSource for DirectoryRecordSource {
    fn load_records(&self) -> ImportResult<Vec<ProductionRecord>> {
        load_normalized_records(&self.dir, &self.config)
    }
}

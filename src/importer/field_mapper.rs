// ==========================================
// 人员配置预测系统 - 字段映射器实现
// ==========================================
// 职责: 源表头 → 逻辑字段解析 (显式别名) + 行映射与类型转换
// 红线: 必填字段 (user / folio_count) 无匹配列 → SchemaMismatch
// ==========================================

use crate::config::{FieldAliases, ImportConfig};
use crate::domain::production::ProductionRecord;
use crate::domain::types::YearMonth;
use crate::importer::data_cleaner::{normalize_text, DataCleaner};
use crate::importer::error::{ImportError, ImportResult};
use std::collections::HashMap;

/// 逻辑字段 → 源列名 (已解析)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSchema {
    pub user: String,
    pub folio_count: String,
    /// 休假标志列 (可多列, 可为空)
    pub vacation: Vec<String>,
    /// 请假标志列 (可多列, 可为空)
    pub leave: Vec<String>,
}

/// 去掉表头去重时追加的 ".N" 后缀
fn strip_dedupe_suffix(header: &str) -> &str {
    match header.rsplit_once('.') {
        Some((base, suffix)) if !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit()) => {
            base
        }
        _ => header,
    }
}

pub struct SchemaMapper {
    aliases: FieldAliases,
    cleaner: DataCleaner,
}

impl SchemaMapper {
    pub fn new(config: &ImportConfig) -> Self {
        Self {
            aliases: config.field_aliases.clone(),
            cleaner: DataCleaner::new(&config.truthy_values),
        }
    }

    /// 解析表头
    ///
    /// # 参数
    /// - file: 文件名 (仅用于错误信息)
    /// - headers: 已去重的源表头
    pub fn resolve(&self, file: &str, headers: &[String]) -> ImportResult<ResolvedSchema> {
        let normalized: Vec<(String, &String)> =
            headers.iter().map(|h| (normalize_text(h), h)).collect();

        let user = self.resolve_required(file, "user", &self.aliases.user, &normalized, headers)?;
        let folio_count = self.resolve_required(
            file,
            "folio_count",
            &self.aliases.folio_count,
            &normalized,
            headers,
        )?;

        Ok(ResolvedSchema {
            user,
            folio_count,
            vacation: Self::resolve_optional(&self.aliases.vacation, &normalized),
            leave: Self::resolve_optional(&self.aliases.leave, &normalized),
        })
    }

    /// 必填字段: 按别名顺序取首个命中的列
    fn resolve_required(
        &self,
        file: &str,
        field: &str,
        aliases: &[String],
        normalized: &[(String, &String)],
        headers: &[String],
    ) -> ImportResult<String> {
        aliases
            .iter()
            .map(|alias| normalize_text(alias))
            .find_map(|alias| {
                normalized
                    .iter()
                    .find(|(norm, _)| *norm == alias)
                    .map(|(_, original)| (*original).clone())
            })
            .ok_or_else(|| ImportError::SchemaMismatch {
                file: file.to_string(),
                field: field.to_string(),
                available: headers.to_vec(),
            })
    }

    /// 可选字段: 收集所有命中的列 (含重名去重后的 ".N" 列)
    fn resolve_optional(aliases: &[String], normalized: &[(String, &String)]) -> Vec<String> {
        let aliases: Vec<String> = aliases.iter().map(|a| normalize_text(a)).collect();
        normalized
            .iter()
            .filter(|(norm, _)| {
                aliases
                    .iter()
                    .any(|a| norm == a || strip_dedupe_suffix(norm) == a)
            })
            .map(|(_, original)| (*original).clone())
            .collect()
    }

    /// 行映射
    ///
    /// # 返回
    /// - Ok(None): 用户为空, 跳过该行
    /// - Err(TypeConversionError): 件数非法
    pub fn map_row(
        &self,
        schema: &ResolvedSchema,
        file: &str,
        period: YearMonth,
        row: &HashMap<String, String>,
        row_number: usize,
    ) -> ImportResult<Option<ProductionRecord>> {
        let user = match row.get(&schema.user).map(|v| v.trim()) {
            Some(v) if !v.is_empty() => v.split_whitespace().collect::<Vec<_>>().join(" "),
            _ => return Ok(None),
        };

        let raw_folio = row.get(&schema.folio_count).map(String::as_str).unwrap_or("");
        let folio_count = self.cleaner.parse_folio_count(raw_folio).map_err(|message| {
            ImportError::TypeConversionError {
                file: file.to_string(),
                row: row_number,
                field: schema.folio_count.clone(),
                message,
            }
        })?;

        Ok(Some(ProductionRecord {
            year: period.year,
            month: period.month,
            user,
            is_on_vacation: self.any_flag(row, &schema.vacation),
            is_on_leave: self.any_flag(row, &schema.leave),
            folio_count,
        }))
    }

    fn any_flag(&self, row: &HashMap<String, String>, columns: &[String]) -> bool {
        columns
            .iter()
            .filter_map(|c| row.get(c))
            .any(|v| self.cleaner.is_truthy_flag(v))
    }
}

impl Default for SchemaMapper {
    fn default() -> Self {
        Self::new(&ImportConfig::default())
    }
}

// ==========================================
// 人员配置预测系统 - 导入层 Trait
// ==========================================
// 职责: 定义文件解析与记录来源接口（不包含实现）
// ==========================================

use crate::domain::production::ProductionRecord;
use crate::importer::error::ImportResult;
use std::collections::HashMap;
use std::path::Path;

/// 原始表格: 表头 (已去重) + 行记录 (列名 → 文本值)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSheet {
    pub headers: Vec<String>,
    pub rows: Vec<HashMap<String, String>>,
}

// ==========================================
// FileParser Trait
// ==========================================
// 实现者: ExcelParser, CsvParser
pub trait FileParser: Send + Sync {
    /// 解析文件首个工作表 (首行为表头, 跳过空白行)
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<RawSheet>;
}

// ==========================================
// RecordSource Trait
// ==========================================
// 用途: 归一化生产记录来源
// 实现者: DirectoryRecordSource
pub trait RecordSource: Send + Sync {
    /// 加载归一化记录
    ///
    /// # 返回
    /// - Err(NoSourceData): 无可导入数据
    fn load_records(&self) -> ImportResult<Vec<ProductionRecord>>;
}

// ==========================================
// 人员配置预测系统 - 导入层
// ==========================================
// 职责: 月度报表 (xlsx/xls/csv) → 归一化 ProductionRecord
// 流程: 文件发现 → 年月解析 → 解析 → 字段映射 → 清洗 → 汇总
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod importer_trait;
pub mod period;
pub mod record_loader;

// 重导出核心类型
pub use data_cleaner::{normalize_text, DataCleaner};
pub use error::{ImportError, ImportResult};
pub use field_mapper::{ResolvedSchema, SchemaMapper};
pub use file_parser::{dedupe_headers, CsvParser, ExcelParser, UniversalFileParser};
pub use period::parse_period_from_file_name;
pub use record_loader::{discover_source_files, load_normalized_records, DirectoryRecordSource};

// 重导出 Trait 接口
pub use importer_trait::{FileParser, RawSheet, RecordSource};

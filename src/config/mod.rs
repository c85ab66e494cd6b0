// ==========================================
// 人员配置预测系统 - 配置层
// ==========================================
// 职责: 运行配置 (路径/模型参数) 与导入字段映射配置
// ==========================================

pub mod import_config;
pub mod pipeline_config;

// 重导出核心配置
pub use import_config::{FieldAliases, ImportConfig};
pub use pipeline_config::{
    env_keys, get_default_db_path, ConfigError, PipelineConfig, DEFAULT_DB_FILE,
};

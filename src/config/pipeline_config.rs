// ==========================================
// 人员配置预测系统 - 运行配置
// ==========================================
// 优先级: 命令行参数 > 环境变量 > 配置文件 (JSON) > 默认值
// ==========================================

use crate::classifier::ForestConfig;
use crate::config::import_config::ImportConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 环境变量
pub mod env_keys {
    pub const DATA_DIR: &str = "DOTACION_DATA_DIR";
    pub const MODEL_PATH: &str = "DOTACION_MODEL_PATH";
    pub const DB_PATH: &str = "DOTACION_DB_PATH";
}

/// 默认模型文件名 (位于数据目录下)
pub const DEFAULT_MODEL_FILE: &str = "model.json";

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {message}")]
    ReadError { path: String, message: String },

    #[error("配置文件格式错误 ({path}): {message}")]
    ParseError { path: String, message: String },
}

// ==========================================
// PipelineConfig - 流水线配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// 月度报表所在目录
    pub data_dir: PathBuf,

    /// 模型文件路径 (None 时为 data_dir/model.json)
    #[serde(default)]
    pub model_path: Option<PathBuf>,

    /// 月度产能历史库路径 (优先于 persist_history 的默认路径)
    #[serde(default)]
    pub db_path: Option<PathBuf>,

    /// 未指定 db_path 时是否写入用户数据目录下的默认历史库
    #[serde(default)]
    pub persist_history: bool,

    #[serde(default)]
    pub import: ImportConfig,

    #[serde(default)]
    pub forest: ForestConfig,
}

impl PipelineConfig {
    /// 以数据目录创建默认配置
    pub fn for_data_dir<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            model_path: None,
            db_path: None,
            persist_history: false,
            import: ImportConfig::default(),
            forest: ForestConfig::default(),
        }
    }

    /// 从 JSON 配置文件加载
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&raw).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// 应用环境变量覆写 (空值忽略)
    pub fn apply_env_overrides(mut self) -> Self {
        if let Some(dir) = read_env_path(env_keys::DATA_DIR) {
            self.data_dir = dir;
        }
        if let Some(path) = read_env_path(env_keys::MODEL_PATH) {
            self.model_path = Some(path);
        }
        if let Some(path) = read_env_path(env_keys::DB_PATH) {
            self.db_path = Some(path);
        }
        self
    }

    /// 实际使用的模型文件路径
    pub fn resolved_model_path(&self) -> PathBuf {
        self.model_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join(DEFAULT_MODEL_FILE))
    }

    /// 实际使用的历史库路径 (None 表示不落库)
    pub fn resolved_db_path(&self) -> Option<PathBuf> {
        match &self.db_path {
            Some(path) => Some(path.clone()),
            None if self.persist_history => Some(get_default_db_path()),
            None => None,
        }
    }
}

fn read_env_path(key: &str) -> Option<PathBuf> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// 默认历史库文件名
pub const DEFAULT_DB_FILE: &str = "dotacion_forecast.db";

/// 默认历史库路径 (用户数据目录下)
pub fn get_default_db_path() -> PathBuf {
    default_db_path_in(dirs::data_dir())
}

/// 目录不可用或无法创建时回退到当前目录
fn default_db_path_in(data_dir: Option<PathBuf>) -> PathBuf {
    let mut path = PathBuf::from(".").join(DEFAULT_DB_FILE);

    if let Some(data_dir) = data_dir {
        let dir = data_dir.join("dotacion-forecast");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join(DEFAULT_DB_FILE);
        }
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_resolved_model_path_default() {
        let config = PipelineConfig::for_data_dir("/data/reportes");
        assert_eq!(
            config.resolved_model_path(),
            PathBuf::from("/data/reportes/model.json")
        );
    }

    #[test]
    fn test_from_json_file_partial() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"data_dir": "/tmp/datos", "forest": {{"n_trees": 50}}, "import": {{"file_name_pattern": null}}}}"#
        )
        .unwrap();

        let config = PipelineConfig::from_json_file(file.path()).unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/datos"));
        assert_eq!(config.forest.n_trees, 50);
        assert_eq!(config.forest.seed, 42);
        assert_eq!(config.import.file_name_pattern, None);
        assert_eq!(config.import.field_aliases.user[0], "usuario");
    }

    #[test]
    fn test_resolved_db_path_prefers_explicit_path() {
        let mut config = PipelineConfig::for_data_dir("/data/reportes");
        assert_eq!(config.resolved_db_path(), None);

        config.persist_history = true;
        let default_path = config.resolved_db_path().unwrap();
        assert_eq!(default_path.file_name().unwrap(), DEFAULT_DB_FILE);

        config.db_path = Some(PathBuf::from("/tmp/history.db"));
        assert_eq!(config.resolved_db_path(), Some(PathBuf::from("/tmp/history.db")));
    }

    #[test]
    fn test_default_db_path_under_data_dir() {
        let dir = tempfile::TempDir::new().unwrap();

        let path = default_db_path_in(Some(dir.path().to_path_buf()));

        assert_eq!(path, dir.path().join("dotacion-forecast").join(DEFAULT_DB_FILE));
        assert!(dir.path().join("dotacion-forecast").is_dir());
        assert_eq!(default_db_path_in(None), PathBuf::from(".").join(DEFAULT_DB_FILE));
    }

    #[test]
    fn test_from_json_file_invalid() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let result = PipelineConfig::from_json_file(file.path());
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }
}

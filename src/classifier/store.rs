// ==========================================
// 人员配置预测系统 - 模型文件存储
// ==========================================
// 格式: JSON 信封 {"format": "...", "model": {...}}
// 写入: 先写同目录临时文件再重命名, 覆盖旧模型 (后写者为准)
// 读取: 格式标记不符 / 解析失败 / 结构非法 → ArtifactIncompatible
// ==========================================

use crate::classifier::error::{ClassifierError, ClassifierResult};
use crate::classifier::model::TrainedModel;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 当前模型文件格式标记
pub const ARTIFACT_FORMAT: &str = "dotacion-forest";

// ==========================================
// ModelStore Trait
// ==========================================
// 用途: 模型持久化边界, 预测/训练流程不感知文件格式
pub trait ModelStore: Send + Sync {
    /// 保存模型 (覆盖已有文件)
    fn save(&self, model: &TrainedModel, path: &Path) -> ClassifierResult<()>;

    /// 读取模型
    ///
    /// # 返回
    /// - Err(ArtifactNotFound): 文件不存在
    /// - Err(ArtifactIncompatible): 文件不是本系统生成的模型
    fn load(&self, path: &Path) -> ClassifierResult<TrainedModel>;
}

#[derive(Serialize)]
struct ArtifactEnvelopeRef<'a> {
    format: &'a str,
    model: &'a TrainedModel,
}

#[derive(Deserialize)]
struct ArtifactEnvelope {
    format: String,
    model: serde_json::Value,
}

// ==========================================
// JsonModelStore - JSON 模型存储
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct JsonModelStore;

impl JsonModelStore {
    pub fn new() -> Self {
        Self
    }

    fn temp_path(path: &Path) -> PathBuf {
        let mut name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        path.with_file_name(name)
    }
}

impl ModelStore for JsonModelStore {
    fn save(&self, model: &TrainedModel, path: &Path) -> ClassifierResult<()> {
        let envelope = ArtifactEnvelopeRef {
            format: ARTIFACT_FORMAT,
            model,
        };
        let bytes = serde_json::to_vec(&envelope)
            .map_err(|e| ClassifierError::Serialization(e.to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let temp = Self::temp_path(path);
        fs::write(&temp, bytes)?;
        fs::rename(&temp, path)?;

        tracing::info!(path = %path.display(), trees = model.trees.len(), "模型已保存");
        Ok(())
    }

    fn load(&self, path: &Path) -> ClassifierResult<TrainedModel> {
        if !path.exists() {
            return Err(ClassifierError::ArtifactNotFound(path.display().to_string()));
        }
        let bytes = fs::read(path)?;

        let envelope: ArtifactEnvelope = serde_json::from_slice(&bytes).map_err(|e| {
            ClassifierError::ArtifactIncompatible(format!("无法解析模型文件: {}", e))
        })?;
        if envelope.format != ARTIFACT_FORMAT {
            return Err(ClassifierError::ArtifactIncompatible(format!(
                "格式标记不符: 期望 {}, 实际 {}",
                ARTIFACT_FORMAT, envelope.format
            )));
        }

        let model: TrainedModel = serde_json::from_value(envelope.model).map_err(|e| {
            ClassifierError::ArtifactIncompatible(format!("模型结构不符: {}", e))
        })?;
        model.validate()?;

        tracing::debug!(path = %path.display(), classes = ?model.classes, "模型已加载");
        Ok(model)
    }
}

// ==========================================
// 人员配置预测系统 - 数据清洗器实现
// ==========================================
// 职责: 文本归一化 (TRIM / 小写 / 去重音 / 合并空白)
//       休假/请假标志判定 / 件数解析
// ==========================================

use std::collections::HashSet;

/// 文本归一化: 去首尾空白、小写、去除西语重音、合并连续空白
pub fn normalize_text(value: &str) -> String {
    let folded: String = value
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'ä' => 'a',
            'é' | 'è' | 'ë' => 'e',
            'í' | 'ì' | 'ï' => 'i',
            'ó' | 'ò' | 'ö' => 'o',
            'ú' | 'ù' | 'ü' => 'u',
            'ñ' => 'n',
            other => other,
        })
        .collect();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub struct DataCleaner {
    truthy_values: HashSet<String>,
}

impl DataCleaner {
    /// 以"是"取值集合创建 (取值先做归一化)
    pub fn new(truthy_values: &[String]) -> Self {
        Self {
            truthy_values: truthy_values.iter().map(|v| normalize_text(v)).collect(),
        }
    }

    /// 标志列判定: 命中"是"取值集合, 或为非零数值
    ///
    /// 整格匹配, 附带说明的单元格 (如 "Sí (15 días)") 不视为真
    pub fn is_truthy_flag(&self, value: &str) -> bool {
        let normalized = normalize_text(value);
        if normalized.is_empty() {
            return false;
        }
        if self.truthy_values.contains(&normalized) {
            return true;
        }
        normalized
            .replace(',', ".")
            .parse::<f64>()
            .map(|n| n.is_finite() && n != 0.0)
            .unwrap_or(false)
    }

    /// 件数解析: 空值 → 0; 须为非负整数值 (接受 Excel 的 12.0 形式)
    pub fn parse_folio_count(&self, value: &str) -> Result<u64, String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Ok(0);
        }

        if let Ok(n) = trimmed.parse::<u64>() {
            return Ok(n);
        }

        let parsed = trimmed
            .parse::<f64>()
            .map_err(|_| format!("无法解析为件数: {}", trimmed))?;

        if !parsed.is_finite() || parsed < 0.0 {
            return Err(format!("件数须为非负数: {}", trimmed));
        }
        if parsed.fract() != 0.0 {
            return Err(format!("件数须为整数: {}", trimmed));
        }
        if parsed > u64::MAX as f64 {
            return Err(format!("件数超出范围: {}", trimmed));
        }

        Ok(parsed as u64)
    }
}

impl Default for DataCleaner {
    fn default() -> Self {
        Self::new(&crate::config::ImportConfig::default().truthy_values)
    }
}

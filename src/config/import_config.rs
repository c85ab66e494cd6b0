// ==========================================
// 人员配置预测系统 - 导入配置 (字段别名映射)
// ==========================================
// 职责: 显式列出每个逻辑字段可接受的源列名
// 红线: 必填字段找不到列时报 SchemaMismatch, 不回退到任意列
// ==========================================

use serde::{Deserialize, Serialize};

/// 逻辑字段 → 源列名别名 (按优先级排序, 比较前统一做文本归一化)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldAliases {
    #[serde(default = "default_user_aliases")]
    pub user: Vec<String>,
    #[serde(default = "default_folio_aliases")]
    pub folio_count: Vec<String>,
    #[serde(default = "default_vacation_aliases")]
    pub vacation: Vec<String>,
    #[serde(default = "default_leave_aliases")]
    pub leave: Vec<String>,
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn default_user_aliases() -> Vec<String> {
    to_strings(&["usuario", "usuarios", "nombre usuario"])
}

fn default_folio_aliases() -> Vec<String> {
    // 源报表常含两列"Recuento de folio", 第二列为按用户计数
    to_strings(&["recuento de folio.1", "recuento de folio", "folios", "folio"])
}

fn default_vacation_aliases() -> Vec<String> {
    to_strings(&["vacaciones", "vacacion"])
}

fn default_leave_aliases() -> Vec<String> {
    to_strings(&["licencia", "licencias", "licencia medica"])
}

impl Default for FieldAliases {
    fn default() -> Self {
        Self {
            user: default_user_aliases(),
            folio_count: default_folio_aliases(),
            vacation: default_vacation_aliases(),
            leave: default_leave_aliases(),
        }
    }
}

/// 导入配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// 文件名须包含的片段 (归一化后比较); None 表示不过滤
    #[serde(default = "default_file_name_pattern")]
    pub file_name_pattern: Option<String>,

    /// 支持的扩展名
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    #[serde(default)]
    pub field_aliases: FieldAliases,

    /// 休假/请假列视为"是"的取值 (归一化后比较)
    #[serde(default = "default_truthy_values")]
    pub truthy_values: Vec<String>,
}

fn default_file_name_pattern() -> Option<String> {
    Some("Ventas e Ingreso por Usuario".to_string())
}

fn default_extensions() -> Vec<String> {
    to_strings(&["xlsx", "xls", "csv"])
}

fn default_truthy_values() -> Vec<String> {
    to_strings(&["si", "s", "x", "true", "1", "yes", "vacaciones", "licencia"])
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            file_name_pattern: default_file_name_pattern(),
            extensions: default_extensions(),
            field_aliases: FieldAliases::default(),
            truthy_values: default_truthy_values(),
        }
    }
}

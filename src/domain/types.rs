// ==========================================
// 人员配置预测系统 - 领域类型定义
// ==========================================
// 依据: 月度产能与人员配置评估规则
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 年月 (Year-Month)
// ==========================================
// 排序规则: 先年后月 (字段顺序即比较顺序)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// 月份是否落在 1..=12
    pub fn is_valid(&self) -> bool {
        (1..=12).contains(&self.month)
    }

    /// 下一个月 (12 月跨年)
    pub fn succ(&self) -> Self {
        if self.month >= 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

// ==========================================
// 人员配置状态 (Adequacy Label)
// ==========================================
// 分类目标: 实际人数 vs 产量推导的需求人数
// 序列化格式: SCREAMING_SNAKE_CASE
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdequacyLabel {
    Adequate,      // 配置适当
    Overstaffed,   // 超配
    Understaffed,  // 欠配
    Indeterminate, // 无产能基准,无法判定
}

impl AdequacyLabel {
    /// 可用于训练的标签 (不含 Indeterminate)
    pub const TRAINABLE: [AdequacyLabel; 3] = [
        AdequacyLabel::Adequate,
        AdequacyLabel::Overstaffed,
        AdequacyLabel::Understaffed,
    ];

    /// 分类器标签编码
    pub fn code(&self) -> &'static str {
        match self {
            AdequacyLabel::Overstaffed => "sobre",
            AdequacyLabel::Understaffed => "sub",
            AdequacyLabel::Adequate => "ok",
            AdequacyLabel::Indeterminate => "indeterminado",
        }
    }

    /// 由分类器编码还原标签
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "sobre" => Some(AdequacyLabel::Overstaffed),
            "sub" => Some(AdequacyLabel::Understaffed),
            "ok" => Some(AdequacyLabel::Adequate),
            "indeterminado" => Some(AdequacyLabel::Indeterminate),
            _ => None,
        }
    }

    pub fn is_trainable(&self) -> bool {
        !matches!(self, AdequacyLabel::Indeterminate)
    }

    /// i18n 文案 key
    pub fn message_key(&self) -> &'static str {
        match self {
            AdequacyLabel::Overstaffed => "predict.state_overstaffed",
            AdequacyLabel::Understaffed => "predict.state_understaffed",
            AdequacyLabel::Adequate => "predict.state_adequate",
            AdequacyLabel::Indeterminate => "predict.state_indeterminate",
        }
    }
}

impl fmt::Display for AdequacyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdequacyLabel::Adequate => write!(f, "ADEQUATE"),
            AdequacyLabel::Overstaffed => write!(f, "OVERSTAFFED"),
            AdequacyLabel::Understaffed => write!(f, "UNDERSTAFFED"),
            AdequacyLabel::Indeterminate => write!(f, "INDETERMINATE"),
        }
    }
}

// ==========================================
// 人员配置预测系统 - 月度产能领域模型
// ==========================================
// 口径: 最优产能 = (有效人员最高产量 + 最低正产量) / 2, 四舍五入(远离零)
// 红线: 无有效人员的月份不报错, 产能字段置空
// ==========================================

use crate::domain::types::YearMonth;
use serde::{Deserialize, Serialize};

// ==========================================
// MonthlyCapacity - 月度产能
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyCapacity {
    // ===== 主键 =====
    pub year: i32,
    pub month: u32,

    // ===== 产能口径 (仅有效人员) =====
    pub optimal_capacity: Option<u64>,
    pub max_productivity: Option<u64>,
    pub min_productivity: Option<u64>,
    pub active_workers: u64,

    // ===== 当月实际 =====
    pub total_production: u64, // 含休假/请假人员产量
    pub real_workers: u64,
}

impl MonthlyCapacity {
    pub fn period(&self) -> YearMonth {
        YearMonth::new(self.year, self.month)
    }
}

/// 最优产能: 最高与最低产量的中点
///
/// 取整规则为四舍五入远离零 (x.5 → x+1), 与银行家舍入在 .5 处不同。
/// 产量非负, 故 (max + min + 1) / 2 与远离零舍入等价。
pub fn midpoint_capacity(max_productivity: u64, min_productivity: u64) -> u64 {
    let sum = max_productivity.saturating_add(min_productivity);
    sum / 2 + sum % 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midpoint_exact() {
        assert_eq!(midpoint_capacity(30, 10), 20);
    }

    #[test]
    fn test_midpoint_rounds_half_away_from_zero() {
        // 16.5 → 17 (银行家舍入会得到 16)
        assert_eq!(midpoint_capacity(23, 10), 17);
        // 15.5 → 16
        assert_eq!(midpoint_capacity(21, 10), 16);
        // 0.5 → 1
        assert_eq!(midpoint_capacity(1, 0), 1);
    }
}

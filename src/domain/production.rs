// ==========================================
// 人员配置预测系统 - 生产记录领域模型
// ==========================================
// 来源: 导入层 (Record Normalizer) 归一化结果
// 粒度: (年, 月, 用户, 休假, 请假) 唯一, 已按月汇总
// ==========================================

use crate::domain::types::YearMonth;
use serde::{Deserialize, Serialize};

// ==========================================
// ProductionRecord - 员工月度产量记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionRecord {
    pub year: i32,
    pub month: u32,
    pub user: String,
    pub is_on_vacation: bool,
    pub is_on_leave: bool,
    pub folio_count: u64, // 当月处理单据 (folio) 数
}

impl ProductionRecord {
    pub fn period(&self) -> YearMonth {
        YearMonth::new(self.year, self.month)
    }

    /// 是否为有效在岗人员 (既未休假也未请假)
    pub fn is_eligible(&self) -> bool {
        !self.is_on_vacation && !self.is_on_leave
    }
}

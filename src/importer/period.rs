// ==========================================
// 人员配置预测系统 - 文件名年月解析
// ==========================================
// 规则: 月份 = 首个西语月份名 (enero ~ diciembre, 含 setiembre)
//       年份 = 首个 19xx/20xx 四位数字
//       任一缺失 → PeriodNotInFileName (不做默认回退)
// ==========================================

use crate::domain::types::YearMonth;
use crate::importer::data_cleaner::normalize_text;
use crate::importer::error::{ImportError, ImportResult};
use std::path::Path;

const SPANISH_MONTHS: [(&str, u32); 13] = [
    ("enero", 1),
    ("febrero", 2),
    ("marzo", 3),
    ("abril", 4),
    ("mayo", 5),
    ("junio", 6),
    ("julio", 7),
    ("agosto", 8),
    ("septiembre", 9),
    ("setiembre", 9),
    ("octubre", 10),
    ("noviembre", 11),
    ("diciembre", 12),
];

fn month_from_token(token: &str) -> Option<u32> {
    SPANISH_MONTHS
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, month)| *month)
}

fn year_from_token(token: &str) -> Option<i32> {
    let is_year = token.len() == 4
        && token.chars().all(|c| c.is_ascii_digit())
        && (token.starts_with("19") || token.starts_with("20"));
    if is_year {
        token.parse().ok()
    } else {
        None
    }
}

/// 从文件名解析年月
pub fn parse_period_from_file_name(file_name: &str) -> ImportResult<YearMonth> {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);

    let cleaned: String = normalize_text(stem)
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let tokens: Vec<&str> = cleaned.split_whitespace().collect();

    let month = tokens.iter().find_map(|t| month_from_token(t));
    let year = tokens.iter().find_map(|t| year_from_token(t));

    match (year, month) {
        (Some(year), Some(month)) => Ok(YearMonth::new(year, month)),
        _ => Err(ImportError::PeriodNotInFileName(file_name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_period_basic() {
        let period =
            parse_period_from_file_name("Ventas e Ingreso por Usuario Marzo 2024.xlsx").unwrap();
        assert_eq!(period, YearMonth::new(2024, 3));
    }

    #[test]
    fn test_parse_period_separators_and_case() {
        let period = parse_period_from_file_name("ventas_e_ingreso-DICIEMBRE-2023.csv").unwrap();
        assert_eq!(period, YearMonth::new(2023, 12));

        let period = parse_period_from_file_name("Reporte 2022 Setiembre.xls").unwrap();
        assert_eq!(period, YearMonth::new(2022, 9));
    }

    #[test]
    fn test_parse_period_first_match_wins() {
        let period = parse_period_from_file_name("Enero Febrero 2021 2020.csv").unwrap();
        assert_eq!(period, YearMonth::new(2021, 1));
    }

    #[test]
    fn test_parse_period_missing_year() {
        let result = parse_period_from_file_name("Ventas e Ingreso por Usuario Marzo.xlsx");
        assert!(matches!(result, Err(ImportError::PeriodNotInFileName(_))));
    }

    #[test]
    fn test_parse_period_missing_month() {
        let result = parse_period_from_file_name("Ventas e Ingreso por Usuario 2024.xlsx");
        assert!(matches!(result, Err(ImportError::PeriodNotInFileName(_))));

        // 五位数字不视为年份
        let result = parse_period_from_file_name("Marzo 20245.csv");
        assert!(matches!(result, Err(ImportError::PeriodNotInFileName(_))));
    }
}

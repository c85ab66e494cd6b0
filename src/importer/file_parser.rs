// ==========================================
// 人员配置预测系统 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xls) / CSV (.csv)
// 表头重名: 第二次出现起追加 .1/.2 后缀 (如 "Recuento de folio.1")
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::importer_trait::{FileParser, RawSheet};
use calamine::{open_workbook_auto, Reader};
use csv::ReaderBuilder;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::path::Path;

/// 表头去重与补名
///
/// - 空表头命名为 `column_{序号}`
/// - 重名表头从第二次出现起追加 `.1`、`.2` ...
pub fn dedupe_headers(raw: &[String]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut taken: HashSet<String> = HashSet::new();
    let mut headers = Vec::with_capacity(raw.len());

    for (index, header) in raw.iter().enumerate() {
        let base = header.trim().trim_start_matches('\u{feff}').to_string();
        let base = if base.is_empty() {
            format!("column_{}", index)
        } else {
            base
        };

        let mut candidate = base.clone();
        while taken.contains(&candidate) {
            let counter = seen.entry(base.clone()).or_insert(0);
            *counter += 1;
            candidate = format!("{}.{}", base, counter);
        }

        taken.insert(candidate.clone());
        headers.push(candidate);
    }

    headers
}

fn row_to_map(headers: &[String], values: impl Iterator<Item = String>) -> HashMap<String, String> {
    let mut row_map = HashMap::new();
    for (col_idx, value) in values.enumerate() {
        if let Some(header) = headers.get(col_idx) {
            row_map.insert(header.clone(), value.trim().to_string());
        }
    }
    row_map
}

fn check_file(path: &Path, allowed: &[&str]) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    if !allowed.contains(&ext.as_str()) {
        return Err(ImportError::UnsupportedFormat(ext));
    }
    Ok(())
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<RawSheet> {
        check_file(file_path, &["csv"])?;

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let raw_headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
        let headers = dedupe_headers(&raw_headers);

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row_map = row_to_map(&headers, record.iter().map(|v| v.to_string()));

            // 跳过完全空白的行
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }
            rows.push(row_map);
        }

        Ok(RawSheet { headers, rows })
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_to_raw_records(&self, file_path: &Path) -> ImportResult<RawSheet> {
        check_file(file_path, &["xlsx", "xls"])?;

        let mut workbook = open_workbook_auto(file_path)?;

        // 读取第一个 sheet
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;
        let range = workbook.worksheet_range(&sheet_name)?;

        // 提取表头（第一行）
        let mut sheet_rows = range.rows();
        let header_row = sheet_rows
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无数据行".to_string()))?;
        let raw_headers: Vec<String> = header_row.iter().map(|cell| cell.to_string()).collect();
        let headers = dedupe_headers(&raw_headers);

        let mut rows = Vec::new();
        for data_row in sheet_rows {
            let row_map = row_to_map(&headers, data_row.iter().map(|cell| cell.to_string()));

            // 跳过完全空白的行
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }
            rows.push(row_map);
        }

        Ok(RawSheet { headers, rows })
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<RawSheet> {
        let path = file_path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => CsvParser.parse_to_raw_records(path),
            "xlsx" | "xls" => ExcelParser.parse_to_raw_records(path),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn temp_csv(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut temp_file = Builder::new().suffix(".csv").tempfile().unwrap();
        for line in lines {
            writeln!(temp_file, "{}", line).unwrap();
        }
        temp_file
    }

    #[test]
    fn test_csv_parser_valid_file() {
        let temp_file = temp_csv(&["Usuario,Recuento de folio", "ana,10", "bruno,20"]);

        let sheet = CsvParser.parse_to_raw_records(temp_file.path()).unwrap();

        assert_eq!(sheet.headers, vec!["Usuario", "Recuento de folio"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0].get("Usuario"), Some(&"ana".to_string()));
        assert_eq!(sheet.rows[1].get("Recuento de folio"), Some(&"20".to_string()));
    }

    #[test]
    fn test_csv_parser_file_not_found() {
        let result = CsvParser.parse_to_raw_records(Path::new("non_existent.csv"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_csv_parser_skip_empty_rows() {
        let temp_file = temp_csv(&["Usuario,Recuento de folio", "ana,10", ",", "bruno,20"]);

        let sheet = CsvParser.parse_to_raw_records(temp_file.path()).unwrap();

        // 应跳过空行
        assert_eq!(sheet.rows.len(), 2);
    }

    #[test]
    fn test_csv_parser_duplicate_headers() {
        let temp_file = temp_csv(&[
            "Usuario,Recuento de folio,Recuento de folio",
            "ana,99,10",
        ]);

        let sheet = CsvParser.parse_to_raw_records(temp_file.path()).unwrap();

        assert_eq!(
            sheet.headers,
            vec!["Usuario", "Recuento de folio", "Recuento de folio.1"]
        );
        assert_eq!(sheet.rows[0].get("Recuento de folio.1"), Some(&"10".to_string()));
    }

    #[test]
    fn test_dedupe_headers_blank_and_collision() {
        let raw = vec![
            "a".to_string(),
            "".to_string(),
            "a".to_string(),
            "a.1".to_string(),
        ];
        assert_eq!(dedupe_headers(&raw), vec!["a", "column_1", "a.1", "a.1.1"]);
    }

    #[test]
    fn test_universal_parser_unsupported() {
        let result = UniversalFileParser.parse("reporte.pdf");
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_excel_parser_file_not_found() {
        let result = ExcelParser.parse_to_raw_records(Path::new("no_existe.xlsx"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }
}

// ==========================================
// 车辆批量导入 - CSV 解码器
// ==========================================
// 职责: 文件字节 → 表头规范化后的有序记录序列
// 红线: 结构错误整体失败，不做逐行恢复；不做业务校验
// ==========================================

use crate::domain::vehicle::{row_number, VehicleRecord};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::{normalize_header, FieldMapper};
use csv::ReaderBuilder;
use std::path::Path;
use tracing::debug;

/// 默认文件大小上限（5 MiB）
pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

// ==========================================
// DecodedFile - 解码结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedFile {
    /// 数据行（已跳过空行），下标 i 对应文件行号 i + 2
    pub records: Vec<VehicleRecord>,
    /// 非致命的解析提示（未知列、列数不一致等）
    pub parse_issues: Vec<String>,
}

// ==========================================
// CsvDecoder
// ==========================================
#[derive(Debug, Clone)]
pub struct CsvDecoder {
    max_file_size: u64,
}

impl Default for CsvDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FILE_SIZE)
    }
}

impl CsvDecoder {
    pub fn new(max_file_size: u64) -> Self {
        Self { max_file_size }
    }

    /// 从文件路径解码
    ///
    /// # 检查顺序
    /// 1. 文件存在
    /// 2. 扩展名为 .csv
    /// 3. 文件大小不超过上限
    pub fn decode_path(&self, file_path: &Path) -> ImportResult<DecodedFile> {
        check_csv_path(file_path)?;

        let size = std::fs::metadata(file_path)?.len();
        self.check_size(size)?;

        let bytes = std::fs::read(file_path)?;
        self.decode_bytes(&bytes)
    }

    /// 从任意 Reader 解码（读入内存后按字节解码）
    pub fn decode_reader<R: std::io::Read>(&self, mut reader: R) -> ImportResult<DecodedFile> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.decode_bytes(&bytes)
    }

    /// 从内存字节解码
    pub fn decode_bytes(&self, bytes: &[u8]) -> ImportResult<DecodedFile> {
        self.check_size(bytes.len() as u64)?;

        // csv 读取器在 EOF 处不报未闭合引号，会把后续行并入同一单元格
        if has_unterminated_quote(bytes) {
            return Err(ImportError::UnterminatedQuote);
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致，差异记入 parse_issues
            .from_reader(bytes);

        // 读取表头
        let headers: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(ImportError::MissingHeader);
        }

        let (mapper, mut parse_issues) = FieldMapper::from_headers(&headers);

        // 读取数据行
        let mut records = Vec::new();
        for result in reader.records() {
            let row = result?;

            // 跳过完全空白的行（不占用行号）
            if row.iter().all(|v| v.trim().is_empty()) {
                continue;
            }

            if row.len() != mapper.column_count() {
                parse_issues.push(format!(
                    "Row {}: expected {} fields but found {}",
                    row_number(records.len()),
                    mapper.column_count(),
                    row.len()
                ));
            }

            records.push(mapper.map_row(&row));
        }

        debug!(
            rows = records.len(),
            issues = parse_issues.len(),
            "CSV 解码完成"
        );

        Ok(DecodedFile {
            records,
            parse_issues,
        })
    }

    fn check_size(&self, size: u64) -> ImportResult<()> {
        if size > self.max_file_size {
            return Err(ImportError::FileTooLarge {
                size,
                limit: self.max_file_size,
            });
        }
        Ok(())
    }
}

/// 按 CSV 规则扫描引号
///
/// - 引号只在字段开头开启引用字段，字段中间的引号（如 20" 轮毂）按字面处理
/// - 引用字段内 "" 为转义
/// - 扫描到末尾仍处于引用字段 → 未闭合
fn has_unterminated_quote(bytes: &[u8]) -> bool {
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut iter = bytes.iter().peekable();

    while let Some(&b) = iter.next() {
        if in_quotes {
            if b == b'"' {
                if iter.peek() == Some(&&b'"') {
                    iter.next();
                } else {
                    in_quotes = false;
                }
            }
            continue;
        }

        match b {
            b',' | b'\n' | b'\r' => at_field_start = true,
            b'"' if at_field_start => {
                in_quotes = true;
                at_field_start = false;
            }
            _ => at_field_start = false,
        }
    }

    in_quotes
}

/// 路径检查：存在且扩展名为 .csv（大小写不敏感）
pub fn check_csv_path(file_path: &Path) -> ImportResult<()> {
    if !file_path.exists() {
        return Err(ImportError::FileNotFound(file_path.display().to_string()));
    }

    let ext = file_path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    if ext != "csv" {
        return Err(ImportError::UnsupportedFormat(ext));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    const HEADER: &str = "vin,make,model,year,price,mileage";

    #[test]
    fn test_decode_normalizes_headers() {
        let csv = "VIN ,Make,MODEL,Year,Price,Mileage\n1HGCV1F34LA123456,Honda,Accord,2025,35000,100\n";
        let decoded = CsvDecoder::default().decode_bytes(csv.as_bytes()).unwrap();

        assert_eq!(decoded.records.len(), 1);
        assert_eq!(decoded.records[0].vin, "1HGCV1F34LA123456");
        assert_eq!(decoded.records[0].model, "Accord");
        assert!(decoded.parse_issues.is_empty());
    }

    #[test]
    fn test_decode_skips_blank_lines() {
        let csv = format!(
            "{}\nAAAAAAAAAAAAAAAA1,Honda,Civic,2020,1,1\n\n,,,,,\nAAAAAAAAAAAAAAAA2,Honda,Fit,2019,1,1\n",
            HEADER
        );
        let decoded = CsvDecoder::default().decode_bytes(csv.as_bytes()).unwrap();

        assert_eq!(decoded.records.len(), 2);
        assert_eq!(decoded.records[1].vin, "AAAAAAAAAAAAAAAA2");
    }

    #[test]
    fn test_decode_quoted_field_with_delimiter() {
        let csv = format!(
            "{},features\nAAAAAAAAAAAAAAAA1,Honda,Civic,2020,1,1,\"Sunroof, Heated Seats\"\n",
            HEADER
        );
        let decoded = CsvDecoder::default().decode_bytes(csv.as_bytes()).unwrap();

        assert_eq!(
            decoded.records[0].features.as_deref(),
            Some("Sunroof, Heated Seats")
        );
        assert!(decoded.parse_issues.is_empty());
    }

    #[test]
    fn test_decode_empty_input_is_fatal() {
        let result = CsvDecoder::default().decode_bytes(b"");
        assert!(matches!(result, Err(ImportError::MissingHeader)));
    }

    #[test]
    fn test_decode_unterminated_quote_is_fatal() {
        let csv = format!("{}\nAAAAAAAAAAAAAAAA1,\"Honda,Civic,2020,1,1\n", HEADER);
        let result = CsvDecoder::default().decode_bytes(csv.as_bytes());
        assert!(matches!(result, Err(ImportError::UnterminatedQuote)));
    }

    #[test]
    fn test_decode_accepts_inch_mark_in_unquoted_field() {
        let csv = format!(
            "{},description\nAAAAAAAAAAAAAAAA1,Honda,Civic,2020,1,1,Has 20\" wheels\n",
            HEADER
        );
        let decoded = CsvDecoder::default().decode_bytes(csv.as_bytes()).unwrap();

        assert_eq!(decoded.records.len(), 1);
        assert_eq!(
            decoded.records[0].description.as_deref(),
            Some("Has 20\" wheels")
        );
    }

    #[test]
    fn test_decode_unterminated_quote_not_masked_by_inch_mark() {
        let csv = format!(
            "{},description\n\
             AAAAAAAAAAAAAAAA1,Honda,Civic,2020,1,1,Has 20\" wheels\n\
             AAAAAAAAAAAAAAAA2,Honda,Accord,2021,1,1,\"unterminated\n\
             AAAAAAAAAAAAAAAA3,Honda,Fit,2023,1,1,ok\n",
            HEADER
        );
        let result = CsvDecoder::default().decode_bytes(csv.as_bytes());
        assert!(matches!(result, Err(ImportError::UnterminatedQuote)));
    }

    #[test]
    fn test_decode_escaped_quotes_inside_quoted_field() {
        let csv = format!(
            "{},description\nAAAAAAAAAAAAAAAA1,Honda,Civic,2020,1,1,\"Says \"\"mint\"\", 20\"\" rims\"\n",
            HEADER
        );
        let decoded = CsvDecoder::default().decode_bytes(csv.as_bytes()).unwrap();

        assert_eq!(
            decoded.records[0].description.as_deref(),
            Some("Says \"mint\", 20\" rims")
        );
    }

    #[test]
    fn test_unterminated_quote_scan() {
        assert!(!has_unterminated_quote(b"a,b\n\"x\",y\n"));
        assert!(!has_unterminated_quote(b"a,20\" wheels,\"ok\"\n"));
        assert!(has_unterminated_quote(b"a,\"open\nb,c\n"));
        assert!(has_unterminated_quote(b"a,\"x\"\"\n"));
    }

    #[test]
    fn test_decode_invalid_utf8_is_fatal() {
        let mut bytes = format!("{}\n", HEADER).into_bytes();
        bytes.extend_from_slice(&[0xff, 0xfe, b',', b'a', b'\n']);
        let result = CsvDecoder::default().decode_bytes(&bytes);
        assert!(matches!(result, Err(ImportError::InvalidEncoding { .. })));
    }

    #[test]
    fn test_decode_records_field_count_mismatch() {
        let csv = format!("{}\nAAAAAAAAAAAAAAAA1,Honda,Civic\n", HEADER);
        let decoded = CsvDecoder::default().decode_bytes(csv.as_bytes()).unwrap();

        assert_eq!(decoded.records.len(), 1);
        assert_eq!(decoded.records[0].year, "");
        assert_eq!(
            decoded.parse_issues,
            vec!["Row 2: expected 6 fields but found 3".to_string()]
        );
    }

    #[test]
    fn test_decode_rejects_oversized_input() {
        let result = CsvDecoder::new(8).decode_bytes(HEADER.as_bytes());
        assert!(matches!(result, Err(ImportError::FileTooLarge { limit: 8, .. })));
    }

    #[test]
    fn test_decode_path_valid_file() {
        let mut temp_file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(temp_file, "{}", HEADER).unwrap();
        writeln!(temp_file, "AAAAAAAAAAAAAAAA1,Honda,Civic,2020,1,1").unwrap();

        let decoded = CsvDecoder::default().decode_path(temp_file.path()).unwrap();
        assert_eq!(decoded.records.len(), 1);
    }

    #[test]
    fn test_decode_path_file_not_found() {
        let result = CsvDecoder::default().decode_path(Path::new("non_existent.csv"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }

    #[test]
    fn test_decode_path_wrong_extension() {
        let temp_file = Builder::new().suffix(".xlsx").tempfile().unwrap();
        let result = CsvDecoder::default().decode_path(temp_file.path());
        assert!(matches!(result, Err(ImportError::UnsupportedFormat(ext)) if ext == "xlsx"));
    }
}

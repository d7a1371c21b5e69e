// ==========================================
// 车辆批量导入 - 字段映射器
// ==========================================
// 职责: 规范化表头 → 已知字段的列绑定，CSV 行 → VehicleRecord
// 红线: 不做类型转换，不做业务校验
// ==========================================

use crate::domain::vehicle::{required_fields, VehicleRecord, VEHICLE_FIELDS};
use csv::StringRecord;

/// 表头规范化: TRIM → 小写 → 内部空白替换为 '_'
///
/// "VIN " / "Vin" / "vin" 等价，"Body Type" 与 "body_type" 等价
pub fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}')
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

pub struct FieldMapper {
    // 列下标 → 绑定字段（None = 忽略该列）
    columns: Vec<Option<&'static str>>,
}

impl FieldMapper {
    /// 根据规范化后的表头建立列绑定
    ///
    /// # 返回
    /// - FieldMapper: 列绑定
    /// - Vec<String>: 非致命的表头问题（未知列 / 重复列 / 缺少必填列）
    pub fn from_headers(headers: &[String]) -> (Self, Vec<String>) {
        let mut issues = Vec::new();
        let mut columns = Vec::with_capacity(headers.len());
        let mut bound: Vec<&'static str> = Vec::new();

        for (idx, header) in headers.iter().enumerate() {
            let known = VEHICLE_FIELDS
                .iter()
                .find(|f| f.name == header.as_str())
                .map(|f| f.name);

            match known {
                Some(name) if bound.contains(&name) => {
                    // 重复列：保留第一次出现
                    issues.push(format!(
                        "Duplicate column '{}' (column {}) will be ignored",
                        name,
                        idx + 1
                    ));
                    columns.push(None);
                }
                Some(name) => {
                    bound.push(name);
                    columns.push(Some(name));
                }
                None => {
                    if !header.is_empty() {
                        issues.push(format!("Unknown column '{}' will be ignored", header));
                    }
                    columns.push(None);
                }
            }
        }

        for field in required_fields() {
            if !bound.contains(&field) {
                issues.push(format!("Missing required column '{}'", field));
            }
        }

        (Self { columns }, issues)
    }

    /// 表头列数
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// 将一行映射为 VehicleRecord（单元格 TRIM，超出表头的列忽略）
    pub fn map_row(&self, row: &StringRecord) -> VehicleRecord {
        let mut record = VehicleRecord::default();

        for (value, column) in row.iter().zip(self.columns.iter()) {
            if let Some(field) = column {
                record.set_field(field, value.trim().to_string());
            }
        }

        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|h| normalize_header(h)).collect()
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("VIN "), "vin");
        assert_eq!(normalize_header("Vin"), "vin");
        assert_eq!(normalize_header("  Body   Type "), "body_type");
        assert_eq!(normalize_header("\u{feff}vin"), "vin");
        assert_eq!(normalize_header("Fuel\tType"), "fuel_type");
    }

    #[test]
    fn test_from_headers_reports_unknown_and_missing() {
        let (mapper, issues) =
            FieldMapper::from_headers(&headers(&["VIN", "Make", "Model", "Year", "Price", "Stock #"]));

        assert_eq!(mapper.column_count(), 6);
        assert!(issues.iter().any(|i| i.contains("Unknown column 'stock_#'")));
        assert!(issues.iter().any(|i| i == "Missing required column 'mileage'"));
    }

    #[test]
    fn test_duplicate_column_first_wins() {
        let (mapper, issues) = FieldMapper::from_headers(&headers(&["vin", "VIN"]));
        let record = mapper.map_row(&StringRecord::from(vec!["FIRST", "SECOND"]));

        assert_eq!(record.vin, "FIRST");
        assert!(issues.iter().any(|i| i.starts_with("Duplicate column 'vin'")));
    }

    #[test]
    fn test_map_row_trims_and_nulls_blank_optional() {
        let (mapper, _) = FieldMapper::from_headers(&headers(&["vin", "trim", "price"]));
        let record = mapper.map_row(&StringRecord::from(vec![" 1HGCV1F34LA123456 ", "  ", "35000"]));

        assert_eq!(record.vin, "1HGCV1F34LA123456");
        assert_eq!(record.trim, None);
        assert_eq!(record.price, "35000");
    }
}

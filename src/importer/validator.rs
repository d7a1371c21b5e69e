// ==========================================
// 车辆批量导入 - 校验规则引擎
// ==========================================
// 职责: 逐行规则校验（ERROR 阻断 / WARNING 不阻断）+ 去重行统计
// 红线: 纯函数，无 I/O，无全局状态
// 红线: 重复 VIN 累加器只在单次校验内存活
// ==========================================

use crate::domain::types::{BodyType, FuelType, ListingStatus, Transmission};
use crate::domain::validation::{Issue, ValidationResult};
use crate::domain::vehicle::{required_fields, row_number, VehicleRecord};
use chrono::Datelike;
use std::collections::HashSet;

/// VIN 固定长度
pub const VIN_LENGTH: usize = 17;

// ==========================================
// ValidationRules - 规则参数
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationRules {
    pub min_year: i32,
    pub max_year: i32, // 含（当前年份 + 1）
    pub max_description_chars: usize,
}

impl ValidationRules {
    /// 以给定年份为"当前年份"的默认规则
    pub fn for_year(current_year: i32) -> Self {
        Self {
            min_year: 1900,
            max_year: current_year + 1,
            max_description_chars: 2000,
        }
    }
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self::for_year(chrono::Local::now().year())
    }
}

/// 使用默认规则（当前年份取本地时钟）校验
pub fn validate(records: &[VehicleRecord]) -> ValidationResult {
    VehicleValidator::default().validate(records)
}

/// 金额解析: 去掉 '$' 与 ','，须为有限数值
pub fn parse_money(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != '$' && *c != ',').collect();
    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// 里程解析: 去掉 ','，须为非负整数
pub fn parse_mileage(raw: &str) -> Option<u64> {
    clean_mileage(raw).parse::<u64>().ok()
}

fn clean_mileage(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != ',')
        .collect::<String>()
        .trim()
        .to_string()
}

// ==========================================
// SeenVins - 单次校验内的 VIN 累加器
// ==========================================
// 按原文比较（仅去首尾空白）；大小写不同的 VIN 由入库端判定
#[derive(Debug, Default)]
struct SeenVins(HashSet<String>);

impl SeenVins {
    /// 首次出现返回 true，之后返回 false
    fn first_occurrence(&mut self, vin: &str) -> bool {
        self.0.insert(vin.trim().to_string())
    }
}

// ==========================================
// VehicleValidator
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct VehicleValidator {
    rules: ValidationRules,
}

impl VehicleValidator {
    pub fn new(rules: ValidationRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    /// 校验全部记录
    ///
    /// # 返回
    /// - ValidationResult: 有序问题序列 + 去重行统计
    pub fn validate(&self, records: &[VehicleRecord]) -> ValidationResult {
        let mut seen_vins = SeenVins::default();
        let mut issues = Vec::new();

        for (idx, record) in records.iter().enumerate() {
            let row = row_number(idx);

            issues.extend(self.validate_required_fields(record, row));
            issues.extend(self.validate_vin(record, row, &mut seen_vins));
            issues.extend(self.validate_numbers(record, row));
            issues.extend(self.validate_status(record, row));
            issues.extend(self.validate_optional_fields(record, row));
        }

        ValidationResult::from_issues(records.len(), issues)
    }

    /// 必填字段: 非空且非空白
    fn validate_required_fields(&self, record: &VehicleRecord, row: usize) -> Vec<Issue> {
        required_fields()
            .filter(|field| record.field(field).is_none())
            .map(|field| Issue::error(row, field, format!("{} is required", field)))
            .collect()
    }

    /// VIN: 长度固定 17 + 文件内唯一（首次出现不报）
    fn validate_vin(
        &self,
        record: &VehicleRecord,
        row: usize,
        seen_vins: &mut SeenVins,
    ) -> Vec<Issue> {
        let mut issues = Vec::new();
        let Some(vin) = record.field("vin") else {
            return issues;
        };

        let len = vin.chars().count();
        if len != VIN_LENGTH {
            issues.push(Issue::error(
                row,
                "vin",
                format!("VIN must be exactly {} characters (got {})", VIN_LENGTH, len),
            ));
        }

        if !seen_vins.first_occurrence(vin) {
            issues.push(Issue::error(row, "vin", "Duplicate VIN in file"));
        }

        issues
    }

    /// 年份 / 价格 / 里程
    fn validate_numbers(&self, record: &VehicleRecord, row: usize) -> Vec<Issue> {
        let mut issues = Vec::new();

        if let Some(year) = record.field("year") {
            let in_range = year
                .trim()
                .parse::<i32>()
                .map(|y| y >= self.rules.min_year && y <= self.rules.max_year)
                .unwrap_or(false);
            if !in_range {
                issues.push(Issue::error(row, "year", format!("Invalid year: {}", year)));
            }
        }

        if let Some(price) = record.field("price") {
            if !parse_money(price).map(|p| p > 0.0).unwrap_or(false) {
                issues.push(Issue::error(row, "price", "Price must be a positive number"));
            }
        }

        if let Some(mileage) = record.field("mileage") {
            if parse_mileage(mileage).is_none() {
                let cleaned = clean_mileage(mileage);
                let out_of_range =
                    !cleaned.is_empty() && cleaned.chars().all(|c| c.is_ascii_digit());
                let message = if out_of_range {
                    format!("Mileage is out of range: {}", mileage)
                } else {
                    "Mileage must be 0 or greater".to_string()
                };
                issues.push(Issue::error(row, "mileage", message));
            }
        }

        issues
    }

    /// 上架状态: 出现时必须为合法枚举（ERROR）
    fn validate_status(&self, record: &VehicleRecord, row: usize) -> Vec<Issue> {
        match record.status.as_deref() {
            Some(status) if ListingStatus::parse(status).is_none() => vec![Issue::error(
                row,
                "status",
                format!(
                    "Invalid status. Use: {}",
                    ListingStatus::ACCEPTED_VALUES.join(", ")
                ),
            )],
            _ => Vec::new(),
        }
    }

    /// 可选字段: 只产生 WARNING
    fn validate_optional_fields(&self, record: &VehicleRecord, row: usize) -> Vec<Issue> {
        let mut issues = Vec::new();

        if let Some(body_type) = record.body_type.as_deref() {
            if BodyType::parse(body_type).is_none() {
                issues.push(Issue::warning(
                    row,
                    "body_type",
                    format!(
                        "Unknown body type: {}. Will default to '{}'.",
                        body_type,
                        BodyType::default()
                    ),
                ));
            }
        }

        if let Some(transmission) = record.transmission.as_deref() {
            if Transmission::parse(transmission).is_none() {
                issues.push(Issue::warning(
                    row,
                    "transmission",
                    format!(
                        "Unknown transmission: {}. Will default to '{}'.",
                        transmission,
                        Transmission::default()
                    ),
                ));
            }
        }

        if let Some(fuel_type) = record.fuel_type.as_deref() {
            if FuelType::parse(fuel_type).is_none() {
                issues.push(Issue::warning(
                    row,
                    "fuel_type",
                    format!(
                        "Unknown fuel type: {}. Will default to '{}'.",
                        fuel_type,
                        FuelType::default()
                    ),
                ));
            }
        }

        if let Some(description) = record.description.as_deref() {
            if description.chars().count() > self.rules.max_description_chars {
                issues.push(Issue::warning(
                    row,
                    "description",
                    format!(
                        "Description exceeds {} characters. Will be truncated.",
                        self.rules.max_description_chars
                    ),
                ));
            }
        }

        // 底价高于标价: 两者都能解析时才比较
        if let (Some(floor), Some(price)) = (
            record.floor_price.as_deref().and_then(parse_money),
            record.field("price").and_then(parse_money),
        ) {
            if floor > price {
                issues.push(Issue::warning(
                    row,
                    "floor_price",
                    format!(
                        "Floor price (${}) is higher than listing price (${})",
                        floor, price
                    ),
                ));
            }
        }

        if let Some(image_url) = record.image_url.as_deref() {
            if url::Url::parse(image_url).is_err() {
                issues.push(Issue::warning(row, "image_url", "Invalid image URL format"));
            }
        }

        issues
    }
}

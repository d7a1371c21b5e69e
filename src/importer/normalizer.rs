// ==========================================
// 车辆批量导入 - 数据规范化器
// ==========================================
// 职责: VehicleRecord → NormalizedVehicle
// 规则: WARNING 所承诺的下游修正在此兑现
// - 未识别车身/变速箱/燃料 → 默认值
// - 描述超长 → 截断
// - msrp 缺失 → 标价 * 1.1；底价缺失 → 标价
// - 颜色缺失 → "Unknown"
// ==========================================

use crate::domain::types::{BodyType, FuelType, ListingStatus, Transmission};
use crate::domain::vehicle::{required_fields, NormalizedVehicle, VehicleRecord};
use crate::importer::validator::{parse_mileage, parse_money, ValidationRules, VIN_LENGTH};
use thiserror::Error;

/// 单行规范化失败原因（入库端逐行拒绝）
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizeError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("VIN must be 17 characters, got {0}")]
    VinLength(usize),

    #[error("Invalid year format: {0}")]
    InvalidYear(String),

    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    #[error("Invalid mileage format: {0}")]
    InvalidMileage(String),
}

/// 库存号默认取 VIN 末尾字符数
const STOCK_NUMBER_SUFFIX: usize = 8;

/// msrp 缺失时的默认上浮比例
const DEFAULT_MSRP_MARKUP: f64 = 1.1;

const UNKNOWN_COLOR: &str = "Unknown";

#[derive(Debug, Clone, Default)]
pub struct DataNormalizer {
    rules: ValidationRules,
}

impl DataNormalizer {
    pub fn new(rules: ValidationRules) -> Self {
        Self { rules }
    }

    /// 规范化一条记录
    pub fn normalize(&self, record: &VehicleRecord) -> Result<NormalizedVehicle, NormalizeError> {
        if let Some(field) = required_fields().find(|f| record.field(f).is_none()) {
            return Err(NormalizeError::MissingField(field.to_string()));
        }

        let vin = record.vin.trim().to_uppercase();
        let vin_len = vin.chars().count();
        if vin_len != VIN_LENGTH {
            return Err(NormalizeError::VinLength(vin_len));
        }

        let year = record
            .year
            .trim()
            .parse::<i32>()
            .ok()
            .filter(|y| *y >= self.rules.min_year && *y <= self.rules.max_year)
            .ok_or_else(|| NormalizeError::InvalidYear(record.year.clone()))?;

        let asking_price = parse_money(&record.price)
            .filter(|p| *p > 0.0)
            .ok_or_else(|| NormalizeError::InvalidPrice(record.price.clone()))?;

        let mileage = parse_mileage(&record.mileage)
            .ok_or_else(|| NormalizeError::InvalidMileage(record.mileage.clone()))?;

        // 可选金额解析失败时按缺失处理
        let msrp = record
            .msrp
            .as_deref()
            .and_then(parse_money)
            .filter(|m| *m > 0.0)
            .unwrap_or(asking_price * DEFAULT_MSRP_MARKUP);
        let floor_price = record
            .floor_price
            .as_deref()
            .and_then(parse_money)
            .unwrap_or(asking_price);

        let stock_number = vin
            .chars()
            .skip(VIN_LENGTH - STOCK_NUMBER_SUFFIX)
            .collect::<String>();

        Ok(NormalizedVehicle {
            stock_number,
            vin,
            make: record.make.trim().to_string(),
            model: record.model.trim().to_string(),
            year,
            trim: record.trim.clone().unwrap_or_default(),
            body_type: record
                .body_type
                .as_deref()
                .and_then(BodyType::parse)
                .unwrap_or_default(),
            asking_price,
            msrp,
            floor_price,
            mileage,
            transmission: record
                .transmission
                .as_deref()
                .and_then(Transmission::parse)
                .unwrap_or_default(),
            fuel_type: record
                .fuel_type
                .as_deref()
                .and_then(FuelType::parse)
                .unwrap_or_default(),
            exterior_color: record
                .exterior_color
                .clone()
                .unwrap_or_else(|| UNKNOWN_COLOR.to_string()),
            interior_color: record
                .interior_color
                .clone()
                .unwrap_or_else(|| UNKNOWN_COLOR.to_string()),
            features: split_features(record.features.as_deref()),
            description: record
                .description
                .as_deref()
                .map(|d| self.truncate_description(d)),
            status: record
                .status
                .as_deref()
                .and_then(ListingStatus::parse)
                .unwrap_or_default(),
            image_url: record.image_url.clone(),
        })
    }

    /// 按字符数截断（不会切断多字节字符）
    fn truncate_description(&self, description: &str) -> String {
        description
            .chars()
            .take(self.rules.max_description_chars)
            .collect()
    }
}

/// 特性列表: 逗号分隔，TRIM，去掉空项
fn split_features(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(|f| f.trim().to_string())
                .filter(|f| !f.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

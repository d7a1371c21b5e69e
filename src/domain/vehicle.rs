// ==========================================
// 车辆批量导入 - 车辆领域模型
// ==========================================
// 职责: 导入行记录 / 字段清单 / 规范化后的车辆
// 红线: 字段清单是模板生成与必填校验的唯一来源
// ==========================================

use crate::domain::types::{BodyType, FuelType, ListingStatus, Transmission};
use serde::{Deserialize, Serialize};

/// 数据行号偏移：行号从 1 开始，且表头占第 1 行
pub const ROW_OFFSET: usize = 2;

/// 数据行下标 → 文件行号
pub fn row_number(index: usize) -> usize {
    index + ROW_OFFSET
}

// ==========================================
// 字段清单
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub required: bool,
}

const fn required(name: &'static str) -> FieldSpec {
    FieldSpec { name, required: true }
}

const fn optional(name: &'static str) -> FieldSpec {
    FieldSpec { name, required: false }
}

/// 全部已知列（模板列顺序）
pub const VEHICLE_FIELDS: [FieldSpec; 18] = [
    required("vin"),
    required("make"),
    required("model"),
    required("year"),
    optional("trim"),
    optional("body_type"),
    required("price"),
    optional("msrp"),
    optional("floor_price"),
    required("mileage"),
    optional("transmission"),
    optional("fuel_type"),
    optional("exterior_color"),
    optional("interior_color"),
    optional("features"),
    optional("description"),
    optional("status"),
    optional("image_url"),
];

/// 必填列（按清单顺序）
pub fn required_fields() -> impl Iterator<Item = &'static str> {
    VEHICLE_FIELDS.iter().filter(|f| f.required).map(|f| f.name)
}

/// 全部列名（按清单顺序）
pub fn field_names() -> impl Iterator<Item = &'static str> {
    VEHICLE_FIELDS.iter().map(|f| f.name)
}

// ==========================================
// VehicleRecord - 导入行记录
// ==========================================
// 用途: 解码产物，字段保持原始字符串（未做类型转换）
// 必填字段: 缺失/空白时为空串；可选字段: 空白时为 None
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleRecord {
    // ===== 必填 =====
    pub vin: String,
    pub make: String,
    pub model: String,
    pub year: String,
    pub price: String,
    pub mileage: String,

    // ===== 可选 =====
    pub trim: Option<String>,
    pub body_type: Option<String>,
    pub msrp: Option<String>,
    pub floor_price: Option<String>,
    pub transmission: Option<String>,
    pub fuel_type: Option<String>,
    pub exterior_color: Option<String>,
    pub interior_color: Option<String>,
    pub features: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub image_url: Option<String>,
}

impl VehicleRecord {
    /// 按列名读取字段值（仅限已知列）
    ///
    /// 空白的必填字段返回 None，与可选字段的语义一致
    pub fn field(&self, name: &str) -> Option<&str> {
        fn required(v: &str) -> Option<&str> {
            if v.trim().is_empty() {
                None
            } else {
                Some(v)
            }
        }

        match name {
            "vin" => required(&self.vin),
            "make" => required(&self.make),
            "model" => required(&self.model),
            "year" => required(&self.year),
            "price" => required(&self.price),
            "mileage" => required(&self.mileage),
            "trim" => self.trim.as_deref(),
            "body_type" => self.body_type.as_deref(),
            "msrp" => self.msrp.as_deref(),
            "floor_price" => self.floor_price.as_deref(),
            "transmission" => self.transmission.as_deref(),
            "fuel_type" => self.fuel_type.as_deref(),
            "exterior_color" => self.exterior_color.as_deref(),
            "interior_color" => self.interior_color.as_deref(),
            "features" => self.features.as_deref(),
            "description" => self.description.as_deref(),
            "status" => self.status.as_deref(),
            "image_url" => self.image_url.as_deref(),
            _ => None,
        }
    }

    /// 按列名写入字段值
    ///
    /// # 返回
    /// - true: 已知列，已写入
    /// - false: 未知列，忽略
    pub fn set_field(&mut self, name: &str, value: String) -> bool {
        let optional = if value.trim().is_empty() {
            None
        } else {
            Some(value.clone())
        };

        match name {
            "vin" => self.vin = value,
            "make" => self.make = value,
            "model" => self.model = value,
            "year" => self.year = value,
            "price" => self.price = value,
            "mileage" => self.mileage = value,
            "trim" => self.trim = optional,
            "body_type" => self.body_type = optional,
            "msrp" => self.msrp = optional,
            "floor_price" => self.floor_price = optional,
            "transmission" => self.transmission = optional,
            "fuel_type" => self.fuel_type = optional,
            "exterior_color" => self.exterior_color = optional,
            "interior_color" => self.interior_color = optional,
            "features" => self.features = optional,
            "description" => self.description = optional,
            "status" => self.status = optional,
            "image_url" => self.image_url = optional,
            _ => return false,
        }
        true
    }

    /// 按模板列顺序输出全部单元格（缺失 → 空串）
    pub fn to_cells(&self) -> Vec<String> {
        field_names()
            .map(|name| self.field(name).unwrap_or_default().to_string())
            .collect()
    }
}

// ==========================================
// NormalizedVehicle - 规范化后的车辆
// ==========================================
// 用途: 入库前的类型化结果（默认值已替换、描述已截断）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedVehicle {
    pub vin: String, // 大写
    pub stock_number: String, // 默认取 VIN 后 8 位
    pub make: String,
    pub model: String,
    pub year: i32,
    pub trim: String,
    pub body_type: BodyType,
    pub asking_price: f64,
    pub msrp: f64,        // 缺失 → asking_price * 1.1
    pub floor_price: f64, // 缺失 → asking_price
    pub mileage: u64,
    pub transmission: Transmission,
    pub fuel_type: FuelType,
    pub exterior_color: String, // 缺失 → "Unknown"
    pub interior_color: String, // 缺失 → "Unknown"
    pub features: Vec<String>,
    pub description: Option<String>,
    pub status: ListingStatus,
    pub image_url: Option<String>,
}

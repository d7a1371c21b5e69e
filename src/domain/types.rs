// ==========================================
// 车辆批量导入 - 领域类型定义
// ==========================================
// 职责: 车辆枚举字段 / 问题级别 / 工作流阶段
// 约定: 枚举解析一律大小写不敏感
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 车身类型 (Body Type)
// ==========================================
// 未识别值 → 默认 sedan（WARNING，不阻断）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyType {
    #[default]
    Sedan,
    Suv,
    Truck,
    Coupe,
    Van,
    Wagon,
    Convertible,
    Hatchback,
}

impl BodyType {
    pub const ALL: [BodyType; 8] = [
        BodyType::Sedan,
        BodyType::Suv,
        BodyType::Truck,
        BodyType::Coupe,
        BodyType::Van,
        BodyType::Wagon,
        BodyType::Convertible,
        BodyType::Hatchback,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BodyType::Sedan => "sedan",
            BodyType::Suv => "suv",
            BodyType::Truck => "truck",
            BodyType::Coupe => "coupe",
            BodyType::Van => "van",
            BodyType::Wagon => "wagon",
            BodyType::Convertible => "convertible",
            BodyType::Hatchback => "hatchback",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let needle = value.trim().to_lowercase();
        Self::ALL.into_iter().find(|v| v.as_str() == needle)
    }
}

impl fmt::Display for BodyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 变速箱 (Transmission)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transmission {
    #[default]
    Automatic,
    Manual,
    Cvt,
}

impl Transmission {
    pub const ALL: [Transmission; 3] = [
        Transmission::Automatic,
        Transmission::Manual,
        Transmission::Cvt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Transmission::Automatic => "automatic",
            Transmission::Manual => "manual",
            Transmission::Cvt => "cvt",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let needle = value.trim().to_lowercase();
        Self::ALL.into_iter().find(|v| v.as_str() == needle)
    }
}

impl fmt::Display for Transmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 燃料类型 (Fuel Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    #[default]
    Gasoline,
    Diesel,
    Hybrid,
    Electric,
    PluginHybrid,
}

impl FuelType {
    pub const ALL: [FuelType; 5] = [
        FuelType::Gasoline,
        FuelType::Diesel,
        FuelType::Hybrid,
        FuelType::Electric,
        FuelType::PluginHybrid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::Gasoline => "gasoline",
            FuelType::Diesel => "diesel",
            FuelType::Hybrid => "hybrid",
            FuelType::Electric => "electric",
            FuelType::PluginHybrid => "plugin_hybrid",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let needle = value.trim().to_lowercase();
        Self::ALL.into_iter().find(|v| v.as_str() == needle)
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 上架状态 (Listing Status)
// ==========================================
// 非法值 → ERROR（阻断），与车身/变速箱/燃料不同
// "pending" 为 "pending_sale" 的旧写法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    #[default]
    Active,
    PendingSale,
    Draft,
    Sold,
    Inactive,
}

impl ListingStatus {
    /// 文件中允许出现的全部写法（含别名）
    pub const ACCEPTED_VALUES: [&'static str; 6] =
        ["active", "pending", "pending_sale", "draft", "sold", "inactive"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Active => "active",
            ListingStatus::PendingSale => "pending_sale",
            ListingStatus::Draft => "draft",
            ListingStatus::Sold => "sold",
            ListingStatus::Inactive => "inactive",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "active" => Some(ListingStatus::Active),
            "pending" | "pending_sale" => Some(ListingStatus::PendingSale),
            "draft" => Some(ListingStatus::Draft),
            "sold" => Some(ListingStatus::Sold),
            "inactive" => Some(ListingStatus::Inactive),
            _ => None,
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 问题级别 (Severity)
// ==========================================
// Error: 阻断提交，需修改源文件
// Warning: 不阻断，导入时自动修正（默认值替换 / 截断）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

// ==========================================
// 工作流阶段 (Workflow Phase)
// ==========================================
// Select → Preview → Uploading → Complete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowPhase {
    #[default]
    Select,
    Preview,
    Uploading,
    Complete,
}

impl fmt::Display for WorkflowPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowPhase::Select => write!(f, "SELECT"),
            WorkflowPhase::Preview => write!(f, "PREVIEW"),
            WorkflowPhase::Uploading => write!(f, "UPLOADING"),
            WorkflowPhase::Complete => write!(f, "COMPLETE"),
        }
    }
}

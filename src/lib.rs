// ==========================================
// 车辆批量导入 - 核心库
// ==========================================
// 职责: 经销商库存 CSV 的解码、校验、预览、提交与结果导出
// 技术栈: Rust + tokio + csv
// 系统定位: 批量导入工作流（入库服务通过 CatalogIngestion 注入）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 记录与结果类型
pub mod domain;

// 配置层 - 可调参数
pub mod config;

// 导入层 - 解码 / 校验 / 规范化 / 模板
pub mod importer;

// 入库服务边界
pub mod ingestion;

// 工作流层 - 状态机与导出
pub mod workflow;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    BodyType, FuelType, ListingStatus, Severity, Transmission, WorkflowPhase,
};

// 领域实体
pub use domain::{
    CreatedRecord, Issue, NormalizedVehicle, RowUploadError, UploadOutcome, ValidationResult,
    VehicleRecord,
};

// 配置
pub use config::{ConfigError, ImportConfig};

// 导入
pub use importer::{
    CsvDecoder, DataNormalizer, ExportFile, ImportError, TemplateGenerator, VehicleValidator,
};

// 入库
pub use ingestion::{CatalogIngestion, InMemoryCatalog, IngestionBatch, IngestionError, IngestionResponse};

// 工作流
pub use workflow::{ImportCoordinator, WorkflowError, WorkflowState};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "车辆批量导入";

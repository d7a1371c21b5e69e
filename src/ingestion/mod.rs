// ==========================================
// 车辆批量导入 - 入库服务边界层
// ==========================================
// 职责: 目录入库服务的请求/响应契约、错误类型与内存参考实现
// 红线: 本层不关心车辆如何持久化
// ==========================================

pub mod error;
pub mod memory;
pub mod service;

pub use error::{IngestionError, IngestionResult};
pub use memory::InMemoryCatalog;
pub use service::{
    BatchRow, CatalogIngestion, CreatedVehicle, IngestionBatch, IngestionResponse,
    IngestionRowError,
};

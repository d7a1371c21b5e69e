// ==========================================
// 车辆批量导入 - 领域模型层
// ==========================================
// 职责: 定义导入记录、校验结果、提交结果与枚举类型
// 红线: 不含解析逻辑，不含网络调用
// ==========================================

pub mod types;
pub mod upload;
pub mod validation;
pub mod vehicle;

// 重导出核心类型
pub use types::{BodyType, FuelType, ListingStatus, Severity, Transmission, WorkflowPhase};
pub use upload::{CreatedRecord, RecordUploadStatus, RowUploadError, UploadOutcome};
pub use validation::{Issue, ValidationResult};
pub use vehicle::{
    field_names, required_fields, row_number, FieldSpec, NormalizedVehicle,
    VehicleRecord, ROW_OFFSET, VEHICLE_FIELDS,
};

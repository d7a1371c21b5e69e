// ==========================================
// 车辆批量导入 - 工作流层
// ==========================================
// 职责: 选择文件 → 预览校验 → 提交 → 结果/导出
// 依赖: importer（解码/校验）+ ingestion（入库服务边界）
// ==========================================

pub mod coordinator;
pub mod error;
pub mod reconcile;
pub mod report;
pub mod state;

pub use coordinator::ImportCoordinator;
pub use error::{WorkflowError, WorkflowResult};
pub use reconcile::reconcile;
pub use report::{error_report, export_file_name, failed_records_report, ERROR_REPORT_HEADERS};
pub use state::{Notice, NoticeLevel, WorkflowState};

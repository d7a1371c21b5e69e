// ==========================================
// 车辆批量导入 - 入库服务错误类型
// ==========================================
// 说明: 只覆盖"请求本身未完成"的情况（网络 / 鉴权 / 超时）
//       服务已受理但逐行拒绝，属于 UploadOutcome.row_errors，不是错误
// ==========================================

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IngestionError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Not authorized to upload vehicles: {0}")]
    Unauthorized(String),

    #[error("Upload timed out after {0} seconds")]
    Timeout(u64),

    #[error("Upload rejected by server (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Ingestion service internal error: {0}")]
    Internal(String),
}

pub type IngestionResult<T> = Result<T, IngestionError>;

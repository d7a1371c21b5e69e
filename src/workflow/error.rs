// ==========================================
// 车辆批量导入 - 工作流错误类型
// ==========================================
// 职责: 汇总解码 / 提交 / 状态机错误，转换为用户可读的提示
// ==========================================

use crate::config::ConfigError;
use crate::domain::types::WorkflowPhase;
use crate::importer::error::ImportError;
use crate::ingestion::error::IngestionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkflowError {
    // ==========================================
    // 状态机错误
    // ==========================================
    #[error("Invalid workflow transition: from={from} to={to}")]
    InvalidStateTransition {
        from: WorkflowPhase,
        to: WorkflowPhase,
    },

    #[error("An upload is already in progress")]
    SubmissionInFlight,

    // ==========================================
    // 提交门槛
    // ==========================================
    #[error("CSV file contains no vehicle rows")]
    EmptyFile,

    #[error("No validated vehicles to upload")]
    NothingToSubmit,

    #[error("Fix {error_rows} row(s) with errors before uploading")]
    SubmissionBlocked { error_rows: usize },

    #[error("Upload was cancelled")]
    SubmissionCancelled,

    #[error("No upload results to export")]
    NothingToExport,

    // ==========================================
    // 下层错误
    // ==========================================
    #[error(transparent)]
    Decode(#[from] ImportError),

    #[error(transparent)]
    Transport(#[from] IngestionError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("Workflow state unavailable: {0}")]
    StatePoisoned(String),
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

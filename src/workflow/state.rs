// ==========================================
// 车辆批量导入 - 工作流状态
// ==========================================
// 生命周期: 工作流开始时创建，仅由协调器修改，重置或离开时丢弃
// 红线: 不跨会话持久化
// ==========================================

use crate::domain::types::WorkflowPhase;
use crate::domain::upload::UploadOutcome;
use crate::domain::validation::ValidationResult;
use crate::domain::vehicle::VehicleRecord;
use serde::{Deserialize, Serialize};

// ==========================================
// Notice - 面向用户的提示
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

// ==========================================
// WorkflowState - 一次导入会话的全部状态
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub phase: WorkflowPhase,
    pub file_name: Option<String>,
    pub records: Option<Vec<VehicleRecord>>,
    pub parse_issues: Vec<String>,
    pub validation: Option<ValidationResult>,
    pub outcome: Option<UploadOutcome>,
    pub notice: Option<Notice>,
}

impl WorkflowState {
    /// 提交门槛
    ///
    /// 允许: Preview，或提交失败退回 Select 但仍保留已校验数据
    /// 条件: 有记录且 ERROR 行数为 0（WARNING 不参与）
    pub fn can_submit(&self) -> bool {
        let phase_allows = matches!(self.phase, WorkflowPhase::Preview | WorkflowPhase::Select);
        let has_records = self.records.as_ref().map(|r| !r.is_empty()).unwrap_or(false);
        let passes = self
            .validation
            .as_ref()
            .map(|v| v.allows_submission())
            .unwrap_or(false);

        phase_allows && has_records && passes
    }

    pub fn record_count(&self) -> usize {
        self.records.as_ref().map(|r| r.len()).unwrap_or(0)
    }
}

// ==========================================
// 车辆批量导入 - 提交结果模型
// ==========================================
// 用途: 批量提交后的对账结果（含部分失败）
// 生命周期: 每次提交生成一次，生成后只读
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// UploadOutcome - 提交结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadOutcome {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub created_records: Vec<CreatedRecord>,
    pub row_errors: Vec<RowUploadError>,
}

impl UploadOutcome {
    /// 部分失败：服务已受理，但有行被拒
    pub fn is_partial_failure(&self) -> bool {
        self.failed > 0 && self.successful > 0
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0 || !self.row_errors.is_empty()
    }

    /// 被拒行号（按服务返回顺序）
    pub fn failed_rows(&self) -> Vec<usize> {
        self.row_errors.iter().map(|e| e.row).collect()
    }
}

// ==========================================
// CreatedRecord - 已创建车辆
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedRecord {
    pub vin: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub status: RecordUploadStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordUploadStatus {
    Success,
}

// ==========================================
// RowUploadError - 行级提交错误
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowUploadError {
    pub row: usize,
    pub vin: String,
    pub error: String,
}

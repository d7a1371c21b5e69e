// ==========================================
// 车辆批量导入 - 提交结果对账
// ==========================================
// 职责: 服务响应 → UploadOutcome
// 红线: 逐行错误全部保留，计数不一致只告警不修正
// ==========================================

use crate::domain::upload::{CreatedRecord, RecordUploadStatus, RowUploadError, UploadOutcome};
use crate::ingestion::service::IngestionResponse;
use tracing::warn;

/// 无 VIN 时的占位
pub const MISSING_VIN: &str = "N/A";

pub fn reconcile(response: IngestionResponse) -> UploadOutcome {
    let accounted = response.successful.checked_add(response.failed);
    if accounted != Some(response.total) {
        warn!(
            total = response.total,
            successful = response.successful,
            failed = response.failed,
            "服务响应计数不一致: successful + failed != total"
        );
    }
    if response.errors.len() != response.failed {
        warn!(
            failed = response.failed,
            row_errors = response.errors.len(),
            "服务响应计数不一致: 逐行错误数 != failed"
        );
    }

    UploadOutcome {
        total: response.total,
        successful: response.successful,
        failed: response.failed,
        created_records: response
            .created_vehicles
            .into_iter()
            .map(|v| CreatedRecord {
                vin: v.vin,
                make: v.make,
                model: v.model,
                year: v.year,
                status: RecordUploadStatus::Success,
            })
            .collect(),
        row_errors: response
            .errors
            .into_iter()
            .map(|e| RowUploadError {
                row: e.row,
                vin: e
                    .vin
                    .filter(|v| !v.trim().is_empty())
                    .unwrap_or_else(|| MISSING_VIN.to_string()),
                error: e.error,
            })
            .collect(),
    }
}

// ==========================================
// 车辆批量导入 - 结果报告导出
// ==========================================
// 职责:
// - 错误报告: Row, VIN, Error（与 row_errors 一一对应）
// - 失败行重导出: 失败行的原始记录（模板列顺序），修正后可作为新批次重传
// ==========================================

use crate::domain::upload::UploadOutcome;
use crate::domain::vehicle::{field_names, VehicleRecord, ROW_OFFSET};
use crate::importer::csv_export::{write_csv, ExportFile};
use crate::importer::error::ImportResult;
use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::warn;

pub const ERROR_REPORT_HEADERS: [&str; 3] = ["Row", "VIN", "Error"];

/// 导出文件名: {prefix}_{YYYY-MM-DD}.csv
pub fn export_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{}_{}.csv", prefix, date.format("%Y-%m-%d"))
}

/// 错误报告
pub fn error_report(
    outcome: &UploadOutcome,
    prefix: &str,
    date: NaiveDate,
) -> ImportResult<ExportFile> {
    let rows = outcome
        .row_errors
        .iter()
        .map(|e| vec![e.row.to_string(), e.vin.clone(), e.error.clone()]);

    Ok(ExportFile {
        file_name: export_file_name(prefix, date),
        content: write_csv(&ERROR_REPORT_HEADERS, rows)?,
    })
}

/// 失败行重导出
///
/// # 参数
/// - records: 本次提交的记录（下标 i 对应行号 i + 2）
/// - outcome: 提交结果
pub fn failed_records_report(
    records: &[VehicleRecord],
    outcome: &UploadOutcome,
    prefix: &str,
    date: NaiveDate,
) -> ImportResult<ExportFile> {
    let headers: Vec<&str> = field_names().collect();
    let mut seen = HashSet::new();
    let mut rows = Vec::new();

    for error in &outcome.row_errors {
        if !seen.insert(error.row) {
            continue;
        }

        match error
            .row
            .checked_sub(ROW_OFFSET)
            .and_then(|idx| records.get(idx))
        {
            Some(record) => rows.push(record.to_cells()),
            None => warn!(row = error.row, "失败行号超出本次提交范围，跳过"),
        }
    }

    Ok(ExportFile {
        file_name: export_file_name(prefix, date),
        content: write_csv(&headers, rows)?,
    })
}

// ==========================================
// 车辆批量导入 - CSV 写出工具
// ==========================================
// 用途: 模板文件 / 错误报告 / 失败行重导出共用
// 说明: 含分隔符、引号、换行的单元格由 csv 写出器自动加引号
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use csv::WriterBuilder;
use serde::{Deserialize, Serialize};

// ==========================================
// ExportFile - 可下载文件
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportFile {
    pub file_name: String,
    pub content: String,
}

impl ExportFile {
    pub const MIME_TYPE: &'static str = "text/csv";
}

/// 写出 CSV 文本（表头 + 数据行）
pub fn write_csv<H, R, C>(headers: &[H], rows: R) -> ImportResult<String>
where
    H: AsRef<str>,
    R: IntoIterator<Item = Vec<C>>,
    C: AsRef<str>,
{
    let mut writer = WriterBuilder::new().from_writer(Vec::new());

    writer
        .write_record(headers.iter().map(AsRef::<str>::as_ref))
        .map_err(|e| ImportError::ExportError(e.to_string()))?;
    for row in rows {
        writer
            .write_record(row.iter().map(AsRef::<str>::as_ref))
            .map_err(|e| ImportError::ExportError(e.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ImportError::ExportError(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ImportError::ExportError(e.to_string()))
}

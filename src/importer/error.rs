// ==========================================
// 车辆批量导入 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 解码类错误对当前文件是致命的，需重新选择文件
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported file format: {0} (only .csv is accepted)")]
    UnsupportedFormat(String),

    #[error("File is too large: {size} bytes (limit {limit} bytes)")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("Failed to read file: {0}")]
    FileReadError(String),

    // ===== CSV 结构错误 =====
    #[error("CSV file has no header row")]
    MissingHeader,

    #[error("CSV file is not valid UTF-8 text (line {line})")]
    InvalidEncoding { line: u64 },

    #[error("CSV file has an unterminated quoted field")]
    UnterminatedQuote,

    #[error("Failed to parse CSV file: {0}")]
    CsvParseError(String),

    // ===== 导出错误 =====
    #[error("Failed to write CSV export: {0}")]
    ExportError(String),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        match err.kind() {
            csv::ErrorKind::Utf8 { pos, .. } => ImportError::InvalidEncoding {
                line: pos.as_ref().map(|p| p.line()).unwrap_or(0),
            },
            _ => ImportError::CsvParseError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

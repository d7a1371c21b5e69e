// ==========================================
// 车辆批量导入 - 导入层
// ==========================================
// 职责: CSV 解码 → 字段映射 → 规则校验 → 规范化
// 附带: 上传模板生成 / CSV 写出
// ==========================================

// 模块声明
pub mod csv_export;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod normalizer;
pub mod template;
pub mod validator;

// 重导出核心类型
pub use csv_export::{write_csv, ExportFile};
pub use error::{ImportError, ImportResult};
pub use field_mapper::{normalize_header, FieldMapper};
pub use file_parser::{CsvDecoder, DecodedFile};
pub use normalizer::{DataNormalizer, NormalizeError};
pub use template::{TemplateGenerator, TEMPLATE_FILE_NAME};
pub use validator::{validate, ValidationRules, VehicleValidator, VIN_LENGTH};

// ==========================================
// 车辆批量导入 - 配置层
// ==========================================
// 职责: 导入管道的可调参数（默认值 + JSON 覆写）
// ==========================================

pub mod import_config;

pub use import_config::{ConfigError, ConfigResult, ImportConfig};

// ==========================================
// 车辆批量导入 - 导入配置
// ==========================================
// 职责: 文件大小上限 / 年份区间 / 描述长度 / 提交超时 / 导出文件名
// 来源: 默认值，或由宿主应用以 JSON 下发
// 红线: 不读取环境变量，不落盘
// ==========================================

use crate::importer::validator::ValidationRules;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置解析失败: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("配置值非法 (key: {key}): {message}")]
    InvalidValue { key: String, message: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// ==========================================
// ImportConfig - 导入配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// 上传文件大小上限（字节），默认 5 MiB
    pub max_file_size_bytes: u64,
    /// 最早允许年份
    pub min_year: i32,
    /// 允许超出当前年份的年数（车型年）
    pub max_years_ahead: i32,
    /// 描述最大字符数（超出 → WARNING，导入时截断）
    pub max_description_chars: usize,
    /// 批量提交超时（秒）
    pub submit_timeout_secs: u64,
    /// 模板文件名
    pub template_file_name: String,
    /// 错误导出文件名前缀
    pub error_export_prefix: String,
    /// 失败行重导出文件名前缀
    pub failed_export_prefix: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: 5 * 1024 * 1024,
            min_year: 1900,
            max_years_ahead: 1,
            max_description_chars: 2000,
            submit_timeout_secs: 120,
            template_file_name: "vehicle_upload_template.csv".to_string(),
            error_export_prefix: "upload_errors".to_string(),
            failed_export_prefix: "failed_vehicles".to_string(),
        }
    }
}

impl ImportConfig {
    /// 从 JSON 字符串加载（缺省键取默认值），并做合法性检查
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: ImportConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 检查配置值
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_file_size_bytes == 0 {
            return Err(invalid("max_file_size_bytes", "必须大于 0"));
        }
        if self.max_years_ahead < 0 {
            return Err(invalid("max_years_ahead", "不能为负数"));
        }
        if self.max_description_chars == 0 {
            return Err(invalid("max_description_chars", "必须大于 0"));
        }
        if self.submit_timeout_secs == 0 {
            return Err(invalid("submit_timeout_secs", "必须大于 0"));
        }
        if !self.template_file_name.ends_with(".csv") {
            return Err(invalid("template_file_name", "必须以 .csv 结尾"));
        }
        if self.error_export_prefix.trim().is_empty() {
            return Err(invalid("error_export_prefix", "不能为空"));
        }
        if self.failed_export_prefix.trim().is_empty() {
            return Err(invalid("failed_export_prefix", "不能为空"));
        }
        Ok(())
    }

    pub fn submit_timeout(&self) -> Duration {
        Duration::from_secs(self.submit_timeout_secs)
    }

    /// 派生校验规则
    ///
    /// # 参数
    /// - current_year: 当前年份（由调用方注入，便于测试）
    pub fn validation_rules(&self, current_year: i32) -> ValidationRules {
        ValidationRules {
            min_year: self.min_year,
            max_year: current_year + self.max_years_ahead,
            max_description_chars: self.max_description_chars,
        }
    }
}

fn invalid(key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ImportConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_description_chars, 2000);
        assert_eq!(config.template_file_name, "vehicle_upload_template.csv");
    }

    #[test]
    fn test_from_json_partial_override() {
        let config = ImportConfig::from_json_str(r#"{"submit_timeout_secs": 30}"#).unwrap();
        assert_eq!(config.submit_timeout(), Duration::from_secs(30));
        assert_eq!(config.min_year, 1900);
    }

    #[test]
    fn test_from_json_rejects_invalid_value() {
        let result = ImportConfig::from_json_str(r#"{"max_description_chars": 0}"#);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "max_description_chars"
        ));
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        assert!(matches!(
            ImportConfig::from_json_str("{not json"),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_validation_rules_year_window() {
        let rules = ImportConfig::default().validation_rules(2026);
        assert_eq!(rules.min_year, 1900);
        assert_eq!(rules.max_year, 2027);
    }
}

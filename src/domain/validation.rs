// ==========================================
// 车辆批量导入 - 校验结果模型
// ==========================================
// 红线: 问题只保存一个有序序列，ERROR/WARNING 视图按级别过滤得到
// 红线: 行数统计按"去重行"计，不按问题条数计
// ==========================================

use crate::domain::types::Severity;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ==========================================
// Issue - 行级问题
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub row: usize,         // 文件行号（表头为第 1 行）
    pub field: String,      // 问题字段
    pub message: String,    // 问题描述
    pub severity: Severity, // 级别
}

impl Issue {
    pub fn error(row: usize, field: &str, message: impl Into<String>) -> Self {
        Self {
            row,
            field: field.to_string(),
            message: message.into(),
            severity: Severity::Error,
        }
    }

    pub fn warning(row: usize, field: &str, message: impl Into<String>) -> Self {
        Self {
            row,
            field: field.to_string(),
            message: message.into(),
            severity: Severity::Warning,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

// ==========================================
// ValidationResult - 校验汇总
// ==========================================
// 不变式:
// - is_valid == (error_row_count == 0)
// - valid_count == total_rows - error_row_count（仅有 WARNING 的行仍计为有效）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub issues: Vec<Issue>,
    pub total_rows: usize,
    pub valid_count: usize,
    pub error_row_count: usize,
    pub warning_row_count: usize,
}

impl ValidationResult {
    /// 由问题序列汇总出各项统计
    pub fn from_issues(total_rows: usize, issues: Vec<Issue>) -> Self {
        let error_rows: HashSet<usize> = issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .map(|i| i.row)
            .collect();
        let warning_rows: HashSet<usize> = issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .map(|i| i.row)
            .collect();

        let error_row_count = error_rows.len();

        Self {
            is_valid: error_row_count == 0,
            issues,
            total_rows,
            valid_count: total_rows.saturating_sub(error_row_count),
            error_row_count,
            warning_row_count: warning_rows.len(),
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    pub fn issues_for_row(&self, row: usize) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |i| i.row == row)
    }

    /// 提交门槛：只看 ERROR 行数，WARNING 永不阻断
    pub fn allows_submission(&self) -> bool {
        self.error_row_count == 0
    }
}

// ==========================================
// 车辆批量导入 - 入库服务边界
// ==========================================
// 职责: 定义批量提交请求 / 响应契约与服务接口（不包含实现）
// 红线: 整批一次提交，不按行调用
// ==========================================

use crate::domain::vehicle::{row_number, VehicleRecord};
use crate::ingestion::error::IngestionResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// IngestionBatch - 批量提交请求
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionBatch {
    pub batch_id: Uuid,
    pub file_name: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub rows: Vec<BatchRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRow {
    pub row: usize, // 文件行号
    pub record: VehicleRecord,
}

impl IngestionBatch {
    /// 由已校验记录构造批次（行号按文件位置编排）
    pub fn new(file_name: Option<String>, records: &[VehicleRecord]) -> Self {
        Self {
            batch_id: Uuid::new_v4(),
            file_name,
            submitted_at: Utc::now(),
            rows: records
                .iter()
                .enumerate()
                .map(|(idx, record)| BatchRow {
                    row: row_number(idx),
                    record: record.clone(),
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ==========================================
// IngestionResponse - 服务响应（线上格式）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionResponse {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    #[serde(default)]
    pub created_vehicles: Vec<CreatedVehicle>,
    #[serde(default)]
    pub errors: Vec<IngestionRowError>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedVehicle {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    pub vin: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    #[serde(default)]
    pub price: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestionRowError {
    pub row: usize,
    #[serde(default)]
    pub vin: Option<String>,
    pub error: String,
}

// ==========================================
// CatalogIngestion Trait
// ==========================================
// 用途: 目录入库服务接口
// 实现者: 远端 HTTP 客户端（宿主应用提供）/ InMemoryCatalog
#[async_trait]
pub trait CatalogIngestion: Send + Sync {
    /// 提交整批记录
    ///
    /// # 返回
    /// - Ok(IngestionResponse): 服务已响应（可能含逐行失败）
    /// - Err(IngestionError): 请求本身未完成
    async fn submit_batch(&self, batch: IngestionBatch) -> IngestionResult<IngestionResponse>;
}

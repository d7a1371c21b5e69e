// ==========================================
// 车辆批量导入 - 内存目录（入库服务参考实现）
// ==========================================
// 职责: 逐行规范化 → VIN 去重 → 写入内存目录
// 行为: 单行失败只记录该行，不影响同批其他行
// ==========================================

use crate::domain::vehicle::NormalizedVehicle;
use crate::importer::normalizer::DataNormalizer;
use crate::ingestion::error::{IngestionError, IngestionResult};
use crate::ingestion::service::{
    CatalogIngestion, CreatedVehicle, IngestionBatch, IngestionResponse, IngestionRowError,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    normalizer: DataNormalizer,
    vehicles: Arc<Mutex<HashMap<String, NormalizedVehicle>>>,
}

impl InMemoryCatalog {
    pub fn new(normalizer: DataNormalizer) -> Self {
        Self {
            normalizer,
            vehicles: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// 预置已存在的车辆（用于模拟跨批次 VIN 冲突）
    pub fn with_vehicles(self, vehicles: Vec<NormalizedVehicle>) -> IngestionResult<Self> {
        {
            let mut guard = self.lock()?;
            for vehicle in vehicles {
                guard.insert(vehicle.vin.clone(), vehicle);
            }
        }
        Ok(self)
    }

    pub fn len(&self) -> IngestionResult<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> IngestionResult<bool> {
        Ok(self.lock()?.is_empty())
    }

    pub fn get(&self, vin: &str) -> IngestionResult<Option<NormalizedVehicle>> {
        Ok(self.lock()?.get(&vin.trim().to_uppercase()).cloned())
    }

    fn lock(
        &self,
    ) -> IngestionResult<std::sync::MutexGuard<'_, HashMap<String, NormalizedVehicle>>> {
        self.vehicles
            .lock()
            .map_err(|e| IngestionError::Internal(format!("锁获取失败: {}", e)))
    }
}

#[async_trait]
impl CatalogIngestion for InMemoryCatalog {
    async fn submit_batch(&self, batch: IngestionBatch) -> IngestionResult<IngestionResponse> {
        let mut guard = self.lock()?;

        let mut created_vehicles = Vec::new();
        let mut errors = Vec::new();

        for row in &batch.rows {
            let vehicle = match self.normalizer.normalize(&row.record) {
                Ok(vehicle) => vehicle,
                Err(e) => {
                    debug!(row = row.row, error = %e, "行规范化失败");
                    errors.push(IngestionRowError {
                        row: row.row,
                        vin: Some(row.record.vin.clone()).filter(|v| !v.is_empty()),
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            if guard.contains_key(&vehicle.vin) {
                errors.push(IngestionRowError {
                    row: row.row,
                    vin: Some(vehicle.vin.clone()),
                    error: "VIN already exists in database".to_string(),
                });
                continue;
            }

            created_vehicles.push(CreatedVehicle {
                id: Some(serde_json::Value::String(vehicle.stock_number.clone())),
                vin: vehicle.vin.clone(),
                make: vehicle.make.clone(),
                model: vehicle.model.clone(),
                year: vehicle.year,
                price: Some(format!("{:.2}", vehicle.asking_price)),
            });
            guard.insert(vehicle.vin.clone(), vehicle);
        }

        info!(
            batch_id = %batch.batch_id,
            total = batch.rows.len(),
            successful = created_vehicles.len(),
            failed = errors.len(),
            "内存目录批量入库完成"
        );

        Ok(IngestionResponse {
            total: batch.rows.len(),
            successful: created_vehicles.len(),
            failed: errors.len(),
            created_vehicles,
            errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::vehicle::VehicleRecord;

    fn create_test_record(vin: &str) -> VehicleRecord {
        VehicleRecord {
            vin: vin.to_string(),
            make: "Toyota".to_string(),
            model: "Camry".to_string(),
            year: "2022".to_string(),
            price: "24,900".to_string(),
            mileage: "30100".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_partial_failure_on_existing_vin() {
        let catalog = InMemoryCatalog::default();
        let first = IngestionBatch::new(None, &[create_test_record("4T1B11HK5JU123456")]);
        catalog.submit_batch(first).await.unwrap();

        let second = IngestionBatch::new(
            None,
            &[
                create_test_record("4T1B11HK5JU123456"),
                create_test_record("4T1B11HK5JU654321"),
            ],
        );
        let response = catalog.submit_batch(second).await.unwrap();

        assert_eq!(response.total, 2);
        assert_eq!(response.successful, 1);
        assert_eq!(response.failed, 1);
        assert_eq!(response.errors[0].row, 2);
        assert_eq!(response.errors[0].error, "VIN already exists in database");
        assert_eq!(catalog.len().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_unnormalizable_row_is_rejected_alone() {
        let catalog = InMemoryCatalog::default();
        let mut bad = create_test_record("4T1B11HK5JU123456");
        bad.year = "old".to_string();

        let batch = IngestionBatch::new(None, &[bad, create_test_record("4T1B11HK5JU654321")]);
        let response = catalog.submit_batch(batch).await.unwrap();

        assert_eq!(response.successful, 1);
        assert_eq!(response.errors[0].error, "Invalid year format: old");
        assert!(catalog.get("4t1b11hk5ju654321").unwrap().is_some());
    }
}

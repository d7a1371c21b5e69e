// ==========================================
// 上传模板集成测试
// ==========================================
// 测试目标: 模板文件经解码 + 校验后零问题，且可直接走完整导入流程
// ==========================================

use std::io::Write;
use std::sync::Arc;
use tempfile::Builder;
use vehicle_bulk_import::domain::types::{BodyType, FuelType, ListingStatus, WorkflowPhase};
use vehicle_bulk_import::importer::{
    CsvDecoder, DataNormalizer, TemplateGenerator, ValidationRules, VehicleValidator,
};
use vehicle_bulk_import::{logging, ImportConfig, ImportCoordinator, InMemoryCatalog};

#[test]
fn test_template_decodes_without_issues() {
    logging::init_test();

    let template = TemplateGenerator::default();
    let file = template.generate().unwrap();

    let decoded = CsvDecoder::default()
        .decode_bytes(file.content.as_bytes())
        .unwrap();
    assert!(decoded.parse_issues.is_empty());
    assert_eq!(decoded.records, vec![template.sample_record()]);

    let result = VehicleValidator::new(ValidationRules::for_year(2026)).validate(&decoded.records);
    assert!(result.issues.is_empty());
    assert!(result.is_valid);
    assert_eq!(result.valid_count, 1);
}

#[test]
fn test_template_sample_normalizes() {
    let record = TemplateGenerator::default().sample_record();
    let vehicle = DataNormalizer::default().normalize(&record).unwrap();

    assert_eq!(vehicle.vin, "1HGCV1F34LA123456");
    assert_eq!(vehicle.stock_number, "LA123456");
    assert_eq!(vehicle.body_type, BodyType::Sedan);
    assert_eq!(vehicle.fuel_type, FuelType::Gasoline);
    assert_eq!(vehicle.status, ListingStatus::Active);
    assert_eq!(vehicle.floor_price, 33000.0);
    assert_eq!(vehicle.features, vec!["Sunroof", "Heated Seats", "Navigation"]);
}

#[tokio::test]
async fn test_template_file_uploads_end_to_end() {
    logging::init_test();

    let catalog = InMemoryCatalog::default();
    let coordinator =
        ImportCoordinator::new(Arc::new(catalog.clone()), ImportConfig::default()).unwrap();

    let template = coordinator.template().unwrap();
    assert_eq!(template.file_name, "vehicle_upload_template.csv");

    let mut temp_file = Builder::new().suffix(".csv").tempfile().unwrap();
    temp_file.write_all(template.content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let validation = coordinator.select_path(temp_file.path()).await.unwrap();
    assert!(validation.is_valid);
    assert_eq!(coordinator.phase().unwrap(), WorkflowPhase::Preview);

    let outcome = coordinator.submit().await.unwrap();
    assert_eq!(outcome.successful, 1);
    assert!(catalog.get("1hgcv1f34la123456").unwrap().is_some());
}

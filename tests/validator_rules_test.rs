// ==========================================
// 校验规则集成测试
// ==========================================
// 测试目标: CSV 解码 → 规则校验 → 规范化 的端到端行为
// ==========================================


use test_helpers::{csv_from_records, valid_record};
use vehicle_bulk_import::domain::types::{BodyType, Severity};
use vehicle_bulk_import::domain::vehicle::VehicleRecord;
use vehicle_bulk_import::importer::{CsvDecoder, DataNormalizer, ValidationRules, VehicleValidator};
use vehicle_bulk_import::logging;
use vehicle_bulk_import::ValidationResult;

fn validator() -> VehicleValidator {
    VehicleValidator::new(ValidationRules::for_year(2026))
}

fn decode_and_validate(csv: &str) -> (Vec<VehicleRecord>, ValidationResult) {
    let decoded = CsvDecoder::default()
        .decode_bytes(csv.as_bytes())
        .expect("解码失败");
    let result = validator().validate(&decoded.records);
    (decoded.records, result)
}

// ==========================================
// 典型场景
// ==========================================

#[test]
fn test_short_vin_single_error() {
    logging::init_test();

    let csv = "vin,make,model,year,price,mileage\n\
               1HGCV1F34LA12345,Honda,Accord,2025,35000,100\n";
    let (_, result) = decode_and_validate(csv);

    assert_eq!(result.issues.len(), 1);
    let issue = &result.issues[0];
    assert_eq!(issue.row, 2);
    assert_eq!(issue.field, "vin");
    assert_eq!(issue.severity, Severity::Error);
    assert_eq!(issue.message, "VIN must be exactly 17 characters (got 16)");
    assert!(!result.is_valid);
}

#[test]
fn test_duplicate_vin_flags_second_row_only() {
    let csv = "vin,make,model,year,price,mileage\n\
               1HGCV1F34LA123456,Honda,Accord,2025,35000,100\n\
               1HGCV1F34LA123456,Honda,Civic,2024,25000,200\n";
    let (_, result) = decode_and_validate(csv);

    assert_eq!(result.issues.len(), 1);
    assert_eq!(result.issues[0].row, 3);
    assert_eq!(result.issues[0].message, "Duplicate VIN in file");
    assert_eq!(result.valid_count, 1);
}

#[test]
fn test_formatted_price_accepted() {
    let csv = "vin,make,model,year,price,mileage\n\
               1HGCV1F34LA123456,Honda,Accord,2025,\"$31,500.00\",\"12,000\"\n";
    let (records, result) = decode_and_validate(csv);

    assert!(result.is_valid);
    assert!(result.issues.is_empty());

    let vehicle = DataNormalizer::default().normalize(&records[0]).unwrap();
    assert_eq!(vehicle.asking_price, 31500.0);
    assert_eq!(vehicle.mileage, 12000);
}

#[test]
fn test_unknown_body_type_warns_and_defaults() {
    let csv = "vin,make,model,year,price,mileage,body_type\n\
               1HGCV1F34LA123456,Honda,Odyssey,2025,42000,10,minivan\n";
    let (records, result) = decode_and_validate(csv);

    assert_eq!(result.issues.len(), 1);
    assert_eq!(result.issues[0].severity, Severity::Warning);
    assert_eq!(result.issues[0].field, "body_type");
    assert!(result.is_valid);
    assert!(result.allows_submission());
    assert_eq!(result.warning_row_count, 1);
    assert_eq!(result.valid_count, 1);

    let vehicle = DataNormalizer::default().normalize(&records[0]).unwrap();
    assert_eq!(vehicle.body_type, BodyType::Sedan);
}

// ==========================================
// 计数与行号
// ==========================================

#[test]
fn test_counts_are_distinct_rows() {
    let mut broken = valid_record(2);
    broken.year = "1800".to_string();
    broken.price = "-5".to_string();
    broken.mileage = "lots".to_string();

    let mut warned = valid_record(3);
    warned.transmission = Some("cvt-ish".to_string());
    warned.fuel_type = Some("steam".to_string());

    let records = vec![valid_record(1), broken, warned, valid_record(4)];
    let result = validator().validate(&records);

    assert_eq!(result.total_rows, 4);
    assert_eq!(result.errors().count(), 3);
    assert_eq!(result.error_row_count, 1);
    assert_eq!(result.warnings().count(), 2);
    assert_eq!(result.warning_row_count, 1);
    // 有 WARNING 的行仍计入 valid_count
    assert_eq!(result.valid_count, 3);
    assert_eq!(result.valid_count, result.total_rows - result.error_row_count);
    assert!(result
        .issues
        .iter()
        .all(|i| i.row >= 2 && i.row <= result.total_rows + 1));
}

#[test]
fn test_issue_rows_follow_file_positions() {
    let mut third = valid_record(3);
    third.make = "   ".to_string();
    let records = vec![valid_record(1), valid_record(2), third];

    let result = validator().validate(&records);

    assert_eq!(result.issues.len(), 1);
    assert_eq!(result.issues[0].row, 4);
    assert_eq!(result.issues[0].message, "make is required");
    assert_eq!(result.issues_for_row(4).count(), 1);
}

#[test]
fn test_blank_lines_do_not_shift_row_numbers() {
    let csv = "vin,make,model,year,price,mileage\n\
               1HGCV1F34LA123456,Honda,Accord,2025,35000,100\n\
               ,,,,,\n\
               1HGCV1F34LA12345,Honda,Civic,2024,25000,200\n";
    let (records, result) = decode_and_validate(csv);

    assert_eq!(records.len(), 2);
    assert_eq!(result.issues[0].row, 3);
}

// ==========================================
// 其他规则
// ==========================================

#[test]
fn test_missing_required_columns_error_every_row() {
    let csv = "vin,make,model,year,price\n\
               1HGCV1F34LA123456,Honda,Accord,2025,35000\n\
               1HGCV1F34LA123457,Honda,Civic,2024,25000\n";
    let decoded = CsvDecoder::default().decode_bytes(csv.as_bytes()).unwrap();
    let result = validator().validate(&decoded.records);

    assert!(decoded
        .parse_issues
        .iter()
        .any(|m| m.contains("Missing required column 'mileage'")));
    assert_eq!(result.error_row_count, 2);
    assert!(result.errors().all(|i| i.message == "mileage is required"));
}

#[test]
fn test_invalid_status_is_error() {
    let mut record = valid_record(1);
    record.status = Some("archived".to_string());

    let result = validator().validate(&[record]);

    assert_eq!(result.error_row_count, 1);
    assert_eq!(
        result.issues[0].message,
        "Invalid status. Use: active, pending, pending_sale, draft, sold, inactive"
    );
}

#[test]
fn test_status_values_accepted() {
    let records: Vec<VehicleRecord> = ["active", "pending", "Pending_Sale", "draft", "sold", "inactive"]
        .iter()
        .enumerate()
        .map(|(i, status)| VehicleRecord {
            status: Some(status.to_string()),
            ..valid_record(i + 1)
        })
        .collect();

    assert!(validator().validate(&records).issues.is_empty());
}

#[test]
fn test_optional_field_warnings() {
    let mut record = valid_record(1);
    record.floor_price = Some("36000".to_string());
    record.description = Some("x".repeat(2001));
    record.image_url = Some("not a url".to_string());

    let result = validator().validate(&[record]);

    assert!(result.is_valid);
    assert_eq!(result.warnings().count(), 3);
    let messages: Vec<&str> = result.issues.iter().map(|i| i.message.as_str()).collect();
    assert!(messages.contains(&"Floor price ($36000) is higher than listing price ($35000)"));
    assert!(messages.contains(&"Description exceeds 2000 characters. Will be truncated."));
    assert!(messages.contains(&"Invalid image URL format"));
}

#[test]
fn test_year_bounds() {
    let mut next_year = valid_record(1);
    next_year.year = "2027".to_string();
    let mut too_new = valid_record(2);
    too_new.year = "2028".to_string();
    let mut oldest = valid_record(3);
    oldest.year = "1900".to_string();

    let result = validator().validate(&[next_year, too_new, oldest]);

    assert_eq!(result.issues.len(), 1);
    assert_eq!(result.issues[0].row, 3);
    assert_eq!(result.issues[0].message, "Invalid year: 2028");
}

#[test]
fn test_validation_is_repeatable() {
    let mut dup = valid_record(1);
    dup.model = "Civic".to_string();
    let csv = csv_from_records(&[valid_record(1), dup]);

    let (_, first) = decode_and_validate(&csv);
    let (_, second) = decode_and_validate(&csv);

    assert_eq!(first, second);
}

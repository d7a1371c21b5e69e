// ==========================================
// 车辆批量导入 - 上传模板生成器
// ==========================================
// 职责: 表头 + 一行完全合法的示例数据
// 红线: 表头取自 VEHICLE_FIELDS，与必填校验同源；
//       模板自身若校验不通过，属于内部一致性缺陷
// ==========================================

use crate::domain::vehicle::{field_names, VehicleRecord};
use crate::importer::csv_export::{write_csv, ExportFile};
use crate::importer::error::ImportResult;

/// 模板默认文件名
pub const TEMPLATE_FILE_NAME: &str = "vehicle_upload_template.csv";

#[derive(Debug, Clone)]
pub struct TemplateGenerator {
    file_name: String,
}

impl Default for TemplateGenerator {
    fn default() -> Self {
        Self::new(TEMPLATE_FILE_NAME)
    }
}

impl TemplateGenerator {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    /// 模板表头（全部已知列）
    pub fn headers(&self) -> Vec<&'static str> {
        field_names().collect()
    }

    /// 示例行
    pub fn sample_record(&self) -> VehicleRecord {
        VehicleRecord {
            vin: "1HGCV1F34LA123456".to_string(),
            make: "Honda".to_string(),
            model: "Accord".to_string(),
            year: "2025".to_string(),
            price: "35500".to_string(),
            mileage: "15000".to_string(),
            trim: Some("EX-L".to_string()),
            body_type: Some("sedan".to_string()),
            msrp: Some("37000".to_string()),
            floor_price: Some("33000".to_string()),
            transmission: Some("automatic".to_string()),
            fuel_type: Some("gasoline".to_string()),
            exterior_color: Some("White Pearl".to_string()),
            interior_color: Some("Black Leather".to_string()),
            features: Some("Sunroof, Heated Seats, Navigation".to_string()),
            description: Some("One owner clean title".to_string()),
            status: Some("active".to_string()),
            image_url: Some("https://example.com/car-image.jpg".to_string()),
        }
    }

    /// 生成模板 CSV 文本
    pub fn render(&self) -> ImportResult<String> {
        write_csv(&self.headers(), vec![self.sample_record().to_cells()])
    }

    /// 生成可下载的模板文件
    pub fn generate(&self) -> ImportResult<ExportFile> {
        Ok(ExportFile {
            file_name: self.file_name.clone(),
            content: self.render()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::vehicle::required_fields;

    #[test]
    fn test_template_headers_contain_required_fields() {
        let headers = TemplateGenerator::default().headers();
        for field in required_fields() {
            assert!(headers.contains(&field), "模板缺少必填列 {}", field);
        }
        assert_eq!(headers.len(), 18);
    }

    #[test]
    fn test_template_layout() {
        let file = TemplateGenerator::default().generate().unwrap();
        let lines: Vec<&str> = file.content.lines().collect();

        assert_eq!(file.file_name, "vehicle_upload_template.csv");
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("vin,make,model,year,trim,body_type,price"));
        assert!(lines[1].contains("\"Sunroof, Heated Seats, Navigation\""));
    }
}

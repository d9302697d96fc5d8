//! 学生导出（CSV / XLSX）

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use rust_xlsxwriter::{Format, Workbook};
use tracing::error;

use super::StudentService;
use crate::errors::{Result, SidisiplinError};
use crate::models::students::entities::Student;
use crate::models::students::requests::{StudentExportParams, StudentListQuery};
use crate::models::ErrorCode;
use crate::services::{bad_request, error_response, trim_optional};

const HEADERS: [&str; 10] = [
    "nis",
    "nisn",
    "name",
    "gender",
    "class_name",
    "birth_date",
    "parent_name",
    "parent_phone",
    "address",
    "is_active",
];

// 表头与导入模板一致，导出文件可直接再次导入
fn student_record(student: &Student) -> [String; 10] {
    [
        student.nis.clone(),
        student.nisn.clone().unwrap_or_default(),
        student.name.clone(),
        student.gender.to_string(),
        student.class_name.clone(),
        student
            .birth_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        student.parent_name.clone().unwrap_or_default(),
        student.parent_phone.clone().unwrap_or_default(),
        student.address.clone().unwrap_or_default(),
        student.is_active.to_string(),
    ]
}

pub(crate) fn students_to_csv(students: &[Student]) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    let csv_error = |e: csv::Error| SidisiplinError::serialization(format!("CSV 写入失败: {e}"));

    wtr.write_record(HEADERS).map_err(csv_error)?;
    for student in students {
        wtr.write_record(student_record(student)).map_err(csv_error)?;
    }

    wtr.into_inner()
        .map_err(|e| SidisiplinError::serialization(format!("CSV 生成失败: {e}")))
}

pub(crate) fn students_to_xlsx(students: &[Student]) -> Result<Vec<u8>> {
    let xlsx_error =
        |e: rust_xlsxwriter::XlsxError| SidisiplinError::serialization(format!("XLSX 写入失败: {e}"));

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Siswa").map_err(xlsx_error)?;

    let header_format = Format::new().set_bold();
    for (col, header) in HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(xlsx_error)?;
    }

    for (row, student) in students.iter().enumerate() {
        let row = (row + 1) as u32;
        for (col, value) in student_record(student).iter().enumerate() {
            worksheet
                .write_string(row, col as u16, value)
                .map_err(xlsx_error)?;
        }
    }

    workbook.save_to_buffer().map_err(xlsx_error)
}

pub async fn export_students(
    service: &StudentService,
    params: StudentExportParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let format = params
        .format
        .as_deref()
        .map(|f| f.trim().to_lowercase())
        .unwrap_or_else(|| "csv".to_string());
    if format != "csv" && format != "xlsx" {
        return Ok(bad_request(
            ErrorCode::ValidationFailed,
            "Format ekspor harus csv atau xlsx",
        ));
    }

    let storage = service.get_storage(request);
    let query = StudentListQuery {
        search: trim_optional(params.search),
        class_name: trim_optional(params.class_name),
        is_active: params.is_active,
        ..Default::default()
    };

    let students = match storage.list_all_students(query).await {
        Ok(students) => students,
        Err(e) => return Ok(error_response(e)),
    };

    let (content_type, body) = if format == "xlsx" {
        (
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            students_to_xlsx(&students),
        )
    } else {
        ("text/csv; charset=utf-8", students_to_csv(&students))
    };

    match body {
        Ok(data) => Ok(HttpResponse::Ok()
            .content_type(content_type)
            .insert_header((
                "Content-Disposition",
                format!("attachment; filename=\"siswa.{format}\""),
            ))
            .body(data)),
        Err(e) => {
            error!("Student export failed: {}", e);
            Ok(error_response(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::students::entities::Gender;

    fn student() -> Student {
        let now = chrono::Utc::now();
        Student {
            id: 1,
            nis: "20231001".to_string(),
            nisn: None,
            name: "Andi, Saputra".to_string(),
            gender: Gender::L,
            class_name: "XI IPA 2".to_string(),
            birth_date: chrono::NaiveDate::from_ymd_opt(2008, 5, 17),
            parent_name: None,
            parent_phone: None,
            address: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_csv_export_quotes_and_headers() {
        let data = students_to_csv(&[student()]).unwrap();
        let text = String::from_utf8(data).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("nis,nisn,name,gender,class_name"));
        assert_eq!(
            lines.next().unwrap(),
            "20231001,,\"Andi, Saputra\",L,XI IPA 2,2008-05-17,,,,true"
        );
    }

    #[test]
    fn test_xlsx_export_is_zip() {
        let data = students_to_xlsx(&[student()]).unwrap();
        assert!(data.starts_with(&[0x50, 0x4B, 0x03, 0x04]));
    }
}

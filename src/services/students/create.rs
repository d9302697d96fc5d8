use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::NaiveDate;
use tracing::info;

use super::StudentService;
use crate::config::AppConfig;
use crate::models::{
    ApiResponse, ErrorCode,
    students::{requests::CreateStudentRequest, responses::StudentResponse},
    system::entities::AuditAction,
};
use crate::services::{bad_request, error_response_with, record_audit, trim_optional};
use crate::utils::validate::{require_text, validate_nis, validate_nisn, validate_phone};

/// 学校时区下的今天
pub(super) fn school_today() -> NaiveDate {
    chrono::Utc::now()
        .with_timezone(&AppConfig::get().school_offset())
        .date_naive()
}

pub(super) fn check_birth_date(
    birth_date: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<(), String> {
    match birth_date {
        Some(date) if date >= today => Err("Tanggal lahir harus sebelum hari ini".to_string()),
        _ => Ok(()),
    }
}

/// 班级名称合并多余空白，如 "XI  IPA 2" -> "XI IPA 2"
pub(super) fn normalize_class_name(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 整理并校验新学生数据（导入时逐行复用）
pub(super) fn normalize_create(
    mut student: CreateStudentRequest,
    today: NaiveDate,
) -> Result<CreateStudentRequest, String> {
    student.nis = student.nis.trim().to_string();
    student.name = student.name.trim().to_string();
    student.class_name = normalize_class_name(&student.class_name);
    student.nisn = trim_optional(student.nisn);
    student.parent_name = trim_optional(student.parent_name);
    student.parent_phone = trim_optional(student.parent_phone);
    student.address = trim_optional(student.address);

    validate_nis(&student.nis)?;
    if let Some(nisn) = &student.nisn {
        validate_nisn(nisn)?;
    }
    require_text(&student.name, "Nama siswa")?;
    require_text(&student.class_name, "Kelas")?;
    if let Some(phone) = &student.parent_phone {
        validate_phone(phone)?;
    }
    check_birth_date(student.birth_date, today)?;

    Ok(student)
}

pub async fn create_student(
    service: &StudentService,
    student: CreateStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let student = match normalize_create(student, school_today()) {
        Ok(student) => student,
        Err(msg) => return Ok(bad_request(ErrorCode::ValidationFailed, msg)),
    };

    let storage = service.get_storage(request);

    match storage.create_student(student).await {
        Ok(student) => {
            info!("Student {} ({}) created", student.nis, student.id);
            record_audit(
                &storage,
                request,
                AuditAction::Create,
                "student",
                student.id,
                Some(serde_json::json!({ "nis": student.nis, "name": student.name })),
            )
            .await;
            Ok(HttpResponse::Created().json(ApiResponse::success(
                StudentResponse { student },
                "Siswa berhasil ditambahkan",
            )))
        }
        Err(e) => Ok(error_response_with(ErrorCode::StudentAlreadyExists, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::students::entities::Gender;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()
    }

    fn student() -> CreateStudentRequest {
        CreateStudentRequest {
            nis: " 20231001 ".to_string(),
            nisn: Some("".to_string()),
            name: " Andi Saputra ".to_string(),
            gender: Gender::L,
            class_name: "XI   IPA  2".to_string(),
            birth_date: NaiveDate::from_ymd_opt(2008, 5, 17),
            parent_name: None,
            parent_phone: Some("081234567890".to_string()),
            address: None,
        }
    }

    #[test]
    fn test_normalize_create() {
        let normalized = normalize_create(student(), today()).unwrap();
        assert_eq!(normalized.nis, "20231001");
        assert_eq!(normalized.name, "Andi Saputra");
        assert_eq!(normalized.class_name, "XI IPA 2");
        assert_eq!(normalized.nisn, None);
    }

    #[test]
    fn test_normalize_create_rejects_invalid_fields() {
        let mut s = student();
        s.nis = "12a".to_string();
        assert!(normalize_create(s, today()).is_err());

        let mut s = student();
        s.nisn = Some("123".to_string());
        assert!(normalize_create(s, today()).is_err());

        let mut s = student();
        s.class_name = "   ".to_string();
        assert!(normalize_create(s, today()).is_err());

        let mut s = student();
        s.birth_date = NaiveDate::from_ymd_opt(2030, 1, 1);
        assert!(normalize_create(s, today()).is_err());
    }
}

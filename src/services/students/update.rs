use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::NaiveDate;
use tracing::info;

use super::StudentService;
use super::create::{check_birth_date, normalize_class_name, school_today};
use crate::models::{
    ApiResponse, ErrorCode,
    students::{requests::UpdateStudentRequest, responses::StudentResponse},
    system::entities::AuditAction,
};
use crate::services::{bad_request, error_response_with, not_found, record_audit};
use crate::utils::validate::{require_text, validate_nis, validate_nisn, validate_phone};

/// 只校验提交的字段；可选文本字段传空串表示清空
pub(super) fn normalize_update(
    mut update: UpdateStudentRequest,
    today: NaiveDate,
) -> Result<UpdateStudentRequest, String> {
    if let Some(nis) = update.nis.take() {
        let nis = nis.trim().to_string();
        validate_nis(&nis)?;
        update.nis = Some(nis);
    }
    if let Some(name) = update.name.take() {
        let name = name.trim().to_string();
        require_text(&name, "Nama siswa")?;
        update.name = Some(name);
    }
    if let Some(class_name) = update.class_name.take() {
        let class_name = normalize_class_name(&class_name);
        require_text(&class_name, "Kelas")?;
        update.class_name = Some(class_name);
    }
    if let Some(nisn) = update.nisn.take() {
        let nisn = nisn.trim().to_string();
        if !nisn.is_empty() {
            validate_nisn(&nisn)?;
        }
        update.nisn = Some(nisn);
    }
    if let Some(phone) = update.parent_phone.take() {
        let phone = phone.trim().to_string();
        if !phone.is_empty() {
            validate_phone(&phone)?;
        }
        update.parent_phone = Some(phone);
    }
    update.parent_name = update.parent_name.map(|v| v.trim().to_string());
    update.address = update.address.map(|v| v.trim().to_string());
    check_birth_date(update.birth_date, today)?;

    Ok(update)
}

pub async fn update_student(
    service: &StudentService,
    student_id: i64,
    update: UpdateStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let update = match normalize_update(update, school_today()) {
        Ok(update) => update,
        Err(msg) => return Ok(bad_request(ErrorCode::ValidationFailed, msg)),
    };

    let storage = service.get_storage(request);

    match storage.update_student(student_id, update).await {
        Ok(Some(student)) => {
            info!("Student {} updated", student.id);
            record_audit(
                &storage,
                request,
                AuditAction::Update,
                "student",
                student.id,
                Some(serde_json::json!({
                    "nis": student.nis,
                    "class_name": student.class_name,
                    "is_active": student.is_active,
                })),
            )
            .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                StudentResponse { student },
                "Data siswa berhasil diperbarui",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::StudentNotFound, "Siswa tidak ditemukan")),
        Err(e) => Ok(error_response_with(ErrorCode::StudentAlreadyExists, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()
    }

    #[test]
    fn test_partial_update_only_checks_given_fields() {
        let update = UpdateStudentRequest {
            class_name: Some(" XII  IPS 1 ".to_string()),
            ..Default::default()
        };
        let normalized = normalize_update(update, today()).unwrap();
        assert_eq!(normalized.class_name.as_deref(), Some("XII IPS 1"));
        assert!(normalized.nis.is_none());
    }

    #[test]
    fn test_empty_optional_fields_clear_values() {
        let update = UpdateStudentRequest {
            nisn: Some(" ".to_string()),
            parent_phone: Some("".to_string()),
            ..Default::default()
        };
        let normalized = normalize_update(update, today()).unwrap();
        assert_eq!(normalized.nisn.as_deref(), Some(""));
        assert_eq!(normalized.parent_phone.as_deref(), Some(""));
    }

    #[test]
    fn test_invalid_update_rejected() {
        let update = UpdateStudentRequest {
            name: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(normalize_update(update, today()).is_err());
    }
}

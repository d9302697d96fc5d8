use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ViolationService, check_points, normalize_code};
use crate::models::{
    ApiResponse, ErrorCode, system::entities::AuditAction,
    violations::requests::CreateViolationRequest,
};
use crate::services::{bad_request, error_response_with, record_audit, trim_optional};
use crate::utils::validate::require_text;

pub(super) fn normalize_create(
    mut req: CreateViolationRequest,
) -> Result<CreateViolationRequest, String> {
    req.code = normalize_code(&req.code);
    req.name = req.name.trim().to_string();
    req.description = trim_optional(req.description);
    req.sanction_type_ids.sort_unstable();
    req.sanction_type_ids.dedup();

    require_text(&req.code, "Kode pelanggaran")?;
    require_text(&req.name, "Nama pelanggaran")?;
    check_points(req.points)?;
    Ok(req)
}

pub async fn create_violation(
    service: &ViolationService,
    req: CreateViolationRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let req = match normalize_create(req) {
        Ok(req) => req,
        Err(msg) => return Ok(bad_request(ErrorCode::ValidationFailed, msg)),
    };

    let storage = service.get_storage(request);

    match storage.create_violation(req).await {
        Ok(detail) => {
            info!(
                "Violation {} created (ID: {})",
                detail.violation.code, detail.violation.id
            );
            record_audit(
                &storage,
                request,
                AuditAction::Create,
                "violation",
                detail.violation.id,
                Some(serde_json::json!({
                    "code": detail.violation.code,
                    "points": detail.violation.points,
                })),
            )
            .await;
            Ok(HttpResponse::Created().json(ApiResponse::success(
                detail,
                "Pelanggaran berhasil ditambahkan",
            )))
        }
        Err(e) => Ok(error_response_with(ErrorCode::ValidationFailed, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateViolationRequest {
        CreateViolationRequest {
            category_id: 1,
            code: " 1.b ".to_string(),
            name: "Tidak memakai atribut".to_string(),
            description: None,
            points: 5,
            sanction_type_ids: vec![3, 1, 3],
        }
    }

    #[test]
    fn test_normalize_create_violation() {
        let req = normalize_create(request()).unwrap();
        assert_eq!(req.code, "1.B");
        assert_eq!(req.sanction_type_ids, vec![1, 3]);
    }

    #[test]
    fn test_negative_points_rejected() {
        let mut req = request();
        req.points = -5;
        assert!(normalize_create(req).is_err());
    }
}

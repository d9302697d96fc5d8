use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ViolationService, check_points, normalize_code};
use crate::models::{
    ApiResponse, ErrorCode, system::entities::AuditAction,
    violations::requests::UpdateViolationRequest,
};
use crate::services::{bad_request, error_response_with, not_found, record_audit};
use crate::utils::validate::require_text;

pub(super) fn normalize_update(
    mut update: UpdateViolationRequest,
) -> Result<UpdateViolationRequest, String> {
    if let Some(code) = update.code.take() {
        let code = normalize_code(&code);
        require_text(&code, "Kode pelanggaran")?;
        update.code = Some(code);
    }
    if let Some(name) = update.name.take() {
        let name = name.trim().to_string();
        require_text(&name, "Nama pelanggaran")?;
        update.name = Some(name);
    }
    if let Some(points) = update.points {
        check_points(points)?;
    }
    if let Some(ids) = update.sanction_type_ids.as_mut() {
        ids.sort_unstable();
        ids.dedup();
    }
    update.description = update.description.map(|v| v.trim().to_string());
    Ok(update)
}

pub async fn update_violation(
    service: &ViolationService,
    violation_id: i64,
    update: UpdateViolationRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let update = match normalize_update(update) {
        Ok(update) => update,
        Err(msg) => return Ok(bad_request(ErrorCode::ValidationFailed, msg)),
    };

    let storage = service.get_storage(request);

    match storage.update_violation(violation_id, update).await {
        Ok(Some(detail)) => {
            info!("Violation {} updated", detail.violation.id);
            record_audit(
                &storage,
                request,
                AuditAction::Update,
                "violation",
                detail.violation.id,
                Some(serde_json::json!({
                    "code": detail.violation.code,
                    "points": detail.violation.points,
                    "is_active": detail.violation.is_active,
                })),
            )
            .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                detail,
                "Pelanggaran berhasil diperbarui",
            )))
        }
        Ok(None) => Ok(not_found(
            ErrorCode::ViolationNotFound,
            "Pelanggaran tidak ditemukan",
        )),
        Err(e) => Ok(error_response_with(ErrorCode::ValidationFailed, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_points_checked_only_when_given() {
        assert!(normalize_update(UpdateViolationRequest::default()).is_ok());

        let update = UpdateViolationRequest {
            points: Some(-1),
            ..Default::default()
        };
        assert!(normalize_update(update).is_err());
    }
}

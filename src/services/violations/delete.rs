use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ViolationService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response_with, record_audit, removal_audit_action};

pub async fn delete_violation(
    service: &ViolationService,
    violation_id: i64,
    force: bool,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.remove_violation(violation_id, force).await {
        Ok(outcome) => {
            info!("Violation {} removed: {:?}", violation_id, outcome);
            record_audit(
                &storage,
                request,
                removal_audit_action(&outcome),
                "violation",
                violation_id,
                Some(serde_json::json!({ "force": force })),
            )
            .await;
            let message = outcome.message("Pelanggaran");
            Ok(HttpResponse::Ok().json(ApiResponse::success(outcome, message)))
        }
        Err(e) => Ok(error_response_with(ErrorCode::ViolationNotFound, e)),
    }
}

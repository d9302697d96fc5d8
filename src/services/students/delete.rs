use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::StudentService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response_with, record_audit, removal_audit_action};

pub async fn delete_student(
    service: &StudentService,
    student_id: i64,
    force: bool,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.remove_student(student_id, force).await {
        Ok(outcome) => {
            info!("Student {} removed: {:?}", student_id, outcome);
            record_audit(
                &storage,
                request,
                removal_audit_action(&outcome),
                "student",
                student_id,
                Some(serde_json::json!({ "force": force })),
            )
            .await;
            let message = outcome.message("Siswa");
            Ok(HttpResponse::Ok().json(ApiResponse::success(outcome, message)))
        }
        Err(e) => Ok(error_response_with(ErrorCode::StudentNotFound, e)),
    }
}

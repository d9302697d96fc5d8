use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::TeacherService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{
    bad_request, cache_from_request, error_response_with, record_audit, removal_audit_action,
    require_user_id,
};

pub async fn delete_teacher(
    service: &TeacherService,
    user_id: i64,
    force: bool,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current_user_id = match require_user_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    if user_id == current_user_id {
        return Ok(bad_request(
            ErrorCode::CanNotDeleteCurrentUser,
            "Tidak dapat menghapus akun sendiri",
        ));
    }

    let storage = service.get_storage(request);

    match storage.remove_user(user_id, force).await {
        Ok(outcome) => {
            if let Some(cache) = cache_from_request(request) {
                cache.invalidate_all().await;
            }
            info!("Teacher {} removed: {:?}", user_id, outcome);
            record_audit(
                &storage,
                request,
                removal_audit_action(&outcome),
                "user",
                user_id,
                Some(serde_json::json!({ "force": force })),
            )
            .await;
            let message = outcome.message("Guru");
            Ok(HttpResponse::Ok().json(ApiResponse::success(outcome, message)))
        }
        Err(e) => Ok(error_response_with(ErrorCode::UserNotFound, e)),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use tracing::info;

use super::CaseService;
use super::create::{check_incident_date, normalize_evidence};
use crate::config::AppConfig;
use crate::models::{
    ApiResponse, ErrorCode, cases::requests::UpdateCaseRequest, system::entities::AuditAction,
};
use crate::services::{bad_request, error_response_with, not_found, record_audit};

// 状态可被直接改写（例如撤销为 DIBATALKAN），不经过处理记录
pub async fn update_case(
    service: &CaseService,
    case_id: i64,
    mut update: UpdateCaseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(urls) = update.evidence_urls.take() {
        match normalize_evidence(urls) {
            Ok(urls) => update.evidence_urls = Some(urls),
            Err(msg) => return Ok(bad_request(ErrorCode::ValidationFailed, msg)),
        }
    }
    if let Some(incident_date) = update.incident_date
        && let Err(msg) =
            check_incident_date(incident_date, Utc::now(), AppConfig::get().school_offset())
    {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }
    update.description = update.description.map(|v| v.trim().to_string());

    let status_change = update.status;
    let storage = service.get_storage(request);

    match storage.update_case(case_id, update).await {
        Ok(Some(case)) => {
            info!("Case {} updated (status {})", case.case_number, case.status);
            record_audit(
                &storage,
                request,
                AuditAction::Update,
                "violation_case",
                case.id,
                Some(serde_json::json!({
                    "case_number": case.case_number,
                    "status": status_change.map(|s| s.as_str()),
                })),
            )
            .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                case,
                "Kasus berhasil diperbarui",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::CaseNotFound, "Kasus tidak ditemukan")),
        Err(e) => Ok(error_response_with(ErrorCode::ValidationFailed, e)),
    }
}

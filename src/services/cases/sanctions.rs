use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CaseService;
use crate::errors::SidisiplinError;
use crate::models::{
    ApiResponse, ErrorCode,
    sanctions::{
        requests::{CreateSanctionRequest, UpdateSanctionRequest},
        responses::SanctionListResponse,
    },
    system::entities::AuditAction,
};
use crate::services::{
    error_response, error_response_with, not_found, record_audit, require_user_id, trim_optional,
};

pub async fn list_sanctions(
    service: &CaseService,
    case_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_case_by_id(case_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::CaseNotFound, "Kasus tidak ditemukan")),
        Err(e) => return Ok(error_response(e)),
    }

    match storage.list_case_sanctions(case_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SanctionListResponse { items },
            "Daftar sanksi berhasil diambil",
        ))),
        Err(e) => Ok(error_response(e)),
    }
}

pub async fn create_sanction(
    service: &CaseService,
    case_id: i64,
    mut req: CreateSanctionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let actor_id = match require_user_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    req.notes = trim_optional(req.notes);

    let storage = service.get_storage(request);

    match storage.create_sanction(case_id, req, actor_id).await {
        Ok(sanction) => {
            info!("Sanction {} issued for case {}", sanction.id, case_id);
            record_audit(
                &storage,
                request,
                AuditAction::Create,
                "sanction",
                sanction.id,
                Some(serde_json::json!({
                    "case_id": case_id,
                    "sanction_type_id": sanction.sanction_type_id,
                })),
            )
            .await;
            Ok(HttpResponse::Created().json(ApiResponse::success(
                sanction,
                "Sanksi berhasil ditambahkan",
            )))
        }
        Err(e @ SidisiplinError::NotFound(_)) => Ok(error_response_with(ErrorCode::CaseNotFound, e)),
        Err(e) => Ok(error_response_with(ErrorCode::ValidationFailed, e)),
    }
}

pub async fn update_sanction(
    service: &CaseService,
    sanction_id: i64,
    mut update: UpdateSanctionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    update.notes = update.notes.map(|v| v.trim().to_string());

    let storage = service.get_storage(request);

    match storage.update_sanction(sanction_id, update).await {
        Ok(Some(sanction)) => {
            record_audit(
                &storage,
                request,
                AuditAction::Update,
                "sanction",
                sanction.id,
                Some(serde_json::json!({
                    "case_id": sanction.case_id,
                    "is_completed": sanction.is_completed,
                })),
            )
            .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                sanction,
                "Sanksi berhasil diperbarui",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::SanctionNotFound, "Sanksi tidak ditemukan")),
        Err(e) => Ok(error_response_with(ErrorCode::ValidationFailed, e)),
    }
}

pub async fn delete_sanction(
    service: &CaseService,
    sanction_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_sanction(sanction_id).await {
        Ok(true) => {
            info!("Sanction {} deleted", sanction_id);
            record_audit(
                &storage,
                request,
                AuditAction::Delete,
                "sanction",
                sanction_id,
                None,
            )
            .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Sanksi berhasil dihapus")))
        }
        Ok(false) => Ok(not_found(ErrorCode::SanctionNotFound, "Sanksi tidak ditemukan")),
        Err(e) => Ok(error_response(e)),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SanctionTypeService;
use crate::models::{
    ApiResponse, ErrorCode,
    sanction_types::{
        requests::{CreateSanctionTypeRequest, UpdateSanctionTypeRequest},
        responses::SanctionTypeListResponse,
    },
    system::entities::AuditAction,
    violations::requests::CatalogListParams,
};
use crate::services::{
    bad_request, error_response, error_response_with, not_found, record_audit,
    removal_audit_action, trim_optional,
};
use crate::utils::validate::require_text;

pub async fn list_sanction_types(
    service: &SanctionTypeService,
    params: CatalogListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage
        .list_sanction_types(params.is_active, trim_optional(params.search))
        .await
    {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SanctionTypeListResponse { items },
            "Daftar jenis sanksi berhasil diambil",
        ))),
        Err(e) => Ok(error_response(e)),
    }
}

pub async fn create_sanction_type(
    service: &SanctionTypeService,
    mut req: CreateSanctionTypeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    req.name = req.name.trim().to_string();
    req.description = trim_optional(req.description);
    if let Err(msg) = require_text(&req.name, "Nama sanksi") {
        return Ok(bad_request(ErrorCode::ValidationFailed, msg));
    }

    let storage = service.get_storage(request);

    match storage.create_sanction_type(req).await {
        Ok(sanction_type) => {
            info!("Sanction type {} created", sanction_type.name);
            record_audit(
                &storage,
                request,
                AuditAction::Create,
                "sanction_type",
                sanction_type.id,
                Some(serde_json::json!({ "name": sanction_type.name })),
            )
            .await;
            Ok(HttpResponse::Created().json(ApiResponse::success(
                sanction_type,
                "Jenis sanksi berhasil ditambahkan",
            )))
        }
        Err(e) => Ok(error_response_with(ErrorCode::ValidationFailed, e)),
    }
}

pub async fn update_sanction_type(
    service: &SanctionTypeService,
    sanction_type_id: i64,
    mut update: UpdateSanctionTypeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(name) = update.name.take() {
        let name = name.trim().to_string();
        if let Err(msg) = require_text(&name, "Nama sanksi") {
            return Ok(bad_request(ErrorCode::ValidationFailed, msg));
        }
        update.name = Some(name);
    }
    update.description = update.description.map(|v| v.trim().to_string());

    let storage = service.get_storage(request);

    match storage.update_sanction_type(sanction_type_id, update).await {
        Ok(Some(sanction_type)) => {
            record_audit(
                &storage,
                request,
                AuditAction::Update,
                "sanction_type",
                sanction_type.id,
                Some(serde_json::json!({
                    "name": sanction_type.name,
                    "is_active": sanction_type.is_active,
                })),
            )
            .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                sanction_type,
                "Jenis sanksi berhasil diperbarui",
            )))
        }
        Ok(None) => Ok(not_found(
            ErrorCode::SanctionTypeNotFound,
            "Jenis sanksi tidak ditemukan",
        )),
        Err(e) => Ok(error_response_with(ErrorCode::ValidationFailed, e)),
    }
}

pub async fn delete_sanction_type(
    service: &SanctionTypeService,
    sanction_type_id: i64,
    force: bool,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.remove_sanction_type(sanction_type_id, force).await {
        Ok(outcome) => {
            info!("Sanction type {} removed: {:?}", sanction_type_id, outcome);
            record_audit(
                &storage,
                request,
                removal_audit_action(&outcome),
                "sanction_type",
                sanction_type_id,
                Some(serde_json::json!({ "force": force })),
            )
            .await;
            let message = outcome.message("Jenis sanksi");
            Ok(HttpResponse::Ok().json(ApiResponse::success(outcome, message)))
        }
        Err(e) => Ok(error_response_with(ErrorCode::SanctionTypeNotFound, e)),
    }
}

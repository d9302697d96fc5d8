//! 旧版扁平违规类型，保留给早期客户端使用

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ViolationService, check_points};
use crate::models::{
    ApiResponse, ErrorCode,
    system::entities::AuditAction,
    violations::{
        requests::{CatalogListParams, CreateViolationTypeRequest, UpdateViolationTypeRequest},
        responses::ViolationTypeListResponse,
    },
};
use crate::services::{
    bad_request, error_response, error_response_with, not_found, record_audit, trim_optional,
};
use crate::utils::validate::require_text;

fn normalize_create(mut req: CreateViolationTypeRequest) -> Result<CreateViolationTypeRequest, String> {
    req.name = req.name.trim().to_string();
    req.description = trim_optional(req.description);
    require_text(&req.name, "Nama jenis pelanggaran")?;
    check_points(req.points)?;
    Ok(req)
}

fn normalize_update(
    mut update: UpdateViolationTypeRequest,
) -> Result<UpdateViolationTypeRequest, String> {
    if let Some(name) = update.name.take() {
        let name = name.trim().to_string();
        require_text(&name, "Nama jenis pelanggaran")?;
        update.name = Some(name);
    }
    if let Some(points) = update.points {
        check_points(points)?;
    }
    update.description = update.description.map(|v| v.trim().to_string());
    Ok(update)
}

pub async fn list_violation_types(
    service: &ViolationService,
    params: CatalogListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage
        .list_violation_types(params.is_active, trim_optional(params.search))
        .await
    {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ViolationTypeListResponse { items },
            "Daftar jenis pelanggaran berhasil diambil",
        ))),
        Err(e) => Ok(error_response(e)),
    }
}

pub async fn create_violation_type(
    service: &ViolationService,
    req: CreateViolationTypeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let req = match normalize_create(req) {
        Ok(req) => req,
        Err(msg) => return Ok(bad_request(ErrorCode::ValidationFailed, msg)),
    };

    let storage = service.get_storage(request);

    match storage.create_violation_type(req).await {
        Ok(violation_type) => {
            record_audit(
                &storage,
                request,
                AuditAction::Create,
                "violation_type",
                violation_type.id,
                Some(serde_json::json!({ "name": violation_type.name })),
            )
            .await;
            Ok(HttpResponse::Created().json(ApiResponse::success(
                violation_type,
                "Jenis pelanggaran berhasil ditambahkan",
            )))
        }
        Err(e) => Ok(error_response_with(ErrorCode::ValidationFailed, e)),
    }
}

pub async fn update_violation_type(
    service: &ViolationService,
    type_id: i64,
    update: UpdateViolationTypeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let update = match normalize_update(update) {
        Ok(update) => update,
        Err(msg) => return Ok(bad_request(ErrorCode::ValidationFailed, msg)),
    };

    let storage = service.get_storage(request);

    match storage.update_violation_type(type_id, update).await {
        Ok(Some(violation_type)) => {
            record_audit(
                &storage,
                request,
                AuditAction::Update,
                "violation_type",
                violation_type.id,
                None,
            )
            .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                violation_type,
                "Jenis pelanggaran berhasil diperbarui",
            )))
        }
        Ok(None) => Ok(not_found(
            ErrorCode::ViolationTypeNotFound,
            "Jenis pelanggaran tidak ditemukan",
        )),
        Err(e) => Ok(error_response_with(ErrorCode::ValidationFailed, e)),
    }
}

pub async fn delete_violation_type(
    service: &ViolationService,
    type_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_violation_type(type_id).await {
        Ok(true) => {
            record_audit(
                &storage,
                request,
                AuditAction::Delete,
                "violation_type",
                type_id,
                None,
            )
            .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Jenis pelanggaran berhasil dihapus",
            )))
        }
        Ok(false) => Ok(not_found(
            ErrorCode::ViolationTypeNotFound,
            "Jenis pelanggaran tidak ditemukan",
        )),
        Err(e) => Ok(error_response(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_type_validation() {
        let ok = CreateViolationTypeRequest {
            name: " Bolos ".to_string(),
            points: 20,
            description: None,
        };
        assert_eq!(normalize_create(ok).unwrap().name, "Bolos");

        let blank = CreateViolationTypeRequest {
            name: " ".to_string(),
            points: 5,
            description: None,
        };
        assert!(normalize_create(blank).is_err());

        let update = UpdateViolationTypeRequest {
            points: Some(-3),
            ..Default::default()
        };
        assert!(normalize_update(update).is_err());
    }
}

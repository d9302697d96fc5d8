//! 违规类别（PASAL）维护

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ViolationService, normalize_code};
use crate::errors::SidisiplinError;
use crate::models::{
    ApiResponse, ErrorCode,
    system::entities::AuditAction,
    violations::{
        requests::{
            CatalogListParams, CreateViolationCategoryRequest, UpdateViolationCategoryRequest,
        },
        responses::ViolationCategoryListResponse,
    },
};
use crate::services::{
    bad_request, error_response, error_response_with, not_found, record_audit, trim_optional,
};
use crate::utils::validate::require_text;

pub(super) fn normalize_create(
    mut req: CreateViolationCategoryRequest,
) -> Result<CreateViolationCategoryRequest, String> {
    req.code = normalize_code(&req.code);
    req.name = req.name.trim().to_string();
    req.description = trim_optional(req.description);

    require_text(&req.code, "Kode kategori")?;
    require_text(&req.name, "Nama kategori")?;
    Ok(req)
}

pub(super) fn normalize_update(
    mut update: UpdateViolationCategoryRequest,
) -> Result<UpdateViolationCategoryRequest, String> {
    if let Some(code) = update.code.take() {
        let code = normalize_code(&code);
        require_text(&code, "Kode kategori")?;
        update.code = Some(code);
    }
    if let Some(name) = update.name.take() {
        let name = name.trim().to_string();
        require_text(&name, "Nama kategori")?;
        update.name = Some(name);
    }
    update.description = update.description.map(|v| v.trim().to_string());
    Ok(update)
}

pub async fn list_categories(
    service: &ViolationService,
    params: CatalogListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage
        .list_violation_categories(params.is_active, trim_optional(params.search))
        .await
    {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ViolationCategoryListResponse { items },
            "Daftar kategori pelanggaran berhasil diambil",
        ))),
        Err(e) => Ok(error_response(e)),
    }
}

pub async fn create_category(
    service: &ViolationService,
    req: CreateViolationCategoryRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let req = match normalize_create(req) {
        Ok(req) => req,
        Err(msg) => return Ok(bad_request(ErrorCode::ValidationFailed, msg)),
    };

    let storage = service.get_storage(request);

    match storage.create_violation_category(req).await {
        Ok(category) => {
            info!("Violation category {} created", category.code);
            record_audit(
                &storage,
                request,
                AuditAction::Create,
                "violation_category",
                category.id,
                Some(serde_json::json!({ "code": category.code, "level": category.level })),
            )
            .await;
            Ok(HttpResponse::Created().json(ApiResponse::success(
                category,
                "Kategori pelanggaran berhasil ditambahkan",
            )))
        }
        Err(e) => Ok(error_response_with(ErrorCode::ValidationFailed, e)),
    }
}

pub async fn update_category(
    service: &ViolationService,
    category_id: i64,
    update: UpdateViolationCategoryRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let update = match normalize_update(update) {
        Ok(update) => update,
        Err(msg) => return Ok(bad_request(ErrorCode::ValidationFailed, msg)),
    };

    let storage = service.get_storage(request);

    match storage.update_violation_category(category_id, update).await {
        Ok(Some(category)) => {
            record_audit(
                &storage,
                request,
                AuditAction::Update,
                "violation_category",
                category.id,
                Some(serde_json::json!({
                    "code": category.code,
                    "is_active": category.is_active,
                })),
            )
            .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                category,
                "Kategori pelanggaran berhasil diperbarui",
            )))
        }
        Ok(None) => Ok(not_found(
            ErrorCode::ViolationCategoryNotFound,
            "Kategori pelanggaran tidak ditemukan",
        )),
        Err(e) => Ok(error_response_with(ErrorCode::ValidationFailed, e)),
    }
}

pub async fn delete_category(
    service: &ViolationService,
    category_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_violation_category(category_id).await {
        Ok(()) => {
            info!("Violation category {} deleted", category_id);
            record_audit(
                &storage,
                request,
                AuditAction::Delete,
                "violation_category",
                category_id,
                None,
            )
            .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Kategori pelanggaran berhasil dihapus",
            )))
        }
        Err(e) => {
            let code = if matches!(e, SidisiplinError::NotFound(_)) {
                ErrorCode::ViolationCategoryNotFound
            } else {
                ErrorCode::ViolationCategoryInUse
            };
            Ok(error_response_with(code, e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::violations::entities::ViolationLevel;

    #[test]
    fn test_normalize_create_category() {
        let req = CreateViolationCategoryRequest {
            code: " pasal_2 ".to_string(),
            name: " Kerapian ".to_string(),
            level: ViolationLevel::Sedang,
            description: Some(" ".to_string()),
        };
        let req = normalize_create(req).unwrap();
        assert_eq!(req.code, "PASAL_2");
        assert_eq!(req.name, "Kerapian");
        assert_eq!(req.description, None);
    }

    #[test]
    fn test_normalize_update_rejects_blank_name() {
        let update = UpdateViolationCategoryRequest {
            name: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(normalize_update(update).is_err());
    }
}

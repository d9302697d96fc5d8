use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ViolationService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{error_response, not_found};

pub async fn get_violation(
    service: &ViolationService,
    violation_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_violation_by_id(violation_id).await {
        Ok(Some(violation)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            violation,
            "Data pelanggaran berhasil diambil",
        ))),
        Ok(None) => Ok(not_found(
            ErrorCode::ViolationNotFound,
            "Pelanggaran tidak ditemukan",
        )),
        Err(e) => Ok(error_response(e)),
    }
}

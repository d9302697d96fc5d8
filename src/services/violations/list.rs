use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ViolationService;
use crate::models::{
    ApiResponse,
    violations::requests::{ViolationListParams, ViolationListQuery},
};
use crate::services::{error_response, trim_optional};

pub async fn list_violations(
    service: &ViolationService,
    params: ViolationListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let (page, size) = params.pagination.normalized();

    let query = ViolationListQuery {
        page,
        size,
        category_id: params.category_id,
        is_active: params.is_active,
        search: trim_optional(params.search),
    };

    match storage.list_violations_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Daftar pelanggaran berhasil diambil",
        ))),
        Err(e) => Ok(error_response(e)),
    }
}

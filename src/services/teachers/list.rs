use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TeacherService;
use crate::models::{ApiResponse, users::requests::UserListParams};
use crate::services::error_response;

pub async fn list_teachers(
    service: &TeacherService,
    query: UserListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_users_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Daftar guru berhasil diambil",
        ))),
        Err(e) => Ok(error_response(e)),
    }
}

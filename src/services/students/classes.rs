use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::models::{ApiResponse, students::responses::ClassListResponse};
use crate::services::error_response;

pub async fn list_classes(
    service: &StudentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_student_classes().await {
        Ok(classes) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ClassListResponse { classes },
            "Daftar kelas berhasil diambil",
        ))),
        Err(e) => Ok(error_response(e)),
    }
}

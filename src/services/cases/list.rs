use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CaseService;
use crate::config::AppConfig;
use crate::models::{
    ApiResponse, ErrorCode,
    cases::requests::{CaseListParams, CaseListQuery},
};
use crate::services::{bad_request, error_response, trim_optional};
use crate::utils::period::day_start;

pub async fn list_cases(
    service: &CaseService,
    params: CaseListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let (Some(start), Some(end)) = (params.start_date, params.end_date)
        && start > end
    {
        return Ok(bad_request(
            ErrorCode::ValidationFailed,
            "Tanggal awal harus sebelum tanggal akhir",
        ));
    }

    let storage = service.get_storage(request);
    let offset = AppConfig::get().school_offset();
    let (page, size) = params.pagination.normalized();

    let query = CaseListQuery {
        page,
        size,
        status: params.status,
        student_id: params.student_id,
        violation_id: params.violation_id,
        class_name: trim_optional(params.class_name),
        search: trim_optional(params.search),
        from: params.start_date.map(|d| day_start(d, offset)),
        until: params
            .end_date
            .and_then(|d| d.succ_opt())
            .map(|d| day_start(d, offset)),
    };

    match storage.list_cases_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Daftar kasus berhasil diambil",
        ))),
        Err(e) => Ok(error_response(e)),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::CaseService;
use crate::errors::Result;
use crate::models::{ApiResponse, ErrorCode, cases::responses::CaseFullResponse};
use crate::services::{error_response, not_found};
use crate::storage::Storage;

/// 案件详情加上未删除的处理记录与全部处分
pub(super) async fn load_full_case(
    storage: &Arc<dyn Storage>,
    case_id: i64,
) -> Result<Option<CaseFullResponse>> {
    let Some(detail) = storage.get_case_by_id(case_id).await? else {
        return Ok(None);
    };
    let actions = storage.list_case_actions(case_id, false).await?;
    let sanctions = storage.list_case_sanctions(case_id).await?;

    Ok(Some(CaseFullResponse {
        detail,
        actions,
        sanctions,
    }))
}

pub async fn get_case(
    service: &CaseService,
    case_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match load_full_case(&storage, case_id).await {
        Ok(Some(case)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            case,
            "Detail kasus berhasil diambil",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::CaseNotFound, "Kasus tidak ditemukan")),
        Err(e) => Ok(error_response(e)),
    }
}

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SystemService;
use crate::models::{ApiResponse, system::requests::AuditLogListParams};
use crate::services::{error_response, trim_optional};

pub async fn list_audit_logs(
    service: &SystemService,
    request: &HttpRequest,
    query: AuditLogListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let (page, size) = query.pagination.normalized();

    // 动作统一为大写，如 CREATE / DEACTIVATE
    let action = trim_optional(query.action).map(|a| a.to_uppercase());

    match storage
        .list_audit_logs_with_pagination(
            page,
            size,
            trim_optional(query.entity),
            trim_optional(query.entity_id),
            action,
        )
        .await
    {
        Ok(logs) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            logs,
            "Log audit berhasil diambil",
        ))),
        Err(e) => Ok(error_response(e)),
    }
}

//! 案件处理记录
//!
//! 新增记录会重算案件状态；已完成的案件不能再追加记录。
//! 软删除后的记录读取、修改、再删除都返回 410。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CaseService;
use crate::errors::SidisiplinError;
use crate::models::{
    ApiResponse, ErrorCode,
    cases::{
        entities::CASE_COMPLETED_MESSAGE,
        requests::{CaseActionListParams, CreateCaseActionRequest, UpdateCaseActionRequest},
        responses::{CaseActionCreatedResponse, CaseActionListResponse},
    },
    system::entities::AuditAction,
};
use crate::services::{
    error_response, error_response_with, not_found, record_audit, require_user_id, trim_optional,
};

/// 存储层错误对应的业务码
fn action_error(err: SidisiplinError) -> HttpResponse {
    let code = match &err {
        SidisiplinError::NotFound(msg) if msg.starts_with("Kasus") => ErrorCode::CaseNotFound,
        SidisiplinError::NotFound(_) => ErrorCode::CaseActionNotFound,
        SidisiplinError::Gone(_) => ErrorCode::CaseActionDeleted,
        SidisiplinError::Validation(msg) if msg == CASE_COMPLETED_MESSAGE => {
            ErrorCode::CaseAlreadyCompleted
        }
        other => ErrorCode::for_error(other),
    };
    error_response_with(code, err)
}

fn action_gone() -> HttpResponse {
    HttpResponse::Gone().json(ApiResponse::error_empty(
        ErrorCode::CaseActionDeleted,
        "Tindakan sudah dihapus",
    ))
}

pub async fn list_actions(
    service: &CaseService,
    case_id: i64,
    params: CaseActionListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_case_by_id(case_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::CaseNotFound, "Kasus tidak ditemukan")),
        Err(e) => return Ok(error_response(e)),
    }

    match storage
        .list_case_actions(case_id, params.include_deleted.unwrap_or(false))
        .await
    {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            CaseActionListResponse { items },
            "Daftar tindakan berhasil diambil",
        ))),
        Err(e) => Ok(error_response(e)),
    }
}

pub async fn create_action(
    service: &CaseService,
    case_id: i64,
    mut req: CreateCaseActionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let actor_id = match require_user_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    req.description = trim_optional(req.description);

    let storage = service.get_storage(request);

    match storage.create_case_action(case_id, req, actor_id).await {
        Ok((action, case_status)) => {
            info!(
                "Action {} added to case {} (status now {})",
                action.id, case_id, case_status
            );
            record_audit(
                &storage,
                request,
                AuditAction::Create,
                "case_action",
                action.id,
                Some(serde_json::json!({
                    "case_id": case_id,
                    "is_completed": action.is_completed,
                    "case_status": case_status.as_str(),
                })),
            )
            .await;
            Ok(HttpResponse::Created().json(ApiResponse::success(
                CaseActionCreatedResponse {
                    action,
                    case_status,
                },
                "Tindakan berhasil ditambahkan",
            )))
        }
        Err(e) => Ok(action_error(e)),
    }
}

pub async fn get_action(
    service: &CaseService,
    case_id: i64,
    action_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_case_action(case_id, action_id).await {
        Ok(Some(action)) if action.is_deleted() => Ok(action_gone()),
        Ok(Some(action)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            action,
            "Detail tindakan berhasil diambil",
        ))),
        Ok(None) => Ok(not_found(
            ErrorCode::CaseActionNotFound,
            "Tindakan tidak ditemukan",
        )),
        Err(e) => Ok(error_response(e)),
    }
}

pub async fn update_action(
    service: &CaseService,
    case_id: i64,
    action_id: i64,
    mut update: UpdateCaseActionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let actor_id = match require_user_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    update.description = update.description.map(|v| v.trim().to_string());

    let storage = service.get_storage(request);

    match storage
        .update_case_action(case_id, action_id, update, actor_id)
        .await
    {
        Ok(action) => {
            record_audit(
                &storage,
                request,
                AuditAction::Update,
                "case_action",
                action.id,
                Some(serde_json::json!({
                    "case_id": case_id,
                    "is_completed": action.is_completed,
                })),
            )
            .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                action,
                "Tindakan berhasil diperbarui",
            )))
        }
        Err(e) => Ok(action_error(e)),
    }
}

// 软删除，不改变案件状态
pub async fn delete_action(
    service: &CaseService,
    case_id: i64,
    action_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let actor_id = match require_user_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    let storage = service.get_storage(request);

    match storage
        .soft_delete_case_action(case_id, action_id, actor_id)
        .await
    {
        Ok(action) => {
            info!("Action {} of case {} soft-deleted", action.id, case_id);
            record_audit(
                &storage,
                request,
                AuditAction::Delete,
                "case_action",
                action.id,
                Some(serde_json::json!({ "case_id": case_id })),
            )
            .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                action,
                "Tindakan berhasil dihapus",
            )))
        }
        Err(e) => Ok(action_error(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_action_error_status() {
        let resp = action_error(SidisiplinError::gone("Tindakan sudah dihapus"));
        assert_eq!(resp.status(), StatusCode::GONE);

        let resp = action_error(SidisiplinError::validation(CASE_COMPLETED_MESSAGE));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = action_error(SidisiplinError::not_found("Tindakan tidak ditemukan"));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}

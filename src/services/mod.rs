pub mod auth;
pub mod cases;
pub mod reports;
pub mod sanction_types;
pub mod students;
pub mod system;
pub mod teachers;
pub mod violations;

pub use auth::AuthService;
pub use cases::CaseService;
pub use reports::ReportService;
pub use sanction_types::SanctionTypeService;
pub use students::StudentService;
pub use system::SystemService;
pub use teachers::TeacherService;
pub use violations::ViolationService;

use actix_web::{HttpRequest, HttpResponse};
use std::sync::Arc;
use tracing::{error, warn};

use crate::cache::ObjectCache;
use crate::errors::SidisiplinError;
use crate::middlewares::RequireJWT;
use crate::models::system::{entities::AuditAction, requests::NewAuditLog};
use crate::models::{ApiResponse, ErrorCode, RemovalOutcome};
use crate::storage::Storage;

/// 从 app data 取得存储实例
pub(crate) fn storage_from_request(request: &HttpRequest) -> Arc<dyn Storage> {
    request
        .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
        .expect("Storage not found in app data")
        .get_ref()
        .clone()
}

/// 对象缓存未注入时返回 None
pub(crate) fn cache_from_request(request: &HttpRequest) -> Option<Arc<dyn ObjectCache>> {
    request
        .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone())
}

/// 错误转换为响应：客户端错误带原始信息，服务端错误记录日志后只返回通用提示
pub(crate) fn error_response(err: SidisiplinError) -> HttpResponse {
    let code = ErrorCode::for_error(&err);
    error_response_with(code, err)
}

/// 同上，但 4xx 时使用指定的业务码
pub(crate) fn error_response_with(code: ErrorCode, err: SidisiplinError) -> HttpResponse {
    let status = err.status_code();
    if status.is_server_error() {
        error!("{}", err);
        return HttpResponse::build(status).json(ApiResponse::error_empty(
            ErrorCode::InternalServerError,
            "Terjadi kesalahan pada server",
        ));
    }
    HttpResponse::build(status).json(ApiResponse::error_empty(code, err.message()))
}

pub(crate) fn not_found(code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

/// 当前登录用户 ID；缺失时返回 401 响应
pub(crate) fn require_user_id(request: &HttpRequest) -> Result<i64, HttpResponse> {
    RequireJWT::extract_user_id(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Silakan login terlebih dahulu",
        ))
    })
}

pub(crate) fn client_ip(request: &HttpRequest) -> Option<String> {
    request
        .connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string())
}

/// 写入审计日志，失败只记录警告
pub(crate) async fn record_audit(
    storage: &Arc<dyn Storage>,
    request: &HttpRequest,
    action: AuditAction,
    entity: &str,
    entity_id: impl ToString,
    details: Option<serde_json::Value>,
) {
    let log = NewAuditLog {
        user_id: RequireJWT::extract_user_id(request),
        action: action.as_str().to_string(),
        entity: entity.to_string(),
        entity_id: Some(entity_id.to_string()),
        details,
        ip_address: client_ip(request),
    };

    if let Err(e) = storage.create_audit_log(log).await {
        warn!("写入审计日志失败 ({} {}): {}", action.as_str(), entity, e);
    }
}

/// 删除结果对应的审计动作
pub(crate) fn removal_audit_action(outcome: &RemovalOutcome) -> AuditAction {
    match outcome {
        RemovalOutcome::Deleted => AuditAction::Delete,
        RemovalOutcome::Deactivated { .. } => AuditAction::Deactivate,
    }
}

/// 可选文本字段：去空白，空串视为未提供
pub(crate) fn trim_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_error_response_status() {
        let resp = error_response(SidisiplinError::validation("NIS sudah digunakan"));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = error_response_with(
            ErrorCode::CaseActionDeleted,
            SidisiplinError::gone("Tindakan sudah dihapus"),
        );
        assert_eq!(resp.status(), StatusCode::GONE);

        let resp = error_response(SidisiplinError::serialization("boom"));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_removal_audit_action() {
        assert_eq!(
            removal_audit_action(&RemovalOutcome::Deleted),
            AuditAction::Delete
        );
        assert_eq!(
            removal_audit_action(&RemovalOutcome::Deactivated { dependents: 2 }),
            AuditAction::Deactivate
        );
    }

    #[test]
    fn test_trim_optional() {
        assert_eq!(trim_optional(Some("  ".to_string())), None);
        assert_eq!(
            trim_optional(Some(" Jl. Merdeka ".to_string())),
            Some("Jl. Merdeka".to_string())
        );
    }
}

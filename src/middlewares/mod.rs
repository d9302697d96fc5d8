pub mod rate_limit;
pub mod require_jwt;
pub mod require_role;

pub use rate_limit::RateLimit;
pub use require_jwt::RequireJWT;
pub use require_role::RequireRole;

use actix_web::{HttpResponse, http::StatusCode, http::header::CONTENT_TYPE};

use crate::errors::{Result, SidisiplinError};
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};

/// 中间件统一的错误响应
pub(crate) fn create_error_response(
    status: StatusCode,
    code: ErrorCode,
    message: &str,
) -> HttpResponse {
    match status {
        StatusCode::NO_CONTENT => HttpResponse::build(status).finish(),
        _ => HttpResponse::build(status)
            .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
            .json(ApiResponse::<()>::error_empty(code, message)),
    }
}

/// 把错误转换为响应，5xx 不向客户端暴露细节
pub(crate) fn error_to_response(err: &SidisiplinError) -> HttpResponse {
    let status = err.status_code();
    let message = if status.is_server_error() {
        "Terjadi kesalahan pada server"
    } else {
        err.message()
    };
    create_error_response(status, ErrorCode::for_error(err), message)
}

/// 角色检查，所有需要权限判断的地方都经过这里
pub fn authorize(user: Option<&User>, required_roles: &[UserRole]) -> Result<()> {
    let user =
        user.ok_or_else(|| SidisiplinError::authentication("Silakan login terlebih dahulu"))?;

    if !user.is_active() {
        return Err(SidisiplinError::authentication("Akun tidak aktif"));
    }

    if required_roles.contains(&user.role) {
        Ok(())
    } else {
        Err(SidisiplinError::authorization(
            "Anda tidak memiliki akses ke fitur ini",
        ))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::users::entities::UserStatus;

    pub(crate) fn user_with(role: UserRole, status: UserStatus) -> User {
        let now = chrono::Utc::now();
        User {
            id: 7,
            username: "guru.budi".to_string(),
            email: "budi@sekolah.sch.id".to_string(),
            password_hash: String::new(),
            role,
            status,
            display_name: Some("Budi".to_string()),
            nip: None,
            phone: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_authorize_roles() {
        let guru = user_with(UserRole::Guru, UserStatus::Active);
        let admin = user_with(UserRole::Admin, UserStatus::Active);

        assert!(authorize(Some(&guru), &[UserRole::Guru, UserRole::Admin]).is_ok());
        assert!(authorize(Some(&admin), &[UserRole::Admin]).is_ok());
        assert!(matches!(
            authorize(Some(&guru), &[UserRole::Admin]),
            Err(SidisiplinError::Authorization(_))
        ));
    }

    #[test]
    fn test_authorize_requires_active_user() {
        let suspended = user_with(UserRole::Admin, UserStatus::Suspended);
        assert!(matches!(
            authorize(Some(&suspended), &[UserRole::Admin]),
            Err(SidisiplinError::Authentication(_))
        ));
        assert!(matches!(
            authorize(None, &[UserRole::Admin]),
            Err(SidisiplinError::Authentication(_))
        ));
    }

    #[test]
    fn test_error_response_hides_internal_message() {
        let resp = error_to_response(&SidisiplinError::database_operation("koneksi putus"));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let resp = error_to_response(&SidisiplinError::gone("Tindakan sudah dihapus"));
        assert_eq!(resp.status(), StatusCode::GONE);
    }
}

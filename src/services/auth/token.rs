use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::middlewares::require_jwt::RequireJWT;
use crate::models::auth::responses::{RefreshTokenResponse, UserInfoResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::error_response;
use crate::utils::jwt;

use super::AuthService;

fn expired_session() -> HttpResponse {
    // 清除无效的 refresh token cookie
    let empty_cookie = jwt::JwtUtils::create_empty_refresh_token_cookie();

    HttpResponse::Unauthorized()
        .cookie(empty_cookie)
        .json(ApiResponse::error_empty(
            ErrorCode::RefreshTokenInvalid,
            "Sesi telah berakhir, silakan login kembali",
        ))
}

pub async fn handle_refresh_token(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = service.get_config();

    let Some(refresh_token) = jwt::JwtUtils::extract_refresh_token_from_cookie(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::RefreshTokenMissing,
            "Refresh token tidak ditemukan, silakan login",
        )));
    };

    let (claims, access_token) = match jwt::JwtUtils::refresh_access_token(&refresh_token) {
        Ok(result) => result,
        Err(e) => {
            info!("Refresh token rejected: {}", e);
            return Ok(expired_session());
        }
    };

    // 账号被停用后 refresh token 随之失效
    let storage = service.get_storage(request);
    match claims.user_id() {
        Some(user_id) => match storage.get_user_by_id(user_id).await {
            Ok(Some(user)) if user.is_active() => {}
            Ok(_) => return Ok(expired_session()),
            Err(e) => return Ok(error_response(e)),
        },
        None => return Ok(expired_session()),
    }

    let response = RefreshTokenResponse {
        access_token,
        expires_in: config.jwt.access_token_expiry * 60,
    };
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Token berhasil diperbarui",
    )))
}

pub async fn handle_get_user(request: &HttpRequest) -> ActixResult<HttpResponse> {
    match RequireJWT::extract_user(request) {
        Some(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UserInfoResponse { user },
            "Informasi pengguna berhasil diambil",
        ))),
        None => Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Silakan login terlebih dahulu",
        ))),
    }
}

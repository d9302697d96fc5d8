use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::cache::session_key;
use crate::middlewares::RequireJWT;
use crate::models::ApiResponse;
use crate::services::cache_from_request;
use crate::utils::jwt::JwtUtils;

/// 注销：清除会话缓存，并下发空的 refresh_token cookie
pub async fn handle_logout(request: &HttpRequest) -> ActixResult<HttpResponse> {
    if let (Some(cache), Some(token)) = (
        cache_from_request(request),
        RequireJWT::extract_token(request),
    ) {
        cache.remove(&session_key(&token)).await;
    }

    let empty_cookie = JwtUtils::create_empty_refresh_token_cookie();

    Ok(HttpResponse::Ok()
        .cookie(empty_cookie)
        .json(ApiResponse::<()>::success_empty("Logout berhasil")))
}

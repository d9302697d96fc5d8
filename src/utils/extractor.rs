//! 路径参数提取器
//!
//! 路径参数解析失败时直接返回统一的 JSON 错误响应，
//! 而不是 actix 默认的纯文本 404。

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError};
use futures_util::future::{Ready, ready};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::{ApiResponse, ErrorCode};

static SETTING_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_]*(\.[a-z0-9_]+)*$").expect("Invalid setting key regex"));

fn bad_path(message: String) -> actix_web::Error {
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(message, response).into()
}

/// 读取正整数 ID
fn parse_positive_id(req: &HttpRequest, name: &str) -> Result<i64, actix_web::Error> {
    let raw = req
        .match_info()
        .get(name)
        .ok_or_else(|| bad_path(format!("Parameter '{name}' tidak ditemukan")))?;

    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(bad_path(format!("ID tidak valid: '{raw}'"))),
    }
}

macro_rules! define_safe_id {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                ready(parse_positive_id(req, $param).map($name))
            }
        }
    };
}

define_safe_id!(SafeIDI64, "id");
define_safe_id!(SafeActionIdI64, "action_id");

/// 配置键，如 `school.name`
#[derive(Debug, Clone)]
pub struct SafeSettingKey(pub String);

impl FromRequest for SafeSettingKey {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let key = req.match_info().get("key").unwrap_or_default();
        if key.len() > 64 || !SETTING_KEY_RE.is_match(key) {
            return ready(Err(bad_path(format!("Kunci pengaturan tidak valid: '{key}'"))));
        }
        ready(Ok(SafeSettingKey(key.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_positive_id() {
        let req = TestRequest::default().param("id", "42").to_http_request();
        let id = SafeIDI64::extract(&req).await.unwrap();
        assert_eq!(id.0, 42);
    }

    #[actix_web::test]
    async fn test_invalid_id_is_bad_request() {
        for raw in ["0", "-3", "abc"] {
            let req = TestRequest::default().param("id", raw).to_http_request();
            let err = SafeIDI64::extract(&req).await.unwrap_err();
            assert_eq!(err.error_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[actix_web::test]
    async fn test_action_id_param() {
        let req = TestRequest::default()
            .param("id", "1")
            .param("action_id", "9")
            .to_http_request();
        assert_eq!(SafeActionIdI64::extract(&req).await.unwrap().0, 9);
    }

    #[actix_web::test]
    async fn test_setting_key() {
        let req = TestRequest::default()
            .param("key", "school.headmaster_name")
            .to_http_request();
        assert_eq!(
            SafeSettingKey::extract(&req).await.unwrap().0,
            "school.headmaster_name"
        );

        let req = TestRequest::default()
            .param("key", "School Name")
            .to_http_request();
        assert!(SafeSettingKey::extract(&req).await.is_err());
    }
}

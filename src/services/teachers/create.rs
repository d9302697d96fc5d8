use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::TeacherService;
use crate::models::{
    ApiResponse, ErrorCode,
    system::entities::AuditAction,
    users::{requests::CreateUserRequest, responses::UserResponse},
};
use crate::services::{bad_request, error_response, record_audit, trim_optional};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password, validate_phone, validate_username};

/// 校验并整理新账号字段，返回对应业务码与提示
pub(super) fn normalize_create(
    mut user_data: CreateUserRequest,
) -> Result<CreateUserRequest, (ErrorCode, String)> {
    user_data.username = user_data.username.trim().to_string();
    user_data.email = user_data.email.trim().to_lowercase();
    user_data.display_name = trim_optional(user_data.display_name);
    user_data.nip = trim_optional(user_data.nip);
    user_data.phone = trim_optional(user_data.phone);

    validate_username(&user_data.username)
        .map_err(|msg| (ErrorCode::UserNameInvalid, msg.to_string()))?;
    validate_email(&user_data.email)
        .map_err(|msg| (ErrorCode::UserEmailInvalid, msg.to_string()))?;
    validate_password(&user_data.password).map_err(|msg| (ErrorCode::UserPasswordInvalid, msg))?;
    if let Some(phone) = &user_data.phone {
        validate_phone(phone).map_err(|msg| (ErrorCode::ValidationFailed, msg.to_string()))?;
    }

    Ok(user_data)
}

pub async fn create_teacher(
    service: &TeacherService,
    user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let mut user_data = match normalize_create(user_data) {
        Ok(data) => data,
        Err((code, msg)) => return Ok(bad_request(code, msg)),
    };

    user_data.password = match hash_password(&user_data.password) {
        Ok(hash) => hash,
        Err(e) => return Ok(error_response(e)),
    };

    let storage = service.get_storage(request);

    match storage.create_user(user_data).await {
        Ok(user) => {
            info!("Teacher account {} created (ID: {})", user.username, user.id);
            record_audit(
                &storage,
                request,
                AuditAction::Create,
                "user",
                user.id,
                Some(serde_json::json!({ "username": user.username, "role": user.role })),
            )
            .await;
            Ok(HttpResponse::Created().json(ApiResponse::success(
                UserResponse { user },
                "Guru berhasil ditambahkan",
            )))
        }
        Err(e) => Ok(crate::services::error_response_with(
            ErrorCode::UserAlreadyExists,
            e,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;

    fn request() -> CreateUserRequest {
        CreateUserRequest {
            username: " guru.sari ".to_string(),
            email: "Sari@Sekolah.sch.id".to_string(),
            password: "Rahasia2025".to_string(),
            role: UserRole::Guru,
            display_name: Some("  ".to_string()),
            nip: Some("198701012010012001".to_string()),
            phone: None,
        }
    }

    #[test]
    fn test_normalize_create_trims_fields() {
        let normalized = normalize_create(request()).unwrap();
        assert_eq!(normalized.username, "guru.sari");
        assert_eq!(normalized.email, "sari@sekolah.sch.id");
        assert_eq!(normalized.display_name, None);
    }

    #[test]
    fn test_normalize_create_rejects_weak_password() {
        let mut req = request();
        req.password = "pendek".to_string();
        let (code, _) = normalize_create(req).unwrap_err();
        assert_eq!(code, ErrorCode::UserPasswordInvalid);
    }

    #[test]
    fn test_normalize_create_rejects_bad_phone() {
        let mut req = request();
        req.phone = Some("08-12".to_string());
        let (code, _) = normalize_create(req).unwrap_err();
        assert_eq!(code, ErrorCode::ValidationFailed);
    }
}

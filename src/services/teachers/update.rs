use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::TeacherService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    system::entities::AuditAction,
    users::{
        entities::{UserRole, UserStatus},
        requests::UpdateUserRequest,
        responses::UserResponse,
    },
};
use crate::services::{
    bad_request, cache_from_request, error_response, error_response_with, not_found,
    record_audit,
};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password, validate_phone};

/// 校验更新字段；管理员不能降级或停用自己的账号
pub(super) fn normalize_update(
    mut update: UpdateUserRequest,
    is_self: bool,
) -> Result<UpdateUserRequest, (ErrorCode, String)> {
    if let Some(email) = update.email.take() {
        let email = email.trim().to_lowercase();
        validate_email(&email).map_err(|msg| (ErrorCode::UserEmailInvalid, msg.to_string()))?;
        update.email = Some(email);
    }
    if let Some(password) = &update.password {
        validate_password(password).map_err(|msg| (ErrorCode::UserPasswordInvalid, msg))?;
    }
    if let Some(phone) = update.phone.take() {
        // 空字符串表示清空
        let phone = phone.trim().to_string();
        if !phone.is_empty() {
            validate_phone(&phone).map_err(|msg| (ErrorCode::ValidationFailed, msg.to_string()))?;
        }
        update.phone = Some(phone);
    }
    update.display_name = update.display_name.map(|v| v.trim().to_string());
    update.nip = update.nip.map(|v| v.trim().to_string());

    if is_self
        && (matches!(update.role, Some(UserRole::Guru))
            || matches!(update.status, Some(s) if s != UserStatus::Active))
    {
        return Err((
            ErrorCode::ValidationFailed,
            "Tidak dapat menurunkan peran atau menonaktifkan akun sendiri".to_string(),
        ));
    }

    Ok(update)
}

pub async fn update_teacher(
    service: &TeacherService,
    user_id: i64,
    update_data: UpdateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let is_self = RequireJWT::extract_user_id(request) == Some(user_id);
    let mut update_data = match normalize_update(update_data, is_self) {
        Ok(data) => data,
        Err((code, msg)) => return Ok(bad_request(code, msg)),
    };

    if let Some(password) = update_data.password.take() {
        match hash_password(&password) {
            Ok(hash) => update_data.password = Some(hash),
            Err(e) => return Ok(error_response(e)),
        }
    }
    let password_changed = update_data.password.is_some();

    let storage = service.get_storage(request);

    match storage.update_user(user_id, update_data).await {
        Ok(Some(user)) => {
            // 角色或状态可能已变化，缓存的会话全部作废
            if let Some(cache) = cache_from_request(request) {
                cache.invalidate_all().await;
            }
            info!("Teacher account {} updated", user.id);
            record_audit(
                &storage,
                request,
                AuditAction::Update,
                "user",
                user.id,
                Some(serde_json::json!({
                    "role": user.role,
                    "status": user.status,
                    "password_changed": password_changed,
                })),
            )
            .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse { user },
                "Data guru berhasil diperbarui",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::UserNotFound, "Guru tidak ditemukan")),
        Err(e) => Ok(error_response_with(ErrorCode::UserAlreadyExists, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_update_blocks_self_demotion() {
        let update = UpdateUserRequest {
            role: Some(UserRole::Guru),
            ..Default::default()
        };
        assert!(normalize_update(update, true).is_err());

        let update = UpdateUserRequest {
            role: Some(UserRole::Guru),
            ..Default::default()
        };
        assert!(normalize_update(update, false).is_ok());

        let update = UpdateUserRequest {
            status: Some(UserStatus::Suspended),
            ..Default::default()
        };
        assert!(normalize_update(update, true).is_err());
    }

    #[test]
    fn test_normalize_update_allows_clearing_phone() {
        let update = UpdateUserRequest {
            phone: Some("  ".to_string()),
            email: Some(" Guru@Sekolah.sch.id ".to_string()),
            ..Default::default()
        };
        let normalized = normalize_update(update, false).unwrap();
        assert_eq!(normalized.phone.as_deref(), Some(""));
        assert_eq!(normalized.email.as_deref(), Some("guru@sekolah.sch.id"));
    }
}

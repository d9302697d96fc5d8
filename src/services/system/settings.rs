use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{DynamicConfig, SystemService};
use crate::models::{
    APP_START_TIME, ApiResponse, ErrorCode,
    system::{
        requests::UpdateSettingRequest,
        responses::{AdminSettingsListResponse, SettingResponse, SystemSettingsResponse},
    },
};
use crate::services::{client_ip, error_response, not_found, require_user_id};

/// 公开系统信息（只读）
pub async fn get_settings(
    service: &SystemService,
    _request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = service.get_config();

    let response = SystemSettingsResponse {
        system_name: config.app.system_name.clone(),
        school_name: DynamicConfig::school_name().await,
        academic_year: DynamicConfig::academic_year().await,
        environment: config.app.environment.clone(),
        utc_offset_minutes: config.school.utc_offset_minutes,
        started_at: APP_START_TIME.get().map(|t| t.start_datetime),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Pengaturan berhasil diambil",
    )))
}

pub async fn list_admin_settings(
    service: &SystemService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_settings().await {
        Ok(settings) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AdminSettingsListResponse { settings },
            "Daftar pengaturan berhasil diambil",
        ))),
        Err(e) => Ok(error_response(e)),
    }
}

/// 更新单个配置；审计日志由存储层在同一事务内写入
pub async fn update_setting(
    service: &SystemService,
    request: &HttpRequest,
    key: String,
    body: UpdateSettingRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user_id = match require_user_id(request) {
        Ok(id) => id,
        Err(resp) => return Ok(resp),
    };

    match storage
        .update_setting(&key, &body.value, user_id, client_ip(request))
        .await
    {
        Ok(Some(setting)) => {
            DynamicConfig::update(&setting.key, &setting.value).await;
            info!("Setting {} updated by user {}", setting.key, user_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                SettingResponse { setting },
                "Pengaturan berhasil diperbarui",
            )))
        }
        Ok(None) => Ok(not_found(
            ErrorCode::SettingNotFound,
            "Pengaturan tidak ditemukan",
        )),
        Err(e) => Ok(error_response(e)),
    }
}

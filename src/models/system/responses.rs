use serde::Serialize;
use ts_rs::TS;

use super::entities::{AuditLog, SystemSetting};
use crate::models::common::PaginationInfo;

/// 公开的系统信息
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct SystemSettingsResponse {
    pub system_name: String,    // 系统名称
    pub school_name: String,    // 学校名称
    pub academic_year: String,  // 学年
    pub environment: String,    // 运行环境
    pub utc_offset_minutes: i32, // 学校时区
    pub started_at: Option<chrono::DateTime<chrono::Utc>>, // 进程启动时间
}

/// 管理员配置列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct AdminSettingsListResponse {
    pub settings: Vec<SystemSetting>,
}

/// 单个配置响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct SettingResponse {
    pub setting: SystemSetting,
}

/// 审计日志列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct AuditLogListResponse {
    pub items: Vec<AuditLog>,
    pub pagination: PaginationInfo,
}

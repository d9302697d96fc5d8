use super::entities::ViolationLevel;
use crate::models::common::PaginationQuery;
use crate::models::common::query::{deserialize_optional_bool, deserialize_optional_i64};
use serde::Deserialize;
use ts_rs::TS;

// 目录类列表过滤
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/violation.ts")]
pub struct CatalogListParams {
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub is_active: Option<bool>,
    pub search: Option<String>,
}

// 创建违规类别
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/violation.ts")]
pub struct CreateViolationCategoryRequest {
    pub code: String,
    pub name: String,
    pub level: ViolationLevel,
    pub description: Option<String>,
}

// 更新违规类别
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/violation.ts")]
pub struct UpdateViolationCategoryRequest {
    pub code: Option<String>,
    pub name: Option<String>,
    pub level: Option<ViolationLevel>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

// 违规条目列表参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/violation.ts")]
pub struct ViolationListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub category_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub is_active: Option<bool>,
    pub search: Option<String>,
}

// 违规条目列表查询（存储层）
#[derive(Debug, Clone, Default)]
pub struct ViolationListQuery {
    pub page: u64,
    pub size: u64,
    pub category_id: Option<i64>,
    pub is_active: Option<bool>,
    pub search: Option<String>,
}

// 创建违规条目
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/violation.ts")]
pub struct CreateViolationRequest {
    pub category_id: i64,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub points: i32,
    #[serde(default)]
    pub sanction_type_ids: Vec<i64>,
}

// 更新违规条目；sanction_type_ids 存在时整体替换关联
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/violation.ts")]
pub struct UpdateViolationRequest {
    pub category_id: Option<i64>,
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub points: Option<i32>,
    pub is_active: Option<bool>,
    pub sanction_type_ids: Option<Vec<i64>>,
}

// 创建旧版违规类型
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/violation.ts")]
pub struct CreateViolationTypeRequest {
    pub name: String,
    pub points: i32,
    pub description: Option<String>,
}

// 更新旧版违规类型
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/violation.ts")]
pub struct UpdateViolationTypeRequest {
    pub name: Option<String>,
    pub points: Option<i32>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

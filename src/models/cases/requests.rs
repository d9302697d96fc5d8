use super::entities::CaseStatus;
use crate::models::common::PaginationQuery;
use crate::models::common::query::{deserialize_optional_bool, deserialize_optional_i64};
use serde::Deserialize;
use ts_rs::TS;

// 案件列表参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/case.ts")]
pub struct CaseListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<CaseStatus>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub student_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub violation_id: Option<i64>,
    pub class_name: Option<String>,
    /// 按案件编号或学生姓名搜索
    pub search: Option<String>,
    /// 事发日期下限（含）
    pub start_date: Option<chrono::NaiveDate>,
    /// 事发日期上限（含）
    pub end_date: Option<chrono::NaiveDate>,
}

// 案件列表查询（存储层），时间范围为 Unix 秒，左闭右开
#[derive(Debug, Clone, Default)]
pub struct CaseListQuery {
    pub page: u64,
    pub size: u64,
    pub status: Option<CaseStatus>,
    pub student_id: Option<i64>,
    pub violation_id: Option<i64>,
    pub class_name: Option<String>,
    pub search: Option<String>,
    pub from: Option<i64>,
    pub until: Option<i64>,
}

// 创建案件
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/case.ts")]
pub struct CreateCaseRequest {
    pub student_id: i64,
    pub violation_id: i64,
    pub incident_date: chrono::DateTime<chrono::Utc>,
    pub description: Option<String>,
    #[serde(default)]
    pub evidence_urls: Vec<String>,
}

// 更新案件
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/case.ts")]
pub struct UpdateCaseRequest {
    pub student_id: Option<i64>,
    pub violation_id: Option<i64>,
    pub incident_date: Option<chrono::DateTime<chrono::Utc>>,
    pub description: Option<String>,
    pub evidence_urls: Option<Vec<String>>,
    pub status: Option<CaseStatus>,
}

// 处理记录列表参数
#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/case.ts")]
pub struct CaseActionListParams {
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub include_deleted: Option<bool>,
}

// 新增处理记录
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/case.ts")]
pub struct CreateCaseActionRequest {
    pub sanction_type_id: i64,
    pub description: Option<String>,
    pub action_date: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub is_completed: bool,
    pub follow_up_date: Option<chrono::DateTime<chrono::Utc>>,
}

// 更新处理记录
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/case.ts")]
pub struct UpdateCaseActionRequest {
    pub sanction_type_id: Option<i64>,
    pub description: Option<String>,
    pub action_date: Option<chrono::DateTime<chrono::Utc>>,
    pub is_completed: Option<bool>,
    pub follow_up_date: Option<chrono::DateTime<chrono::Utc>>,
}

use super::entities::Gender;
use crate::models::common::PaginationQuery;
use crate::models::common::query::deserialize_optional_bool;
use serde::Deserialize;
use ts_rs::TS;

// 学生列表查询参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    pub class_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub is_active: Option<bool>,
}

// 学生列表查询（存储层）
#[derive(Debug, Clone, Default)]
pub struct StudentListQuery {
    pub page: u64,
    pub size: u64,
    pub search: Option<String>,
    pub class_name: Option<String>,
    pub is_active: Option<bool>,
}

// 创建学生请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct CreateStudentRequest {
    pub nis: String,
    pub nisn: Option<String>,
    pub name: String,
    pub gender: Gender,
    pub class_name: String,
    pub birth_date: Option<chrono::NaiveDate>,
    pub parent_name: Option<String>,
    pub parent_phone: Option<String>,
    pub address: Option<String>,
}

// 更新学生请求
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct UpdateStudentRequest {
    pub nis: Option<String>,
    pub nisn: Option<String>,
    pub name: Option<String>,
    pub gender: Option<Gender>,
    pub class_name: Option<String>,
    pub birth_date: Option<chrono::NaiveDate>,
    pub parent_name: Option<String>,
    pub parent_phone: Option<String>,
    pub address: Option<String>,
    pub is_active: Option<bool>,
}

// 导出参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentExportParams {
    pub format: Option<String>,
    pub class_name: Option<String>,
    pub search: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub is_active: Option<bool>,
}

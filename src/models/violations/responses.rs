use super::entities::{ViolationCategory, ViolationDetail, ViolationType};
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/violation.ts")]
pub struct ViolationCategoryListResponse {
    pub items: Vec<ViolationCategory>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/violation.ts")]
pub struct ViolationListResponse {
    pub items: Vec<ViolationDetail>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/violation.ts")]
pub struct ViolationTypeListResponse {
    pub items: Vec<ViolationType>,
}

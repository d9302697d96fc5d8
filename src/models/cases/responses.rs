use super::entities::{CaseAction, CaseDetail, CaseStatus};
use crate::models::common::PaginationInfo;
use crate::models::sanctions::entities::Sanction;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/case.ts")]
pub struct CaseListResponse {
    pub items: Vec<CaseDetail>,
    pub pagination: PaginationInfo,
}

// 案件完整信息：处理记录与正式处分
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/case.ts")]
pub struct CaseFullResponse {
    #[serde(flatten)]
    #[ts(flatten)]
    pub detail: CaseDetail,
    pub actions: Vec<CaseAction>,
    pub sanctions: Vec<Sanction>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/case.ts")]
pub struct CaseActionListResponse {
    pub items: Vec<CaseAction>,
}

// 新增处理记录后的结果，附带推导出的案件状态
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/case.ts")]
pub struct CaseActionCreatedResponse {
    pub action: CaseAction,
    pub case_status: CaseStatus,
}

use super::entities::{SavedReport, StatusCount, Statistics, ViolationStat};
use crate::models::cases::entities::CaseDetail;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

// 月度报表
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct MonthlyReport {
    pub year: i32,
    pub month: u32,
    pub statistics: Statistics,
    pub cases: Vec<CaseDetail>,
}

// 仪表盘
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct DashboardResponse {
    pub active_students: i64,
    pub total_cases: i64,
    pub cases_by_status: Vec<StatusCount>,
    pub cases_this_month: i64,
    pub top_violations: Vec<ViolationStat>,
    pub recent_cases: Vec<CaseDetail>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct ReportListResponse {
    pub items: Vec<SavedReport>,
    pub pagination: PaginationInfo,
}

use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

// 统计区间（含首尾两天）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct StatisticsParams {
    pub start: chrono::NaiveDate,
    pub end: chrono::NaiveDate,
}

// 月度报表参数
#[derive(Debug, Clone, Copy, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct MonthlyParams {
    pub year: i32,
    pub month: u32,
}

// 保存月度报表
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct CreateReportRequest {
    pub year: i32,
    pub month: u32,
    pub title: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct ReportListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub report_type: Option<String>,
}

// 新报表（存储层）
#[derive(Debug, Clone)]
pub struct NewReport {
    pub title: String,
    pub report_type: String,
    pub period_start: i64,
    pub period_end: i64,
    pub data: serde_json::Value,
    pub generated_by: Option<i64>,
}

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::cases::entities::CaseStatus;
use crate::models::violations::entities::ViolationLevel;

/// 统计用的案件扁平行（案件 + 学生 + 违规条目 + 类别）
#[derive(Debug, Clone)]
pub struct CaseFact {
    pub case_id: i64,
    pub status: CaseStatus,
    pub incident_date: chrono::DateTime<chrono::Utc>,
    pub student_id: i64,
    pub student_nis: String,
    pub student_name: String,
    pub class_name: String,
    pub violation_id: i64,
    pub violation_code: String,
    pub violation_name: String,
    pub points: i32,
    pub category_id: i64,
    pub category_code: String,
    pub category_name: String,
    pub category_level: ViolationLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct StatusCount {
    pub status: CaseStatus,
    pub count: i64,
    pub percentage: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct PeriodCount {
    /// `YYYY-MM-DD` 或 ISO 周 `YYYY-Www`
    pub period: String,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct ViolationStat {
    pub violation_id: i64,
    pub code: String,
    pub name: String,
    pub count: i64,
    pub percentage: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct CategoryStat {
    pub category_id: i64,
    pub code: String,
    pub name: String,
    pub level: ViolationLevel,
    pub count: i64,
    pub percentage: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct ClassStat {
    pub class_name: String,
    pub count: i64,
    pub percentage: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct StudentStat {
    pub student_id: i64,
    pub nis: String,
    pub name: String,
    pub class_name: String,
    pub case_count: i64,
    pub total_points: i64,
}

// 统计结果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct Statistics {
    pub start: chrono::NaiveDate,
    pub end: chrono::NaiveDate,
    pub total_cases: i64,
    pub by_status: Vec<StatusCount>,
    pub by_day: Vec<PeriodCount>,
    pub by_week: Vec<PeriodCount>,
    pub by_violation: Vec<ViolationStat>,
    pub by_category: Vec<CategoryStat>,
    pub by_class: Vec<ClassStat>,
    pub top_students: Vec<StudentStat>,
}

// 已保存的报表
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct SavedReport {
    pub id: i64,
    pub title: String,
    pub report_type: String,
    pub period_start: chrono::DateTime<chrono::Utc>,
    pub period_end: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    pub generated_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl SavedReport {
    pub const MONTHLY: &'static str = "MONTHLY";
}

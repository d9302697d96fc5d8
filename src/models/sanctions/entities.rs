use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 正式处分记录
//
// is_completed 只表示处分是否执行完毕，不影响案件状态。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/sanction.ts")]
pub struct Sanction {
    pub id: i64,
    pub case_id: i64,
    pub sanction_type_id: i64,
    pub sanction_type_name: Option<String>,
    pub start_date: chrono::DateTime<chrono::Utc>,
    pub end_date: Option<chrono::DateTime<chrono::Utc>>,
    pub notes: Option<String>,
    pub is_completed: bool,
    pub created_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

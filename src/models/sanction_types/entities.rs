use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 处分类型（如 "Teguran lisan"、"Skorsing"）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/sanction_type.ts")]
pub struct SanctionType {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

use super::entities::SanctionType;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/sanction_type.ts")]
pub struct SanctionTypeListResponse {
    pub items: Vec<SanctionType>,
}

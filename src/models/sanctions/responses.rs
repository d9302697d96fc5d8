use super::entities::Sanction;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/sanction.ts")]
pub struct SanctionListResponse {
    pub items: Vec<Sanction>,
}

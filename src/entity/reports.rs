//! 已保存报表实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "reports")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub report_type: String,
    pub period_start: i64,
    pub period_end: i64,
    pub data: String,
    pub generated_by: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// `with_data` 为 false 时省略 JSON 数据（列表场景）
    pub fn into_report(self, with_data: bool) -> crate::models::reports::entities::SavedReport {
        use super::ts_to_datetime;
        use crate::models::reports::entities::SavedReport;

        SavedReport {
            id: self.id,
            title: self.title,
            report_type: self.report_type,
            period_start: ts_to_datetime(self.period_start),
            period_end: ts_to_datetime(self.period_end),
            data: if with_data {
                serde_json::from_str(&self.data).ok()
            } else {
                None
            },
            generated_by: self.generated_by,
            created_at: ts_to_datetime(self.created_at),
        }
    }
}

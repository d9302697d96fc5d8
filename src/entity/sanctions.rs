//! 正式处分实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sanctions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub case_id: i64,
    pub sanction_type_id: i64,
    pub start_date: i64,
    pub end_date: Option<i64>,
    pub notes: Option<String>,
    pub is_completed: bool,
    pub created_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::violation_cases::Entity",
        from = "Column::CaseId",
        to = "super::violation_cases::Column::Id"
    )]
    Case,
    #[sea_orm(
        belongs_to = "super::sanction_types::Entity",
        from = "Column::SanctionTypeId",
        to = "super::sanction_types::Column::Id"
    )]
    SanctionType,
}

impl Related<super::violation_cases::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Case.def()
    }
}

impl Related<super::sanction_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SanctionType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_sanction(
        self,
        sanction_type_name: Option<String>,
    ) -> crate::models::sanctions::entities::Sanction {
        use super::ts_to_datetime;
        use crate::models::sanctions::entities::Sanction;

        Sanction {
            id: self.id,
            case_id: self.case_id,
            sanction_type_id: self.sanction_type_id,
            sanction_type_name,
            start_date: ts_to_datetime(self.start_date),
            end_date: self.end_date.map(ts_to_datetime),
            notes: self.notes,
            is_completed: self.is_completed,
            created_by: self.created_by,
            created_at: ts_to_datetime(self.created_at),
            updated_at: ts_to_datetime(self.updated_at),
        }
    }
}

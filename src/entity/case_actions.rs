//! 案件处理记录实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "case_actions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub case_id: i64,
    pub sanction_type_id: i64,
    pub description: Option<String>,
    pub action_date: i64,
    pub is_completed: bool,
    pub follow_up_date: Option<i64>,
    pub created_by: Option<i64>,
    pub updated_by: Option<i64>,
    pub deleted_at: Option<i64>,
    pub deleted_by_id: Option<i64>,
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
    pub fn into_case_action(
        self,
        sanction_type_name: Option<String>,
    ) -> crate::models::cases::entities::CaseAction {
        use super::ts_to_datetime;
        use crate::models::cases::entities::CaseAction;

        CaseAction {
            id: self.id,
            case_id: self.case_id,
            sanction_type_id: self.sanction_type_id,
            sanction_type_name,
            description: self.description,
            action_date: ts_to_datetime(self.action_date),
            is_completed: self.is_completed,
            follow_up_date: self.follow_up_date.map(ts_to_datetime),
            created_by: self.created_by,
            updated_by: self.updated_by,
            deleted_at: self.deleted_at.map(ts_to_datetime),
            deleted_by_id: self.deleted_by_id,
            created_at: ts_to_datetime(self.created_at),
            updated_at: ts_to_datetime(self.updated_at),
        }
    }
}

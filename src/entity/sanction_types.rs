//! 处分类型实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sanction_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::case_actions::Entity")]
    CaseActions,
    #[sea_orm(has_many = "super::sanctions::Entity")]
    Sanctions,
    #[sea_orm(has_many = "super::violation_sanction_types::Entity")]
    ViolationSanctionTypes,
}

impl Related<super::case_actions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CaseActions.def()
    }
}

impl Related<super::sanctions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sanctions.def()
    }
}

impl Related<super::violation_sanction_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ViolationSanctionTypes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_sanction_type(self) -> crate::models::sanction_types::entities::SanctionType {
        use super::ts_to_datetime;
        use crate::models::sanction_types::entities::SanctionType;

        SanctionType {
            id: self.id,
            name: self.name,
            description: self.description,
            is_active: self.is_active,
            created_at: ts_to_datetime(self.created_at),
            updated_at: ts_to_datetime(self.updated_at),
        }
    }
}

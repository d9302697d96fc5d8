//! 违规条目实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "violations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub category_id: i64,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub points: i32,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::violation_categories::Entity",
        from = "Column::CategoryId",
        to = "super::violation_categories::Column::Id"
    )]
    Category,
    #[sea_orm(has_many = "super::violation_cases::Entity")]
    ViolationCases,
    #[sea_orm(has_many = "super::violation_sanction_types::Entity")]
    ViolationSanctionTypes,
}

impl Related<super::violation_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::violation_cases::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ViolationCases.def()
    }
}

impl Related<super::violation_sanction_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ViolationSanctionTypes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_violation(self) -> crate::models::violations::entities::Violation {
        use super::ts_to_datetime;
        use crate::models::violations::entities::Violation;

        Violation {
            id: self.id,
            category_id: self.category_id,
            code: self.code,
            name: self.name,
            description: self.description,
            points: self.points,
            is_active: self.is_active,
            created_at: ts_to_datetime(self.created_at),
            updated_at: ts_to_datetime(self.updated_at),
        }
    }
}

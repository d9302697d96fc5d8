//! 违规类别实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "violation_categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    pub level: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::violations::Entity")]
    Violations,
}

impl Related<super::violations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Violations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_category(self) -> crate::models::violations::entities::ViolationCategory {
        use super::ts_to_datetime;
        use crate::models::violations::entities::{ViolationCategory, ViolationLevel};

        ViolationCategory {
            id: self.id,
            code: self.code,
            name: self.name,
            level: self
                .level
                .parse::<ViolationLevel>()
                .unwrap_or(ViolationLevel::Ringan),
            description: self.description,
            is_active: self.is_active,
            created_at: ts_to_datetime(self.created_at),
            updated_at: ts_to_datetime(self.updated_at),
        }
    }
}

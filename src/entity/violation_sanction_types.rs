//! 违规条目与处分类型的关联表

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "violation_sanction_types")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub violation_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub sanction_type_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::violations::Entity",
        from = "Column::ViolationId",
        to = "super::violations::Column::Id"
    )]
    Violation,
    #[sea_orm(
        belongs_to = "super::sanction_types::Entity",
        from = "Column::SanctionTypeId",
        to = "super::sanction_types::Column::Id"
    )]
    SanctionType,
}

impl Related<super::violations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Violation.def()
    }
}

impl Related<super::sanction_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SanctionType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

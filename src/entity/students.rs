//! 学生实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub nis: String,
    pub nisn: Option<String>,
    pub name: String,
    pub gender: String,
    pub class_name: String,
    pub birth_date: Option<String>,
    pub parent_name: Option<String>,
    pub parent_phone: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::violation_cases::Entity")]
    ViolationCases,
}

impl Related<super::violation_cases::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ViolationCases.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_student(self) -> crate::models::students::entities::Student {
        use super::ts_to_datetime;
        use crate::models::students::entities::{Gender, Student};

        Student {
            id: self.id,
            nis: self.nis,
            nisn: self.nisn,
            name: self.name,
            gender: self.gender.parse::<Gender>().unwrap_or(Gender::L),
            class_name: self.class_name,
            birth_date: self
                .birth_date
                .and_then(|d| chrono::NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
            parent_name: self.parent_name,
            parent_phone: self.parent_phone,
            address: self.address,
            is_active: self.is_active,
            created_at: ts_to_datetime(self.created_at),
            updated_at: ts_to_datetime(self.updated_at),
        }
    }
}

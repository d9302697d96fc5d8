//! 违规案件实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "violation_cases")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub case_number: String,
    pub student_id: i64,
    pub violation_id: i64,
    pub reported_by: Option<i64>,
    pub incident_date: i64,
    pub description: Option<String>,
    /// JSON 字符串数组
    pub evidence_urls: Option<String>,
    pub status: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::violations::Entity",
        from = "Column::ViolationId",
        to = "super::violations::Column::Id"
    )]
    Violation,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ReportedBy",
        to = "super::users::Column::Id"
    )]
    Reporter,
    #[sea_orm(has_many = "super::case_actions::Entity")]
    CaseActions,
    #[sea_orm(has_many = "super::sanctions::Entity")]
    Sanctions,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::violations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Violation.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reporter.def()
    }
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

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_case(self) -> crate::models::cases::entities::ViolationCase {
        use super::ts_to_datetime;
        use crate::models::cases::entities::{CaseStatus, ViolationCase};

        ViolationCase {
            id: self.id,
            case_number: self.case_number,
            student_id: self.student_id,
            violation_id: self.violation_id,
            reported_by: self.reported_by,
            incident_date: ts_to_datetime(self.incident_date),
            description: self.description,
            evidence_urls: self
                .evidence_urls
                .and_then(|raw| serde_json::from_str(&raw).ok())
                .unwrap_or_default(),
            status: self
                .status
                .parse::<CaseStatus>()
                .unwrap_or(CaseStatus::Pending),
            created_at: ts_to_datetime(self.created_at),
            updated_at: ts_to_datetime(self.updated_at),
        }
    }
}

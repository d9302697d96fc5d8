//! 审计日志实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: Option<i64>,
    pub action: String,
    pub entity: String,
    pub entity_id: Option<String>,
    pub details: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_audit_log(self) -> crate::models::system::entities::AuditLog {
        use super::ts_to_datetime;
        use crate::models::system::entities::AuditLog;

        AuditLog {
            id: self.id,
            user_id: self.user_id,
            action: self.action,
            entity: self.entity,
            entity_id: self.entity_id,
            details: self
                .details
                .and_then(|raw| serde_json::from_str(&raw).ok()),
            ip_address: self.ip_address,
            created_at: ts_to_datetime(self.created_at),
        }
    }
}

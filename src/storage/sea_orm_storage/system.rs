use super::{SeaOrmStorage, db_error, now_ts};
use crate::entity::{audit_logs, configs};
use crate::errors::{Result, SidisiplinError};
use crate::models::{
    PaginationInfo,
    system::{
        entities::{AuditAction, AuditLog, SettingValueType, SystemSetting},
        requests::NewAuditLog,
        responses::AuditLogListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

async fn insert_audit_log<C: ConnectionTrait>(conn: &C, log: NewAuditLog) -> Result<AuditLog> {
    let details = match log.details {
        Some(ref value) => Some(serde_json::to_string(value)?),
        None => None,
    };

    let model = audit_logs::ActiveModel {
        user_id: Set(log.user_id),
        action: Set(log.action),
        entity: Set(log.entity),
        entity_id: Set(log.entity_id),
        details: Set(details),
        ip_address: Set(log.ip_address),
        created_at: Set(now_ts()),
        ..Default::default()
    };

    let created = model
        .insert(conn)
        .await
        .map_err(db_error("写入审计日志失败"))?;
    Ok(created.into_audit_log())
}

impl SeaOrmStorage {
    pub async fn list_settings_impl(&self) -> Result<Vec<SystemSetting>> {
        let settings = configs::Entity::find()
            .order_by_asc(configs::Column::Key)
            .all(&self.db)
            .await
            .map_err(db_error("查询系统配置失败"))?;

        Ok(settings.into_iter().map(|m| m.into_setting()).collect())
    }

    /// 更新配置值并写入审计日志
    pub async fn update_setting_impl(
        &self,
        key: &str,
        value: &str,
        updated_by: i64,
        ip_address: Option<String>,
    ) -> Result<Option<SystemSetting>> {
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        let Some(existing) = configs::Entity::find_by_id(key.to_string())
            .one(&txn)
            .await
            .map_err(db_error("查询系统配置失败"))?
        else {
            return Ok(None);
        };

        let value_type = existing
            .value_type
            .parse::<SettingValueType>()
            .unwrap_or(SettingValueType::String);
        value_type
            .validate(value)
            .map_err(SidisiplinError::validation)?;

        let old_value = existing.value.clone();
        let mut model: configs::ActiveModel = existing.into();
        model.value = Set(value.trim().to_string());
        model.updated_at = Set(now_ts());
        model.updated_by = Set(Some(updated_by));

        let updated = model
            .update(&txn)
            .await
            .map_err(db_error("更新系统配置失败"))?;

        insert_audit_log(
            &txn,
            NewAuditLog {
                user_id: Some(updated_by),
                action: AuditAction::Update.as_str().to_string(),
                entity: "config".to_string(),
                entity_id: Some(key.to_string()),
                details: Some(serde_json::json!({
                    "old_value": old_value,
                    "new_value": updated.value,
                })),
                ip_address,
            },
        )
        .await?;

        txn.commit().await.map_err(db_error("提交事务失败"))?;

        Ok(Some(updated.into_setting()))
    }

    pub async fn create_audit_log_impl(&self, log: NewAuditLog) -> Result<AuditLog> {
        insert_audit_log(&self.db, log).await
    }

    pub async fn list_audit_logs_with_pagination_impl(
        &self,
        page: u64,
        size: u64,
        entity: Option<String>,
        entity_id: Option<String>,
        action: Option<String>,
    ) -> Result<AuditLogListResponse> {
        let page = page.max(1);
        let size = size.clamp(1, 100);

        let mut select = audit_logs::Entity::find();
        if let Some(entity) = entity {
            select = select.filter(audit_logs::Column::Entity.eq(entity));
        }
        if let Some(entity_id) = entity_id {
            select = select.filter(audit_logs::Column::EntityId.eq(entity_id));
        }
        if let Some(action) = action {
            select = select.filter(audit_logs::Column::Action.eq(action.to_uppercase()));
        }

        let paginator = select
            .order_by_desc(audit_logs::Column::CreatedAt)
            .order_by_desc(audit_logs::Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_error("查询审计日志总数失败"))?;
        let logs = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_error("查询审计日志失败"))?;

        Ok(AuditLogListResponse {
            items: logs.into_iter().map(|m| m.into_audit_log()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::system::entities::KnownSettingKey;
    use crate::storage::sea_orm_storage::users::tests::teacher_request;

    #[tokio::test]
    async fn test_default_settings_seeded() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let settings = storage.list_settings_impl().await.unwrap();
        for key in KnownSettingKey::all() {
            assert!(settings.iter().any(|s| s.key == key.as_str()));
        }
    }

    #[tokio::test]
    async fn test_update_setting_writes_audit_log() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let admin = storage
            .create_user_impl(teacher_request("operator"))
            .await
            .unwrap();

        let updated = storage
            .update_setting_impl(
                KnownSettingKey::SchoolName.as_str(),
                "SMA Negeri 2 Bandung",
                admin.id,
                Some("127.0.0.1".to_string()),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.value, "SMA Negeri 2 Bandung");
        assert_eq!(updated.updated_by, Some(admin.id));

        let logs = storage
            .list_audit_logs_with_pagination_impl(1, 10, Some("config".to_string()), None, None)
            .await
            .unwrap();
        assert_eq!(logs.pagination.total, 1);
        assert_eq!(logs.items[0].action, "UPDATE");
        assert_eq!(
            logs.items[0].details.as_ref().and_then(|d| d["old_value"].as_str()),
            Some("SMA Negeri 1")
        );
    }

    #[tokio::test]
    async fn test_update_setting_validates_type() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let result = storage
            .update_setting_impl(KnownSettingKey::TopStudentsLimit.as_str(), "sepuluh", 1, None)
            .await;
        assert!(matches!(result, Err(SidisiplinError::Validation(_))));

        let missing = storage
            .update_setting_impl("app.unknown", "x", 1, None)
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}

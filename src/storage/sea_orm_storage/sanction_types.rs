use super::{SeaOrmStorage, db_error, ensure_unique, now_ts};
use crate::entity::sanction_types::{ActiveModel, Column, Entity as SanctionTypes, Model};
use crate::errors::{Result, SidisiplinError};
use crate::models::sanction_types::{
    entities::SanctionType,
    requests::{CreateSanctionTypeRequest, UpdateSanctionTypeRequest},
};
use crate::utils::like_contains;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

pub(super) const SANCTION_TYPE_INACTIVE: &str = "Jenis sanksi sudah dinonaktifkan";

/// 查询可用于新记录的处分类型；`current` 为记录原有类型，已停用也允许保留
pub(super) async fn usable_sanction_type<C: ConnectionTrait>(
    conn: &C,
    id: i64,
    current: Option<i64>,
) -> Result<Model> {
    let sanction_type = SanctionTypes::find_by_id(id)
        .one(conn)
        .await
        .map_err(db_error("查询处分类型失败"))?
        .ok_or_else(|| SidisiplinError::validation("Jenis sanksi tidak ditemukan"))?;

    if !sanction_type.is_active && current != Some(id) {
        return Err(SidisiplinError::validation(SANCTION_TYPE_INACTIVE));
    }
    Ok(sanction_type)
}

impl SeaOrmStorage {
    async fn check_sanction_type_unique<C: ConnectionTrait>(
        conn: &C,
        name: &str,
        exclude_id: Option<i64>,
    ) -> Result<()> {
        let mut select = SanctionTypes::find().filter(Column::Name.eq(name));
        if let Some(id) = exclude_id {
            select = select.filter(Column::Id.ne(id));
        }
        let existing = select
            .one(conn)
            .await
            .map_err(db_error("查询处分类型失败"))?;
        ensure_unique("Jenis sanksi", name, existing.map(|t| t.is_active))
    }

    pub async fn create_sanction_type_impl(
        &self,
        req: CreateSanctionTypeRequest,
    ) -> Result<SanctionType> {
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        Self::check_sanction_type_unique(&txn, &req.name, None).await?;

        let now = now_ts();
        let model = ActiveModel {
            name: Set(req.name),
            description: Set(req.description),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(db_error("创建处分类型失败"))?;
        txn.commit().await.map_err(db_error("提交事务失败"))?;

        Ok(result.into_sanction_type())
    }

    pub async fn list_sanction_types_impl(
        &self,
        is_active: Option<bool>,
        search: Option<String>,
    ) -> Result<Vec<SanctionType>> {
        let mut select = SanctionTypes::find();

        if let Some(is_active) = is_active {
            select = select.filter(Column::IsActive.eq(is_active));
        }
        if let Some(ref search) = search
            && !search.trim().is_empty()
        {
            select = select.filter(Column::Name.like(like_contains(search.trim())));
        }

        let types = select
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(db_error("查询处分类型列表失败"))?;

        Ok(types.into_iter().map(|m| m.into_sanction_type()).collect())
    }

    pub async fn update_sanction_type_impl(
        &self,
        id: i64,
        update: UpdateSanctionTypeRequest,
    ) -> Result<Option<SanctionType>> {
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        let Some(existing) = SanctionTypes::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_error("查询处分类型失败"))?
        else {
            return Ok(None);
        };

        if let Some(ref name) = update.name
            && *name != existing.name
        {
            Self::check_sanction_type_unique(&txn, name, Some(id)).await?;
        }

        let mut model: ActiveModel = existing.into();
        model.updated_at = Set(now_ts());

        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description).filter(|v| !v.is_empty()));
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }

        let updated = model
            .update(&txn)
            .await
            .map_err(db_error("更新处分类型失败"))?;
        txn.commit().await.map_err(db_error("提交事务失败"))?;

        Ok(Some(updated.into_sanction_type()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SidisiplinError;

    #[tokio::test]
    async fn test_sanction_type_crud() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let created = storage
            .create_sanction_type_impl(CreateSanctionTypeRequest {
                name: "Teguran Lisan".to_string(),
                description: Some("Peringatan langsung".to_string()),
            })
            .await
            .unwrap();
        assert!(created.is_active);

        let updated = storage
            .update_sanction_type_impl(
                created.id,
                UpdateSanctionTypeRequest {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(!updated.is_active);

        let active = storage
            .list_sanction_types_impl(Some(true), None)
            .await
            .unwrap();
        assert!(active.is_empty());

        let err = storage
            .create_sanction_type_impl(CreateSanctionTypeRequest {
                name: "Teguran Lisan".to_string(),
                description: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SidisiplinError::Validation(_)));
        assert!(err.message().contains("dinonaktifkan"));
    }
}

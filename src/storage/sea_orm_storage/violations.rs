use std::collections::{HashMap, HashSet};

use super::sanction_types::SANCTION_TYPE_INACTIVE;
use super::{SeaOrmStorage, db_error, ensure_unique, now_ts};
use crate::entity::{
    sanction_types, violation_categories, violation_sanction_types, violation_types, violations,
};
use crate::errors::{Result, SidisiplinError};
use crate::models::{
    PaginationInfo,
    violations::{
        entities::{ViolationCategory, ViolationDetail, ViolationType},
        requests::{
            CreateViolationCategoryRequest, CreateViolationRequest, CreateViolationTypeRequest,
            UpdateViolationCategoryRequest, UpdateViolationRequest, UpdateViolationTypeRequest,
            ViolationListQuery,
        },
        responses::ViolationListResponse,
    },
};
use crate::utils::like_contains;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

/// 批量补全类别与关联处分类型
async fn attach_violation_details<C: ConnectionTrait>(
    conn: &C,
    models: Vec<violations::Model>,
) -> Result<Vec<ViolationDetail>> {
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let category_ids: HashSet<i64> = models.iter().map(|m| m.category_id).collect();
    let violation_ids: Vec<i64> = models.iter().map(|m| m.id).collect();

    let categories: HashMap<i64, ViolationCategory> = violation_categories::Entity::find()
        .filter(violation_categories::Column::Id.is_in(category_ids))
        .all(conn)
        .await
        .map_err(db_error("查询违规类别失败"))?
        .into_iter()
        .map(|m| (m.id, m.into_category()))
        .collect();

    let links = violation_sanction_types::Entity::find()
        .filter(violation_sanction_types::Column::ViolationId.is_in(violation_ids))
        .all(conn)
        .await
        .map_err(db_error("查询违规处分关联失败"))?;

    let sanction_type_ids: HashSet<i64> = links.iter().map(|l| l.sanction_type_id).collect();
    let sanction_types: HashMap<i64, sanction_types::Model> = if sanction_type_ids.is_empty() {
        HashMap::new()
    } else {
        sanction_types::Entity::find()
            .filter(sanction_types::Column::Id.is_in(sanction_type_ids))
            .all(conn)
            .await
            .map_err(db_error("查询处分类型失败"))?
            .into_iter()
            .map(|m| (m.id, m))
            .collect()
    };

    let mut linked: HashMap<i64, Vec<i64>> = HashMap::new();
    for link in links {
        linked
            .entry(link.violation_id)
            .or_default()
            .push(link.sanction_type_id);
    }

    Ok(models
        .into_iter()
        .map(|m| {
            let mut types: Vec<_> = linked
                .get(&m.id)
                .map(|ids| {
                    ids.iter()
                        .filter_map(|id| sanction_types.get(id).cloned())
                        .map(|t| t.into_sanction_type())
                        .collect()
                })
                .unwrap_or_default();
            types.sort_by(|a, b| a.name.cmp(&b.name));

            ViolationDetail {
                category: categories.get(&m.category_id).cloned(),
                violation: m.into_violation(),
                sanction_types: types,
            }
        })
        .collect())
}

/// 整体替换违规条目的处分类型关联
async fn replace_sanction_links<C: ConnectionTrait>(
    conn: &C,
    violation_id: i64,
    sanction_type_ids: &[i64],
) -> Result<()> {
    let ids: HashSet<i64> = sanction_type_ids.iter().copied().collect();

    if !ids.is_empty() {
        let found = sanction_types::Entity::find()
            .filter(sanction_types::Column::Id.is_in(ids.clone()))
            .all(conn)
            .await
            .map_err(db_error("查询处分类型失败"))?;
        if found.len() != ids.len() {
            return Err(SidisiplinError::validation(
                "Sebagian jenis sanksi tidak ditemukan",
            ));
        }

        // 已停用的类型只能保留原有关联，不能新增
        let inactive: Vec<i64> = found
            .iter()
            .filter(|t| !t.is_active)
            .map(|t| t.id)
            .collect();
        if !inactive.is_empty() {
            let linked = violation_sanction_types::Entity::find()
                .filter(violation_sanction_types::Column::ViolationId.eq(violation_id))
                .filter(violation_sanction_types::Column::SanctionTypeId.is_in(inactive.clone()))
                .count(conn)
                .await
                .map_err(db_error("查询违规处分关联失败"))?;
            if linked != inactive.len() as u64 {
                return Err(SidisiplinError::validation(SANCTION_TYPE_INACTIVE));
            }
        }
    }

    violation_sanction_types::Entity::delete_many()
        .filter(violation_sanction_types::Column::ViolationId.eq(violation_id))
        .exec(conn)
        .await
        .map_err(db_error("删除违规处分关联失败"))?;

    if ids.is_empty() {
        return Ok(());
    }

    let rows = ids
        .into_iter()
        .map(|sanction_type_id| violation_sanction_types::ActiveModel {
            violation_id: Set(violation_id),
            sanction_type_id: Set(sanction_type_id),
        });
    violation_sanction_types::Entity::insert_many(rows)
        .exec(conn)
        .await
        .map_err(db_error("创建违规处分关联失败"))?;

    Ok(())
}

async fn ensure_category_exists<C: ConnectionTrait>(conn: &C, category_id: i64) -> Result<()> {
    violation_categories::Entity::find_by_id(category_id)
        .one(conn)
        .await
        .map_err(db_error("查询违规类别失败"))?
        .map(|_| ())
        .ok_or_else(|| SidisiplinError::validation("Kategori pelanggaran tidak ditemukan"))
}

impl SeaOrmStorage {
    // ==================== 违规类别 ====================

    async fn check_category_code_unique<C: ConnectionTrait>(
        conn: &C,
        code: &str,
        exclude_id: Option<i64>,
    ) -> Result<()> {
        let mut select = violation_categories::Entity::find()
            .filter(violation_categories::Column::Code.eq(code));
        if let Some(id) = exclude_id {
            select = select.filter(violation_categories::Column::Id.ne(id));
        }
        let existing = select
            .one(conn)
            .await
            .map_err(db_error("查询违规类别失败"))?;
        ensure_unique("Kode kategori", code, existing.map(|c| c.is_active))
    }

    pub async fn create_violation_category_impl(
        &self,
        req: CreateViolationCategoryRequest,
    ) -> Result<ViolationCategory> {
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        Self::check_category_code_unique(&txn, &req.code, None).await?;

        let now = now_ts();
        let model = violation_categories::ActiveModel {
            code: Set(req.code),
            name: Set(req.name),
            level: Set(req.level.to_string()),
            description: Set(req.description),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(db_error("创建违规类别失败"))?;
        txn.commit().await.map_err(db_error("提交事务失败"))?;

        Ok(result.into_category())
    }

    pub async fn list_violation_categories_impl(
        &self,
        is_active: Option<bool>,
        search: Option<String>,
    ) -> Result<Vec<ViolationCategory>> {
        let mut select = violation_categories::Entity::find();

        if let Some(is_active) = is_active {
            select = select.filter(violation_categories::Column::IsActive.eq(is_active));
        }
        if let Some(ref search) = search
            && !search.trim().is_empty()
        {
            let term = search.trim();
            select = select.filter(
                Condition::any()
                    .add(violation_categories::Column::Code.like(like_contains(term)))
                    .add(violation_categories::Column::Name.like(like_contains(term))),
            );
        }

        let categories = select
            .order_by_asc(violation_categories::Column::Code)
            .all(&self.db)
            .await
            .map_err(db_error("查询违规类别列表失败"))?;

        Ok(categories.into_iter().map(|m| m.into_category()).collect())
    }

    pub async fn update_violation_category_impl(
        &self,
        id: i64,
        update: UpdateViolationCategoryRequest,
    ) -> Result<Option<ViolationCategory>> {
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        let Some(existing) = violation_categories::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_error("查询违规类别失败"))?
        else {
            return Ok(None);
        };

        if let Some(ref code) = update.code
            && *code != existing.code
        {
            Self::check_category_code_unique(&txn, code, Some(id)).await?;
        }

        let mut model: violation_categories::ActiveModel = existing.into();
        model.updated_at = Set(now_ts());

        if let Some(code) = update.code {
            model.code = Set(code);
        }
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(level) = update.level {
            model.level = Set(level.to_string());
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
            .map_err(db_error("更新违规类别失败"))?;
        txn.commit().await.map_err(db_error("提交事务失败"))?;

        Ok(Some(updated.into_category()))
    }

    /// 删除违规类别；仍被违规条目引用时拒绝
    pub async fn delete_violation_category_impl(&self, id: i64) -> Result<()> {
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        if violation_categories::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_error("查询违规类别失败"))?
            .is_none()
        {
            return Err(SidisiplinError::not_found(
                "Kategori pelanggaran tidak ditemukan",
            ));
        }

        let in_use = violations::Entity::find()
            .filter(violations::Column::CategoryId.eq(id))
            .count(&txn)
            .await
            .map_err(db_error("统计违规条目失败"))?;
        if in_use > 0 {
            return Err(SidisiplinError::validation(format!(
                "Kategori masih digunakan oleh {in_use} pelanggaran"
            )));
        }

        violation_categories::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_error("删除违规类别失败"))?;
        txn.commit().await.map_err(db_error("提交事务失败"))?;

        Ok(())
    }

    // ==================== 违规条目 ====================

    async fn check_violation_code_unique<C: ConnectionTrait>(
        conn: &C,
        code: &str,
        exclude_id: Option<i64>,
    ) -> Result<()> {
        let mut select = violations::Entity::find().filter(violations::Column::Code.eq(code));
        if let Some(id) = exclude_id {
            select = select.filter(violations::Column::Id.ne(id));
        }
        let existing = select
            .one(conn)
            .await
            .map_err(db_error("查询违规条目失败"))?;
        ensure_unique("Kode pelanggaran", code, existing.map(|v| v.is_active))
    }

    pub async fn create_violation_impl(
        &self,
        req: CreateViolationRequest,
    ) -> Result<ViolationDetail> {
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        ensure_category_exists(&txn, req.category_id).await?;
        Self::check_violation_code_unique(&txn, &req.code, None).await?;

        let now = now_ts();
        let model = violations::ActiveModel {
            category_id: Set(req.category_id),
            code: Set(req.code),
            name: Set(req.name),
            description: Set(req.description),
            points: Set(req.points),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let created = model
            .insert(&txn)
            .await
            .map_err(db_error("创建违规条目失败"))?;

        replace_sanction_links(&txn, created.id, &req.sanction_type_ids).await?;

        let detail = attach_violation_details(&txn, vec![created])
            .await?
            .pop()
            .ok_or_else(|| SidisiplinError::database_operation("违规条目创建后读取失败"))?;
        txn.commit().await.map_err(db_error("提交事务失败"))?;

        Ok(detail)
    }

    pub async fn get_violation_by_id_impl(&self, id: i64) -> Result<Option<ViolationDetail>> {
        let Some(model) = violations::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询违规条目失败"))?
        else {
            return Ok(None);
        };

        Ok(attach_violation_details(&self.db, vec![model]).await?.pop())
    }

    pub async fn list_violations_with_pagination_impl(
        &self,
        query: ViolationListQuery,
    ) -> Result<ViolationListResponse> {
        let page = query.page.max(1);
        let size = query.size.clamp(1, 100);

        let mut select = violations::Entity::find();

        if let Some(category_id) = query.category_id {
            select = select.filter(violations::Column::CategoryId.eq(category_id));
        }
        if let Some(is_active) = query.is_active {
            select = select.filter(violations::Column::IsActive.eq(is_active));
        }
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let term = search.trim();
            select = select.filter(
                Condition::any()
                    .add(violations::Column::Code.like(like_contains(term)))
                    .add(violations::Column::Name.like(like_contains(term))),
            );
        }

        let paginator = select
            .order_by_asc(violations::Column::Code)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_error("查询违规条目总数失败"))?;
        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_error("查询违规条目列表失败"))?;

        Ok(ViolationListResponse {
            items: attach_violation_details(&self.db, models).await?,
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn update_violation_impl(
        &self,
        id: i64,
        update: UpdateViolationRequest,
    ) -> Result<Option<ViolationDetail>> {
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        let Some(existing) = violations::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_error("查询违规条目失败"))?
        else {
            return Ok(None);
        };

        if let Some(category_id) = update.category_id {
            ensure_category_exists(&txn, category_id).await?;
        }
        if let Some(ref code) = update.code
            && *code != existing.code
        {
            Self::check_violation_code_unique(&txn, code, Some(id)).await?;
        }

        let mut model: violations::ActiveModel = existing.into();
        model.updated_at = Set(now_ts());

        if let Some(category_id) = update.category_id {
            model.category_id = Set(category_id);
        }
        if let Some(code) = update.code {
            model.code = Set(code);
        }
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description).filter(|v| !v.is_empty()));
        }
        if let Some(points) = update.points {
            model.points = Set(points);
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }

        let updated = model
            .update(&txn)
            .await
            .map_err(db_error("更新违规条目失败"))?;

        if let Some(ref ids) = update.sanction_type_ids {
            replace_sanction_links(&txn, id, ids).await?;
        }

        let detail = attach_violation_details(&txn, vec![updated]).await?.pop();
        txn.commit().await.map_err(db_error("提交事务失败"))?;

        Ok(detail)
    }

    // ==================== 旧版违规类型 ====================

    async fn check_violation_type_unique<C: ConnectionTrait>(
        conn: &C,
        name: &str,
        exclude_id: Option<i64>,
    ) -> Result<()> {
        let mut select =
            violation_types::Entity::find().filter(violation_types::Column::Name.eq(name));
        if let Some(id) = exclude_id {
            select = select.filter(violation_types::Column::Id.ne(id));
        }
        let existing = select
            .one(conn)
            .await
            .map_err(db_error("查询违规类型失败"))?;
        ensure_unique("Jenis pelanggaran", name, existing.map(|t| t.is_active))
    }

    pub async fn create_violation_type_impl(
        &self,
        req: CreateViolationTypeRequest,
    ) -> Result<ViolationType> {
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        Self::check_violation_type_unique(&txn, &req.name, None).await?;

        let now = now_ts();
        let model = violation_types::ActiveModel {
            name: Set(req.name),
            points: Set(req.points),
            description: Set(req.description),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(db_error("创建违规类型失败"))?;
        txn.commit().await.map_err(db_error("提交事务失败"))?;

        Ok(result.into_violation_type())
    }

    pub async fn list_violation_types_impl(
        &self,
        is_active: Option<bool>,
        search: Option<String>,
    ) -> Result<Vec<ViolationType>> {
        let mut select = violation_types::Entity::find();

        if let Some(is_active) = is_active {
            select = select.filter(violation_types::Column::IsActive.eq(is_active));
        }
        if let Some(ref search) = search
            && !search.trim().is_empty()
        {
            select = select.filter(violation_types::Column::Name.like(like_contains(search.trim())));
        }

        let types = select
            .order_by_asc(violation_types::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_error("查询违规类型列表失败"))?;

        Ok(types.into_iter().map(|m| m.into_violation_type()).collect())
    }

    pub async fn update_violation_type_impl(
        &self,
        id: i64,
        update: UpdateViolationTypeRequest,
    ) -> Result<Option<ViolationType>> {
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        let Some(existing) = violation_types::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_error("查询违规类型失败"))?
        else {
            return Ok(None);
        };

        if let Some(ref name) = update.name
            && *name != existing.name
        {
            Self::check_violation_type_unique(&txn, name, Some(id)).await?;
        }

        let mut model: violation_types::ActiveModel = existing.into();
        model.updated_at = Set(now_ts());

        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(points) = update.points {
            model.points = Set(points);
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
            .map_err(db_error("更新违规类型失败"))?;
        txn.commit().await.map_err(db_error("提交事务失败"))?;

        Ok(Some(updated.into_violation_type()))
    }

    pub async fn delete_violation_type_impl(&self, id: i64) -> Result<bool> {
        let result = violation_types::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error("删除违规类型失败"))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::sanction_types::requests::{
        CreateSanctionTypeRequest, UpdateSanctionTypeRequest,
    };
    use crate::models::violations::entities::ViolationLevel;

    /// 建立一个类别与其下的违规条目
    pub(crate) async fn seed_violation(
        storage: &SeaOrmStorage,
        category_code: &str,
        violation_code: &str,
    ) -> ViolationDetail {
        let category = storage
            .create_violation_category_impl(CreateViolationCategoryRequest {
                code: category_code.to_string(),
                name: format!("Kategori {category_code}"),
                level: ViolationLevel::Ringan,
                description: None,
            })
            .await
            .unwrap();

        storage
            .create_violation_impl(CreateViolationRequest {
                category_id: category.id,
                code: violation_code.to_string(),
                name: format!("Pelanggaran {violation_code}"),
                description: None,
                points: 10,
                sanction_type_ids: Vec::new(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_category_in_use_cannot_be_deleted() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let detail = seed_violation(&storage, "PASAL_1", "1.A").await;
        let category_id = detail.violation.category_id;

        let result = storage.delete_violation_category_impl(category_id).await;
        assert!(matches!(result, Err(SidisiplinError::Validation(_))));

        let result = storage.delete_violation_category_impl(9999).await;
        assert!(matches!(result, Err(SidisiplinError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_violation_sanction_links_replaced() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let teguran = storage
            .create_sanction_type_impl(CreateSanctionTypeRequest {
                name: "Teguran".to_string(),
                description: None,
            })
            .await
            .unwrap();
        let skorsing = storage
            .create_sanction_type_impl(CreateSanctionTypeRequest {
                name: "Skorsing".to_string(),
                description: None,
            })
            .await
            .unwrap();

        let detail = seed_violation(&storage, "PASAL_2", "2.A").await;
        assert_eq!(
            detail.category.as_ref().map(|c| c.code.as_str()),
            Some("PASAL_2")
        );
        assert!(detail.sanction_types.is_empty());

        let updated = storage
            .update_violation_impl(
                detail.violation.id,
                UpdateViolationRequest {
                    sanction_type_ids: Some(vec![teguran.id, skorsing.id]),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.sanction_types.len(), 2);
        assert_eq!(updated.sanction_types[0].name, "Skorsing");

        let updated = storage
            .update_violation_impl(
                detail.violation.id,
                UpdateViolationRequest {
                    sanction_type_ids: Some(vec![teguran.id]),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.sanction_types.len(), 1);

        let result = storage
            .update_violation_impl(
                detail.violation.id,
                UpdateViolationRequest {
                    sanction_type_ids: Some(vec![777]),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(SidisiplinError::Validation(_))));
    }

    #[tokio::test]
    async fn test_inactive_sanction_type_kept_but_not_linked() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let teguran = storage
            .create_sanction_type_impl(CreateSanctionTypeRequest {
                name: "Teguran".to_string(),
                description: None,
            })
            .await
            .unwrap();
        let linked = seed_violation(&storage, "PASAL_3", "3.A").await;
        let unlinked = seed_violation(&storage, "PASAL_4", "4.A").await;
        storage
            .update_violation_impl(
                linked.violation.id,
                UpdateViolationRequest {
                    sanction_type_ids: Some(vec![teguran.id]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        storage
            .update_sanction_type_impl(
                teguran.id,
                UpdateSanctionTypeRequest {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let result = storage
            .update_violation_impl(
                unlinked.violation.id,
                UpdateViolationRequest {
                    sanction_type_ids: Some(vec![teguran.id]),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(SidisiplinError::Validation(msg)) if msg == SANCTION_TYPE_INACTIVE));

        let result = storage
            .create_violation_impl(CreateViolationRequest {
                category_id: linked.violation.category_id,
                code: "3.B".to_string(),
                name: "Membolos".to_string(),
                description: None,
                points: 15,
                sanction_type_ids: vec![teguran.id],
            })
            .await;
        assert!(matches!(result, Err(SidisiplinError::Validation(_))));

        // 已有关联可原样保留
        let kept = storage
            .update_violation_impl(
                linked.violation.id,
                UpdateViolationRequest {
                    name: Some("Pelanggaran 3.A diperbarui".to_string()),
                    sanction_type_ids: Some(vec![teguran.id]),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(kept.sanction_types.len(), 1);
    }

    #[tokio::test]
    async fn test_violation_requires_existing_category() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let result = storage
            .create_violation_impl(CreateViolationRequest {
                category_id: 42,
                code: "X.1".to_string(),
                name: "Tanpa kategori".to_string(),
                description: None,
                points: 5,
                sanction_type_ids: Vec::new(),
            })
            .await;
        assert!(matches!(result, Err(SidisiplinError::Validation(_))));
    }

    #[tokio::test]
    async fn test_list_violations_by_category_and_search() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let first = seed_violation(&storage, "PASAL_3", "3.A").await;
        seed_violation(&storage, "PASAL_4", "4.A").await;

        let list = storage
            .list_violations_with_pagination_impl(ViolationListQuery {
                page: 1,
                size: 20,
                category_id: Some(first.violation.category_id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(list.pagination.total, 1);
        assert_eq!(list.items[0].violation.code, "3.A");

        let list = storage
            .list_violations_with_pagination_impl(ViolationListQuery {
                page: 1,
                size: 20,
                search: Some("4.".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(list.pagination.total, 1);
    }

    #[tokio::test]
    async fn test_violation_type_unique_name() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let request = CreateViolationTypeRequest {
            name: "Terlambat".to_string(),
            points: 5,
            description: None,
        };
        let created = storage
            .create_violation_type_impl(request.clone())
            .await
            .unwrap();
        assert!(storage.create_violation_type_impl(request).await.is_err());
        assert!(storage.delete_violation_type_impl(created.id).await.unwrap());
        assert!(!storage.delete_violation_type_impl(created.id).await.unwrap());
    }
}

//! 案件处理记录
//!
//! 新增记录时先写案件行（加锁），再检查已完成记录、插入、回写状态。

use super::sanction_types::usable_sanction_type;
use super::{SeaOrmStorage, db_error, now_ts};
use crate::entity::{case_actions, sanction_types, violation_cases};
use crate::errors::{Result, SidisiplinError};
use crate::models::cases::{
    entities::{CASE_COMPLETED_MESSAGE, CaseAction, CaseStatus},
    requests::{CreateCaseActionRequest, UpdateCaseActionRequest},
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

/// 写一次案件行，既更新时间又串行化同一案件上的并发写入
async fn touch_case(txn: &DatabaseTransaction, case_id: i64) -> Result<()> {
    let result = violation_cases::Entity::update_many()
        .col_expr(violation_cases::Column::UpdatedAt, Expr::value(now_ts()))
        .filter(violation_cases::Column::Id.eq(case_id))
        .exec(txn)
        .await
        .map_err(db_error("锁定案件失败"))?;

    if result.rows_affected == 0 {
        return Err(SidisiplinError::not_found("Kasus tidak ditemukan"));
    }
    Ok(())
}

async fn set_case_status(txn: &DatabaseTransaction, case_id: i64, status: CaseStatus) -> Result<()> {
    violation_cases::Entity::update_many()
        .col_expr(violation_cases::Column::Status, Expr::value(status.as_str()))
        .filter(violation_cases::Column::Id.eq(case_id))
        .exec(txn)
        .await
        .map_err(db_error("更新案件状态失败"))?;
    Ok(())
}

/// 案件上未删除且已完成的记录数（可排除某条）
async fn count_completed_actions(
    txn: &DatabaseTransaction,
    case_id: i64,
    exclude_id: Option<i64>,
) -> Result<u64> {
    let mut select = case_actions::Entity::find()
        .filter(case_actions::Column::CaseId.eq(case_id))
        .filter(case_actions::Column::IsCompleted.eq(true))
        .filter(case_actions::Column::DeletedAt.is_null());
    if let Some(id) = exclude_id {
        select = select.filter(case_actions::Column::Id.ne(id));
    }
    select
        .count(txn)
        .await
        .map_err(db_error("统计已完成处理记录失败"))
}

async fn sanction_type_name<C: ConnectionTrait>(conn: &C, id: i64) -> Result<Option<String>> {
    Ok(sanction_types::Entity::find_by_id(id)
        .one(conn)
        .await
        .map_err(db_error("查询处分类型失败"))?
        .map(|t| t.name))
}

/// 跟进日期不能早于处理日期
fn check_follow_up(action_date: i64, follow_up_date: Option<i64>) -> Result<()> {
    match follow_up_date {
        Some(follow_up) if follow_up < action_date => Err(SidisiplinError::validation(
            "Tanggal tindak lanjut tidak boleh sebelum tanggal tindakan",
        )),
        _ => Ok(()),
    }
}

/// 查询属于指定案件的记录（含已删除）
async fn find_action<C: ConnectionTrait>(
    conn: &C,
    case_id: i64,
    action_id: i64,
) -> Result<Option<case_actions::Model>> {
    case_actions::Entity::find_by_id(action_id)
        .filter(case_actions::Column::CaseId.eq(case_id))
        .one(conn)
        .await
        .map_err(db_error("查询处理记录失败"))
}

impl SeaOrmStorage {
    pub async fn list_case_actions_impl(
        &self,
        case_id: i64,
        include_deleted: bool,
    ) -> Result<Vec<CaseAction>> {
        let mut select = case_actions::Entity::find()
            .find_also_related(sanction_types::Entity)
            .filter(case_actions::Column::CaseId.eq(case_id));
        if !include_deleted {
            select = select.filter(case_actions::Column::DeletedAt.is_null());
        }

        let rows = select
            .order_by_asc(case_actions::Column::ActionDate)
            .order_by_asc(case_actions::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_error("查询处理记录列表失败"))?;

        Ok(rows
            .into_iter()
            .map(|(action, sanction_type)| action.into_case_action(sanction_type.map(|t| t.name)))
            .collect())
    }

    pub async fn get_case_action_impl(
        &self,
        case_id: i64,
        action_id: i64,
    ) -> Result<Option<CaseAction>> {
        let Some(action) = find_action(&self.db, case_id, action_id).await? else {
            return Ok(None);
        };
        let name = sanction_type_name(&self.db, action.sanction_type_id).await?;
        Ok(Some(action.into_case_action(name)))
    }

    /// 新增处理记录并推导案件状态
    pub async fn create_case_action_impl(
        &self,
        case_id: i64,
        req: CreateCaseActionRequest,
        actor_id: i64,
    ) -> Result<(CaseAction, CaseStatus)> {
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        touch_case(&txn, case_id).await?;

        if count_completed_actions(&txn, case_id, None).await? > 0 {
            return Err(SidisiplinError::validation(CASE_COMPLETED_MESSAGE));
        }

        let name = usable_sanction_type(&txn, req.sanction_type_id, None)
            .await?
            .name;

        let now = now_ts();
        let action_date = req.action_date.map(|d| d.timestamp()).unwrap_or(now);
        let follow_up_date = req.follow_up_date.map(|d| d.timestamp());
        check_follow_up(action_date, follow_up_date)?;

        let model = case_actions::ActiveModel {
            case_id: Set(case_id),
            sanction_type_id: Set(req.sanction_type_id),
            description: Set(req.description),
            action_date: Set(action_date),
            is_completed: Set(req.is_completed),
            follow_up_date: Set(follow_up_date),
            created_by: Set(Some(actor_id)),
            updated_by: Set(Some(actor_id)),
            deleted_at: Set(None),
            deleted_by_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let created = model
            .insert(&txn)
            .await
            .map_err(db_error("创建处理记录失败"))?;

        let status = CaseStatus::after_action(created.is_completed);
        set_case_status(&txn, case_id, status).await?;

        txn.commit().await.map_err(db_error("提交事务失败"))?;

        Ok((created.into_case_action(Some(name)), status))
    }

    /// 修改处理记录；完成标记变化时按同一规则重算案件状态
    pub async fn update_case_action_impl(
        &self,
        case_id: i64,
        action_id: i64,
        update: UpdateCaseActionRequest,
        actor_id: i64,
    ) -> Result<CaseAction> {
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        touch_case(&txn, case_id).await?;

        let existing = find_action(&txn, case_id, action_id)
            .await?
            .ok_or_else(|| SidisiplinError::not_found("Tindakan tidak ditemukan"))?;
        if existing.deleted_at.is_some() {
            return Err(SidisiplinError::gone("Tindakan sudah dihapus"));
        }

        let completion_changed = update
            .is_completed
            .is_some_and(|completed| completed != existing.is_completed);
        if update.is_completed == Some(true)
            && completion_changed
            && count_completed_actions(&txn, case_id, Some(action_id)).await? > 0
        {
            return Err(SidisiplinError::validation(CASE_COMPLETED_MESSAGE));
        }

        // 与原记录合并后再校验日期
        let action_date = update
            .action_date
            .map(|d| d.timestamp())
            .unwrap_or(existing.action_date);
        let follow_up_date = match update.follow_up_date {
            Some(d) => Some(d.timestamp()),
            None => existing.follow_up_date,
        };
        check_follow_up(action_date, follow_up_date)?;

        let sanction_type_id = update.sanction_type_id.unwrap_or(existing.sanction_type_id);
        let name = usable_sanction_type(&txn, sanction_type_id, Some(existing.sanction_type_id))
            .await?
            .name;

        let mut model: case_actions::ActiveModel = existing.into();
        model.sanction_type_id = Set(sanction_type_id);
        model.action_date = Set(action_date);
        model.follow_up_date = Set(follow_up_date);
        model.updated_by = Set(Some(actor_id));
        model.updated_at = Set(now_ts());

        if let Some(description) = update.description {
            model.description = Set(Some(description).filter(|v| !v.is_empty()));
        }
        if let Some(is_completed) = update.is_completed {
            model.is_completed = Set(is_completed);
        }

        let updated = model
            .update(&txn)
            .await
            .map_err(db_error("更新处理记录失败"))?;

        if completion_changed {
            set_case_status(&txn, case_id, CaseStatus::after_action(updated.is_completed)).await?;
        }

        txn.commit().await.map_err(db_error("提交事务失败"))?;

        Ok(updated.into_case_action(Some(name)))
    }

    /// 软删除处理记录，不影响案件状态
    pub async fn soft_delete_case_action_impl(
        &self,
        case_id: i64,
        action_id: i64,
        actor_id: i64,
    ) -> Result<CaseAction> {
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        let existing = find_action(&txn, case_id, action_id)
            .await?
            .ok_or_else(|| SidisiplinError::not_found("Tindakan tidak ditemukan"))?;
        if existing.deleted_at.is_some() {
            return Err(SidisiplinError::gone("Tindakan sudah dihapus"));
        }

        let now = now_ts();
        let mut model: case_actions::ActiveModel = existing.into();
        model.deleted_at = Set(Some(now));
        model.deleted_by_id = Set(Some(actor_id));
        model.updated_by = Set(Some(actor_id));
        model.updated_at = Set(now);

        let deleted = model
            .update(&txn)
            .await
            .map_err(db_error("删除处理记录失败"))?;
        let name = sanction_type_name(&txn, deleted.sanction_type_id).await?;

        txn.commit().await.map_err(db_error("提交事务失败"))?;

        Ok(deleted.into_case_action(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RemovalOutcome;
    use crate::models::cases::requests::CreateCaseRequest;
    use crate::models::sanctions::requests::CreateSanctionRequest;
    use crate::storage::sea_orm_storage::removal::SanctionTypeRemoval;
    use crate::storage::sea_orm_storage::sanction_types::SANCTION_TYPE_INACTIVE;
    use chrono::{TimeZone, Utc};
    use crate::models::sanction_types::requests::CreateSanctionTypeRequest;
    use crate::models::violations::{
        entities::ViolationLevel,
        requests::{CreateViolationCategoryRequest, CreateViolationRequest},
    };
    use crate::storage::sea_orm_storage::cases::tests::{seed_case, wib};
    use crate::storage::sea_orm_storage::students::tests::student_request;
    use crate::storage::sea_orm_storage::users::tests::teacher_request;

    async fn seed_sanction_type(storage: &SeaOrmStorage, name: &str) -> i64 {
        storage
            .create_sanction_type_impl(CreateSanctionTypeRequest {
                name: name.to_string(),
                description: None,
            })
            .await
            .unwrap()
            .id
    }

    fn action(sanction_type_id: i64, is_completed: bool) -> CreateCaseActionRequest {
        CreateCaseActionRequest {
            sanction_type_id,
            description: None,
            action_date: None,
            is_completed,
            follow_up_date: None,
        }
    }

    #[tokio::test]
    async fn test_pasal_scenario_status_flow() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let teacher = storage
            .create_user_impl(teacher_request("walikelas"))
            .await
            .unwrap();
        let student = storage
            .create_student_impl(student_request("7001", "X IPS 2"))
            .await
            .unwrap();
        let category = storage
            .create_violation_category_impl(CreateViolationCategoryRequest {
                code: "PASAL_1".to_string(),
                name: "Kedisiplinan".to_string(),
                level: ViolationLevel::Ringan,
                description: None,
            })
            .await
            .unwrap();
        let violation = storage
            .create_violation_impl(CreateViolationRequest {
                category_id: category.id,
                code: "1.A".to_string(),
                name: "Terlambat".to_string(),
                description: None,
                points: 5,
                sanction_type_ids: Vec::new(),
            })
            .await
            .unwrap();
        let teguran = seed_sanction_type(&storage, "Teguran").await;

        let case = storage
            .create_case_impl(
                CreateCaseRequest {
                    student_id: student.id,
                    violation_id: violation.violation.id,
                    incident_date: chrono::Utc::now(),
                    description: None,
                    evidence_urls: Vec::new(),
                },
                teacher.id,
                wib(),
            )
            .await
            .unwrap();
        assert_eq!(case.status, CaseStatus::Pending);

        let (_, status) = storage
            .create_case_action_impl(case.id, action(teguran, false), teacher.id)
            .await
            .unwrap();
        assert_eq!(status, CaseStatus::Proses);

        let (completed, status) = storage
            .create_case_action_impl(case.id, action(teguran, true), teacher.id)
            .await
            .unwrap();
        assert_eq!(status, CaseStatus::Selesai);
        assert_eq!(completed.sanction_type_name.as_deref(), Some("Teguran"));

        let detail = storage.get_case_by_id_impl(case.id).await.unwrap().unwrap();
        assert_eq!(detail.case.status, CaseStatus::Selesai);

        let result = storage
            .create_case_action_impl(case.id, action(teguran, false), teacher.id)
            .await;
        assert!(matches!(result, Err(SidisiplinError::Validation(_))));
        assert_eq!(
            storage
                .list_case_actions_impl(case.id, false)
                .await
                .unwrap()
                .len(),
            2
        );
    }

    #[tokio::test]
    async fn test_soft_deleted_action_excluded() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let case = seed_case(&storage, "7101").await;
        let actor = case.reported_by.unwrap();
        let teguran = seed_sanction_type(&storage, "Teguran").await;

        let (completed, _) = storage
            .create_case_action_impl(case.id, action(teguran, true), actor)
            .await
            .unwrap();

        let deleted = storage
            .soft_delete_case_action_impl(case.id, completed.id, actor)
            .await
            .unwrap();
        assert!(deleted.is_deleted());
        assert_eq!(deleted.deleted_by_id, Some(actor));

        // 软删除不改状态
        let detail = storage.get_case_by_id_impl(case.id).await.unwrap().unwrap();
        assert_eq!(detail.case.status, CaseStatus::Selesai);

        assert!(
            storage
                .list_case_actions_impl(case.id, false)
                .await
                .unwrap()
                .is_empty()
        );
        assert_eq!(
            storage
                .list_case_actions_impl(case.id, true)
                .await
                .unwrap()
                .len(),
            1
        );

        let (_, status) = storage
            .create_case_action_impl(case.id, action(teguran, false), actor)
            .await
            .unwrap();
        assert_eq!(status, CaseStatus::Proses);
    }

    #[tokio::test]
    async fn test_deleted_action_is_gone() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let case = seed_case(&storage, "7201").await;
        let actor = case.reported_by.unwrap();
        let teguran = seed_sanction_type(&storage, "Teguran").await;

        let (created, _) = storage
            .create_case_action_impl(case.id, action(teguran, false), actor)
            .await
            .unwrap();
        storage
            .soft_delete_case_action_impl(case.id, created.id, actor)
            .await
            .unwrap();

        let update = storage
            .update_case_action_impl(
                case.id,
                created.id,
                UpdateCaseActionRequest {
                    description: Some("ubah".to_string()),
                    ..Default::default()
                },
                actor,
            )
            .await;
        assert!(matches!(update, Err(SidisiplinError::Gone(_))));

        let again = storage
            .soft_delete_case_action_impl(case.id, created.id, actor)
            .await;
        assert!(matches!(again, Err(SidisiplinError::Gone(_))));

        let fetched = storage
            .get_case_action_impl(case.id, created.id)
            .await
            .unwrap()
            .unwrap();
        assert!(fetched.is_deleted());
    }

    #[tokio::test]
    async fn test_update_completion_reapplies_status() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let case = seed_case(&storage, "7301").await;
        let actor = case.reported_by.unwrap();
        let teguran = seed_sanction_type(&storage, "Teguran").await;

        let (created, _) = storage
            .create_case_action_impl(case.id, action(teguran, false), actor)
            .await
            .unwrap();
        let updated = storage
            .update_case_action_impl(
                case.id,
                created.id,
                UpdateCaseActionRequest {
                    is_completed: Some(true),
                    ..Default::default()
                },
                actor,
            )
            .await
            .unwrap();
        assert!(updated.is_completed);

        let detail = storage.get_case_by_id_impl(case.id).await.unwrap().unwrap();
        assert_eq!(detail.case.status, CaseStatus::Selesai);
    }

    #[tokio::test]
    async fn test_follow_up_checked_against_stored_dates() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let case = seed_case(&storage, "7401").await;
        let actor = case.reported_by.unwrap();
        let teguran = seed_sanction_type(&storage, "Teguran").await;
        let action_date = Utc.with_ymd_and_hms(2025, 2, 10, 8, 0, 0).unwrap();

        let mut early = action(teguran, false);
        early.action_date = Some(action_date);
        early.follow_up_date = Some(Utc.with_ymd_and_hms(2025, 2, 9, 8, 0, 0).unwrap());
        let result = storage.create_case_action_impl(case.id, early, actor).await;
        assert!(matches!(result, Err(SidisiplinError::Validation(_))));

        let mut req = action(teguran, false);
        req.action_date = Some(action_date);
        let (created, _) = storage
            .create_case_action_impl(case.id, req, actor)
            .await
            .unwrap();

        // 只改跟进日期
        let result = storage
            .update_case_action_impl(
                case.id,
                created.id,
                UpdateCaseActionRequest {
                    follow_up_date: Some(Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap()),
                    ..Default::default()
                },
                actor,
            )
            .await;
        assert!(matches!(result, Err(SidisiplinError::Validation(_))));

        let follow_up = Utc.with_ymd_and_hms(2025, 2, 17, 8, 0, 0).unwrap();
        storage
            .update_case_action_impl(
                case.id,
                created.id,
                UpdateCaseActionRequest {
                    follow_up_date: Some(follow_up),
                    ..Default::default()
                },
                actor,
            )
            .await
            .unwrap();

        // 只改处理日期
        let result = storage
            .update_case_action_impl(
                case.id,
                created.id,
                UpdateCaseActionRequest {
                    action_date: Some(Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap()),
                    ..Default::default()
                },
                actor,
            )
            .await;
        assert!(matches!(result, Err(SidisiplinError::Validation(_))));

        let stored = storage
            .get_case_action_impl(case.id, created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.action_date, action_date);
        assert_eq!(stored.follow_up_date, Some(follow_up));
    }

    #[tokio::test]
    async fn test_deactivated_sanction_type_not_reused() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let case = seed_case(&storage, "7501").await;
        let actor = case.reported_by.unwrap();
        let skorsing = seed_sanction_type(&storage, "Skorsing").await;
        let teguran = seed_sanction_type(&storage, "Teguran").await;

        let (existing, _) = storage
            .create_case_action_impl(case.id, action(skorsing, false), actor)
            .await
            .unwrap();
        let outcome = storage
            .remove_with_policy(&SanctionTypeRemoval, skorsing, false)
            .await
            .unwrap();
        assert_eq!(outcome, RemovalOutcome::Deactivated { dependents: 1 });

        let result = storage
            .create_case_action_impl(case.id, action(skorsing, false), actor)
            .await;
        assert!(matches!(result, Err(SidisiplinError::Validation(msg)) if msg == SANCTION_TYPE_INACTIVE));

        let result = storage
            .create_sanction_impl(
                case.id,
                CreateSanctionRequest {
                    sanction_type_id: skorsing,
                    start_date: Utc::now(),
                    end_date: None,
                    notes: None,
                    is_completed: false,
                },
                actor,
            )
            .await;
        assert!(matches!(result, Err(SidisiplinError::Validation(msg)) if msg == SANCTION_TYPE_INACTIVE));

        // 原有记录保留停用类型仍可修改
        let updated = storage
            .update_case_action_impl(
                case.id,
                existing.id,
                UpdateCaseActionRequest {
                    description: Some("Orang tua dipanggil".to_string()),
                    ..Default::default()
                },
                actor,
            )
            .await
            .unwrap();
        assert_eq!(updated.sanction_type_id, skorsing);

        // 其他记录不能换成停用类型
        let (other, _) = storage
            .create_case_action_impl(case.id, action(teguran, false), actor)
            .await
            .unwrap();
        let result = storage
            .update_case_action_impl(
                case.id,
                other.id,
                UpdateCaseActionRequest {
                    sanction_type_id: Some(skorsing),
                    ..Default::default()
                },
                actor,
            )
            .await;
        assert!(matches!(result, Err(SidisiplinError::Validation(_))));
    }

    #[tokio::test]
    async fn test_action_on_missing_case() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let result = storage
            .create_case_action_impl(12345, action(1, false), 1)
            .await;
        assert!(matches!(result, Err(SidisiplinError::NotFound(_))));
    }
}

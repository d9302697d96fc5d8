//! 停用或级联删除
//!
//! 被引用的实体默认只停用；`force` 时先删除（或解除）依赖再硬删除。
//! 整个流程在同一事务内完成。

use super::{SeaOrmStorage, db_error, now_ts};
use crate::entity::{
    audit_logs, case_actions, configs, reports, sanction_types, sanctions, students, users,
    violation_cases, violation_sanction_types, violations,
};
use crate::errors::{Result, SidisiplinError};
use crate::models::{RemovalOutcome, users::entities::UserStatus};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, DatabaseTransaction, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect, TransactionTrait,
};

/// 每类实体的删除策略
#[async_trait::async_trait]
pub(super) trait RemovalPolicy: Send + Sync {
    /// 提示信息中的实体名称
    const LABEL: &'static str;

    async fn exists(&self, txn: &DatabaseTransaction, id: i64) -> std::result::Result<bool, DbErr>;
    async fn count_dependents(
        &self,
        txn: &DatabaseTransaction,
        id: i64,
    ) -> std::result::Result<u64, DbErr>;
    async fn deactivate(&self, txn: &DatabaseTransaction, id: i64)
    -> std::result::Result<(), DbErr>;
    async fn purge(&self, txn: &DatabaseTransaction, id: i64) -> std::result::Result<(), DbErr>;
}

impl SeaOrmStorage {
    /// 按策略停用或删除
    pub(super) async fn remove_with_policy<P: RemovalPolicy>(
        &self,
        policy: &P,
        id: i64,
        force: bool,
    ) -> Result<RemovalOutcome> {
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        if !policy
            .exists(&txn, id)
            .await
            .map_err(db_error("查询待删除数据失败"))?
        {
            return Err(SidisiplinError::not_found(format!(
                "{} tidak ditemukan",
                P::LABEL
            )));
        }

        let dependents = policy
            .count_dependents(&txn, id)
            .await
            .map_err(db_error("统计关联数据失败"))?;

        let outcome = if dependents > 0 && !force {
            policy
                .deactivate(&txn, id)
                .await
                .map_err(db_error("停用数据失败"))?;
            RemovalOutcome::Deactivated { dependents }
        } else {
            policy
                .purge(&txn, id)
                .await
                .map_err(db_error("删除数据失败"))?;
            RemovalOutcome::Deleted
        };

        txn.commit().await.map_err(db_error("提交事务失败"))?;
        Ok(outcome)
    }
}

/// 删除若干案件及其处理记录、处分
async fn purge_cases(
    txn: &DatabaseTransaction,
    condition: Condition,
) -> std::result::Result<(), DbErr> {
    let case_ids: Vec<i64> = violation_cases::Entity::find()
        .select_only()
        .column(violation_cases::Column::Id)
        .filter(condition)
        .into_tuple()
        .all(txn)
        .await?;

    if case_ids.is_empty() {
        return Ok(());
    }

    case_actions::Entity::delete_many()
        .filter(case_actions::Column::CaseId.is_in(case_ids.clone()))
        .exec(txn)
        .await?;
    sanctions::Entity::delete_many()
        .filter(sanctions::Column::CaseId.is_in(case_ids.clone()))
        .exec(txn)
        .await?;
    violation_cases::Entity::delete_many()
        .filter(violation_cases::Column::Id.is_in(case_ids))
        .exec(txn)
        .await?;

    Ok(())
}

pub(super) struct StudentRemoval;

#[async_trait::async_trait]
impl RemovalPolicy for StudentRemoval {
    const LABEL: &'static str = "Siswa";

    async fn exists(&self, txn: &DatabaseTransaction, id: i64) -> std::result::Result<bool, DbErr> {
        Ok(students::Entity::find_by_id(id).one(txn).await?.is_some())
    }

    async fn count_dependents(
        &self,
        txn: &DatabaseTransaction,
        id: i64,
    ) -> std::result::Result<u64, DbErr> {
        violation_cases::Entity::find()
            .filter(violation_cases::Column::StudentId.eq(id))
            .count(txn)
            .await
    }

    async fn deactivate(
        &self,
        txn: &DatabaseTransaction,
        id: i64,
    ) -> std::result::Result<(), DbErr> {
        students::Entity::update_many()
            .col_expr(students::Column::IsActive, Expr::value(false))
            .col_expr(students::Column::UpdatedAt, Expr::value(now_ts()))
            .filter(students::Column::Id.eq(id))
            .exec(txn)
            .await?;
        Ok(())
    }

    async fn purge(&self, txn: &DatabaseTransaction, id: i64) -> std::result::Result<(), DbErr> {
        purge_cases(
            txn,
            Condition::all().add(violation_cases::Column::StudentId.eq(id)),
        )
        .await?;
        students::Entity::delete_by_id(id).exec(txn).await?;
        Ok(())
    }
}

pub(super) struct ViolationRemoval;

#[async_trait::async_trait]
impl RemovalPolicy for ViolationRemoval {
    const LABEL: &'static str = "Pelanggaran";

    async fn exists(&self, txn: &DatabaseTransaction, id: i64) -> std::result::Result<bool, DbErr> {
        Ok(violations::Entity::find_by_id(id).one(txn).await?.is_some())
    }

    async fn count_dependents(
        &self,
        txn: &DatabaseTransaction,
        id: i64,
    ) -> std::result::Result<u64, DbErr> {
        violation_cases::Entity::find()
            .filter(violation_cases::Column::ViolationId.eq(id))
            .count(txn)
            .await
    }

    async fn deactivate(
        &self,
        txn: &DatabaseTransaction,
        id: i64,
    ) -> std::result::Result<(), DbErr> {
        violations::Entity::update_many()
            .col_expr(violations::Column::IsActive, Expr::value(false))
            .col_expr(violations::Column::UpdatedAt, Expr::value(now_ts()))
            .filter(violations::Column::Id.eq(id))
            .exec(txn)
            .await?;
        Ok(())
    }

    async fn purge(&self, txn: &DatabaseTransaction, id: i64) -> std::result::Result<(), DbErr> {
        purge_cases(
            txn,
            Condition::all().add(violation_cases::Column::ViolationId.eq(id)),
        )
        .await?;
        violation_sanction_types::Entity::delete_many()
            .filter(violation_sanction_types::Column::ViolationId.eq(id))
            .exec(txn)
            .await?;
        violations::Entity::delete_by_id(id).exec(txn).await?;
        Ok(())
    }
}

pub(super) struct SanctionTypeRemoval;

#[async_trait::async_trait]
impl RemovalPolicy for SanctionTypeRemoval {
    const LABEL: &'static str = "Jenis sanksi";

    async fn exists(&self, txn: &DatabaseTransaction, id: i64) -> std::result::Result<bool, DbErr> {
        Ok(sanction_types::Entity::find_by_id(id)
            .one(txn)
            .await?
            .is_some())
    }

    async fn count_dependents(
        &self,
        txn: &DatabaseTransaction,
        id: i64,
    ) -> std::result::Result<u64, DbErr> {
        let actions = case_actions::Entity::find()
            .filter(case_actions::Column::SanctionTypeId.eq(id))
            .count(txn)
            .await?;
        let sanctions = sanctions::Entity::find()
            .filter(sanctions::Column::SanctionTypeId.eq(id))
            .count(txn)
            .await?;
        Ok(actions + sanctions)
    }

    async fn deactivate(
        &self,
        txn: &DatabaseTransaction,
        id: i64,
    ) -> std::result::Result<(), DbErr> {
        sanction_types::Entity::update_many()
            .col_expr(sanction_types::Column::IsActive, Expr::value(false))
            .col_expr(sanction_types::Column::UpdatedAt, Expr::value(now_ts()))
            .filter(sanction_types::Column::Id.eq(id))
            .exec(txn)
            .await?;
        Ok(())
    }

    async fn purge(&self, txn: &DatabaseTransaction, id: i64) -> std::result::Result<(), DbErr> {
        case_actions::Entity::delete_many()
            .filter(case_actions::Column::SanctionTypeId.eq(id))
            .exec(txn)
            .await?;
        sanctions::Entity::delete_many()
            .filter(sanctions::Column::SanctionTypeId.eq(id))
            .exec(txn)
            .await?;
        violation_sanction_types::Entity::delete_many()
            .filter(violation_sanction_types::Column::SanctionTypeId.eq(id))
            .exec(txn)
            .await?;
        sanction_types::Entity::delete_by_id(id).exec(txn).await?;
        Ok(())
    }
}

pub(super) struct TeacherRemoval;

#[async_trait::async_trait]
impl RemovalPolicy for TeacherRemoval {
    const LABEL: &'static str = "Guru";

    async fn exists(&self, txn: &DatabaseTransaction, id: i64) -> std::result::Result<bool, DbErr> {
        Ok(users::Entity::find_by_id(id).one(txn).await?.is_some())
    }

    async fn count_dependents(
        &self,
        txn: &DatabaseTransaction,
        id: i64,
    ) -> std::result::Result<u64, DbErr> {
        let cases = violation_cases::Entity::find()
            .filter(violation_cases::Column::ReportedBy.eq(id))
            .count(txn)
            .await?;
        let actions = case_actions::Entity::find()
            .filter(case_actions::Column::CreatedBy.eq(id))
            .count(txn)
            .await?;
        let sanctions = sanctions::Entity::find()
            .filter(sanctions::Column::CreatedBy.eq(id))
            .count(txn)
            .await?;
        Ok(cases + actions + sanctions)
    }

    async fn deactivate(
        &self,
        txn: &DatabaseTransaction,
        id: i64,
    ) -> std::result::Result<(), DbErr> {
        users::Entity::update_many()
            .col_expr(
                users::Column::Status,
                Expr::value(UserStatus::Inactive.to_string()),
            )
            .col_expr(users::Column::UpdatedAt, Expr::value(now_ts()))
            .filter(users::Column::Id.eq(id))
            .exec(txn)
            .await?;
        Ok(())
    }

    async fn purge(&self, txn: &DatabaseTransaction, id: i64) -> std::result::Result<(), DbErr> {
        let null = Expr::value(Option::<i64>::None);

        violation_cases::Entity::update_many()
            .col_expr(violation_cases::Column::ReportedBy, null.clone())
            .filter(violation_cases::Column::ReportedBy.eq(id))
            .exec(txn)
            .await?;
        for column in [
            case_actions::Column::CreatedBy,
            case_actions::Column::UpdatedBy,
            case_actions::Column::DeletedById,
        ] {
            case_actions::Entity::update_many()
                .col_expr(column, null.clone())
                .filter(column.eq(id))
                .exec(txn)
                .await?;
        }
        sanctions::Entity::update_many()
            .col_expr(sanctions::Column::CreatedBy, null.clone())
            .filter(sanctions::Column::CreatedBy.eq(id))
            .exec(txn)
            .await?;
        configs::Entity::update_many()
            .col_expr(configs::Column::UpdatedBy, null.clone())
            .filter(configs::Column::UpdatedBy.eq(id))
            .exec(txn)
            .await?;
        reports::Entity::update_many()
            .col_expr(reports::Column::GeneratedBy, null.clone())
            .filter(reports::Column::GeneratedBy.eq(id))
            .exec(txn)
            .await?;
        audit_logs::Entity::update_many()
            .col_expr(audit_logs::Column::UserId, null)
            .filter(audit_logs::Column::UserId.eq(id))
            .exec(txn)
            .await?;

        users::Entity::delete_by_id(id).exec(txn).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cases::requests::{CreateCaseActionRequest, CreateCaseRequest};
    use crate::models::sanction_types::requests::CreateSanctionTypeRequest;
    use crate::models::sanctions::requests::CreateSanctionRequest;
    use crate::models::violations::{
        entities::ViolationLevel,
        requests::{CreateViolationCategoryRequest, CreateViolationRequest},
    };
    use crate::storage::sea_orm_storage::students::tests::student_request;
    use crate::storage::sea_orm_storage::users::tests::teacher_request;
    use crate::storage::sea_orm_storage::violations::tests::seed_violation;
    use chrono::{FixedOffset, Utc};

    fn case_request(student_id: i64, violation_id: i64) -> CreateCaseRequest {
        CreateCaseRequest {
            student_id,
            violation_id,
            incident_date: Utc::now(),
            description: None,
            evidence_urls: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_student_without_cases_is_hard_deleted() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let student = storage
            .create_student_impl(student_request("5001", "X IPA 1"))
            .await
            .unwrap();

        let outcome = storage
            .remove_with_policy(&StudentRemoval, student.id, false)
            .await
            .unwrap();
        assert_eq!(outcome, RemovalOutcome::Deleted);
        assert!(
            storage
                .get_student_by_id_impl(student.id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_student_with_cases_deactivated_then_forced() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let teacher = storage
            .create_user_impl(teacher_request("wali01"))
            .await
            .unwrap();
        let student = storage
            .create_student_impl(student_request("5002", "X IPA 1"))
            .await
            .unwrap();
        let violation = seed_violation(&storage, "PASAL_9", "9.A").await;
        let offset = FixedOffset::east_opt(7 * 3600).unwrap();
        storage
            .create_case_impl(case_request(student.id, violation.violation.id), teacher.id, offset)
            .await
            .unwrap();

        let outcome = storage
            .remove_with_policy(&StudentRemoval, student.id, false)
            .await
            .unwrap();
        assert_eq!(outcome, RemovalOutcome::Deactivated { dependents: 1 });
        let kept = storage
            .get_student_by_id_impl(student.id)
            .await
            .unwrap()
            .unwrap();
        assert!(!kept.is_active);

        let outcome = storage
            .remove_with_policy(&StudentRemoval, student.id, true)
            .await
            .unwrap();
        assert_eq!(outcome, RemovalOutcome::Deleted);
        assert!(
            storage
                .list_cases_by_student_impl(student.id)
                .await
                .unwrap()
                .is_empty()
        );
    }

    /// 违规条目关联处分类型，案件上各有一条处理记录和处分
    async fn seed_linked_case(storage: &SeaOrmStorage, nis: &str) -> (i64, i64, i64) {
        let teacher = storage
            .create_user_impl(teacher_request(&format!("guru{nis}")))
            .await
            .unwrap();
        let student = storage
            .create_student_impl(student_request(nis, "XI IPS 1"))
            .await
            .unwrap();
        let sanction_type = storage
            .create_sanction_type_impl(CreateSanctionTypeRequest {
                name: format!("Skorsing {nis}"),
                description: None,
            })
            .await
            .unwrap();
        let category = storage
            .create_violation_category_impl(CreateViolationCategoryRequest {
                code: format!("PASAL_{nis}"),
                name: "Ketertiban".to_string(),
                level: ViolationLevel::Sedang,
                description: None,
            })
            .await
            .unwrap();
        let violation = storage
            .create_violation_impl(CreateViolationRequest {
                category_id: category.id,
                code: format!("{nis}.B"),
                name: "Berkelahi".to_string(),
                description: None,
                points: 25,
                sanction_type_ids: vec![sanction_type.id],
            })
            .await
            .unwrap();
        let offset = FixedOffset::east_opt(7 * 3600).unwrap();
        let case = storage
            .create_case_impl(case_request(student.id, violation.violation.id), teacher.id, offset)
            .await
            .unwrap();
        storage
            .create_case_action_impl(
                case.id,
                CreateCaseActionRequest {
                    sanction_type_id: sanction_type.id,
                    description: None,
                    action_date: None,
                    is_completed: false,
                    follow_up_date: None,
                },
                teacher.id,
            )
            .await
            .unwrap();
        storage
            .create_sanction_impl(
                case.id,
                CreateSanctionRequest {
                    sanction_type_id: sanction_type.id,
                    start_date: Utc::now(),
                    end_date: None,
                    notes: None,
                    is_completed: false,
                },
                teacher.id,
            )
            .await
            .unwrap();

        (case.id, violation.violation.id, sanction_type.id)
    }

    async fn count_links(storage: &SeaOrmStorage, condition: Condition) -> u64 {
        violation_sanction_types::Entity::find()
            .filter(condition)
            .count(&storage.db)
            .await
            .unwrap()
    }

    async fn count_case_children(storage: &SeaOrmStorage, case_id: i64) -> (u64, u64) {
        let actions = case_actions::Entity::find()
            .filter(case_actions::Column::CaseId.eq(case_id))
            .count(&storage.db)
            .await
            .unwrap();
        let sanctions = sanctions::Entity::find()
            .filter(sanctions::Column::CaseId.eq(case_id))
            .count(&storage.db)
            .await
            .unwrap();
        (actions, sanctions)
    }

    #[tokio::test]
    async fn test_violation_with_cases_deactivated_then_forced() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let (case_id, violation_id, _) = seed_linked_case(&storage, "5101").await;

        let outcome = storage
            .remove_with_policy(&ViolationRemoval, violation_id, false)
            .await
            .unwrap();
        assert_eq!(outcome, RemovalOutcome::Deactivated { dependents: 1 });
        let kept = storage
            .get_violation_by_id_impl(violation_id)
            .await
            .unwrap()
            .unwrap();
        assert!(!kept.violation.is_active);
        assert_eq!(kept.sanction_types.len(), 1);
        assert_eq!(count_case_children(&storage, case_id).await, (1, 1));

        let outcome = storage
            .remove_with_policy(&ViolationRemoval, violation_id, true)
            .await
            .unwrap();
        assert_eq!(outcome, RemovalOutcome::Deleted);
        assert!(
            storage
                .get_violation_by_id_impl(violation_id)
                .await
                .unwrap()
                .is_none()
        );
        assert!(storage.get_case_by_id_impl(case_id).await.unwrap().is_none());
        assert_eq!(count_case_children(&storage, case_id).await, (0, 0));
        let links = Condition::all().add(violation_sanction_types::Column::ViolationId.eq(violation_id));
        assert_eq!(count_links(&storage, links).await, 0);
    }

    #[tokio::test]
    async fn test_sanction_type_in_use_deactivated_then_forced() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let (case_id, violation_id, sanction_type_id) = seed_linked_case(&storage, "5201").await;

        let outcome = storage
            .remove_with_policy(&SanctionTypeRemoval, sanction_type_id, false)
            .await
            .unwrap();
        assert_eq!(outcome, RemovalOutcome::Deactivated { dependents: 2 });
        let kept = sanction_types::Entity::find_by_id(sanction_type_id)
            .one(&storage.db)
            .await
            .unwrap()
            .unwrap();
        assert!(!kept.is_active);

        let outcome = storage
            .remove_with_policy(&SanctionTypeRemoval, sanction_type_id, true)
            .await
            .unwrap();
        assert_eq!(outcome, RemovalOutcome::Deleted);
        assert!(
            sanction_types::Entity::find_by_id(sanction_type_id)
                .one(&storage.db)
                .await
                .unwrap()
                .is_none()
        );
        assert_eq!(count_case_children(&storage, case_id).await, (0, 0));
        let links =
            Condition::all().add(violation_sanction_types::Column::SanctionTypeId.eq(sanction_type_id));
        assert_eq!(count_links(&storage, links).await, 0);

        // 案件与违规条目本身保留
        assert!(storage.get_case_by_id_impl(case_id).await.unwrap().is_some());
        let violation = storage
            .get_violation_by_id_impl(violation_id)
            .await
            .unwrap()
            .unwrap();
        assert!(violation.sanction_types.is_empty());
    }

    #[tokio::test]
    async fn test_missing_entity_is_not_found() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let result = storage
            .remove_with_policy(&ViolationRemoval, 404, true)
            .await;
        assert!(matches!(result, Err(SidisiplinError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_teacher_purge_keeps_cases() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let teacher = storage
            .create_user_impl(teacher_request("pelapor"))
            .await
            .unwrap();
        let student = storage
            .create_student_impl(student_request("5003", "XI IPA 2"))
            .await
            .unwrap();
        let violation = seed_violation(&storage, "PASAL_8", "8.A").await;
        let offset = FixedOffset::east_opt(7 * 3600).unwrap();
        let case = storage
            .create_case_impl(case_request(student.id, violation.violation.id), teacher.id, offset)
            .await
            .unwrap();

        let outcome = storage
            .remove_with_policy(&TeacherRemoval, teacher.id, false)
            .await
            .unwrap();
        assert_eq!(outcome, RemovalOutcome::Deactivated { dependents: 1 });

        let outcome = storage
            .remove_with_policy(&TeacherRemoval, teacher.id, true)
            .await
            .unwrap();
        assert_eq!(outcome, RemovalOutcome::Deleted);

        let detail = storage.get_case_by_id_impl(case.id).await.unwrap().unwrap();
        assert_eq!(detail.case.reported_by, None);
        assert!(detail.reporter.is_none());
    }
}

use super::sanction_types::usable_sanction_type;
use super::{SeaOrmStorage, db_error, now_ts};
use crate::entity::{sanction_types, sanctions, violation_cases};
use crate::errors::{Result, SidisiplinError};
use crate::models::sanctions::{
    entities::Sanction,
    requests::{CreateSanctionRequest, UpdateSanctionRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

fn check_period(start: i64, end: Option<i64>) -> Result<()> {
    match end {
        Some(end) if end < start => Err(SidisiplinError::validation(
            "Tanggal selesai sanksi tidak boleh sebelum tanggal mulai",
        )),
        _ => Ok(()),
    }
}

impl SeaOrmStorage {
    pub async fn list_case_sanctions_impl(&self, case_id: i64) -> Result<Vec<Sanction>> {
        let rows = sanctions::Entity::find()
            .find_also_related(sanction_types::Entity)
            .filter(sanctions::Column::CaseId.eq(case_id))
            .order_by_asc(sanctions::Column::StartDate)
            .order_by_asc(sanctions::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_error("查询处分列表失败"))?;

        Ok(rows
            .into_iter()
            .map(|(sanction, sanction_type)| sanction.into_sanction(sanction_type.map(|t| t.name)))
            .collect())
    }

    /// 为案件登记正式处分
    pub async fn create_sanction_impl(
        &self,
        case_id: i64,
        req: CreateSanctionRequest,
        actor_id: i64,
    ) -> Result<Sanction> {
        let start = req.start_date.timestamp();
        let end = req.end_date.map(|d| d.timestamp());
        check_period(start, end)?;

        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        if violation_cases::Entity::find_by_id(case_id)
            .one(&txn)
            .await
            .map_err(db_error("查询案件失败"))?
            .is_none()
        {
            return Err(SidisiplinError::not_found("Kasus tidak ditemukan"));
        }
        let name = usable_sanction_type(&txn, req.sanction_type_id, None)
            .await?
            .name;

        let now = now_ts();
        let model = sanctions::ActiveModel {
            case_id: Set(case_id),
            sanction_type_id: Set(req.sanction_type_id),
            start_date: Set(start),
            end_date: Set(end),
            notes: Set(req.notes),
            is_completed: Set(req.is_completed),
            created_by: Set(Some(actor_id)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let created = model.insert(&txn).await.map_err(db_error("创建处分失败"))?;
        txn.commit().await.map_err(db_error("提交事务失败"))?;

        Ok(created.into_sanction(Some(name)))
    }

    /// 更新处分；完成标记不影响案件状态
    pub async fn update_sanction_impl(
        &self,
        id: i64,
        update: UpdateSanctionRequest,
    ) -> Result<Option<Sanction>> {
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        let Some(existing) = sanctions::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_error("查询处分失败"))?
        else {
            return Ok(None);
        };

        let start = update
            .start_date
            .map(|d| d.timestamp())
            .unwrap_or(existing.start_date);
        let end = match update.end_date {
            Some(d) => Some(d.timestamp()),
            None => existing.end_date,
        };
        check_period(start, end)?;

        let sanction_type_id = update.sanction_type_id.unwrap_or(existing.sanction_type_id);
        let name = usable_sanction_type(&txn, sanction_type_id, Some(existing.sanction_type_id))
            .await?
            .name;

        let mut model: sanctions::ActiveModel = existing.into();
        model.sanction_type_id = Set(sanction_type_id);
        model.start_date = Set(start);
        model.end_date = Set(end);
        model.updated_at = Set(now_ts());

        if let Some(notes) = update.notes {
            model.notes = Set(Some(notes).filter(|v| !v.is_empty()));
        }
        if let Some(is_completed) = update.is_completed {
            model.is_completed = Set(is_completed);
        }

        let updated = model.update(&txn).await.map_err(db_error("更新处分失败"))?;
        txn.commit().await.map_err(db_error("提交事务失败"))?;

        Ok(Some(updated.into_sanction(Some(name))))
    }

    pub async fn delete_sanction_impl(&self, id: i64) -> Result<bool> {
        let result = sanctions::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error("删除处分失败"))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cases::entities::CaseStatus;
    use crate::models::sanction_types::requests::CreateSanctionTypeRequest;
    use crate::storage::sea_orm_storage::cases::tests::seed_case;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_sanction_lifecycle_leaves_case_status() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let case = seed_case(&storage, "8001").await;
        let actor = case.reported_by.unwrap();
        let skorsing = storage
            .create_sanction_type_impl(CreateSanctionTypeRequest {
                name: "Skorsing".to_string(),
                description: None,
            })
            .await
            .unwrap();

        let start = Utc::now();
        let created = storage
            .create_sanction_impl(
                case.id,
                CreateSanctionRequest {
                    sanction_type_id: skorsing.id,
                    start_date: start,
                    end_date: Some(start + Duration::days(3)),
                    notes: None,
                    is_completed: false,
                },
                actor,
            )
            .await
            .unwrap();
        assert_eq!(created.sanction_type_name.as_deref(), Some("Skorsing"));

        let updated = storage
            .update_sanction_impl(
                created.id,
                UpdateSanctionRequest {
                    is_completed: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(updated.is_completed);

        let detail = storage.get_case_by_id_impl(case.id).await.unwrap().unwrap();
        assert_eq!(detail.case.status, CaseStatus::Pending);

        assert_eq!(storage.list_case_sanctions_impl(case.id).await.unwrap().len(), 1);
        assert!(storage.delete_sanction_impl(created.id).await.unwrap());
        assert!(storage.list_case_sanctions_impl(case.id).await.unwrap().is_empty());
        assert!(!storage.delete_sanction_impl(created.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_sanction_end_before_start_rejected() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let case = seed_case(&storage, "8101").await;
        let start = Utc::now();

        let result = storage
            .create_sanction_impl(
                case.id,
                CreateSanctionRequest {
                    sanction_type_id: 1,
                    start_date: start,
                    end_date: Some(start - Duration::days(1)),
                    notes: None,
                    is_completed: false,
                },
                case.reported_by.unwrap(),
            )
            .await;
        assert!(matches!(result, Err(SidisiplinError::Validation(_))));
    }
}

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, FixedOffset, Utc};

use super::{SeaOrmStorage, db_error, now_ts};
use crate::entity::{
    case_number_sequences, students, users, violation_cases, violation_categories, violations,
};
use crate::errors::{Result, SidisiplinError};
use crate::models::{
    PaginationInfo,
    cases::{
        entities::{
            CaseDetail, CaseReporter, CaseStatus, CaseStudent, CaseViolation, ViolationCase,
        },
        requests::{CaseListQuery, CreateCaseRequest, UpdateCaseRequest},
        responses::CaseListResponse,
    },
    students::entities::Gender,
    violations::entities::ViolationLevel,
};
use crate::utils::{format_case_number, like_contains};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};

/// 取下一个年度序号（先自增，不存在则插入 1）
async fn next_case_sequence(txn: &DatabaseTransaction, year: i32) -> Result<i64> {
    let updated = case_number_sequences::Entity::update_many()
        .col_expr(
            case_number_sequences::Column::LastValue,
            Expr::cust("last_value + 1"),
        )
        .filter(case_number_sequences::Column::Year.eq(year))
        .exec(txn)
        .await
        .map_err(db_error("更新案件编号计数器失败"))?;

    if updated.rows_affected == 0 {
        case_number_sequences::ActiveModel {
            year: Set(year),
            last_value: Set(1),
        }
        .insert(txn)
        .await
        .map_err(db_error("创建案件编号计数器失败"))?;
        return Ok(1);
    }

    let row = case_number_sequences::Entity::find_by_id(year)
        .one(txn)
        .await
        .map_err(db_error("读取案件编号计数器失败"))?
        .ok_or_else(|| SidisiplinError::database_operation("案件编号计数器丢失"))?;

    Ok(row.last_value)
}

/// 案件引用的学生与违规条目必须存在且启用
async fn ensure_case_refs<C: ConnectionTrait>(
    conn: &C,
    student_id: Option<i64>,
    violation_id: Option<i64>,
) -> Result<()> {
    if let Some(student_id) = student_id {
        match students::Entity::find_by_id(student_id)
            .one(conn)
            .await
            .map_err(db_error("查询学生失败"))?
        {
            None => return Err(SidisiplinError::validation("Siswa tidak ditemukan")),
            Some(s) if !s.is_active => {
                return Err(SidisiplinError::validation("Siswa sudah dinonaktifkan"));
            }
            Some(_) => {}
        }
    }

    if let Some(violation_id) = violation_id {
        match violations::Entity::find_by_id(violation_id)
            .one(conn)
            .await
            .map_err(db_error("查询违规条目失败"))?
        {
            None => return Err(SidisiplinError::validation("Pelanggaran tidak ditemukan")),
            Some(v) if !v.is_active => {
                return Err(SidisiplinError::validation(
                    "Pelanggaran sudah dinonaktifkan",
                ));
            }
            Some(_) => {}
        }
    }

    Ok(())
}

fn encode_evidence(urls: &[String]) -> Result<Option<String>> {
    if urls.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::to_string(urls)?))
}

/// 批量补全学生、违规条目与报告人
pub(super) async fn attach_case_details<C: ConnectionTrait>(
    conn: &C,
    models: Vec<violation_cases::Model>,
) -> Result<Vec<CaseDetail>> {
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let student_ids: HashSet<i64> = models.iter().map(|m| m.student_id).collect();
    let violation_ids: HashSet<i64> = models.iter().map(|m| m.violation_id).collect();
    let reporter_ids: HashSet<i64> = models.iter().filter_map(|m| m.reported_by).collect();

    let students: HashMap<i64, CaseStudent> = students::Entity::find()
        .filter(students::Column::Id.is_in(student_ids))
        .all(conn)
        .await
        .map_err(db_error("查询学生失败"))?
        .into_iter()
        .map(|s| {
            let student = CaseStudent {
                id: s.id,
                nis: s.nis,
                name: s.name,
                gender: s.gender.parse::<Gender>().unwrap_or(Gender::L),
                class_name: s.class_name,
            };
            (student.id, student)
        })
        .collect();

    let violation_models = violations::Entity::find()
        .filter(violations::Column::Id.is_in(violation_ids))
        .all(conn)
        .await
        .map_err(db_error("查询违规条目失败"))?;
    let category_ids: HashSet<i64> = violation_models.iter().map(|v| v.category_id).collect();
    let categories: HashMap<i64, violation_categories::Model> =
        violation_categories::Entity::find()
            .filter(violation_categories::Column::Id.is_in(category_ids))
            .all(conn)
            .await
            .map_err(db_error("查询违规类别失败"))?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
    let violations: HashMap<i64, CaseViolation> = violation_models
        .into_iter()
        .map(|v| {
            let category = categories.get(&v.category_id);
            let violation = CaseViolation {
                id: v.id,
                code: v.code,
                name: v.name,
                points: v.points,
                category_id: v.category_id,
                category_code: category.map(|c| c.code.clone()).unwrap_or_default(),
                category_name: category.map(|c| c.name.clone()).unwrap_or_default(),
                category_level: category
                    .and_then(|c| c.level.parse::<ViolationLevel>().ok())
                    .unwrap_or(ViolationLevel::Ringan),
            };
            (violation.id, violation)
        })
        .collect();

    let reporters: HashMap<i64, CaseReporter> = if reporter_ids.is_empty() {
        HashMap::new()
    } else {
        users::Entity::find()
            .filter(users::Column::Id.is_in(reporter_ids))
            .all(conn)
            .await
            .map_err(db_error("查询报告人失败"))?
            .into_iter()
            .map(|u| {
                (
                    u.id,
                    CaseReporter {
                        id: u.id,
                        username: u.username,
                        display_name: u.display_name,
                    },
                )
            })
            .collect()
    };

    Ok(models
        .into_iter()
        .map(|m| CaseDetail {
            student: students.get(&m.student_id).cloned(),
            violation: violations.get(&m.violation_id).cloned(),
            reporter: m.reported_by.and_then(|id| reporters.get(&id).cloned()),
            case: m.into_case(),
        })
        .collect())
}

impl SeaOrmStorage {
    fn case_filters(query: &CaseListQuery) -> Select<violation_cases::Entity> {
        let mut select = violation_cases::Entity::find();

        if let Some(status) = query.status {
            select = select.filter(violation_cases::Column::Status.eq(status.as_str()));
        }
        if let Some(student_id) = query.student_id {
            select = select.filter(violation_cases::Column::StudentId.eq(student_id));
        }
        if let Some(violation_id) = query.violation_id {
            select = select.filter(violation_cases::Column::ViolationId.eq(violation_id));
        }
        if let Some(from) = query.from {
            select = select.filter(violation_cases::Column::IncidentDate.gte(from));
        }
        if let Some(until) = query.until {
            select = select.filter(violation_cases::Column::IncidentDate.lt(until));
        }

        if let Some(ref class_name) = query.class_name
            && !class_name.trim().is_empty()
        {
            select = select.filter(
                violation_cases::Column::StudentId.in_subquery(
                    sea_orm::sea_query::Query::select()
                        .column(students::Column::Id)
                        .from(students::Entity)
                        .and_where(students::Column::ClassName.eq(class_name.trim()))
                        .to_owned(),
                ),
            );
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let term = search.trim();
            select = select.filter(
                Condition::any()
                    .add(violation_cases::Column::CaseNumber.like(like_contains(term)))
                    .add(
                        violation_cases::Column::StudentId.in_subquery(
                            sea_orm::sea_query::Query::select()
                                .column(students::Column::Id)
                                .from(students::Entity)
                                .and_where(students::Column::Name.like(like_contains(term)))
                                .to_owned(),
                        ),
                    ),
            );
        }

        select
    }

    /// 创建案件并分配编号
    pub async fn create_case_impl(
        &self,
        req: CreateCaseRequest,
        reported_by: i64,
        offset: FixedOffset,
    ) -> Result<ViolationCase> {
        let evidence_urls = encode_evidence(&req.evidence_urls)?;

        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        ensure_case_refs(&txn, Some(req.student_id), Some(req.violation_id)).await?;

        let year = Utc::now().with_timezone(&offset).year();
        let seq = next_case_sequence(&txn, year).await?;

        let now = now_ts();
        let model = violation_cases::ActiveModel {
            case_number: Set(format_case_number(year, seq)),
            student_id: Set(req.student_id),
            violation_id: Set(req.violation_id),
            reported_by: Set(Some(reported_by)),
            incident_date: Set(req.incident_date.timestamp()),
            description: Set(req.description),
            evidence_urls: Set(evidence_urls),
            status: Set(CaseStatus::Pending.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let created = model.insert(&txn).await.map_err(db_error("创建案件失败"))?;
        txn.commit().await.map_err(db_error("提交事务失败"))?;

        Ok(created.into_case())
    }

    pub async fn get_case_by_id_impl(&self, id: i64) -> Result<Option<CaseDetail>> {
        let Some(model) = violation_cases::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询案件失败"))?
        else {
            return Ok(None);
        };

        Ok(attach_case_details(&self.db, vec![model]).await?.pop())
    }

    /// 分页列出案件，按事发时间倒序
    pub async fn list_cases_with_pagination_impl(
        &self,
        query: CaseListQuery,
    ) -> Result<CaseListResponse> {
        let page = query.page.max(1);
        let size = query.size.clamp(1, 100);

        let paginator = Self::case_filters(&query)
            .order_by_desc(violation_cases::Column::IncidentDate)
            .order_by_desc(violation_cases::Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_error("查询案件总数失败"))?;
        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_error("查询案件列表失败"))?;

        Ok(CaseListResponse {
            items: attach_case_details(&self.db, models).await?,
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn list_cases_between_impl(&self, from: i64, until: i64) -> Result<Vec<CaseDetail>> {
        let models = violation_cases::Entity::find()
            .filter(violation_cases::Column::IncidentDate.gte(from))
            .filter(violation_cases::Column::IncidentDate.lt(until))
            .order_by_asc(violation_cases::Column::IncidentDate)
            .order_by_asc(violation_cases::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_error("查询案件列表失败"))?;

        attach_case_details(&self.db, models).await
    }

    pub async fn list_cases_by_student_impl(&self, student_id: i64) -> Result<Vec<CaseDetail>> {
        let models = violation_cases::Entity::find()
            .filter(violation_cases::Column::StudentId.eq(student_id))
            .order_by_desc(violation_cases::Column::IncidentDate)
            .order_by_desc(violation_cases::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_error("查询学生案件失败"))?;

        attach_case_details(&self.db, models).await
    }

    pub async fn list_recent_cases_impl(&self, limit: u64) -> Result<Vec<CaseDetail>> {
        let models = violation_cases::Entity::find()
            .order_by_desc(violation_cases::Column::CreatedAt)
            .order_by_desc(violation_cases::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_error("查询最近案件失败"))?;

        attach_case_details(&self.db, models).await
    }

    /// 更新案件（可更换学生或违规条目、直接改状态）
    pub async fn update_case_impl(
        &self,
        id: i64,
        update: UpdateCaseRequest,
    ) -> Result<Option<ViolationCase>> {
        let evidence_urls = match update.evidence_urls {
            Some(ref urls) => Some(encode_evidence(urls)?),
            None => None,
        };

        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        let Some(existing) = violation_cases::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_error("查询案件失败"))?
        else {
            return Ok(None);
        };

        let student_id = update.student_id.filter(|s| *s != existing.student_id);
        let violation_id = update.violation_id.filter(|v| *v != existing.violation_id);
        ensure_case_refs(&txn, student_id, violation_id).await?;

        let mut model: violation_cases::ActiveModel = existing.into();
        model.updated_at = Set(now_ts());

        if let Some(student_id) = student_id {
            model.student_id = Set(student_id);
        }
        if let Some(violation_id) = violation_id {
            model.violation_id = Set(violation_id);
        }
        if let Some(incident_date) = update.incident_date {
            model.incident_date = Set(incident_date.timestamp());
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description).filter(|v| !v.is_empty()));
        }
        if let Some(evidence_urls) = evidence_urls {
            model.evidence_urls = Set(evidence_urls);
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        let updated = model.update(&txn).await.map_err(db_error("更新案件失败"))?;
        txn.commit().await.map_err(db_error("提交事务失败"))?;

        Ok(Some(updated.into_case()))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::students::tests::student_request;
    use crate::storage::sea_orm_storage::users::tests::teacher_request;
    use crate::storage::sea_orm_storage::violations::tests::seed_violation;

    pub(crate) fn wib() -> FixedOffset {
        FixedOffset::east_opt(7 * 3600).unwrap()
    }

    /// 学生、违规条目、报告人俱全的一个案件
    pub(crate) async fn seed_case(storage: &SeaOrmStorage, nis: &str) -> ViolationCase {
        let teacher = storage
            .create_user_impl(teacher_request(&format!("guru{nis}")))
            .await
            .unwrap();
        let student = storage
            .create_student_impl(student_request(nis, "X IPA 1"))
            .await
            .unwrap();
        let violation =
            seed_violation(storage, &format!("PASAL_{nis}"), &format!("{nis}.A")).await;

        storage
            .create_case_impl(
                CreateCaseRequest {
                    student_id: student.id,
                    violation_id: violation.violation.id,
                    incident_date: Utc::now(),
                    description: Some("Terlambat masuk kelas".to_string()),
                    evidence_urls: vec!["https://contoh.sch.id/bukti.jpg".to_string()],
                },
                teacher.id,
                wib(),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_case_numbers_increase_within_year() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let first = seed_case(&storage, "6001").await;
        let second = seed_case(&storage, "6002").await;
        let third = seed_case(&storage, "6003").await;

        let year = Utc::now().with_timezone(&wib()).year();
        assert_eq!(first.case_number, format_case_number(year, 1));
        assert_eq!(second.case_number, format_case_number(year, 2));
        assert_eq!(third.case_number, format_case_number(year, 3));
        assert_eq!(first.status, CaseStatus::Pending);
        assert_eq!(first.evidence_urls.len(), 1);
    }

    #[tokio::test]
    async fn test_case_detail_includes_relations() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let case = seed_case(&storage, "6101").await;

        let detail = storage.get_case_by_id_impl(case.id).await.unwrap().unwrap();
        assert_eq!(detail.student.as_ref().map(|s| s.nis.as_str()), Some("6101"));
        let violation = detail.violation.unwrap();
        assert_eq!(violation.code, "6101.A");
        assert_eq!(violation.category_code, "PASAL_6101");
        assert_eq!(
            detail.reporter.map(|r| r.username),
            Some("guru6101".to_string())
        );
    }

    #[tokio::test]
    async fn test_case_requires_active_student() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let case = seed_case(&storage, "6201").await;

        let result = storage
            .create_case_impl(
                CreateCaseRequest {
                    student_id: 9999,
                    violation_id: case.violation_id,
                    incident_date: Utc::now(),
                    description: None,
                    evidence_urls: Vec::new(),
                },
                case.reported_by.unwrap(),
                wib(),
            )
            .await;
        assert!(matches!(result, Err(SidisiplinError::Validation(_))));
    }

    #[tokio::test]
    async fn test_list_cases_filters() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let first = seed_case(&storage, "6301").await;
        seed_case(&storage, "6302").await;

        storage
            .update_case_impl(
                first.id,
                UpdateCaseRequest {
                    status: Some(CaseStatus::Dibatalkan),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        let cancelled = storage
            .list_cases_with_pagination_impl(CaseListQuery {
                page: 1,
                size: 10,
                status: Some(CaseStatus::Dibatalkan),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(cancelled.pagination.total, 1);
        assert_eq!(cancelled.items[0].case.id, first.id);

        let by_name = storage
            .list_cases_with_pagination_impl(CaseListQuery {
                page: 1,
                size: 10,
                search: Some("Siswa 6302".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_name.pagination.total, 1);

        let by_class = storage
            .list_cases_with_pagination_impl(CaseListQuery {
                page: 1,
                size: 10,
                class_name: Some("X IPA 1".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_class.pagination.total, 2);

        let future = Utc::now().timestamp() + 3600;
        let none = storage
            .list_cases_with_pagination_impl(CaseListQuery {
                page: 1,
                size: 10,
                from: Some(future),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(none.pagination.total, 0);
    }
}

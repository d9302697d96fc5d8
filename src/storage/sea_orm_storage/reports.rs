use super::cases::attach_case_details;
use super::{SeaOrmStorage, db_error, now_ts};
use crate::entity::{reports, students, violation_cases};
use crate::errors::Result;
use crate::models::{
    PaginationInfo,
    cases::entities::CaseStatus,
    reports::{
        entities::{CaseFact, SavedReport},
        requests::NewReport,
        responses::ReportListResponse,
    },
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 区间内案件的扁平行，用于统计
    pub async fn list_case_facts_impl(&self, from: i64, until: i64) -> Result<Vec<CaseFact>> {
        let models = violation_cases::Entity::find()
            .filter(violation_cases::Column::IncidentDate.gte(from))
            .filter(violation_cases::Column::IncidentDate.lt(until))
            .order_by_asc(violation_cases::Column::IncidentDate)
            .all(&self.db)
            .await
            .map_err(db_error("查询统计案件失败"))?;

        let details = attach_case_details(&self.db, models).await?;

        Ok(details
            .into_iter()
            .filter_map(|detail| {
                let student = detail.student?;
                let violation = detail.violation?;
                Some(CaseFact {
                    case_id: detail.case.id,
                    status: detail.case.status,
                    incident_date: detail.case.incident_date,
                    student_id: student.id,
                    student_nis: student.nis,
                    student_name: student.name,
                    class_name: student.class_name,
                    violation_id: violation.id,
                    violation_code: violation.code,
                    violation_name: violation.name,
                    points: violation.points,
                    category_id: violation.category_id,
                    category_code: violation.category_code,
                    category_name: violation.category_name,
                    category_level: violation.category_level,
                })
            })
            .collect())
    }

    pub async fn count_active_students_impl(&self) -> Result<u64> {
        students::Entity::find()
            .filter(students::Column::IsActive.eq(true))
            .count(&self.db)
            .await
            .map_err(db_error("统计学生数量失败"))
    }

    /// 各状态案件数，缺失的状态补 0
    pub async fn count_cases_by_status_impl(&self) -> Result<Vec<(CaseStatus, i64)>> {
        let rows: Vec<(String, i64)> = violation_cases::Entity::find()
            .select_only()
            .column(violation_cases::Column::Status)
            .column_as(sea_orm::sea_query::ExprTrait::count(Expr::col(violation_cases::Column::Id)), "count")
            .group_by(violation_cases::Column::Status)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_error("统计案件状态失败"))?;

        Ok(CaseStatus::ALL
            .into_iter()
            .map(|status| {
                let count = rows
                    .iter()
                    .find(|(s, _)| s == status.as_str())
                    .map(|(_, c)| *c)
                    .unwrap_or(0);
                (status, count)
            })
            .collect())
    }

    pub async fn create_report_impl(&self, report: NewReport) -> Result<SavedReport> {
        let model = reports::ActiveModel {
            title: Set(report.title),
            report_type: Set(report.report_type),
            period_start: Set(report.period_start),
            period_end: Set(report.period_end),
            data: Set(serde_json::to_string(&report.data)?),
            generated_by: Set(report.generated_by),
            created_at: Set(now_ts()),
            ..Default::default()
        };

        let created = model
            .insert(&self.db)
            .await
            .map_err(db_error("保存报表失败"))?;

        Ok(created.into_report(true))
    }

    pub async fn get_report_by_id_impl(&self, id: i64) -> Result<Option<SavedReport>> {
        let result = reports::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询报表失败"))?;

        Ok(result.map(|m| m.into_report(true)))
    }

    /// 分页列出报表，不含数据体
    pub async fn list_reports_with_pagination_impl(
        &self,
        page: u64,
        size: u64,
        report_type: Option<String>,
    ) -> Result<ReportListResponse> {
        let page = page.max(1);
        let size = size.clamp(1, 100);

        let mut select = reports::Entity::find();
        if let Some(report_type) = report_type {
            select = select.filter(reports::Column::ReportType.eq(report_type));
        }

        let paginator = select
            .order_by_desc(reports::Column::CreatedAt)
            .order_by_desc(reports::Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_error("查询报表总数失败"))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_error("查询报表列表失败"))?;

        Ok(ReportListResponse {
            items: items.into_iter().map(|m| m.into_report(false)).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    pub async fn delete_report_impl(&self, id: i64) -> Result<bool> {
        let result = reports::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error("删除报表失败"))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::reports::entities::SavedReport;
    use crate::storage::sea_orm_storage::cases::tests::seed_case;
    use chrono::Utc;

    #[tokio::test]
    async fn test_case_facts_and_status_counts() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        seed_case(&storage, "9001").await;
        seed_case(&storage, "9002").await;

        let now = Utc::now().timestamp();
        let facts = storage
            .list_case_facts_impl(now - 3600, now + 3600)
            .await
            .unwrap();
        assert_eq!(facts.len(), 2);
        assert_eq!(facts[0].class_name, "X IPA 1");
        assert_eq!(facts[0].points, 10);

        let empty = storage
            .list_case_facts_impl(now + 3600, now + 7200)
            .await
            .unwrap();
        assert!(empty.is_empty());

        let counts = storage.count_cases_by_status_impl().await.unwrap();
        assert_eq!(counts.len(), 4);
        assert_eq!(counts[0], (CaseStatus::Pending, 2));
        assert_eq!(counts[2], (CaseStatus::Selesai, 0));

        assert_eq!(storage.count_active_students_impl().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_saved_reports() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let saved = storage
            .create_report_impl(NewReport {
                title: "Laporan Januari".to_string(),
                report_type: SavedReport::MONTHLY.to_string(),
                period_start: 0,
                period_end: 100,
                data: serde_json::json!({ "total_cases": 3 }),
                generated_by: None,
            })
            .await
            .unwrap();
        assert_eq!(saved.data, Some(serde_json::json!({ "total_cases": 3 })));

        let list = storage
            .list_reports_with_pagination_impl(1, 10, Some(SavedReport::MONTHLY.to_string()))
            .await
            .unwrap();
        assert_eq!(list.pagination.total, 1);
        assert!(list.items[0].data.is_none());

        assert!(storage.delete_report_impl(saved.id).await.unwrap());
        assert!(storage.get_report_by_id_impl(saved.id).await.unwrap().is_none());
    }
}

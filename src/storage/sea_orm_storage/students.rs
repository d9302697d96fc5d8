use super::{SeaOrmStorage, db_error, ensure_unique, now_ts};
use crate::entity::students::{ActiveModel, Column, Entity as Students};
use crate::errors::Result;
use crate::models::{
    PaginationInfo,
    students::{
        entities::Student,
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
        responses::StudentListResponse,
    },
};
use crate::utils::like_contains;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};

fn format_birth_date(date: Option<chrono::NaiveDate>) -> Option<String> {
    date.map(|d| d.format("%Y-%m-%d").to_string())
}

impl SeaOrmStorage {
    async fn check_nis_unique<C: ConnectionTrait>(
        conn: &C,
        nis: &str,
        exclude_id: Option<i64>,
    ) -> Result<()> {
        let mut select = Students::find().filter(Column::Nis.eq(nis));
        if let Some(id) = exclude_id {
            select = select.filter(Column::Id.ne(id));
        }
        let existing = select
            .one(conn)
            .await
            .map_err(db_error("查询学生失败"))?;
        ensure_unique("NIS", nis, existing.map(|s| s.is_active))
    }

    fn student_filters(query: &StudentListQuery) -> Select<Students> {
        let mut select = Students::find();

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let term = search.trim();
            select = select.filter(
                Condition::any()
                    .add(Column::Nis.like(like_contains(term)))
                    .add(Column::Nisn.like(like_contains(term)))
                    .add(Column::Name.like(like_contains(term))),
            );
        }

        if let Some(ref class_name) = query.class_name
            && !class_name.trim().is_empty()
        {
            select = select.filter(Column::ClassName.eq(class_name.trim()));
        }

        if let Some(is_active) = query.is_active {
            select = select.filter(Column::IsActive.eq(is_active));
        }

        select
    }

    /// 创建学生
    pub async fn create_student_impl(&self, req: CreateStudentRequest) -> Result<Student> {
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        Self::check_nis_unique(&txn, &req.nis, None).await?;

        let now = now_ts();
        let model = ActiveModel {
            nis: Set(req.nis),
            nisn: Set(req.nisn),
            name: Set(req.name),
            gender: Set(req.gender.to_string()),
            class_name: Set(req.class_name),
            birth_date: Set(format_birth_date(req.birth_date)),
            parent_name: Set(req.parent_name),
            parent_phone: Set(req.parent_phone),
            address: Set(req.address),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&txn).await.map_err(db_error("创建学生失败"))?;
        txn.commit().await.map_err(db_error("提交事务失败"))?;

        Ok(result.into_student())
    }

    pub async fn get_student_by_id_impl(&self, id: i64) -> Result<Option<Student>> {
        let result = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询学生失败"))?;

        Ok(result.map(|m| m.into_student()))
    }

    pub async fn get_student_by_nis_impl(&self, nis: &str) -> Result<Option<Student>> {
        let result = Students::find()
            .filter(Column::Nis.eq(nis))
            .one(&self.db)
            .await
            .map_err(db_error("查询学生失败"))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 分页列出学生
    pub async fn list_students_with_pagination_impl(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        let page = query.page.max(1);
        let size = query.size.clamp(1, 100);

        let paginator = Self::student_filters(&query)
            .order_by_asc(Column::ClassName)
            .order_by_asc(Column::Name)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_error("查询学生总数失败"))?;
        let students = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_error("查询学生列表失败"))?;

        Ok(StudentListResponse {
            items: students.into_iter().map(|m| m.into_student()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 列出全部符合条件的学生（导出用）
    pub async fn list_all_students_impl(&self, query: StudentListQuery) -> Result<Vec<Student>> {
        let students = Self::student_filters(&query)
            .order_by_asc(Column::ClassName)
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(db_error("查询学生列表失败"))?;

        Ok(students.into_iter().map(|m| m.into_student()).collect())
    }

    /// 班级名称列表
    pub async fn list_student_classes_impl(&self) -> Result<Vec<String>> {
        Students::find()
            .select_only()
            .column(Column::ClassName)
            .distinct()
            .order_by_asc(Column::ClassName)
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .map_err(db_error("查询班级列表失败"))
    }

    /// 更新学生
    pub async fn update_student_impl(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        let Some(existing) = Students::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_error("查询学生失败"))?
        else {
            return Ok(None);
        };

        if let Some(ref nis) = update.nis
            && *nis != existing.nis
        {
            Self::check_nis_unique(&txn, nis, Some(id)).await?;
        }

        let mut model: ActiveModel = existing.into();
        model.updated_at = Set(now_ts());

        if let Some(nis) = update.nis {
            model.nis = Set(nis);
        }
        if let Some(nisn) = update.nisn {
            model.nisn = Set(Some(nisn).filter(|v| !v.is_empty()));
        }
        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(gender) = update.gender {
            model.gender = Set(gender.to_string());
        }
        if let Some(class_name) = update.class_name {
            model.class_name = Set(class_name);
        }
        if let Some(birth_date) = update.birth_date {
            model.birth_date = Set(format_birth_date(Some(birth_date)));
        }
        if let Some(parent_name) = update.parent_name {
            model.parent_name = Set(Some(parent_name).filter(|v| !v.is_empty()));
        }
        if let Some(parent_phone) = update.parent_phone {
            model.parent_phone = Set(Some(parent_phone).filter(|v| !v.is_empty()));
        }
        if let Some(address) = update.address {
            model.address = Set(Some(address).filter(|v| !v.is_empty()));
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }

        let updated = model.update(&txn).await.map_err(db_error("更新学生失败"))?;
        txn.commit().await.map_err(db_error("提交事务失败"))?;

        Ok(Some(updated.into_student()))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::errors::SidisiplinError;
    use crate::models::students::entities::Gender;

    pub(crate) fn student_request(nis: &str, class_name: &str) -> CreateStudentRequest {
        CreateStudentRequest {
            nis: nis.to_string(),
            nisn: None,
            name: format!("Siswa {nis}"),
            gender: Gender::L,
            class_name: class_name.to_string(),
            birth_date: chrono::NaiveDate::from_ymd_opt(2008, 5, 17),
            parent_name: None,
            parent_phone: None,
            address: None,
        }
    }

    #[tokio::test]
    async fn test_create_student_keeps_birth_date() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let student = storage
            .create_student_impl(student_request("1001", "X IPA 1"))
            .await
            .unwrap();
        assert!(student.is_active);
        assert_eq!(
            student.birth_date,
            chrono::NaiveDate::from_ymd_opt(2008, 5, 17)
        );
    }

    #[tokio::test]
    async fn test_duplicate_nis_distinct_messages() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let student = storage
            .create_student_impl(student_request("1002", "X IPA 1"))
            .await
            .unwrap();

        let err = storage
            .create_student_impl(student_request("1002", "X IPA 2"))
            .await
            .unwrap_err();
        assert!(matches!(err, SidisiplinError::Validation(_)));
        assert!(!err.message().contains("dinonaktifkan"));

        storage
            .update_student_impl(
                student.id,
                UpdateStudentRequest {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let err = storage
            .create_student_impl(student_request("1002", "X IPA 2"))
            .await
            .unwrap_err();
        assert!(err.message().contains("dinonaktifkan"));
    }

    #[tokio::test]
    async fn test_update_nis_to_existing_rejected() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        storage
            .create_student_impl(student_request("2001", "XI IPS 1"))
            .await
            .unwrap();
        let other = storage
            .create_student_impl(student_request("2002", "XI IPS 1"))
            .await
            .unwrap();

        let result = storage
            .update_student_impl(
                other.id,
                UpdateStudentRequest {
                    nis: Some("2001".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(SidisiplinError::Validation(_))));
    }

    #[tokio::test]
    async fn test_list_students_and_classes() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        for (nis, class) in [("3001", "XII IPA 1"), ("3002", "X IPA 1"), ("3003", "X IPA 1")] {
            storage
                .create_student_impl(student_request(nis, class))
                .await
                .unwrap();
        }

        let classes = storage.list_student_classes_impl().await.unwrap();
        assert_eq!(classes, vec!["X IPA 1".to_string(), "XII IPA 1".to_string()]);

        let page = storage
            .list_students_with_pagination_impl(StudentListQuery {
                page: 1,
                size: 10,
                class_name: Some("X IPA 1".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 2);

        let searched = storage
            .list_all_students_impl(StudentListQuery {
                search: Some("3001".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(searched.len(), 1);
    }
}

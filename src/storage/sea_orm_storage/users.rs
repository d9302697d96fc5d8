use super::{SeaOrmStorage, db_error, ensure_unique, now_ts};
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::Result;
use crate::models::{
    PaginationInfo,
    users::{
        entities::{User, UserRole, UserStatus},
        requests::{CreateUserRequest, UpdateUserRequest, UserListParams},
        responses::UserListResponse,
    },
};
use crate::utils::like_contains;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 用户名与邮箱唯一性检查（排除自身）
    async fn check_user_unique<C: ConnectionTrait>(
        conn: &C,
        username: Option<&str>,
        email: Option<&str>,
        exclude_id: Option<i64>,
    ) -> Result<()> {
        let exclude = |select: sea_orm::Select<Users>| match exclude_id {
            Some(id) => select.filter(Column::Id.ne(id)),
            None => select,
        };

        if let Some(username) = username {
            let existing = exclude(Users::find().filter(Column::Username.eq(username)))
                .one(conn)
                .await
                .map_err(db_error("查询用户失败"))?;
            ensure_unique(
                "Username",
                username,
                existing.map(|u| u.status == UserStatus::Active.to_string()),
            )?;
        }

        if let Some(email) = email {
            let existing = exclude(Users::find().filter(Column::Email.eq(email)))
                .one(conn)
                .await
                .map_err(db_error("查询用户失败"))?;
            ensure_unique(
                "Email",
                email,
                existing.map(|u| u.status == UserStatus::Active.to_string()),
            )?;
        }

        Ok(())
    }

    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        Self::check_user_unique(&txn, Some(&req.username), Some(&req.email), None).await?;

        let now = now_ts();
        let model = ActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            password_hash: Set(req.password),
            role: Set(req.role.to_string()),
            status: Set(UserStatus::Active.to_string()),
            display_name: Set(req.display_name),
            nip: Set(req.nip),
            phone: Set(req.phone),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&txn).await.map_err(db_error("创建用户失败"))?;
        txn.commit().await.map_err(db_error("提交事务失败"))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询用户失败"))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名或邮箱获取用户
    pub async fn get_user_by_username_or_email_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        let result = Users::find()
            .filter(
                Condition::any()
                    .add(Column::Username.eq(identifier))
                    .add(Column::Email.eq(identifier)),
            )
            .one(&self.db)
            .await
            .map_err(db_error("查询用户失败"))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 分页列出用户
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListParams,
    ) -> Result<UserListResponse> {
        let (page, size) = query.pagination.normalized();

        let mut select = Users::find();

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let term = search.trim();
            select = select.filter(
                Condition::any()
                    .add(Column::Username.like(like_contains(term)))
                    .add(Column::Email.like(like_contains(term)))
                    .add(Column::DisplayName.like(like_contains(term)))
                    .add(Column::Nip.like(like_contains(term))),
            );
        }

        if let Some(role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_error("查询用户总数失败"))?;
        let users = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_error("查询用户列表失败"))?;

        Ok(UserListResponse {
            items: users.into_iter().map(|m| m.into_user()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let result = Users::update_many()
            .col_expr(
                Column::LastLogin,
                sea_orm::sea_query::Expr::value(now_ts()),
            )
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(db_error("更新最后登录时间失败"))?;

        Ok(result.rows_affected > 0)
    }

    /// 更新用户信息
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        let Some(existing) = Users::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_error("查询用户失败"))?
        else {
            return Ok(None);
        };

        if let Some(ref email) = update.email
            && *email != existing.email
        {
            Self::check_user_unique(&txn, None, Some(email), Some(id)).await?;
        }

        let mut model: ActiveModel = existing.into();
        model.updated_at = Set(now_ts());

        if let Some(email) = update.email {
            model.email = Set(email);
        }
        if let Some(password) = update.password {
            model.password_hash = Set(password);
        }
        if let Some(role) = update.role {
            model.role = Set(role.to_string());
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }
        if let Some(display_name) = update.display_name {
            model.display_name = Set(Some(display_name).filter(|v| !v.is_empty()));
        }
        if let Some(nip) = update.nip {
            model.nip = Set(Some(nip).filter(|v| !v.is_empty()));
        }
        if let Some(phone) = update.phone {
            model.phone = Set(Some(phone).filter(|v| !v.is_empty()));
        }

        let updated = model.update(&txn).await.map_err(db_error("更新用户失败"))?;
        txn.commit().await.map_err(db_error("提交事务失败"))?;

        Ok(Some(updated.into_user()))
    }

    /// 统计启用中的管理员数量
    pub async fn count_admins_impl(&self) -> Result<u64> {
        Users::find()
            .filter(Column::Role.eq(UserRole::Admin.to_string()))
            .filter(Column::Status.eq(UserStatus::Active.to_string()))
            .count(&self.db)
            .await
            .map_err(db_error("统计管理员数量失败"))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::errors::SidisiplinError;

    pub(crate) fn teacher_request(username: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@sekolah.sch.id"),
            password: "hashed".to_string(),
            role: UserRole::Guru,
            display_name: Some(format!("Guru {username}")),
            nip: None,
            phone: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let user = storage
            .create_user_impl(teacher_request("budi01"))
            .await
            .unwrap();
        assert_eq!(user.role, UserRole::Guru);
        assert_eq!(user.status, UserStatus::Active);

        let by_email = storage
            .get_user_by_username_or_email_impl("budi01@sekolah.sch.id")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, user.id);
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected_with_inactive_hint() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let user = storage
            .create_user_impl(teacher_request("siti02"))
            .await
            .unwrap();

        let err = storage
            .create_user_impl(teacher_request("siti02"))
            .await
            .unwrap_err();
        assert!(matches!(err, SidisiplinError::Validation(_)));
        assert!(!err.message().contains("dinonaktifkan"));

        storage
            .update_user_impl(
                user.id,
                UpdateUserRequest {
                    status: Some(UserStatus::Inactive),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let err = storage
            .create_user_impl(teacher_request("siti02"))
            .await
            .unwrap_err();
        assert!(err.message().contains("dinonaktifkan"));
    }

    #[tokio::test]
    async fn test_list_users_filters_by_role() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        storage
            .create_user_impl(teacher_request("guru_a"))
            .await
            .unwrap();
        let mut admin = teacher_request("admin_a");
        admin.role = UserRole::Admin;
        storage.create_user_impl(admin).await.unwrap();

        let list = storage
            .list_users_with_pagination_impl(UserListParams {
                pagination: Default::default(),
                role: Some(UserRole::Admin),
                status: None,
                search: None,
            })
            .await
            .unwrap();
        assert_eq!(list.pagination.total, 1);
        assert_eq!(list.items[0].username, "admin_a");
        assert_eq!(storage.count_admins_impl().await.unwrap(), 1);
    }
}

//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。
//! 所有"先检查后写入"的流程都在单个事务内完成，并由唯一索引兜底。

mod case_actions;
mod cases;
mod removal;
mod reports;
mod sanction_types;
mod sanctions;
mod students;
mod system;
mod users;
mod violations;

use crate::config::AppConfig;
use crate::errors::{Result, SidisiplinError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        Self::from_connection(db).await
    }

    /// 使用已有连接创建实例并执行迁移
    pub async fn from_connection(db: DatabaseConnection) -> Result<Self> {
        Migrator::up(&db, None)
            .await
            .map_err(|e| SidisiplinError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成");

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| SidisiplinError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| SidisiplinError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(2)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false);

        Database::connect(opt)
            .await
            .map_err(|e| SidisiplinError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(SidisiplinError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    /// 测试用内存数据库（单连接，保证所有查询看到同一个库）
    #[cfg(test)]
    pub(crate) async fn new_in_memory() -> Result<Self> {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opt)
            .await
            .map_err(|e| SidisiplinError::database_connection(e.to_string()))?;
        Self::from_connection(db).await
    }
}

/// 给数据库错误附加上下文；唯一约束冲突仍映射为校验错误
pub(super) fn db_error(context: &'static str) -> impl Fn(DbErr) -> SidisiplinError {
    move |e| match SidisiplinError::from(e) {
        SidisiplinError::DatabaseOperation(msg) => {
            SidisiplinError::database_operation(format!("{context}: {msg}"))
        }
        other => other,
    }
}

/// 唯一字段冲突判断
///
/// `existing_active` 为已有记录的启用状态，`None` 表示无冲突。
pub(super) fn ensure_unique(label: &str, value: &str, existing_active: Option<bool>) -> Result<()> {
    match existing_active {
        None => Ok(()),
        Some(true) => Err(SidisiplinError::validation(format!(
            "{label} '{value}' sudah digunakan"
        ))),
        Some(false) => Err(SidisiplinError::validation(format!(
            "{label} '{value}' sudah digunakan oleh data yang dinonaktifkan. Aktifkan kembali data tersebut"
        ))),
    }
}

pub(super) fn now_ts() -> i64 {
    chrono::Utc::now().timestamp()
}

// Storage trait 实现
use crate::models::{
    RemovalOutcome,
    cases::{
        entities::{CaseAction, CaseDetail, CaseStatus, ViolationCase},
        requests::{
            CaseListQuery, CreateCaseActionRequest, CreateCaseRequest, UpdateCaseActionRequest,
            UpdateCaseRequest,
        },
        responses::CaseListResponse,
    },
    reports::{
        entities::{CaseFact, SavedReport},
        requests::NewReport,
        responses::ReportListResponse,
    },
    sanction_types::{
        entities::SanctionType,
        requests::{CreateSanctionTypeRequest, UpdateSanctionTypeRequest},
    },
    sanctions::{
        entities::Sanction,
        requests::{CreateSanctionRequest, UpdateSanctionRequest},
    },
    students::{
        entities::Student,
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
        responses::StudentListResponse,
    },
    system::{
        entities::{AuditLog, SystemSetting},
        requests::NewAuditLog,
        responses::AuditLogListResponse,
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListParams},
        responses::UserListResponse,
    },
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
use crate::storage::Storage;
use async_trait::async_trait;
use chrono::FixedOffset;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(
        &self,
        query: UserListParams,
    ) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn remove_user(&self, id: i64, force: bool) -> Result<RemovalOutcome> {
        self.remove_with_policy(&removal::TeacherRemoval, id, force)
            .await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_admins(&self) -> Result<u64> {
        self.count_admins_impl().await
    }

    // 学生模块
    async fn create_student(&self, student: CreateStudentRequest) -> Result<Student> {
        self.create_student_impl(student).await
    }

    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>> {
        self.get_student_by_id_impl(id).await
    }

    async fn get_student_by_nis(&self, nis: &str) -> Result<Option<Student>> {
        self.get_student_by_nis_impl(nis).await
    }

    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        self.list_students_with_pagination_impl(query).await
    }

    async fn list_all_students(&self, query: StudentListQuery) -> Result<Vec<Student>> {
        self.list_all_students_impl(query).await
    }

    async fn list_student_classes(&self) -> Result<Vec<String>> {
        self.list_student_classes_impl().await
    }

    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        self.update_student_impl(id, update).await
    }

    async fn remove_student(&self, id: i64, force: bool) -> Result<RemovalOutcome> {
        self.remove_with_policy(&removal::StudentRemoval, id, force)
            .await
    }

    // 违规类别
    async fn create_violation_category(
        &self,
        req: CreateViolationCategoryRequest,
    ) -> Result<ViolationCategory> {
        self.create_violation_category_impl(req).await
    }

    async fn list_violation_categories(
        &self,
        is_active: Option<bool>,
        search: Option<String>,
    ) -> Result<Vec<ViolationCategory>> {
        self.list_violation_categories_impl(is_active, search).await
    }

    async fn update_violation_category(
        &self,
        id: i64,
        update: UpdateViolationCategoryRequest,
    ) -> Result<Option<ViolationCategory>> {
        self.update_violation_category_impl(id, update).await
    }

    async fn delete_violation_category(&self, id: i64) -> Result<()> {
        self.delete_violation_category_impl(id).await
    }

    // 违规条目
    async fn create_violation(&self, req: CreateViolationRequest) -> Result<ViolationDetail> {
        self.create_violation_impl(req).await
    }

    async fn get_violation_by_id(&self, id: i64) -> Result<Option<ViolationDetail>> {
        self.get_violation_by_id_impl(id).await
    }

    async fn list_violations_with_pagination(
        &self,
        query: ViolationListQuery,
    ) -> Result<ViolationListResponse> {
        self.list_violations_with_pagination_impl(query).await
    }

    async fn update_violation(
        &self,
        id: i64,
        update: UpdateViolationRequest,
    ) -> Result<Option<ViolationDetail>> {
        self.update_violation_impl(id, update).await
    }

    async fn remove_violation(&self, id: i64, force: bool) -> Result<RemovalOutcome> {
        self.remove_with_policy(&removal::ViolationRemoval, id, force)
            .await
    }

    // 旧版违规类型
    async fn create_violation_type(
        &self,
        req: CreateViolationTypeRequest,
    ) -> Result<ViolationType> {
        self.create_violation_type_impl(req).await
    }

    async fn list_violation_types(
        &self,
        is_active: Option<bool>,
        search: Option<String>,
    ) -> Result<Vec<ViolationType>> {
        self.list_violation_types_impl(is_active, search).await
    }

    async fn update_violation_type(
        &self,
        id: i64,
        update: UpdateViolationTypeRequest,
    ) -> Result<Option<ViolationType>> {
        self.update_violation_type_impl(id, update).await
    }

    async fn delete_violation_type(&self, id: i64) -> Result<bool> {
        self.delete_violation_type_impl(id).await
    }

    // 处分类型
    async fn create_sanction_type(&self, req: CreateSanctionTypeRequest) -> Result<SanctionType> {
        self.create_sanction_type_impl(req).await
    }

    async fn list_sanction_types(
        &self,
        is_active: Option<bool>,
        search: Option<String>,
    ) -> Result<Vec<SanctionType>> {
        self.list_sanction_types_impl(is_active, search).await
    }

    async fn update_sanction_type(
        &self,
        id: i64,
        update: UpdateSanctionTypeRequest,
    ) -> Result<Option<SanctionType>> {
        self.update_sanction_type_impl(id, update).await
    }

    async fn remove_sanction_type(&self, id: i64, force: bool) -> Result<RemovalOutcome> {
        self.remove_with_policy(&removal::SanctionTypeRemoval, id, force)
            .await
    }

    // 案件
    async fn create_case(
        &self,
        req: CreateCaseRequest,
        reported_by: i64,
        offset: FixedOffset,
    ) -> Result<ViolationCase> {
        self.create_case_impl(req, reported_by, offset).await
    }

    async fn get_case_by_id(&self, id: i64) -> Result<Option<CaseDetail>> {
        self.get_case_by_id_impl(id).await
    }

    async fn list_cases_with_pagination(&self, query: CaseListQuery) -> Result<CaseListResponse> {
        self.list_cases_with_pagination_impl(query).await
    }

    async fn list_cases_between(&self, from: i64, until: i64) -> Result<Vec<CaseDetail>> {
        self.list_cases_between_impl(from, until).await
    }

    async fn list_cases_by_student(&self, student_id: i64) -> Result<Vec<CaseDetail>> {
        self.list_cases_by_student_impl(student_id).await
    }

    async fn list_recent_cases(&self, limit: u64) -> Result<Vec<CaseDetail>> {
        self.list_recent_cases_impl(limit).await
    }

    async fn update_case(
        &self,
        id: i64,
        update: UpdateCaseRequest,
    ) -> Result<Option<ViolationCase>> {
        self.update_case_impl(id, update).await
    }

    // 案件处理记录
    async fn list_case_actions(
        &self,
        case_id: i64,
        include_deleted: bool,
    ) -> Result<Vec<CaseAction>> {
        self.list_case_actions_impl(case_id, include_deleted).await
    }

    async fn get_case_action(&self, case_id: i64, action_id: i64) -> Result<Option<CaseAction>> {
        self.get_case_action_impl(case_id, action_id).await
    }

    async fn create_case_action(
        &self,
        case_id: i64,
        req: CreateCaseActionRequest,
        actor_id: i64,
    ) -> Result<(CaseAction, CaseStatus)> {
        self.create_case_action_impl(case_id, req, actor_id).await
    }

    async fn update_case_action(
        &self,
        case_id: i64,
        action_id: i64,
        update: UpdateCaseActionRequest,
        actor_id: i64,
    ) -> Result<CaseAction> {
        self.update_case_action_impl(case_id, action_id, update, actor_id)
            .await
    }

    async fn soft_delete_case_action(
        &self,
        case_id: i64,
        action_id: i64,
        actor_id: i64,
    ) -> Result<CaseAction> {
        self.soft_delete_case_action_impl(case_id, action_id, actor_id)
            .await
    }

    // 正式处分
    async fn list_case_sanctions(&self, case_id: i64) -> Result<Vec<Sanction>> {
        self.list_case_sanctions_impl(case_id).await
    }

    async fn create_sanction(
        &self,
        case_id: i64,
        req: CreateSanctionRequest,
        actor_id: i64,
    ) -> Result<Sanction> {
        self.create_sanction_impl(case_id, req, actor_id).await
    }

    async fn update_sanction(
        &self,
        id: i64,
        update: UpdateSanctionRequest,
    ) -> Result<Option<Sanction>> {
        self.update_sanction_impl(id, update).await
    }

    async fn delete_sanction(&self, id: i64) -> Result<bool> {
        self.delete_sanction_impl(id).await
    }

    // 统计与报表
    async fn list_case_facts(&self, from: i64, until: i64) -> Result<Vec<CaseFact>> {
        self.list_case_facts_impl(from, until).await
    }

    async fn count_active_students(&self) -> Result<u64> {
        self.count_active_students_impl().await
    }

    async fn count_cases_by_status(&self) -> Result<Vec<(CaseStatus, i64)>> {
        self.count_cases_by_status_impl().await
    }

    async fn create_report(&self, report: NewReport) -> Result<SavedReport> {
        self.create_report_impl(report).await
    }

    async fn get_report_by_id(&self, id: i64) -> Result<Option<SavedReport>> {
        self.get_report_by_id_impl(id).await
    }

    async fn list_reports_with_pagination(
        &self,
        page: u64,
        size: u64,
        report_type: Option<String>,
    ) -> Result<ReportListResponse> {
        self.list_reports_with_pagination_impl(page, size, report_type)
            .await
    }

    async fn delete_report(&self, id: i64) -> Result<bool> {
        self.delete_report_impl(id).await
    }

    // 系统配置与审计
    async fn list_settings(&self) -> Result<Vec<SystemSetting>> {
        self.list_settings_impl().await
    }

    async fn update_setting(
        &self,
        key: &str,
        value: &str,
        updated_by: i64,
        ip_address: Option<String>,
    ) -> Result<Option<SystemSetting>> {
        self.update_setting_impl(key, value, updated_by, ip_address)
            .await
    }

    async fn create_audit_log(&self, log: NewAuditLog) -> Result<AuditLog> {
        self.create_audit_log_impl(log).await
    }

    async fn list_audit_logs_with_pagination(
        &self,
        page: u64,
        size: u64,
        entity: Option<String>,
        entity_id: Option<String>,
        action: Option<String>,
    ) -> Result<AuditLogListResponse> {
        self.list_audit_logs_with_pagination_impl(page, size, entity, entity_id, action)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("sidisiplin.db").unwrap(),
            "sqlite://sidisiplin.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url(":memory:").unwrap(),
            "sqlite::memory:"
        );
        assert!(SeaOrmStorage::build_database_url("postgres://u:p@h/db").is_ok());
        assert!(SeaOrmStorage::build_database_url("ftp://nope").is_err());
    }

    #[test]
    fn test_ensure_unique_messages() {
        assert!(ensure_unique("NIS", "123", None).is_ok());

        let active = ensure_unique("NIS", "123", Some(true)).unwrap_err();
        assert!(matches!(active, SidisiplinError::Validation(_)));
        assert!(!active.message().contains("dinonaktifkan"));

        let inactive = ensure_unique("NIS", "123", Some(false)).unwrap_err();
        assert!(inactive.message().contains("dinonaktifkan"));
    }

    #[tokio::test]
    async fn test_in_memory_storage_seeds_configs() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let settings = storage.list_settings().await.unwrap();
        assert!(settings.iter().any(|s| s.key == "school.name"));
    }
}

use std::sync::Arc;

use chrono::FixedOffset;

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 教师 / 管理员账号
    // 创建账号（password 字段为已哈希的密码）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListParams)
    -> Result<UserListResponse>;
    // 更新用户信息（password 字段为已哈希的密码）
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 删除或停用用户
    async fn remove_user(&self, id: i64, force: bool) -> Result<RemovalOutcome>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计管理员数量
    async fn count_admins(&self) -> Result<u64>;

    /// 学生
    async fn create_student(&self, student: CreateStudentRequest) -> Result<Student>;
    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>>;
    async fn get_student_by_nis(&self, nis: &str) -> Result<Option<Student>>;
    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse>;
    // 不分页，用于导出
    async fn list_all_students(&self, query: StudentListQuery) -> Result<Vec<Student>>;
    // 去重后的班级名称
    async fn list_student_classes(&self) -> Result<Vec<String>>;
    async fn update_student(&self, id: i64, update: UpdateStudentRequest)
    -> Result<Option<Student>>;
    async fn remove_student(&self, id: i64, force: bool) -> Result<RemovalOutcome>;

    /// 违规类别
    async fn create_violation_category(
        &self,
        req: CreateViolationCategoryRequest,
    ) -> Result<ViolationCategory>;
    async fn list_violation_categories(
        &self,
        is_active: Option<bool>,
        search: Option<String>,
    ) -> Result<Vec<ViolationCategory>>;
    async fn update_violation_category(
        &self,
        id: i64,
        update: UpdateViolationCategoryRequest,
    ) -> Result<Option<ViolationCategory>>;
    // 仍有违规条目引用时拒绝删除
    async fn delete_violation_category(&self, id: i64) -> Result<()>;

    /// 违规条目
    async fn create_violation(&self, req: CreateViolationRequest) -> Result<ViolationDetail>;
    async fn get_violation_by_id(&self, id: i64) -> Result<Option<ViolationDetail>>;
    async fn list_violations_with_pagination(
        &self,
        query: ViolationListQuery,
    ) -> Result<ViolationListResponse>;
    async fn update_violation(
        &self,
        id: i64,
        update: UpdateViolationRequest,
    ) -> Result<Option<ViolationDetail>>;
    async fn remove_violation(&self, id: i64, force: bool) -> Result<RemovalOutcome>;

    /// 旧版违规类型
    async fn create_violation_type(&self, req: CreateViolationTypeRequest)
    -> Result<ViolationType>;
    async fn list_violation_types(
        &self,
        is_active: Option<bool>,
        search: Option<String>,
    ) -> Result<Vec<ViolationType>>;
    async fn update_violation_type(
        &self,
        id: i64,
        update: UpdateViolationTypeRequest,
    ) -> Result<Option<ViolationType>>;
    async fn delete_violation_type(&self, id: i64) -> Result<bool>;

    /// 处分类型
    async fn create_sanction_type(&self, req: CreateSanctionTypeRequest) -> Result<SanctionType>;
    async fn list_sanction_types(
        &self,
        is_active: Option<bool>,
        search: Option<String>,
    ) -> Result<Vec<SanctionType>>;
    async fn update_sanction_type(
        &self,
        id: i64,
        update: UpdateSanctionTypeRequest,
    ) -> Result<Option<SanctionType>>;
    async fn remove_sanction_type(&self, id: i64, force: bool) -> Result<RemovalOutcome>;

    /// 违规案件
    // 创建案件并分配编号，编号年份按 offset 所在时区计算
    async fn create_case(
        &self,
        req: CreateCaseRequest,
        reported_by: i64,
        offset: FixedOffset,
    ) -> Result<ViolationCase>;
    async fn get_case_by_id(&self, id: i64) -> Result<Option<CaseDetail>>;
    async fn list_cases_with_pagination(&self, query: CaseListQuery) -> Result<CaseListResponse>;
    // 不分页，按事发时间升序
    async fn list_cases_between(&self, from: i64, until: i64) -> Result<Vec<CaseDetail>>;
    async fn list_cases_by_student(&self, student_id: i64) -> Result<Vec<CaseDetail>>;
    async fn list_recent_cases(&self, limit: u64) -> Result<Vec<CaseDetail>>;
    async fn update_case(&self, id: i64, update: UpdateCaseRequest)
    -> Result<Option<ViolationCase>>;

    /// 案件处理记录
    async fn list_case_actions(&self, case_id: i64, include_deleted: bool)
    -> Result<Vec<CaseAction>>;
    // 含已软删除的记录
    async fn get_case_action(&self, case_id: i64, action_id: i64) -> Result<Option<CaseAction>>;
    // 新增记录并在同一事务内推导案件状态
    async fn create_case_action(
        &self,
        case_id: i64,
        req: CreateCaseActionRequest,
        actor_id: i64,
    ) -> Result<(CaseAction, CaseStatus)>;
    async fn update_case_action(
        &self,
        case_id: i64,
        action_id: i64,
        update: UpdateCaseActionRequest,
        actor_id: i64,
    ) -> Result<CaseAction>;
    async fn soft_delete_case_action(
        &self,
        case_id: i64,
        action_id: i64,
        actor_id: i64,
    ) -> Result<CaseAction>;

    /// 正式处分
    async fn list_case_sanctions(&self, case_id: i64) -> Result<Vec<Sanction>>;
    async fn create_sanction(
        &self,
        case_id: i64,
        req: CreateSanctionRequest,
        actor_id: i64,
    ) -> Result<Sanction>;
    async fn update_sanction(&self, id: i64, update: UpdateSanctionRequest)
    -> Result<Option<Sanction>>;
    async fn delete_sanction(&self, id: i64) -> Result<bool>;

    /// 统计与报表
    // [from, until) 区间内的案件扁平行
    async fn list_case_facts(&self, from: i64, until: i64) -> Result<Vec<CaseFact>>;
    async fn count_active_students(&self) -> Result<u64>;
    async fn count_cases_by_status(&self) -> Result<Vec<(CaseStatus, i64)>>;
    async fn create_report(&self, report: NewReport) -> Result<SavedReport>;
    async fn get_report_by_id(&self, id: i64) -> Result<Option<SavedReport>>;
    async fn list_reports_with_pagination(
        &self,
        page: u64,
        size: u64,
        report_type: Option<String>,
    ) -> Result<ReportListResponse>;
    async fn delete_report(&self, id: i64) -> Result<bool>;

    /// 系统配置与审计
    async fn list_settings(&self) -> Result<Vec<SystemSetting>>;
    // 更新配置并在同一事务内写入审计日志
    async fn update_setting(
        &self,
        key: &str,
        value: &str,
        updated_by: i64,
        ip_address: Option<String>,
    ) -> Result<Option<SystemSetting>>;
    async fn create_audit_log(&self, log: NewAuditLog) -> Result<AuditLog>;
    async fn list_audit_logs_with_pagination(
        &self,
        page: u64,
        size: u64,
        entity: Option<String>,
        entity_id: Option<String>,
        action: Option<String>,
    ) -> Result<AuditLogListResponse>;
}

/// 由配置创建存储实例
pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}

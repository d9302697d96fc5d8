use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 用户表（教师 / 管理员）
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::Status).string().not_null())
                    .col(ColumnDef::new(Users::DisplayName).string().null())
                    .col(ColumnDef::new(Users::Nip).string().null())
                    .col(ColumnDef::new(Users::Phone).string().null())
                    .col(ColumnDef::new(Users::LastLogin).big_integer().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 学生表
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Students::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Students::Nis)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Students::Nisn).string().null())
                    .col(ColumnDef::new(Students::Name).string().not_null())
                    .col(ColumnDef::new(Students::Gender).string().not_null())
                    .col(ColumnDef::new(Students::ClassName).string().not_null())
                    .col(ColumnDef::new(Students::BirthDate).string().null())
                    .col(ColumnDef::new(Students::ParentName).string().null())
                    .col(ColumnDef::new(Students::ParentPhone).string().null())
                    .col(ColumnDef::new(Students::Address).text().null())
                    .col(
                        ColumnDef::new(Students::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Students::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Students::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 违规类别表
        manager
            .create_table(
                Table::create()
                    .table(ViolationCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ViolationCategories::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ViolationCategories::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(ViolationCategories::Name).string().not_null())
                    .col(ColumnDef::new(ViolationCategories::Level).string().not_null())
                    .col(ColumnDef::new(ViolationCategories::Description).text().null())
                    .col(
                        ColumnDef::new(ViolationCategories::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ViolationCategories::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ViolationCategories::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 违规条目表
        manager
            .create_table(
                Table::create()
                    .table(Violations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Violations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Violations::CategoryId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Violations::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Violations::Name).string().not_null())
                    .col(ColumnDef::new(Violations::Description).text().null())
                    .col(
                        ColumnDef::new(Violations::Points)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Violations::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Violations::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Violations::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Violations::Table, Violations::CategoryId)
                            .to(ViolationCategories::Table, ViolationCategories::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // 旧版违规类型表
        manager
            .create_table(
                Table::create()
                    .table(ViolationTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ViolationTypes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ViolationTypes::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(ViolationTypes::Points)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(ViolationTypes::Description).text().null())
                    .col(
                        ColumnDef::new(ViolationTypes::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ViolationTypes::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ViolationTypes::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 处分类型表
        manager
            .create_table(
                Table::create()
                    .table(SanctionTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SanctionTypes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SanctionTypes::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(SanctionTypes::Description).text().null())
                    .col(
                        ColumnDef::new(SanctionTypes::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(SanctionTypes::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SanctionTypes::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 违规条目与可用处分类型关联表
        manager
            .create_table(
                Table::create()
                    .table(ViolationSanctionTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ViolationSanctionTypes::ViolationId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ViolationSanctionTypes::SanctionTypeId)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(ViolationSanctionTypes::ViolationId)
                            .col(ViolationSanctionTypes::SanctionTypeId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                ViolationSanctionTypes::Table,
                                ViolationSanctionTypes::ViolationId,
                            )
                            .to(Violations::Table, Violations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                ViolationSanctionTypes::Table,
                                ViolationSanctionTypes::SanctionTypeId,
                            )
                            .to(SanctionTypes::Table, SanctionTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 违规案件表
        manager
            .create_table(
                Table::create()
                    .table(ViolationCases::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ViolationCases::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ViolationCases::CaseNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(ViolationCases::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ViolationCases::ViolationId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ViolationCases::ReportedBy).big_integer().null())
                    .col(
                        ColumnDef::new(ViolationCases::IncidentDate)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ViolationCases::Description).text().null())
                    .col(ColumnDef::new(ViolationCases::EvidenceUrls).text().null())
                    .col(ColumnDef::new(ViolationCases::Status).string().not_null())
                    .col(
                        ColumnDef::new(ViolationCases::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ViolationCases::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ViolationCases::Table, ViolationCases::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ViolationCases::Table, ViolationCases::ViolationId)
                            .to(Violations::Table, Violations::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ViolationCases::Table, ViolationCases::ReportedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 案件编号年度计数器
        manager
            .create_table(
                Table::create()
                    .table(CaseNumberSequences::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CaseNumberSequences::Year)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CaseNumberSequences::LastValue)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 案件处理记录表
        manager
            .create_table(
                Table::create()
                    .table(CaseActions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CaseActions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CaseActions::CaseId).big_integer().not_null())
                    .col(
                        ColumnDef::new(CaseActions::SanctionTypeId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CaseActions::Description).text().null())
                    .col(
                        ColumnDef::new(CaseActions::ActionDate)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CaseActions::IsCompleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(CaseActions::FollowUpDate).big_integer().null())
                    .col(ColumnDef::new(CaseActions::CreatedBy).big_integer().null())
                    .col(ColumnDef::new(CaseActions::UpdatedBy).big_integer().null())
                    .col(ColumnDef::new(CaseActions::DeletedAt).big_integer().null())
                    .col(ColumnDef::new(CaseActions::DeletedById).big_integer().null())
                    .col(ColumnDef::new(CaseActions::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(CaseActions::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(CaseActions::Table, CaseActions::CaseId)
                            .to(ViolationCases::Table, ViolationCases::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CaseActions::Table, CaseActions::SanctionTypeId)
                            .to(SanctionTypes::Table, SanctionTypes::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CaseActions::Table, CaseActions::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 正式处分表
        manager
            .create_table(
                Table::create()
                    .table(Sanctions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sanctions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sanctions::CaseId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Sanctions::SanctionTypeId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Sanctions::StartDate).big_integer().not_null())
                    .col(ColumnDef::new(Sanctions::EndDate).big_integer().null())
                    .col(ColumnDef::new(Sanctions::Notes).text().null())
                    .col(
                        ColumnDef::new(Sanctions::IsCompleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Sanctions::CreatedBy).big_integer().null())
                    .col(ColumnDef::new(Sanctions::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Sanctions::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Sanctions::Table, Sanctions::CaseId)
                            .to(ViolationCases::Table, ViolationCases::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Sanctions::Table, Sanctions::SanctionTypeId)
                            .to(SanctionTypes::Table, SanctionTypes::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Sanctions::Table, Sanctions::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_students_class_name")
                    .table(Students::Table)
                    .col(Students::ClassName)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_violations_category_id")
                    .table(Violations::Table)
                    .col(Violations::CategoryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_violation_cases_student_id")
                    .table(ViolationCases::Table)
                    .col(ViolationCases::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_violation_cases_violation_id")
                    .table(ViolationCases::Table)
                    .col(ViolationCases::ViolationId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_violation_cases_incident_date")
                    .table(ViolationCases::Table)
                    .col(ViolationCases::IncidentDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_case_actions_case_id")
                    .table(CaseActions::Table)
                    .col(CaseActions::CaseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_sanctions_case_id")
                    .table(Sanctions::Table)
                    .col(Sanctions::CaseId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sanctions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CaseActions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CaseNumberSequences::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ViolationCases::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ViolationSanctionTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SanctionTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ViolationTypes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Violations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ViolationCategories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    Role,
    Status,
    DisplayName,
    Nip,
    Phone,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Students {
    #[sea_orm(iden = "students")]
    Table,
    Id,
    Nis,
    Nisn,
    Name,
    Gender,
    ClassName,
    BirthDate,
    ParentName,
    ParentPhone,
    Address,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ViolationCategories {
    #[sea_orm(iden = "violation_categories")]
    Table,
    Id,
    Code,
    Name,
    Level,
    Description,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Violations {
    #[sea_orm(iden = "violations")]
    Table,
    Id,
    CategoryId,
    Code,
    Name,
    Description,
    Points,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ViolationTypes {
    #[sea_orm(iden = "violation_types")]
    Table,
    Id,
    Name,
    Points,
    Description,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SanctionTypes {
    #[sea_orm(iden = "sanction_types")]
    Table,
    Id,
    Name,
    Description,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ViolationSanctionTypes {
    #[sea_orm(iden = "violation_sanction_types")]
    Table,
    ViolationId,
    SanctionTypeId,
}

#[derive(DeriveIden)]
enum ViolationCases {
    #[sea_orm(iden = "violation_cases")]
    Table,
    Id,
    CaseNumber,
    StudentId,
    ViolationId,
    ReportedBy,
    IncidentDate,
    Description,
    EvidenceUrls,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CaseNumberSequences {
    #[sea_orm(iden = "case_number_sequences")]
    Table,
    Year,
    LastValue,
}

#[derive(DeriveIden)]
enum CaseActions {
    #[sea_orm(iden = "case_actions")]
    Table,
    Id,
    CaseId,
    SanctionTypeId,
    Description,
    ActionDate,
    IsCompleted,
    FollowUpDate,
    CreatedBy,
    UpdatedBy,
    DeletedAt,
    DeletedById,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Sanctions {
    #[sea_orm(iden = "sanctions")]
    Table,
    Id,
    CaseId,
    SanctionTypeId,
    StartDate,
    EndDate,
    Notes,
    IsCompleted,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 系统配置表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Configs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Configs::Key)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Configs::Value).text().not_null())
                    .col(ColumnDef::new(Configs::ValueType).string().not_null())
                    .col(ColumnDef::new(Configs::Description).text().null())
                    .col(ColumnDef::new(Configs::UpdatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Configs::UpdatedBy).big_integer().null())
                    .to_owned(),
            )
            .await?;

        // ==================== 审计日志表 ====================
        manager
            .create_table(
                Table::create()
                    .table(AuditLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AuditLogs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AuditLogs::UserId).big_integer().null())
                    .col(ColumnDef::new(AuditLogs::Action).string().not_null())
                    .col(ColumnDef::new(AuditLogs::Entity).string().not_null())
                    .col(ColumnDef::new(AuditLogs::EntityId).string().null())
                    .col(ColumnDef::new(AuditLogs::Details).text().null())
                    .col(ColumnDef::new(AuditLogs::IpAddress).string().null())
                    .col(ColumnDef::new(AuditLogs::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // ==================== 已生成报表表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Reports::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reports::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reports::Title).string().not_null())
                    .col(ColumnDef::new(Reports::ReportType).string().not_null())
                    .col(ColumnDef::new(Reports::PeriodStart).big_integer().not_null())
                    .col(ColumnDef::new(Reports::PeriodEnd).big_integer().not_null())
                    .col(ColumnDef::new(Reports::Data).text().not_null())
                    .col(ColumnDef::new(Reports::GeneratedBy).big_integer().null())
                    .col(ColumnDef::new(Reports::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_audit_logs_entity")
                    .table(AuditLogs::Table)
                    .col(AuditLogs::Entity)
                    .col(AuditLogs::EntityId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_audit_logs_created_at")
                    .table(AuditLogs::Table)
                    .col(AuditLogs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // ==================== 插入默认配置 ====================
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or_default();

        let default_configs = [
            ("school.name", "SMA Negeri 1", "string", "Nama sekolah"),
            ("school.address", "-", "string", "Alamat sekolah"),
            (
                "school.headmaster_name",
                "-",
                "string",
                "Nama kepala sekolah",
            ),
            ("school.headmaster_nip", "-", "string", "NIP kepala sekolah"),
            (
                "school.academic_year",
                "2025/2026",
                "string",
                "Tahun ajaran aktif",
            ),
            (
                "report.top_students_limit",
                "10",
                "integer",
                "Jumlah siswa teratas pada laporan statistik",
            ),
        ];

        for (key, value, value_type, description) in default_configs {
            let insert = Query::insert()
                .into_table(Configs::Table)
                .columns([
                    Configs::Key,
                    Configs::Value,
                    Configs::ValueType,
                    Configs::Description,
                    Configs::UpdatedAt,
                ])
                .values_panic([
                    key.into(),
                    value.into(),
                    value_type.into(),
                    description.into(),
                    now.into(),
                ])
                .to_owned();

            manager.exec_stmt(insert).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reports::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AuditLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Configs::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Configs {
    #[sea_orm(iden = "configs")]
    Table,
    Key,
    Value,
    ValueType,
    Description,
    UpdatedAt,
    UpdatedBy,
}

#[derive(DeriveIden)]
enum AuditLogs {
    #[sea_orm(iden = "audit_logs")]
    Table,
    Id,
    UserId,
    Action,
    Entity,
    EntityId,
    Details,
    IpAddress,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Reports {
    #[sea_orm(iden = "reports")]
    Table,
    Id,
    Title,
    ReportType,
    PeriodStart,
    PeriodEnd,
    Data,
    GeneratedBy,
    CreatedAt,
}

//! Migration: Create employee_invites table

use sea_orm_migration::prelude::*;

use super::m20260301_000001_create_companies::Companies;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EmployeeInvites::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EmployeeInvites::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EmployeeInvites::Email).string().not_null())
                    .col(
                        ColumnDef::new(EmployeeInvites::FirstName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmployeeInvites::LastName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmployeeInvites::CompanyId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmployeeInvites::InviterId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(EmployeeInvites::Token).string().not_null())
                    .col(
                        ColumnDef::new(EmployeeInvites::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(EmployeeInvites::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmployeeInvites::AcceptedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(EmployeeInvites::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmployeeInvites::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmployeeInvites::DeletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(EmployeeInvites::Table, EmployeeInvites::CompanyId)
                            .to(Companies::Table, Companies::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_employee_invites_token")
                    .table(EmployeeInvites::Table)
                    .col(EmployeeInvites::Token)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_employee_invites_company_email")
                    .table(EmployeeInvites::Table)
                    .col(EmployeeInvites::CompanyId)
                    .col(EmployeeInvites::Email)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(EmployeeInvites::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum EmployeeInvites {
    Table,
    Id,
    Email,
    #[iden = "first_name"]
    FirstName,
    #[iden = "last_name"]
    LastName,
    #[iden = "company_id"]
    CompanyId,
    #[iden = "inviter_id"]
    InviterId,
    Token,
    Status,
    #[iden = "expires_at"]
    ExpiresAt,
    #[iden = "accepted_at"]
    AcceptedAt,
    #[iden = "created_at"]
    CreatedAt,
    #[iden = "updated_at"]
    UpdatedAt,
    #[iden = "deleted_at"]
    DeletedAt,
}

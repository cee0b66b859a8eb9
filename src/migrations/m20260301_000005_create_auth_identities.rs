//! Migration: Create auth_identities and provider_identities tables

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AuthIdentities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AuthIdentities::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AuthIdentities::CustomerId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AuthIdentities::Role).string().not_null())
                    .col(
                        ColumnDef::new(AuthIdentities::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProviderIdentities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProviderIdentities::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ProviderIdentities::Provider)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProviderIdentities::EntityId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProviderIdentities::AuthIdentityId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProviderIdentities::PasswordHash)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProviderIdentities::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ProviderIdentities::Table, ProviderIdentities::AuthIdentityId)
                            .to(AuthIdentities::Table, AuthIdentities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_provider_identities_provider_entity")
                    .table(ProviderIdentities::Table)
                    .col(ProviderIdentities::Provider)
                    .col(ProviderIdentities::EntityId)
                    .unique()
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
                    .table(ProviderIdentities::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(AuthIdentities::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum AuthIdentities {
    Table,
    Id,
    #[iden = "customer_id"]
    CustomerId,
    Role,
    #[iden = "created_at"]
    CreatedAt,
}

#[derive(Iden)]
enum ProviderIdentities {
    Table,
    Id,
    Provider,
    #[iden = "entity_id"]
    EntityId,
    #[iden = "auth_identity_id"]
    AuthIdentityId,
    #[iden = "password_hash"]
    PasswordHash,
    #[iden = "created_at"]
    CreatedAt,
}

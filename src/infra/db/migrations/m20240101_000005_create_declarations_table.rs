//! Migration: Create customs declarations table.

use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Declarations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Declarations::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Declarations::DeclarationNumber)
                            .string_len(32)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Declarations::DeclarationType)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Declarations::TnvedCode).string_len(20).null())
                    .col(ColumnDef::new(Declarations::ProductDescription).text().not_null())
                    .col(
                        ColumnDef::new(Declarations::ProductValue)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Declarations::NetWeight)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(Declarations::Quantity)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Declarations::CountryOfOrigin).string_len(100).null())
                    .col(
                        ColumnDef::new(Declarations::CountryOfDestination)
                            .string_len(100)
                            .null(),
                    )
                    .col(ColumnDef::new(Declarations::CustomsOffice).string_len(255).null())
                    .col(
                        ColumnDef::new(Declarations::Status)
                            .string_len(20)
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(ColumnDef::new(Declarations::ClientId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Declarations::SubmittedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Declarations::ReviewedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Declarations::CreatedBy).string_len(255).null())
                    .col(
                        ColumnDef::new(Declarations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Declarations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_declarations_client_id")
                            .from(Declarations::Table, Declarations::ClientId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_declarations_status")
                    .table(Declarations::Table)
                    .col(Declarations::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_declarations_client_id")
                    .table(Declarations::Table)
                    .col(Declarations::ClientId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Declarations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Declarations {
    Table,
    Id,
    DeclarationNumber,
    DeclarationType,
    TnvedCode,
    ProductDescription,
    ProductValue,
    NetWeight,
    Quantity,
    CountryOfOrigin,
    CountryOfDestination,
    CustomsOffice,
    Status,
    ClientId,
    SubmittedAt,
    ReviewedAt,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

//! Migration: Create the UNP reference table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Unps::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Unps::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Unps::Unp).string_len(9).not_null().unique_key())
                    .col(
                        ColumnDef::new(Unps::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Unps::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Unps {
    Table,
    Id,
    Unp,
    CreatedAt,
}

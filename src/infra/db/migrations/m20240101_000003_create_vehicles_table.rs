//! Migration: Create vehicles table.

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
                    .table(Vehicles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Vehicles::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Vehicles::LicensePlate)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Vehicles::Model).string_len(255).null())
                    .col(ColumnDef::new(Vehicles::VehicleType).string_len(100).null())
                    .col(ColumnDef::new(Vehicles::YearOfManufacture).integer().null())
                    .col(ColumnDef::new(Vehicles::Capacity).double().null())
                    .col(ColumnDef::new(Vehicles::ClientId).big_integer().not_null())
                    .col(ColumnDef::new(Vehicles::CreatedBy).string_len(255).null())
                    .col(
                        ColumnDef::new(Vehicles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Vehicles::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vehicles_client_id")
                            .from(Vehicles::Table, Vehicles::ClientId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_vehicles_client_id")
                    .table(Vehicles::Table)
                    .col(Vehicles::ClientId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Vehicles::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Vehicles {
    Table,
    Id,
    LicensePlate,
    Model,
    VehicleType,
    YearOfManufacture,
    Capacity,
    ClientId,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

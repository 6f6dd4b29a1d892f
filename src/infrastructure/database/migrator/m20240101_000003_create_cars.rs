//! Create cars table

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_cities::Cities;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cars::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cars::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Cars::CarType).string_len(20).not_null())
                    .col(ColumnDef::new(Cars::Seats).small_integer().not_null())
                    .col(ColumnDef::new(Cars::HourlyRentCost).double().not_null())
                    .col(ColumnDef::new(Cars::CityId).uuid().not_null())
                    .col(
                        ColumnDef::new(Cars::Status)
                            .string_len(20)
                            .not_null()
                            .default("Available"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cars_city")
                            .from(Cars::Table, Cars::CityId)
                            .to(Cities::Table, Cities::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // listing is `WHERE city_id = ? AND id > ? ORDER BY id`
        manager
            .create_index(
                Index::create()
                    .name("idx_cars_city_id")
                    .table(Cars::Table)
                    .col(Cars::CityId)
                    .col(Cars::Id)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Cars::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Cars {
    Table,
    Id,
    CarType,
    Seats,
    HourlyRentCost,
    CityId,
    Status,
}

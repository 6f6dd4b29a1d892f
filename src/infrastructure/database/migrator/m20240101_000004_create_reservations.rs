//! Create reservations table

use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_users::Users;
use super::m20240101_000003_create_cars::Cars;

/// FK names are matched when translating violations into domain errors.
pub const FK_RESERVATIONS_USER: &str = "fk_reservations_user";
pub const FK_RESERVATIONS_CAR: &str = "fk_reservations_car";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reservations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reservations::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reservations::UserId).uuid().not_null())
                    .col(ColumnDef::new(Reservations::CarId).uuid().not_null())
                    .col(
                        ColumnDef::new(Reservations::Status)
                            .string_len(20)
                            .not_null()
                            .default("Reserved"),
                    )
                    .col(
                        ColumnDef::new(Reservations::PaymentStatus)
                            .string_len(20)
                            .not_null()
                            .default("Pending"),
                    )
                    .col(
                        ColumnDef::new(Reservations::StartDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::EndDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_RESERVATIONS_USER)
                            .from(Reservations::Table, Reservations::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name(FK_RESERVATIONS_CAR)
                            .from(Reservations::Table, Reservations::CarId)
                            .to(Cars::Table, Cars::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_car_window")
                    .table(Reservations::Table)
                    .col(Reservations::CarId)
                    .col(Reservations::StartDate)
                    .col(Reservations::EndDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_user")
                    .table(Reservations::Table)
                    .col(Reservations::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reservations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Reservations {
    Table,
    Id,
    UserId,
    CarId,
    Status,
    PaymentStatus,
    StartDate,
    EndDate,
}

//! Create cities table
//!
//! Cities are reference data: the table is seeded here and the API only
//! ever reads it.

use sea_orm_migration::prelude::*;
use uuid::Uuid;

/// Cities available on a fresh database.
pub const SEED_CITIES: &[&str] = &[
    "Bogota",
    "Chicago",
    "Los Angeles",
    "Medellin",
    "Miami",
    "New York",
    "San Francisco",
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cities::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Cities::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Cities::Name)
                            .string_len(100)
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        let mut insert = Query::insert();
        insert.into_table(Cities::Table).columns([Cities::Id, Cities::Name]);
        for name in SEED_CITIES {
            insert
                .values([Uuid::new_v4().into(), (*name).into()])
                .map_err(|e| DbErr::Custom(format!("seed city {name}: {e}")))?;
        }
        manager.exec_stmt(insert.to_owned()).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Cities::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Cities {
    Table,
    Id,
    Name,
}

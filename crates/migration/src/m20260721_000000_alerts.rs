//! Alerts table.
//!
//! The dedup invariant (at most one unresolved alert per kind and target per
//! owner) is backed by a partial unique index. SeaQuery has no builder for
//! partial indexes, so that one statement goes through raw SQL.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Users {
    Table,
    Username,
}

#[derive(Iden)]
enum Alerts {
    Table,
    Id,
    Kind,
    Severity,
    Title,
    Message,
    EntityType,
    EntityId,
    Metadata,
    IsRead,
    IsResolved,
    OwnerId,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alerts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Alerts::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Alerts::Kind).string().not_null())
                    .col(ColumnDef::new(Alerts::Severity).string().not_null())
                    .col(ColumnDef::new(Alerts::Title).string().not_null())
                    .col(ColumnDef::new(Alerts::Message).string().not_null())
                    .col(ColumnDef::new(Alerts::EntityType).string())
                    .col(ColumnDef::new(Alerts::EntityId).string())
                    .col(ColumnDef::new(Alerts::Metadata).json())
                    .col(ColumnDef::new(Alerts::IsRead).boolean().not_null())
                    .col(ColumnDef::new(Alerts::IsResolved).boolean().not_null())
                    .col(ColumnDef::new(Alerts::OwnerId).string().not_null())
                    .col(ColumnDef::new(Alerts::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Alerts::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-alerts-owner_id")
                            .from(Alerts::Table, Alerts::OwnerId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-alerts-owner_id-is_resolved")
                    .table(Alerts::Table)
                    .col(Alerts::OwnerId)
                    .col(Alerts::IsResolved)
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX \"idx-alerts-unresolved-target-unique\" \
                 ON \"alerts\" (\"kind\", \"entity_type\", \"entity_id\", \"owner_id\") \
                 WHERE \"is_resolved\" = 0",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alerts::Table).to_owned())
            .await?;
        Ok(())
    }
}

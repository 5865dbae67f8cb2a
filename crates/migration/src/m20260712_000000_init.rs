//! Initial schema migration for the ledger core:
//!
//! - `users`: authentication
//! - `funds`: imprest funds with a cached balance
//! - `fund_transactions`: append-only ledger entries per fund
//! - `expenses`: expense requests going through the approval workflow

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Users {
    Table,
    Username,
    Password,
}

#[derive(Iden)]
enum Funds {
    Table,
    Id,
    Reference,
    OwnerId,
    AccountHolder,
    Purpose,
    InitialAmountMinor,
    CurrentBalanceMinor,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum FundTransactions {
    Table,
    Id,
    Reference,
    FundId,
    Seq,
    Kind,
    AmountMinor,
    Description,
    BalanceAfterMinor,
    ExpenseId,
    OwnerId,
    CreatedAt,
}

#[derive(Iden)]
enum Expenses {
    Table,
    Id,
    Reference,
    Description,
    AmountMinor,
    ExpenseDate,
    PaymentMethod,
    CategoryId,
    FundId,
    Status,
    ApprovedBy,
    ApprovedAt,
    OwnerId,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Funds::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Funds::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Funds::Reference).string().not_null())
                    .col(ColumnDef::new(Funds::OwnerId).string().not_null())
                    .col(ColumnDef::new(Funds::AccountHolder).string().not_null())
                    .col(ColumnDef::new(Funds::Purpose).string())
                    .col(
                        ColumnDef::new(Funds::InitialAmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Funds::CurrentBalanceMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Funds::Status).string().not_null())
                    .col(ColumnDef::new(Funds::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Funds::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-funds-owner_id")
                            .from(Funds::Table, Funds::OwnerId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-funds-reference-unique")
                    .table(Funds::Table)
                    .col(Funds::Reference)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-funds-owner_id")
                    .table(Funds::Table)
                    .col(Funds::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FundTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FundTransactions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FundTransactions::Reference).string().not_null())
                    .col(ColumnDef::new(FundTransactions::FundId).string().not_null())
                    .col(
                        ColumnDef::new(FundTransactions::Seq)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FundTransactions::Kind).string().not_null())
                    .col(
                        ColumnDef::new(FundTransactions::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FundTransactions::Description).string())
                    .col(
                        ColumnDef::new(FundTransactions::BalanceAfterMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FundTransactions::ExpenseId).string())
                    .col(ColumnDef::new(FundTransactions::OwnerId).string().not_null())
                    .col(
                        ColumnDef::new(FundTransactions::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-fund_transactions-fund_id")
                            .from(FundTransactions::Table, FundTransactions::FundId)
                            .to(Funds::Table, Funds::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-fund_transactions-fund_id-seq-unique")
                    .table(FundTransactions::Table)
                    .col(FundTransactions::FundId)
                    .col(FundTransactions::Seq)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-fund_transactions-reference-unique")
                    .table(FundTransactions::Table)
                    .col(FundTransactions::Reference)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::Reference).string().not_null())
                    .col(ColumnDef::new(Expenses::Description).string().not_null())
                    .col(
                        ColumnDef::new(Expenses::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Expenses::ExpenseDate).date().not_null())
                    .col(ColumnDef::new(Expenses::PaymentMethod).string())
                    .col(ColumnDef::new(Expenses::CategoryId).string())
                    .col(ColumnDef::new(Expenses::FundId).string())
                    .col(ColumnDef::new(Expenses::Status).string().not_null())
                    .col(ColumnDef::new(Expenses::ApprovedBy).string())
                    .col(ColumnDef::new(Expenses::ApprovedAt).timestamp())
                    .col(ColumnDef::new(Expenses::OwnerId).string().not_null())
                    .col(ColumnDef::new(Expenses::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-owner_id")
                            .from(Expenses::Table, Expenses::OwnerId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-reference-unique")
                    .table(Expenses::Table)
                    .col(Expenses::Reference)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-owner_id-status")
                    .table(Expenses::Table)
                    .col(Expenses::OwnerId)
                    .col(Expenses::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-fund_id")
                    .table(Expenses::Table)
                    .col(Expenses::FundId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FundTransactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Funds::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

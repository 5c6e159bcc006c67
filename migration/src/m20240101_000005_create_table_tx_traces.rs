use sea_orm_migration::prelude::*;

use crate::m20240101_000004_create_table_txs::Txs;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TxTraces::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TxTraces::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TxTraces::TxHash).string_len(66).not_null())
                    .col(ColumnDef::new(TxTraces::TraceJson).json().not_null())
                    .col(ColumnDef::new(TxTraces::CapturedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from_col(TxTraces::TxHash)
                            .to(Txs::Table, Txs::Hash),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TxTraces::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum TxTraces {
    Table,
    Id,
    TxHash,
    TraceJson,
    CapturedAt,
}

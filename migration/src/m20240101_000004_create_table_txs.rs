use sea_orm_migration::prelude::*;

use crate::m20240101_000003_create_table_contracts::Contracts;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Txs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Txs::Hash)
                            .string_len(66)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Txs::BlockNumber).big_integer().not_null())
                    .col(ColumnDef::new(Txs::BlockTimestamp).big_integer().not_null())
                    .col(ColumnDef::new(Txs::FromAddress).string_len(42).not_null())
                    .col(ColumnDef::new(Txs::ToAddress).string_len(42))
                    .col(ColumnDef::new(Txs::ContractId).integer())
                    .col(
                        ColumnDef::new(Txs::ValueWei)
                            .decimal_len(78, 0)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Txs::GasUsed).big_integer().not_null())
                    .col(ColumnDef::new(Txs::GasPrice).big_integer().not_null())
                    .col(ColumnDef::new(Txs::Status).small_integer().not_null())
                    .col(ColumnDef::new(Txs::ErrorRaw).text())
                    .col(ColumnDef::new(Txs::ErrorSignature).string_len(10))
                    .col(ColumnDef::new(Txs::ErrorDecoded).text())
                    .col(ColumnDef::new(Txs::ErrorParams).json())
                    .col(ColumnDef::new(Txs::MethodId).string_len(10))
                    .col(ColumnDef::new(Txs::MethodName).text())
                    .col(
                        ColumnDef::new(Txs::HasTrace)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Txs::IsTentative)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Txs::IngestedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from_col(Txs::ContractId)
                            .to(Contracts::Table, Contracts::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Txs::Table)
                    .name("idx-txs-block_number")
                    .col(Txs::BlockNumber)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Txs::Table)
                    .name("idx-txs-contract_id")
                    .col(Txs::ContractId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Txs::Table)
                    .name("idx-txs-is_tentative")
                    .col(Txs::IsTentative)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Txs::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Txs {
    Table,
    Hash,
    BlockNumber,
    BlockTimestamp,
    FromAddress,
    ToAddress,
    ContractId,
    ValueWei,
    GasUsed,
    GasPrice,
    Status,
    ErrorRaw,
    ErrorSignature,
    ErrorDecoded,
    ErrorParams,
    MethodId,
    MethodName,
    HasTrace,
    IsTentative,
    IngestedAt,
}

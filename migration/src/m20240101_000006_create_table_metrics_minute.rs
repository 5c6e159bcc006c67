use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MetricsMinute::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MetricsMinute::BucketTs)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MetricsMinute::TxCount).big_integer().not_null())
                    .col(
                        ColumnDef::new(MetricsMinute::TxFailedCount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MetricsMinute::GasUsedTotal)
                            .decimal_len(78, 0)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MetricsMinute::GasPriceAvg)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MetricsMinute::BlockCount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MetricsMinute::UniqueSenders)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MetricsMinute::TopErrors).json().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MetricsMinute::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum MetricsMinute {
    Table,
    BucketTs,
    TxCount,
    TxFailedCount,
    GasUsedTotal,
    GasPriceAvg,
    BlockCount,
    UniqueSenders,
    TopErrors,
}

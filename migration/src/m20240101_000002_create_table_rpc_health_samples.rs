use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_table_rpc_endpoints::RpcEndpoints;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RpcHealthSamples::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RpcHealthSamples::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RpcHealthSamples::EndpointId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RpcHealthSamples::SampledAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RpcHealthSamples::LatencyMs).integer())
                    .col(ColumnDef::new(RpcHealthSamples::BlockNumber).big_integer())
                    .col(
                        ColumnDef::new(RpcHealthSamples::IsSuccess)
                            .boolean()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RpcHealthSamples::ErrorCode).string_len(64))
                    .foreign_key(
                        ForeignKey::create()
                            .from_col(RpcHealthSamples::EndpointId)
                            .to(RpcEndpoints::Table, RpcEndpoints::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(RpcHealthSamples::Table)
                    .name("idx-rpc_health_samples-endpoint_sampled")
                    .col(RpcHealthSamples::EndpointId)
                    .col(RpcHealthSamples::SampledAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RpcHealthSamples::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum RpcHealthSamples {
    Table,
    Id,
    EndpointId,
    SampledAt,
    LatencyMs,
    BlockNumber,
    IsSuccess,
    ErrorCode,
}

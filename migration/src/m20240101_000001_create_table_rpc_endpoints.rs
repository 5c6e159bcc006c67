use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RpcEndpoints::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RpcEndpoints::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RpcEndpoints::Url).text().not_null())
                    .col(
                        ColumnDef::new(RpcEndpoints::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(RpcEndpoints::Score)
                            .integer()
                            .not_null()
                            .default(100),
                    )
                    .col(
                        ColumnDef::new(RpcEndpoints::Status)
                            .string_len(10)
                            .not_null()
                            .default("healthy"),
                    )
                    .col(
                        ColumnDef::new(RpcEndpoints::SupportsTraces)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(RpcEndpoints::LastProbeAt)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(RpcEndpoints::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(RpcEndpoints::Table)
                    .name("idx-rpc_endpoints-is_active")
                    .col(RpcEndpoints::IsActive)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RpcEndpoints::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum RpcEndpoints {
    Table,
    Id,
    Url,
    IsActive,
    Score,
    Status,
    SupportsTraces,
    LastProbeAt,
    UpdatedAt,
}

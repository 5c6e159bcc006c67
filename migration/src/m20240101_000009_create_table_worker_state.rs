use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WorkerState::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WorkerState::Key)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WorkerState::Value).json().not_null())
                    .col(ColumnDef::new(WorkerState::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WorkerState::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum WorkerState {
    Table,
    Key,
    Value,
    UpdatedAt,
}

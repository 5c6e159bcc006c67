use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alerts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alerts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Alerts::Name).text().not_null())
                    .col(ColumnDef::new(Alerts::Description).text())
                    .col(ColumnDef::new(Alerts::AlertType).string_len(20).not_null())
                    .col(ColumnDef::new(Alerts::Conditions).json().not_null())
                    .col(ColumnDef::new(Alerts::Threshold).double().not_null())
                    .col(ColumnDef::new(Alerts::WindowMinutes).integer().not_null())
                    .col(ColumnDef::new(Alerts::CooldownMinutes).integer().not_null())
                    .col(ColumnDef::new(Alerts::Severity).string_len(10).not_null())
                    .col(
                        ColumnDef::new(Alerts::IsEnabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Alerts::ContractIds).json().not_null())
                    .col(ColumnDef::new(Alerts::LastTriggeredAt).big_integer())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alerts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Alerts {
    Table,
    Id,
    Name,
    Description,
    AlertType,
    Conditions,
    Threshold,
    WindowMinutes,
    CooldownMinutes,
    Severity,
    IsEnabled,
    ContractIds,
    LastTriggeredAt,
}

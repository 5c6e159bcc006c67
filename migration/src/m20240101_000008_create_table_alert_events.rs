use sea_orm_migration::prelude::*;

use crate::m20240101_000007_create_table_alerts::Alerts;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AlertEvents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AlertEvents::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AlertEvents::AlertId).integer().not_null())
                    .col(
                        ColumnDef::new(AlertEvents::TriggeredAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AlertEvents::Severity).string_len(10).not_null())
                    .col(
                        ColumnDef::new(AlertEvents::ValueObserved)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AlertEvents::Threshold).double().not_null())
                    .col(ColumnDef::new(AlertEvents::Context).json().not_null())
                    .col(ColumnDef::new(AlertEvents::AcknowledgedAt).big_integer())
                    .col(ColumnDef::new(AlertEvents::AcknowledgedBy).text())
                    .foreign_key(
                        ForeignKey::create()
                            .from_col(AlertEvents::AlertId)
                            .to(Alerts::Table, Alerts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(AlertEvents::Table)
                    .name("idx-alert_events-alert_id")
                    .col(AlertEvents::AlertId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AlertEvents::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum AlertEvents {
    Table,
    Id,
    AlertId,
    TriggeredAt,
    Severity,
    ValueObserved,
    Threshold,
    Context,
    AcknowledgedAt,
    AcknowledgedBy,
}

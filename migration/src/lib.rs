pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_table_rpc_endpoints;
mod m20240101_000002_create_table_rpc_health_samples;
mod m20240101_000003_create_table_contracts;
mod m20240101_000004_create_table_txs;
mod m20240101_000005_create_table_tx_traces;
mod m20240101_000006_create_table_metrics_minute;
mod m20240101_000007_create_table_alerts;
mod m20240101_000008_create_table_alert_events;
mod m20240101_000009_create_table_worker_state;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_table_rpc_endpoints::Migration),
            Box::new(m20240101_000002_create_table_rpc_health_samples::Migration),
            Box::new(m20240101_000003_create_table_contracts::Migration),
            Box::new(m20240101_000004_create_table_txs::Migration),
            Box::new(m20240101_000005_create_table_tx_traces::Migration),
            Box::new(m20240101_000006_create_table_metrics_minute::Migration),
            Box::new(m20240101_000007_create_table_alerts::Migration),
            Box::new(m20240101_000008_create_table_alert_events::Migration),
            Box::new(m20240101_000009_create_table_worker_state::Migration),
        ]
    }
}

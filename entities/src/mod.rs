//! `SeaORM` entity definitions for the tables the observability worker owns
//! or reads. One module per table, mirroring the teacher's layout.

pub mod sea_orm_active_enums;

pub mod alert_events;
pub mod alerts;
pub mod contracts;
pub mod metrics_minute;
pub mod rpc_endpoints;
pub mod rpc_health_samples;
pub mod tx_traces;
pub mod txs;
pub mod worker_state;

pub mod prelude {
    pub use super::alert_events::Entity as AlertEvents;
    pub use super::alerts::Entity as Alerts;
    pub use super::contracts::Entity as Contracts;
    pub use super::metrics_minute::Entity as MetricsMinute;
    pub use super::rpc_endpoints::Entity as RpcEndpoints;
    pub use super::rpc_health_samples::Entity as RpcHealthSamples;
    pub use super::tx_traces::Entity as TxTraces;
    pub use super::txs::Entity as Txs;
    pub use super::worker_state::Entity as WorkerState;
}

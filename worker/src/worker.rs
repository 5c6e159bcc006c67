//! The `Worker` aggregate: the one piece of shared mutable state, passed to
//! every pipeline behind an `Arc`. Mirrors the teacher's module-level
//! singletons (config, db pool, provider manager) folded into a single
//! struct constructed once by the orchestrator.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::Config;
use crate::rpc::provider_manager::{ProviderManager, TransportFactory};
use crate::rpc::transport::{HttpTransport, JsonRpcTransport};

pub struct Worker {
    pub db: DatabaseConnection,
    pub config: Config,
    pub provider_manager: ProviderManager,
    pub transport_factory: TransportFactory,
}

impl Worker {
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        let http_client = reqwest::Client::new();
        let transport_factory: TransportFactory = Arc::new(move |url: &str| {
            Arc::new(HttpTransport::new(http_client.clone(), url.to_string())) as Arc<dyn JsonRpcTransport>
        });

        let provider_manager = ProviderManager::new(
            db.clone(),
            config.rpc_timeout_default,
            config.rpc_timeout_trace,
            transport_factory.clone(),
        );

        Self {
            db,
            config,
            provider_manager,
            transport_factory,
        }
    }
}

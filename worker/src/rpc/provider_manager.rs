//! Picks a primary/trace RPC endpoint by score and caches one client per
//! endpoint id, matching the teacher's `DashMap`-based connection caches.
//! Endpoint rows are re-read on every selection; only the constructed client
//! is cached.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use entities::prelude::RpcEndpoints;
use entities::sea_orm_active_enums::RpcStatus;
use entities::rpc_endpoints;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::warn;

use super::client::RpcClient;
use super::transport::JsonRpcTransport;

const SWITCH_COOLDOWN: Duration = Duration::from_secs(30);
const SWITCH_SCORE_THRESHOLD: i32 = 50;

pub type TransportFactory = Arc<dyn Fn(&str) -> Arc<dyn JsonRpcTransport> + Send + Sync>;

pub struct ProviderManager {
    db: DatabaseConnection,
    clients: DashMap<i32, Arc<RpcClient<dyn JsonRpcTransport>>>,
    last_switch: DashMap<i32, Instant>,
    timeout_default: Duration,
    timeout_trace: Duration,
    transport_factory: TransportFactory,
}

impl ProviderManager {
    pub fn new(
        db: DatabaseConnection,
        timeout_default: Duration,
        timeout_trace: Duration,
        transport_factory: TransportFactory,
    ) -> Self {
        Self {
            db,
            clients: DashMap::new(),
            last_switch: DashMap::new(),
            timeout_default,
            timeout_trace,
            transport_factory,
        }
    }

    fn client_for(&self, endpoint: &rpc_endpoints::Model) -> Arc<RpcClient<dyn JsonRpcTransport>> {
        self.clients
            .entry(endpoint.id)
            .or_insert_with(|| {
                let transport = (self.transport_factory)(&endpoint.url);
                Arc::new(RpcClient::new(transport, self.timeout_default, self.timeout_trace))
            })
            .clone()
    }

    /// Highest-scoring active+healthy endpoint; falls back to the
    /// highest-scoring active endpoint regardless of status.
    pub async fn get_primary(&self) -> Result<(i32, Arc<RpcClient<dyn JsonRpcTransport>>), sea_orm::DbErr> {
        let healthy = RpcEndpoints::find()
            .filter(rpc_endpoints::Column::IsActive.eq(true))
            .filter(rpc_endpoints::Column::Status.eq(RpcStatus::Healthy))
            .order_by_desc(rpc_endpoints::Column::Score)
            .one(&self.db)
            .await?;

        let endpoint = match healthy {
            Some(endpoint) => endpoint,
            None => {
                RpcEndpoints::find()
                    .filter(rpc_endpoints::Column::IsActive.eq(true))
                    .order_by_desc(rpc_endpoints::Column::Score)
                    .one(&self.db)
                    .await?
                    .ok_or(sea_orm::DbErr::RecordNotFound("no active rpc endpoint".to_string()))?
            }
        };

        let id = endpoint.id;
        Ok((id, self.client_for(&endpoint)))
    }

    /// Same selection restricted to `supports_traces` endpoints; `None` if
    /// none qualify (trace capture is best-effort, see worker::pipelines).
    pub async fn get_trace_provider(
        &self,
    ) -> Result<Option<(i32, Arc<RpcClient<dyn JsonRpcTransport>>)>, sea_orm::DbErr> {
        let endpoint = RpcEndpoints::find()
            .filter(rpc_endpoints::Column::IsActive.eq(true))
            .filter(rpc_endpoints::Column::SupportsTraces.eq(true))
            .filter(rpc_endpoints::Column::Status.eq(RpcStatus::Healthy))
            .order_by_desc(rpc_endpoints::Column::Score)
            .one(&self.db)
            .await?;

        Ok(endpoint.map(|endpoint| {
            let id = endpoint.id;
            (id, self.client_for(&endpoint))
        }))
    }

    /// Record-only: scoring is the probe pipeline's responsibility.
    pub fn mark_failure(&self, endpoint_id: i32) {
        warn!(endpoint_id, "rpc call failed");
    }

    pub async fn should_switch(&self, current_id: i32) -> Result<bool, sea_orm::DbErr> {
        let current = RpcEndpoints::find_by_id(current_id).one(&self.db).await?;
        let score = match current {
            Some(endpoint) => endpoint.score,
            None => return Ok(true),
        };

        if score >= SWITCH_SCORE_THRESHOLD {
            return Ok(false);
        }

        let now = Instant::now();
        let cooled_down = match self.last_switch.get(&current_id) {
            Some(last) => now.duration_since(*last) >= SWITCH_COOLDOWN,
            None => true,
        };

        if cooled_down {
            self.last_switch.insert(current_id, now);
        }

        Ok(cooled_down)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use entities::sea_orm_active_enums::RpcStatus;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};

    use super::*;
    use crate::rpc::transport::fake::FakeTransport;

    fn endpoint(id: i32, score: i32, status: RpcStatus, is_active: bool) -> rpc_endpoints::Model {
        rpc_endpoints::Model {
            id,
            url: format!("http://node-{id}"),
            is_active,
            score,
            status,
            supports_traces: false,
            last_probe_at: 0,
            updated_at: 0,
        }
    }

    fn manager(db: DatabaseConnection) -> ProviderManager {
        let factory: TransportFactory =
            Arc::new(|_url: &str| Arc::new(FakeTransport::new()) as Arc<dyn JsonRpcTransport>);
        ProviderManager::new(db, Duration::from_secs(5), Duration::from_secs(10), factory)
    }

    // Provider failover scenario: A starts healthy/score 92, B unhealthy/score
    // 30. get_primary prefers A while it's healthy.
    #[tokio::test]
    async fn get_primary_prefers_the_healthy_highest_scoring_endpoint() {
        let a = endpoint(1, 92, RpcStatus::Healthy, true);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![a]])
            .into_connection();

        let (id, _) = manager(db).get_primary().await.unwrap();
        assert_eq!(id, 1);
    }

    // After three failed probe cycles A's score drops to 25 and it goes
    // unhealthy. With no healthy endpoint left, get_primary falls back to
    // whichever active endpoint scores highest — B (30 > 25).
    #[tokio::test]
    async fn get_primary_falls_back_to_highest_scoring_active_endpoint_when_none_are_healthy() {
        let b = endpoint(2, 30, RpcStatus::Unhealthy, true);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<rpc_endpoints::Model>::new(), vec![b]])
            .into_connection();

        let (id, _) = manager(db).get_primary().await.unwrap();
        assert_eq!(id, 2);
    }

    #[tokio::test]
    async fn get_primary_errors_when_no_active_endpoint_exists() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<rpc_endpoints::Model>::new(), Vec::<rpc_endpoints::Model>::new()])
            .into_connection();

        assert!(manager(db).get_primary().await.is_err());
    }

    #[tokio::test]
    async fn should_switch_is_true_once_score_drops_below_threshold() {
        let degraded = endpoint(1, 25, RpcStatus::Unhealthy, true);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![degraded]])
            .into_connection();

        assert!(manager(db).should_switch(1).await.unwrap());
    }

    #[tokio::test]
    async fn should_switch_is_false_above_threshold() {
        let healthy = endpoint(1, 92, RpcStatus::Healthy, true);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![healthy]])
            .into_connection();

        assert!(!manager(db).should_switch(1).await.unwrap());
    }
}

//! Probe pipeline: samples every active endpoint on a fixed period, scores
//! it, and records the result. The only writer of
//! `rpc_endpoints.{score,status,last_probe_at}` and of `rpc_health_samples`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use entities::prelude::RpcEndpoints;
use entities::{rpc_endpoints, rpc_health_samples};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter};
use tokio::sync::Semaphore;
use tracing::{info, instrument, warn};

use crate::rpc::client::RpcClient;
use crate::rpc::scoring::{calculate_score, score_to_status};
use crate::time::now_unix;
use crate::worker::Worker;

#[instrument(skip_all)]
async fn run_cycle(worker: &Worker, consecutive_failures: &mut HashMap<i32, u32>) -> Result<(), sea_orm::DbErr> {
    let endpoints = RpcEndpoints::find()
        .filter(rpc_endpoints::Column::IsActive.eq(true))
        .all(&worker.db)
        .await?;

    let semaphore = Arc::new(Semaphore::new(worker.config.max_concurrent_probes.max(1)));
    let mut tasks = Vec::with_capacity(endpoints.len());

    for endpoint in endpoints {
        let semaphore = semaphore.clone();
        let transport_factory = worker.transport_factory.clone();
        let timeout_default = worker.config.rpc_timeout_default;
        let timeout_trace = worker.config.rpc_timeout_trace;

        tasks.push(tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await.expect("probe semaphore closed");
            let client = RpcClient::new(transport_factory(&endpoint.url), timeout_default, timeout_trace);
            let started = Instant::now();
            let result = client.eth_block_number().await;
            let latency_ms = started.elapsed().as_millis() as u64;
            (endpoint, result, latency_ms)
        }));
    }

    let mut samples = Vec::with_capacity(tasks.len());
    for task in tasks {
        samples.push(
            task.await
                .map_err(|err| sea_orm::DbErr::Custom(format!("probe task panicked: {err}")))?,
        );
    }

    let leader_block = samples
        .iter()
        .filter_map(|(_, result, _)| result.as_ref().ok())
        .map(|n| n.as_u64())
        .max()
        .unwrap_or(0);

    let sampled_at = now_unix();

    for (endpoint, result, latency_ms) in samples {
        let failures = consecutive_failures.entry(endpoint.id).or_insert(0);

        let (block_number, latency, is_success, error_code) = match &result {
            Ok(number) => {
                *failures = 0;
                (Some(number.as_u64()), Some(latency_ms), true, None)
            }
            Err(err) => {
                *failures += 1;
                (None, None, false, Some(err.to_string()))
            }
        };

        let block_lag = block_number.map(|n| leader_block.saturating_sub(n)).unwrap_or(0);
        let score = calculate_score(latency, *failures, block_lag);
        let status = score_to_status(score);

        rpc_health_samples::ActiveModel {
            endpoint_id: Set(endpoint.id),
            sampled_at: Set(sampled_at),
            latency_ms: Set(latency.map(|ms| ms as i32)),
            block_number: Set(block_number.map(|n| n as i64)),
            is_success: Set(is_success),
            error_code: Set(error_code),
            ..Default::default()
        }
        .insert(&worker.db)
        .await?;

        let mut active_model = endpoint.into_active_model();
        active_model.score = Set(score);
        active_model.status = Set(status);
        active_model.last_probe_at = Set(sampled_at);
        active_model.updated_at = Set(sampled_at);
        active_model.update(&worker.db).await?;
    }

    Ok(())
}

pub async fn run(worker: Arc<Worker>, mut shutdown: tokio::sync::watch::Receiver<bool>) {
    let mut consecutive_failures = HashMap::new();
    let mut interval = tokio::time::interval(worker.config.poll_interval_probe);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if let Err(err) = run_cycle(&worker, &mut consecutive_failures).await {
                    warn!(error = %err, "probe cycle failed");
                }
            }
            _ = shutdown.changed() => {
                info!("probe pipeline shutting down");
                break;
            }
        }
    }
}

//! Alert evaluation: polls enabled `alerts`, checks each against its
//! cooldown, evaluates its `alert_type` against recent `txs` /
//! `metrics_minute` / `rpc_endpoints` state, and records a firing as an
//! `alert_events` row.

use std::sync::Arc;

use entities::prelude::{Alerts, MetricsMinute, RpcEndpoints, Txs};
use entities::sea_orm_active_enums::{AlertType, RpcStatus};
use entities::{alert_events, alerts, metrics_minute, rpc_endpoints, txs};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter};
use tracing::{debug, info, instrument, warn};

use crate::errors::WorkerResult;
use crate::state;
use crate::time::now_unix;
use crate::worker::Worker;

const GAS_SPIKE_BASELINE_SECS: i64 = 3600;

pub async fn run(worker: Arc<Worker>, mut shutdown: tokio::sync::watch::Receiver<bool>) {
    let mut interval = tokio::time::interval(worker.config.poll_interval_alerts);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if let Err(err) = run_cycle(&worker).await {
                    warn!(error = %err, "alert evaluation cycle failed");
                }
            }
            _ = shutdown.changed() => {
                info!("alert pipeline shutting down");
                break;
            }
        }
    }
}

#[instrument(skip_all)]
async fn run_cycle(worker: &Worker) -> WorkerResult<()> {
    let enabled = Alerts::find().filter(alerts::Column::IsEnabled.eq(true)).all(&worker.db).await?;
    let now = now_unix();

    for alert in enabled {
        if in_cooldown(&alert, now) {
            continue;
        }

        if let Err(err) = evaluate_and_fire(worker, &alert, now).await {
            warn!(alert_id = alert.id, error = %err, "alert evaluation failed, skipping");
        }
    }

    state::set_alert_eval_cursor(&worker.db, state::AlertEvalCursor { last_eval_ts: now }).await?;

    Ok(())
}

async fn evaluate_and_fire(worker: &Worker, alert: &alerts::Model, now: i64) -> WorkerResult<()> {
    let outcome = match alert.alert_type {
        AlertType::FailureRate => evaluate_failure_rate(worker, alert, now).await?,
        AlertType::GasSpike => evaluate_gas_spike(worker, alert, now).await?,
        AlertType::ProviderDown => evaluate_provider_down(worker, alert).await?,
        AlertType::Custom => {
            debug!(alert_id = alert.id, "custom alert type has no built-in evaluator, skipping");
            None
        }
    };

    if let Some((value_observed, context)) = outcome {
        fire_alert(worker, alert, value_observed, context, now).await?;
    }

    Ok(())
}

fn in_cooldown(alert: &alerts::Model, now: i64) -> bool {
    match alert.last_triggered_at {
        Some(last) => now - last < i64::from(alert.cooldown_minutes) * 60,
        None => false,
    }
}

fn contract_id_filter(alert: &alerts::Model) -> Vec<i32> {
    serde_json::from_value(alert.contract_ids.clone()).unwrap_or_default()
}

/// Returns `Some((observed_value, context))` when the alert's condition is met.
async fn evaluate_failure_rate(worker: &Worker, alert: &alerts::Model, now: i64) -> WorkerResult<Option<(f64, serde_json::Value)>> {
    let window_start = now - i64::from(alert.window_minutes) * 60;

    let mut query = Txs::find()
        .filter(txs::Column::BlockTimestamp.gte(window_start))
        .filter(txs::Column::BlockTimestamp.lt(now));

    let contract_ids = contract_id_filter(alert);
    if !contract_ids.is_empty() {
        query = query.filter(txs::Column::ContractId.is_in(contract_ids));
    }

    let rows = query.all(&worker.db).await?;
    let total = rows.len();
    if total == 0 {
        return Ok(None);
    }

    let failed = rows.iter().filter(|row| row.status == 0).count();
    let failure_rate = (failed as f64 / total as f64) * 100.0;

    if failure_rate > alert.threshold {
        let context = serde_json::json!({ "window_minutes": alert.window_minutes });
        Ok(Some((failure_rate, context)))
    } else {
        Ok(None)
    }
}

async fn evaluate_gas_spike(worker: &Worker, alert: &alerts::Model, now: i64) -> WorkerResult<Option<(f64, serde_json::Value)>> {
    let window_start = now - i64::from(alert.window_minutes) * 60;
    let baseline_start = window_start - GAS_SPIKE_BASELINE_SECS;

    let current_avg = average_gas_price(worker, window_start, now).await?;
    let baseline_avg = average_gas_price(worker, baseline_start, window_start).await?;

    let (current_avg, baseline_avg) = match (current_avg, baseline_avg) {
        (Some(current), Some(baseline)) if baseline != 0.0 => (current, baseline),
        _ => return Ok(None),
    };

    let multiplier = current_avg / baseline_avg;
    if multiplier > alert.threshold {
        let context = serde_json::json!({ "baseline_window": "1 hour", "check_time": now });
        Ok(Some((multiplier, context)))
    } else {
        Ok(None)
    }
}

async fn average_gas_price(worker: &Worker, start: i64, end: i64) -> WorkerResult<Option<f64>> {
    let buckets = MetricsMinute::find()
        .filter(metrics_minute::Column::BucketTs.gte(start))
        .filter(metrics_minute::Column::BucketTs.lt(end))
        .all(&worker.db)
        .await?;

    if buckets.is_empty() {
        return Ok(None);
    }

    let sum: i64 = buckets.iter().map(|bucket| bucket.gas_price_avg).sum();
    Ok(Some(sum as f64 / buckets.len() as f64))
}

async fn evaluate_provider_down(worker: &Worker, alert: &alerts::Model) -> WorkerResult<Option<(f64, serde_json::Value)>> {
    let unhealthy_count = RpcEndpoints::find()
        .filter(rpc_endpoints::Column::IsActive.eq(true))
        .filter(rpc_endpoints::Column::Status.eq(RpcStatus::Unhealthy))
        .all(&worker.db)
        .await?
        .len();

    if (unhealthy_count as f64) >= alert.threshold {
        let context = serde_json::json!({ "check_time": now_unix() });
        Ok(Some((unhealthy_count as f64, context)))
    } else {
        Ok(None)
    }
}

async fn fire_alert(
    worker: &Worker,
    alert: &alerts::Model,
    value_observed: f64,
    context: serde_json::Value,
    now: i64,
) -> WorkerResult<()> {
    alert_events::ActiveModel {
        alert_id: Set(alert.id),
        triggered_at: Set(now),
        severity: Set(alert.severity),
        value_observed: Set(value_observed),
        threshold: Set(alert.threshold),
        context: Set(context),
        acknowledged_at: Set(None),
        acknowledged_by: Set(None),
        ..Default::default()
    }
    .insert(&worker.db)
    .await?;

    let mut active_model = alert.clone().into_active_model();
    active_model.last_triggered_at = Set(Some(now));
    active_model.update(&worker.db).await?;

    info!(alert_id = alert.id, value_observed, "alert fired");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(cooldown_minutes: i32, last_triggered_at: Option<i64>) -> alerts::Model {
        alerts::Model {
            id: 1,
            name: "test".to_string(),
            description: None,
            alert_type: AlertType::FailureRate,
            conditions: serde_json::json!({}),
            threshold: 10.0,
            window_minutes: 5,
            cooldown_minutes,
            severity: entities::sea_orm_active_enums::Severity::Warning,
            is_enabled: true,
            contract_ids: serde_json::json!([]),
            last_triggered_at,
        }
    }

    #[test]
    fn cooldown_blocks_reevaluation_until_elapsed() {
        let now = 1_700_000_000;
        let a = alert(10, Some(now - 60));
        assert!(in_cooldown(&a, now));

        let b = alert(10, Some(now - 700));
        assert!(!in_cooldown(&b, now));
    }

    #[test]
    fn no_prior_firing_is_never_in_cooldown() {
        let a = alert(10, None);
        assert!(!in_cooldown(&a, 1_700_000_000));
    }

    #[test]
    fn contract_id_filter_parses_list_or_defaults_empty() {
        let mut a = alert(10, None);
        a.contract_ids = serde_json::json!([1, 2, 3]);
        assert_eq!(contract_id_filter(&a), vec![1, 2, 3]);

        let b = alert(10, None);
        assert_eq!(contract_id_filter(&b), Vec::<i32>::new());
    }
}

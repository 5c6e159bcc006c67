//! Minute-bucket rollup: aggregates `txs` rows into `metrics_minute`. Only
//! buckets that have fully elapsed are written; empty buckets still advance
//! the cursor so a quiet chain doesn't stall the pipeline.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use entities::prelude::{MetricsMinute, Txs};
use entities::{metrics_minute, txs};
use rust_decimal::Decimal;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue::Set, ColumnTrait, EntityTrait, QueryFilter};
use tracing::{info, instrument, warn};

use crate::errors::WorkerResult;
use crate::state;
use crate::time::now_unix;
use crate::worker::Worker;

const BUCKET_WIDTH_SECS: i64 = 60;
const TOP_ERRORS_LIMIT: usize = 5;

pub async fn run(worker: Arc<Worker>, mut shutdown: tokio::sync::watch::Receiver<bool>) {
    let mut interval = tokio::time::interval(worker.config.poll_interval_rollup);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if let Err(err) = run_cycle(&worker).await {
                    warn!(error = %err, "rollup cycle failed");
                }
            }
            _ = shutdown.changed() => {
                info!("rollup pipeline shutting down");
                break;
            }
        }
    }
}

#[instrument(skip_all)]
async fn run_cycle(worker: &Worker) -> WorkerResult<()> {
    let now = now_unix();
    let current_bucket_start = now - now.rem_euclid(BUCKET_WIDTH_SECS);
    let target = current_bucket_start - BUCKET_WIDTH_SECS;

    let cursor = state::get_metrics_rollup_cursor(&worker.db).await?;
    let last_bucket_ts = cursor.map(|cursor| cursor.last_bucket_ts);
    if last_bucket_ts.is_some_and(|last| target <= last) {
        return Ok(());
    }

    // only one bucket advances per cycle; catch-up is bounded by cycle frequency.
    process_bucket(worker, target).await?;
    state::set_metrics_rollup_cursor(&worker.db, state::MetricsRollupCursor { last_bucket_ts: target }).await?;

    Ok(())
}

async fn process_bucket(worker: &Worker, bucket_ts: i64) -> WorkerResult<()> {
    let rows = Txs::find()
        .filter(txs::Column::BlockTimestamp.gte(bucket_ts))
        .filter(txs::Column::BlockTimestamp.lt(bucket_ts + BUCKET_WIDTH_SECS))
        .all(&worker.db)
        .await?;

    // tentative (post-reorg, unconfirmed) txs still count here: excluding them
    // would let a bucket made entirely of tentative txs look empty and get
    // silently skipped forever once the cursor advances past it. An empty
    // bucket still advances the cursor in run_cycle; nothing to write here.
    if rows.is_empty() {
        return Ok(());
    }

    let tx_count = rows.len() as i64;
    let tx_failed_count = rows.iter().filter(|row| row.status == 0).count() as i64;
    let gas_used_total: Decimal = rows.iter().map(|row| Decimal::from(row.gas_used)).sum();
    let gas_price_avg = rows.iter().map(|row| row.gas_price).sum::<i64>() / tx_count;

    let block_count = rows.iter().map(|row| row.block_number).collect::<HashSet<_>>().len() as i64;
    let unique_senders = rows
        .iter()
        .map(|row| row.from_address.as_str())
        .collect::<HashSet<_>>()
        .len() as i64;

    let top_errors = top_errors(&rows);

    let model = metrics_minute::ActiveModel {
        bucket_ts: Set(bucket_ts),
        tx_count: Set(tx_count),
        tx_failed_count: Set(tx_failed_count),
        gas_used_total: Set(gas_used_total),
        gas_price_avg: Set(gas_price_avg),
        block_count: Set(block_count),
        unique_senders: Set(unique_senders),
        top_errors: Set(top_errors),
    };

    MetricsMinute::insert(model)
        .on_conflict(
            OnConflict::column(metrics_minute::Column::BucketTs)
                .update_columns([
                    metrics_minute::Column::TxCount,
                    metrics_minute::Column::TxFailedCount,
                    metrics_minute::Column::GasUsedTotal,
                    metrics_minute::Column::GasPriceAvg,
                    metrics_minute::Column::BlockCount,
                    metrics_minute::Column::UniqueSenders,
                    metrics_minute::Column::TopErrors,
                ])
                .to_owned(),
        )
        .exec(&worker.db)
        .await?;

    Ok(())
}

fn top_errors(rows: &[txs::Model]) -> serde_json::Value {
    let mut counts: HashMap<(&str, Option<&str>), i64> = HashMap::new();
    for row in rows {
        if row.status != 0 {
            continue;
        }
        if let Some(signature) = row.error_signature.as_deref() {
            let decoded = row.error_decoded.as_deref();
            *counts.entry((signature, decoded)).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<((&str, Option<&str>), i64)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(TOP_ERRORS_LIMIT);

    serde_json::json!(ranked
        .into_iter()
        .map(|((signature, decoded), count)| serde_json::json!({
            "signature": signature,
            "name": decoded.unwrap_or_default(),
            "count": count,
        }))
        .collect::<Vec<_>>())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(signature: Option<&str>, decoded: Option<&str>, status: i16) -> txs::Model {
        txs::Model {
            hash: "0x0".to_string(),
            block_number: 1,
            block_timestamp: 0,
            from_address: "0x0".to_string(),
            to_address: None,
            contract_id: None,
            value_wei: Decimal::ZERO,
            gas_used: 21_000,
            gas_price: 1,
            status,
            error_raw: None,
            error_signature: signature.map(|s| s.to_string()),
            error_decoded: decoded.map(|s| s.to_string()),
            error_params: None,
            method_id: None,
            method_name: None,
            has_trace: false,
            is_tentative: false,
            ingested_at: 0,
        }
    }

    #[test]
    fn top_errors_ranks_by_frequency_and_caps_at_five() {
        let mut rows = Vec::new();
        rows.extend((0..3).map(|_| tx(Some("0xa"), Some("Approval required"), 0)));
        rows.extend((0..5).map(|_| tx(Some("0xb"), Some("Insufficient balance"), 0)));
        rows.push(tx(Some("0xc"), Some("Paused"), 0));
        rows.push(tx(None, None, 1));

        let value = top_errors(&rows);
        let array = value.as_array().unwrap();
        assert_eq!(array.len(), 3);
        assert_eq!(array[0]["signature"], "0xb");
        assert_eq!(array[0]["name"], "Insufficient balance");
        assert_eq!(array[0]["count"], 5);
        assert_eq!(array[1]["signature"], "0xa");
        assert_eq!(array[1]["name"], "Approval required");
        assert_eq!(array[1]["count"], 3);
    }

    #[test]
    fn top_errors_excludes_successful_txs() {
        let rows = vec![tx(Some("0xa"), Some("Approval required"), 1), tx(None, None, 0)];
        let value = top_errors(&rows);
        assert!(value.as_array().unwrap().is_empty());
    }

    #[test]
    fn top_errors_keeps_distinct_messages_sharing_a_selector_separate() {
        let mut rows = Vec::new();
        rows.extend((0..4).map(|_| tx(Some("0xa9059cbb"), Some("Transfer amount exceeds balance"), 0)));
        rows.extend((0..2).map(|_| tx(Some("0xa9059cbb"), Some("Transfer to zero address"), 0)));

        let value = top_errors(&rows);
        let array = value.as_array().unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array[0]["signature"], "0xa9059cbb");
        assert_eq!(array[0]["name"], "Transfer amount exceeds balance");
        assert_eq!(array[0]["count"], 4);
        assert_eq!(array[1]["signature"], "0xa9059cbb");
        assert_eq!(array[1]["name"], "Transfer to zero address");
        assert_eq!(array[1]["count"], 2);
    }

    #[test]
    fn aggregates_match_expected_totals() {
        let rows = vec![tx(None, None, 1), tx(None, None, 0)];
        assert_eq!(rows.iter().filter(|r| r.status == 0).count(), 1);
        let total: Decimal = rows.iter().map(|r| Decimal::from(r.gas_used)).sum();
        assert_eq!(total, Decimal::from(42_000));
    }
}

//! Block scanner: walks the chain from the persisted cursor, ingests
//! transactions and receipts, and detects single-block-deep reorgs. Adaptive
//! polling is modeled explicitly as a `Tracking`/`CatchingUp` state machine
//! rather than an inline boolean threaded through the loop.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use entities::prelude::{Contracts, Txs};
use entities::{contracts, txs};
use ethers::types::{Transaction as EthTransaction, TransactionReceipt, H256, U256, U64};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tracing::{info, instrument, warn};

use crate::errors::{WorkerError, WorkerResult};
use crate::rpc::client::RpcClient;
use crate::rpc::transport::JsonRpcTransport;
use crate::state;
use crate::time::now_unix;
use crate::worker::Worker;

const CATCH_UP_THRESHOLD: u64 = 10;
const CATCH_UP_POLL: Duration = Duration::from_millis(500);
const REORG_TENTATIVE_WINDOW: i64 = 10;
const REORG_ROLLBACK_WINDOW: i64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScannerState {
    Tracking,
    CatchingUp,
}

pub async fn run(worker: Arc<Worker>, mut shutdown: tokio::sync::watch::Receiver<bool>) {
    let mut last_block_hash: Option<H256> = None;
    let mut state = ScannerState::Tracking;

    loop {
        let sleep_for = match state {
            ScannerState::Tracking => worker.config.poll_interval_scanner,
            ScannerState::CatchingUp => CATCH_UP_POLL,
        };

        tokio::select! {
            _ = tokio::time::sleep(sleep_for) => {
                match run_cycle(&worker, &mut last_block_hash).await {
                    Ok(next_state) => state = next_state,
                    Err(err) => warn!(error = %err, "scanner cycle failed"),
                }
            }
            _ = shutdown.changed() => {
                info!("scanner pipeline shutting down");
                break;
            }
        }
    }
}

#[instrument(skip_all)]
async fn run_cycle(worker: &Worker, last_block_hash: &mut Option<H256>) -> WorkerResult<ScannerState> {
    let (primary_id, primary) = match worker.provider_manager.get_primary().await {
        Ok(pair) => pair,
        Err(err) => {
            warn!(error = %err, "no primary rpc endpoint available");
            return Ok(ScannerState::Tracking);
        }
    };

    let tip = match primary.eth_block_number().await {
        Ok(tip) => tip.as_u64(),
        Err(err) => {
            worker.provider_manager.mark_failure(primary_id);
            warn!(error = %err, "failed to read chain tip");
            return Ok(ScannerState::Tracking);
        }
    };

    let cursor = state::get_last_scanned_block(&worker.db).await?;
    let last_scanned = match cursor {
        Some(cursor) => cursor.block_number as u64,
        // no historical backfill: a fresh worker starts at the current tip.
        None => tip.saturating_sub(1),
    };

    if tip <= last_scanned {
        return Ok(ScannerState::Tracking);
    }

    let blocks_behind = tip - last_scanned;
    let next_state = if blocks_behind > CATCH_UP_THRESHOLD {
        ScannerState::CatchingUp
    } else {
        ScannerState::Tracking
    };
    let batch = if next_state == ScannerState::CatchingUp {
        worker.config.block_batch_size.min(blocks_behind)
    } else {
        1
    };

    let watched_contracts = load_watched_contracts(&worker.db).await?;

    for n in (last_scanned + 1)..=(last_scanned + batch) {
        let block = match primary.eth_get_block_by_number(U64::from(n)).await {
            Ok(Some(block)) => block,
            Ok(None) => {
                warn!(block_number = n, "block not yet available, retrying next cycle");
                return Ok(next_state);
            }
            Err(err) => {
                worker.provider_manager.mark_failure(primary_id);
                warn!(error = %err, block_number = n, "failed to fetch block");
                return Ok(next_state);
            }
        };

        if let Some(expected_parent) = *last_block_hash {
            if block.parent_hash != expected_parent {
                handle_reorg(worker, n as i64).await?;
                *last_block_hash = None;
                return Ok(ScannerState::CatchingUp);
            }
        }

        let block_hash = block.hash.unwrap_or_default();
        let block_timestamp = block.timestamp.low_u64() as i64;

        let mut rows = Vec::with_capacity(block.transactions.len());
        for tx in &block.transactions {
            match build_tx_row(&primary, tx, n as i64, block_timestamp, &watched_contracts).await {
                Ok(row) => rows.push(row),
                Err(err) => {
                    warn!(error = %err, tx_hash = %tx.hash, "failed to process transaction, skipping");
                }
            }
        }

        if !rows.is_empty() {
            insert_tx_rows(&worker.db, rows).await?;
        }

        *last_block_hash = Some(block_hash);
        state::set_last_scanned_block(
            &worker.db,
            state::LastScannedBlock {
                block_number: n as i64,
                block_hash: format!("{block_hash:#x}"),
                timestamp: now_unix(),
            },
        )
        .await?;
    }

    Ok(next_state)
}

async fn build_tx_row(
    primary: &RpcClient<dyn JsonRpcTransport>,
    tx: &EthTransaction,
    block_number: i64,
    block_timestamp: i64,
    watched_contracts: &HashMap<String, i32>,
) -> WorkerResult<txs::ActiveModel> {
    let receipt = primary
        .eth_get_transaction_receipt(tx.hash)
        .await
        .map_err(WorkerError::Rpc)?
        .ok_or_else(|| WorkerError::Config(format!("missing receipt for {:#x}", tx.hash)))?;

    let status = receipt.status.map(|s| s.low_u64() as i16).unwrap_or(0);
    let gas_used = receipt.gas_used.map(|g| g.low_u64() as i64).unwrap_or(0);
    let gas_price = tx.gas_price.map(u256_to_i64).unwrap_or(0);
    let value_wei = u256_to_decimal(tx.value);

    let to_address = tx.to.map(|addr| format!("{addr:#x}"));
    let contract_id = to_address
        .as_ref()
        .and_then(|addr| watched_contracts.get(&addr.to_lowercase()).copied());

    let method_id = extract_method_id(&tx.input.0);

    let (error_raw, error_signature, error_decoded, error_params) = if status == 0 {
        match revert_reason(&receipt) {
            Some(raw) => {
                let decoded = crate::decode::decode_revert(&raw);
                (Some(raw), decoded.signature, decoded.message, decoded.params)
            }
            None => (None, None, None, None),
        }
    } else {
        (None, None, None, None)
    };

    Ok(txs::ActiveModel {
        hash: Set(format!("{:#x}", tx.hash)),
        block_number: Set(block_number),
        block_timestamp: Set(block_timestamp),
        from_address: Set(format!("{:#x}", tx.from)),
        to_address: Set(to_address),
        contract_id: Set(contract_id),
        value_wei: Set(value_wei),
        gas_used: Set(gas_used),
        gas_price: Set(gas_price),
        status: Set(status),
        error_raw: Set(error_raw),
        error_signature: Set(error_signature),
        error_decoded: Set(error_decoded),
        error_params: Set(error_params),
        method_id: Set(method_id),
        // ABI-based method decoding beyond the selector itself is not implemented.
        method_name: Set(None),
        has_trace: Set(false),
        is_tentative: Set(false),
        ingested_at: Set(now_unix()),
    })
}

fn extract_method_id(input: &[u8]) -> Option<String> {
    if input.len() >= 4 {
        Some(format!("0x{}", hex::encode(&input[..4])))
    } else {
        None
    }
}

fn revert_reason(receipt: &TransactionReceipt) -> Option<String> {
    receipt
        .other
        .get("revertReason")
        .and_then(|raw| serde_json::from_str::<String>(raw.get()).ok())
}

fn u256_to_i64(value: U256) -> i64 {
    value.low_u64() as i64
}

/// `rust_decimal::Decimal` cannot hold the full uint256 range (its mantissa
/// tops out around 2^96); values beyond that saturate rather than panic.
fn u256_to_decimal(value: U256) -> rust_decimal::Decimal {
    rust_decimal::Decimal::from_str_exact(&value.to_string()).unwrap_or(rust_decimal::Decimal::MAX)
}

async fn load_watched_contracts(db: &DatabaseConnection) -> WorkerResult<HashMap<String, i32>> {
    let rows = Contracts::find()
        .filter(contracts::Column::IsWatched.eq(true))
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|contract| (contract.address.to_lowercase(), contract.id))
        .collect())
}

async fn insert_tx_rows(db: &DatabaseConnection, rows: Vec<txs::ActiveModel>) -> WorkerResult<()> {
    let result = Txs::insert_many(rows)
        .on_conflict(OnConflict::column(txs::Column::Hash).do_nothing().to_owned())
        .exec(db)
        .await;

    match result {
        Ok(_) => Ok(()),
        Err(sea_orm::DbErr::RecordNotInserted) => Ok(()),
        Err(err) => Err(err.into()),
    }
}

async fn handle_reorg(worker: &Worker, reorg_at: i64) -> WorkerResult<()> {
    let tentative_floor = (reorg_at - REORG_TENTATIVE_WINDOW).max(0);

    Txs::update_many()
        .set(txs::ActiveModel {
            is_tentative: Set(true),
            ..Default::default()
        })
        .filter(txs::Column::BlockNumber.gte(tentative_floor))
        .exec(&worker.db)
        .await?;

    let rollback_to = (reorg_at - REORG_ROLLBACK_WINDOW).max(0);
    state::set_last_scanned_block(
        &worker.db,
        state::LastScannedBlock {
            block_number: rollback_to,
            block_hash: "0x0".to_string(),
            timestamp: now_unix(),
        },
    )
    .await?;

    warn!(reorg_at, rollback_to, tentative_floor, "reorg detected, rolling back cursor");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_id_requires_four_bytes() {
        assert_eq!(extract_method_id(&[]), None);
        assert_eq!(extract_method_id(&[0xa9, 0x05, 0x9c]), None);
        assert_eq!(
            extract_method_id(&[0xa9, 0x05, 0x9c, 0xbb, 0x01]),
            Some("0xa9059cbb".to_string())
        );
    }

    #[test]
    fn u256_to_decimal_round_trips_small_values() {
        let value = U256::from(1_000_000_000_000_000_000u64);
        let decimal = u256_to_decimal(value);
        assert_eq!(decimal.to_string(), "1000000000000000000");
    }

    #[test]
    fn reorg_windows_are_asymmetric_and_floor_at_zero() {
        assert_eq!((100 - REORG_TENTATIVE_WINDOW).max(0), 90);
        assert_eq!((100 - REORG_ROLLBACK_WINDOW).max(0), 80);
        assert_eq!((5 - REORG_ROLLBACK_WINDOW).max(0), 0);
    }
}

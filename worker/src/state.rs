//! Durable cursor store (`worker_state`). The JSON `value` column carries
//! heterogeneous payloads keyed by `key`; modeled here as a closed
//! `CursorValue` enum instead of raw `serde_json::Value` at the call sites.

use entities::prelude::WorkerState as WorkerStateEntity;
use entities::worker_state;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveValue::Set, DatabaseConnection, EntityTrait};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{WorkerError, WorkerResult};
use crate::time::now_unix;

pub const KEY_LAST_SCANNED_BLOCK: &str = "last_scanned_block";
pub const KEY_METRICS_ROLLUP_CURSOR: &str = "metrics_rollup_cursor";
pub const KEY_ALERT_EVAL_CURSOR: &str = "alert_eval_cursor";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastScannedBlock {
    pub block_number: i64,
    pub block_hash: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRollupCursor {
    pub last_bucket_ts: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvalCursor {
    pub last_eval_ts: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CursorValue {
    LastScannedBlock(LastScannedBlock),
    MetricsRollupCursor(MetricsRollupCursor),
    AlertEvalCursor(AlertEvalCursor),
}

impl CursorValue {
    pub fn key(&self) -> &'static str {
        match self {
            Self::LastScannedBlock(_) => KEY_LAST_SCANNED_BLOCK,
            Self::MetricsRollupCursor(_) => KEY_METRICS_ROLLUP_CURSOR,
            Self::AlertEvalCursor(_) => KEY_ALERT_EVAL_CURSOR,
        }
    }

    fn to_json(&self) -> WorkerResult<Value> {
        let value = match self {
            Self::LastScannedBlock(v) => serde_json::to_value(v)?,
            Self::MetricsRollupCursor(v) => serde_json::to_value(v)?,
            Self::AlertEvalCursor(v) => serde_json::to_value(v)?,
        };
        Ok(value)
    }

    fn from_row(key: &str, value: Value) -> WorkerResult<Self> {
        match key {
            KEY_LAST_SCANNED_BLOCK => Ok(Self::LastScannedBlock(serde_json::from_value(value)?)),
            KEY_METRICS_ROLLUP_CURSOR => Ok(Self::MetricsRollupCursor(serde_json::from_value(value)?)),
            KEY_ALERT_EVAL_CURSOR => Ok(Self::AlertEvalCursor(serde_json::from_value(value)?)),
            other => Err(WorkerError::Config(format!("unknown worker_state key: {other}"))),
        }
    }
}

pub async fn get_state(db: &DatabaseConnection, key: &str) -> WorkerResult<Option<CursorValue>> {
    let row = WorkerStateEntity::find_by_id(key.to_string()).one(db).await?;
    row.map(|row| CursorValue::from_row(key, row.value)).transpose()
}

pub async fn set_state(db: &DatabaseConnection, value: CursorValue) -> WorkerResult<()> {
    let model = worker_state::ActiveModel {
        key: Set(value.key().to_string()),
        value: Set(value.to_json()?),
        updated_at: Set(now_unix()),
    };

    WorkerStateEntity::insert(model)
        .on_conflict(
            OnConflict::column(worker_state::Column::Key)
                .update_columns([worker_state::Column::Value, worker_state::Column::UpdatedAt])
                .to_owned(),
        )
        .exec(db)
        .await?;

    Ok(())
}

pub async fn get_last_scanned_block(db: &DatabaseConnection) -> WorkerResult<Option<LastScannedBlock>> {
    match get_state(db, KEY_LAST_SCANNED_BLOCK).await? {
        Some(CursorValue::LastScannedBlock(value)) => Ok(Some(value)),
        Some(_) => unreachable!("from_row keys variants to the requested key"),
        None => Ok(None),
    }
}

pub async fn set_last_scanned_block(db: &DatabaseConnection, value: LastScannedBlock) -> WorkerResult<()> {
    set_state(db, CursorValue::LastScannedBlock(value)).await
}

pub async fn get_metrics_rollup_cursor(db: &DatabaseConnection) -> WorkerResult<Option<MetricsRollupCursor>> {
    match get_state(db, KEY_METRICS_ROLLUP_CURSOR).await? {
        Some(CursorValue::MetricsRollupCursor(value)) => Ok(Some(value)),
        Some(_) => unreachable!("from_row keys variants to the requested key"),
        None => Ok(None),
    }
}

pub async fn set_metrics_rollup_cursor(db: &DatabaseConnection, value: MetricsRollupCursor) -> WorkerResult<()> {
    set_state(db, CursorValue::MetricsRollupCursor(value)).await
}

pub async fn get_alert_eval_cursor(db: &DatabaseConnection) -> WorkerResult<Option<AlertEvalCursor>> {
    match get_state(db, KEY_ALERT_EVAL_CURSOR).await? {
        Some(CursorValue::AlertEvalCursor(value)) => Ok(Some(value)),
        Some(_) => unreachable!("from_row keys variants to the requested key"),
        None => Ok(None),
    }
}

pub async fn set_alert_eval_cursor(db: &DatabaseConnection, value: AlertEvalCursor) -> WorkerResult<()> {
    set_state(db, CursorValue::AlertEvalCursor(value)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let value = CursorValue::LastScannedBlock(LastScannedBlock {
            block_number: 100,
            block_hash: "0xabc".to_string(),
            timestamp: 1_700_000_000,
        });
        let json = value.to_json().unwrap();
        let restored = CursorValue::from_row(KEY_LAST_SCANNED_BLOCK, json).unwrap();
        assert_eq!(value, restored);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = CursorValue::from_row("bogus", serde_json::json!({})).unwrap_err();
        assert!(matches!(err, WorkerError::Config(_)));
    }
}

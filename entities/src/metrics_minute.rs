use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

#[derive(Copy, Clone, Default, Debug, DeriveEntity)]
pub struct Entity;

impl EntityName for Entity {
    fn table_name(&self) -> &str {
        "metrics_minute"
    }
}

/// Keyed by `bucket_ts`; upserted by the rollup pipeline, never deleted.
#[derive(Clone, Debug, PartialEq, DeriveModel, DeriveActiveModel, Eq)]
pub struct Model {
    pub bucket_ts: i64,
    pub tx_count: i64,
    pub tx_failed_count: i64,
    pub gas_used_total: Decimal,
    pub gas_price_avg: i64,
    pub block_count: i64,
    pub unique_senders: i64,
    pub top_errors: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveColumn)]
pub enum Column {
    BucketTs,
    TxCount,
    TxFailedCount,
    GasUsedTotal,
    GasPriceAvg,
    BlockCount,
    UniqueSenders,
    TopErrors,
}

#[derive(Copy, Clone, Debug, EnumIter, DerivePrimaryKey)]
pub enum PrimaryKey {
    BucketTs,
}

impl PrimaryKeyTrait for PrimaryKey {
    type ValueType = i64;
    fn auto_increment() -> bool {
        false
    }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl ColumnTrait for Column {
    type EntityName = Entity;
    fn def(&self) -> ColumnDef {
        match self {
            Self::BucketTs => ColumnType::BigInteger.def(),
            Self::TxCount => ColumnType::BigInteger.def(),
            Self::TxFailedCount => ColumnType::BigInteger.def(),
            Self::GasUsedTotal => ColumnType::Decimal(Some((78, 0))).def(),
            Self::GasPriceAvg => ColumnType::BigInteger.def(),
            Self::BlockCount => ColumnType::BigInteger.def(),
            Self::UniqueSenders => ColumnType::BigInteger.def(),
            Self::TopErrors => ColumnType::Json.def(),
        }
    }
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        panic!("no relations for metrics_minute")
    }
}

impl ActiveModelBehavior for ActiveModel {}

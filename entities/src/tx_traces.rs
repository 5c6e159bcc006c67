use sea_orm::entity::prelude::*;

#[derive(Copy, Clone, Default, Debug, DeriveEntity)]
pub struct Entity;

impl EntityName for Entity {
    fn table_name(&self) -> &str {
        "tx_traces"
    }
}

/// Reserved for `debug_traceTransaction` output. The scanner never writes
/// this table in the current core (trace capture is deferred, see
/// `worker::pipelines::scanner`); it exists so the owned schema matches the
/// contract the HTTP surface expects.
#[derive(Clone, Debug, PartialEq, DeriveModel, DeriveActiveModel, Eq)]
pub struct Model {
    pub id: i64,
    pub tx_hash: String,
    pub trace_json: Json,
    pub captured_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveColumn)]
pub enum Column {
    Id,
    TxHash,
    TraceJson,
    CapturedAt,
}

#[derive(Copy, Clone, Debug, EnumIter, DerivePrimaryKey)]
pub enum PrimaryKey {
    Id,
}

impl PrimaryKeyTrait for PrimaryKey {
    type ValueType = i64;
    fn auto_increment() -> bool {
        true
    }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Txs,
}

impl ColumnTrait for Column {
    type EntityName = Entity;
    fn def(&self) -> ColumnDef {
        match self {
            Self::Id => ColumnType::BigInteger.def(),
            Self::TxHash => ColumnType::String(Some(66)).def(),
            Self::TraceJson => ColumnType::Json.def(),
            Self::CapturedAt => ColumnType::BigInteger.def(),
        }
    }
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::Txs => Entity::belongs_to(super::txs::Entity)
                .from(Column::TxHash)
                .to(super::txs::Column::Hash)
                .into(),
        }
    }
}

impl Related<super::txs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Txs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

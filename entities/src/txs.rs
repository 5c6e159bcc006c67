use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;

#[derive(Copy, Clone, Default, Debug, DeriveEntity)]
pub struct Entity;

impl EntityName for Entity {
    fn table_name(&self) -> &str {
        "txs"
    }
}

/// Keyed by `hash`; inserts are idempotent (`ON CONFLICT (hash) DO NOTHING`)
/// so replaying a block never duplicates a row.
#[derive(Clone, Debug, PartialEq, DeriveModel, DeriveActiveModel)]
pub struct Model {
    pub hash: String,
    pub block_number: i64,
    pub block_timestamp: i64,
    pub from_address: String,
    pub to_address: Option<String>,
    pub contract_id: Option<i32>,
    pub value_wei: Decimal,
    pub gas_used: i64,
    pub gas_price: i64,
    pub status: i16,
    pub error_raw: Option<String>,
    pub error_signature: Option<String>,
    pub error_decoded: Option<String>,
    pub error_params: Option<Json>,
    pub method_id: Option<String>,
    pub method_name: Option<String>,
    pub has_trace: bool,
    pub is_tentative: bool,
    pub ingested_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveColumn)]
pub enum Column {
    Hash,
    BlockNumber,
    BlockTimestamp,
    FromAddress,
    ToAddress,
    ContractId,
    ValueWei,
    GasUsed,
    GasPrice,
    Status,
    ErrorRaw,
    ErrorSignature,
    ErrorDecoded,
    ErrorParams,
    MethodId,
    MethodName,
    HasTrace,
    IsTentative,
    IngestedAt,
}

#[derive(Copy, Clone, Debug, EnumIter, DerivePrimaryKey)]
pub enum PrimaryKey {
    Hash,
}

impl PrimaryKeyTrait for PrimaryKey {
    type ValueType = String;
    fn auto_increment() -> bool {
        false
    }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Contracts,
}

impl ColumnTrait for Column {
    type EntityName = Entity;
    fn def(&self) -> ColumnDef {
        match self {
            Self::Hash => ColumnType::String(Some(66)).def(),
            Self::BlockNumber => ColumnType::BigInteger.def(),
            Self::BlockTimestamp => ColumnType::BigInteger.def(),
            Self::FromAddress => ColumnType::String(Some(42)).def(),
            Self::ToAddress => ColumnType::String(Some(42)).def().null(),
            Self::ContractId => ColumnType::Integer.def().null(),
            Self::ValueWei => ColumnType::Decimal(Some((78, 0))).def(),
            Self::GasUsed => ColumnType::BigInteger.def(),
            Self::GasPrice => ColumnType::BigInteger.def(),
            Self::Status => ColumnType::SmallInteger.def(),
            Self::ErrorRaw => ColumnType::Text.def().null(),
            Self::ErrorSignature => ColumnType::String(Some(10)).def().null(),
            Self::ErrorDecoded => ColumnType::Text.def().null(),
            Self::ErrorParams => ColumnType::Json.def().null(),
            Self::MethodId => ColumnType::String(Some(10)).def().null(),
            Self::MethodName => ColumnType::Text.def().null(),
            Self::HasTrace => ColumnType::Boolean.def(),
            Self::IsTentative => ColumnType::Boolean.def(),
            Self::IngestedAt => ColumnType::BigInteger.def(),
        }
    }
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::Contracts => Entity::belongs_to(super::contracts::Entity)
                .from(Column::ContractId)
                .to(super::contracts::Column::Id)
                .into(),
        }
    }
}

impl Related<super::contracts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contracts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

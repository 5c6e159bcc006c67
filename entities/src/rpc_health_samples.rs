use sea_orm::entity::prelude::*;

#[derive(Copy, Clone, Default, Debug, DeriveEntity)]
pub struct Entity;

impl EntityName for Entity {
    fn table_name(&self) -> &str {
        "rpc_health_samples"
    }
}

/// Append-only: one row per probe per endpoint per cycle.
#[derive(Clone, Debug, PartialEq, DeriveModel, DeriveActiveModel, Eq)]
pub struct Model {
    pub id: i64,
    pub endpoint_id: i32,
    pub sampled_at: i64,
    pub latency_ms: Option<i32>,
    pub block_number: Option<i64>,
    pub is_success: bool,
    pub error_code: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveColumn)]
pub enum Column {
    Id,
    EndpointId,
    SampledAt,
    LatencyMs,
    BlockNumber,
    IsSuccess,
    ErrorCode,
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
    RpcEndpoints,
}

impl ColumnTrait for Column {
    type EntityName = Entity;
    fn def(&self) -> ColumnDef {
        match self {
            Self::Id => ColumnType::BigInteger.def(),
            Self::EndpointId => ColumnType::Integer.def(),
            Self::SampledAt => ColumnType::BigInteger.def(),
            Self::LatencyMs => ColumnType::Integer.def().null(),
            Self::BlockNumber => ColumnType::BigInteger.def().null(),
            Self::IsSuccess => ColumnType::Boolean.def(),
            Self::ErrorCode => ColumnType::String(Some(64)).def().null(),
        }
    }
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::RpcEndpoints => Entity::belongs_to(super::rpc_endpoints::Entity)
                .from(Column::EndpointId)
                .to(super::rpc_endpoints::Column::Id)
                .into(),
        }
    }
}

impl Related<super::rpc_endpoints::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RpcEndpoints.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

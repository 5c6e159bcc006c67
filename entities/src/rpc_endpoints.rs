use sea_orm::entity::prelude::*;

use crate::sea_orm_active_enums::RpcStatus;

#[derive(Copy, Clone, Default, Debug, DeriveEntity)]
pub struct Entity;

impl EntityName for Entity {
    fn table_name(&self) -> &str {
        "rpc_endpoints"
    }
}

/// Mutated only by the probe pipeline, which is the sole writer of
/// `score`, `status`, `supports_traces` and `last_probe_at`.
#[derive(Clone, Debug, PartialEq, DeriveModel, DeriveActiveModel, Eq)]
pub struct Model {
    pub id: i32,
    pub url: String,
    pub is_active: bool,
    pub score: i32,
    pub status: RpcStatus,
    pub supports_traces: bool,
    pub last_probe_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveColumn)]
pub enum Column {
    Id,
    Url,
    IsActive,
    Score,
    Status,
    SupportsTraces,
    LastProbeAt,
    UpdatedAt,
}

#[derive(Copy, Clone, Debug, EnumIter, DerivePrimaryKey)]
pub enum PrimaryKey {
    Id,
}

impl PrimaryKeyTrait for PrimaryKey {
    type ValueType = i32;
    fn auto_increment() -> bool {
        true
    }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    RpcHealthSamples,
}

impl ColumnTrait for Column {
    type EntityName = Entity;
    fn def(&self) -> ColumnDef {
        match self {
            Self::Id => ColumnType::Integer.def(),
            Self::Url => ColumnType::Text.def(),
            Self::IsActive => ColumnType::Boolean.def(),
            Self::Score => ColumnType::Integer.def(),
            Self::Status => ColumnType::String(Some(10)).def(),
            Self::SupportsTraces => ColumnType::Boolean.def(),
            Self::LastProbeAt => ColumnType::BigInteger.def(),
            Self::UpdatedAt => ColumnType::BigInteger.def(),
        }
    }
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::RpcHealthSamples => Entity::has_many(super::rpc_health_samples::Entity).into(),
        }
    }
}

impl Related<super::rpc_health_samples::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RpcHealthSamples.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

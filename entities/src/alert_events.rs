use sea_orm::entity::prelude::*;

use crate::sea_orm_active_enums::Severity;

#[derive(Copy, Clone, Default, Debug, DeriveEntity)]
pub struct Entity;

impl EntityName for Entity {
    fn table_name(&self) -> &str {
        "alert_events"
    }
}

/// Append-only; cascade-deleted with its parent alert.
#[derive(Clone, Debug, PartialEq, DeriveModel, DeriveActiveModel)]
pub struct Model {
    pub id: i64,
    pub alert_id: i32,
    pub triggered_at: i64,
    pub severity: Severity,
    pub value_observed: f64,
    pub threshold: f64,
    pub context: Json,
    pub acknowledged_at: Option<i64>,
    pub acknowledged_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveColumn)]
pub enum Column {
    Id,
    AlertId,
    TriggeredAt,
    Severity,
    ValueObserved,
    Threshold,
    Context,
    AcknowledgedAt,
    AcknowledgedBy,
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
    Alerts,
}

impl ColumnTrait for Column {
    type EntityName = Entity;
    fn def(&self) -> ColumnDef {
        match self {
            Self::Id => ColumnType::BigInteger.def(),
            Self::AlertId => ColumnType::Integer.def(),
            Self::TriggeredAt => ColumnType::BigInteger.def(),
            Self::Severity => ColumnType::String(Some(10)).def(),
            Self::ValueObserved => ColumnType::Double.def(),
            Self::Threshold => ColumnType::Double.def(),
            Self::Context => ColumnType::Json.def(),
            Self::AcknowledgedAt => ColumnType::BigInteger.def().null(),
            Self::AcknowledgedBy => ColumnType::Text.def().null(),
        }
    }
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::Alerts => Entity::belongs_to(super::alerts::Entity)
                .from(Column::AlertId)
                .to(super::alerts::Column::Id)
                .into(),
        }
    }
}

impl Related<super::alerts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Alerts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

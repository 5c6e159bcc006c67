use sea_orm::entity::prelude::*;

use crate::sea_orm_active_enums::{AlertType, Severity};

#[derive(Copy, Clone, Default, Debug, DeriveEntity)]
pub struct Entity;

impl EntityName for Entity {
    fn table_name(&self) -> &str {
        "alerts"
    }
}

/// Written by the external HTTP surface; `last_triggered_at` is also
/// written by the alert pipeline after a firing.
#[derive(Clone, Debug, PartialEq, DeriveModel, DeriveActiveModel)]
pub struct Model {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub alert_type: AlertType,
    pub conditions: Json,
    pub threshold: f64,
    pub window_minutes: i32,
    pub cooldown_minutes: i32,
    pub severity: Severity,
    pub is_enabled: bool,
    pub contract_ids: Json,
    pub last_triggered_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveColumn)]
pub enum Column {
    Id,
    Name,
    Description,
    AlertType,
    Conditions,
    Threshold,
    WindowMinutes,
    CooldownMinutes,
    Severity,
    IsEnabled,
    ContractIds,
    LastTriggeredAt,
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
    AlertEvents,
}

impl ColumnTrait for Column {
    type EntityName = Entity;
    fn def(&self) -> ColumnDef {
        match self {
            Self::Id => ColumnType::Integer.def(),
            Self::Name => ColumnType::Text.def(),
            Self::Description => ColumnType::Text.def().null(),
            Self::AlertType => ColumnType::String(Some(20)).def(),
            Self::Conditions => ColumnType::Json.def(),
            Self::Threshold => ColumnType::Double.def(),
            Self::WindowMinutes => ColumnType::Integer.def(),
            Self::CooldownMinutes => ColumnType::Integer.def(),
            Self::Severity => ColumnType::String(Some(10)).def(),
            Self::IsEnabled => ColumnType::Boolean.def(),
            Self::ContractIds => ColumnType::Json.def(),
            Self::LastTriggeredAt => ColumnType::BigInteger.def().null(),
        }
    }
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::AlertEvents => Entity::has_many(super::alert_events::Entity).into(),
        }
    }
}

impl Related<super::alert_events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AlertEvents.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

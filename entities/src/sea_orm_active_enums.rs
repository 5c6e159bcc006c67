//! Closed enums shared by the persisted tables. Stored as short text so the
//! HTTP query surface (which does not share this crate) can read them back
//! without a custom type.

use sea_orm::entity::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, serde::Serialize, serde::Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(10))")]
pub enum RpcStatus {
    #[sea_orm(string_value = "healthy")]
    Healthy,
    #[sea_orm(string_value = "degraded")]
    Degraded,
    #[sea_orm(string_value = "unhealthy")]
    Unhealthy,
}

impl RpcStatus {
    /// `status = score_to_status(score)`, see `worker::rpc::scoring`.
    pub fn from_score(score: i32) -> Self {
        if score > 80 {
            Self::Healthy
        } else if score > 50 {
            Self::Degraded
        } else {
            Self::Unhealthy
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, serde::Serialize, serde::Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(20))")]
pub enum AlertType {
    #[sea_orm(string_value = "failure_rate")]
    FailureRate,
    #[sea_orm(string_value = "gas_spike")]
    GasSpike,
    #[sea_orm(string_value = "provider_down")]
    ProviderDown,
    #[sea_orm(string_value = "custom")]
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, serde::Serialize, serde::Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(Some(10))")]
pub enum Severity {
    #[sea_orm(string_value = "info")]
    Info,
    #[sea_orm(string_value = "warning")]
    Warning,
    #[sea_orm(string_value = "critical")]
    Critical,
}

use sea_orm::entity::prelude::*;

#[derive(Copy, Clone, Default, Debug, DeriveEntity)]
pub struct Entity;

impl EntityName for Entity {
    fn table_name(&self) -> &str {
        "contracts"
    }
}

/// Mutated only by the external HTTP surface; the scanner only reads it to
/// tag `txs.contract_id`.
#[derive(Clone, Debug, PartialEq, DeriveModel, DeriveActiveModel, Eq)]
pub struct Model {
    pub id: i32,
    pub address: String,
    pub name: String,
    pub tags: Json,
    pub abi_json: Option<Json>,
    pub is_watched: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveColumn)]
pub enum Column {
    Id,
    Address,
    Name,
    Tags,
    AbiJson,
    IsWatched,
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
pub enum Relation {}

impl ColumnTrait for Column {
    type EntityName = Entity;
    fn def(&self) -> ColumnDef {
        match self {
            Self::Id => ColumnType::Integer.def(),
            Self::Address => ColumnType::String(Some(42)).def().unique(),
            Self::Name => ColumnType::Text.def(),
            Self::Tags => ColumnType::Json.def(),
            Self::AbiJson => ColumnType::Json.def().null(),
            Self::IsWatched => ColumnType::Boolean.def(),
        }
    }
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        panic!("no relations for contracts")
    }
}

impl ActiveModelBehavior for ActiveModel {}

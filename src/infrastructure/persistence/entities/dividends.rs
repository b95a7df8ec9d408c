//! Dividend entity for SeaORM

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "dividends")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub tx_index: i64,
    #[sea_orm(unique)]
    pub tx_hash: String,
    pub block_index: i64,
    pub source: String,
    pub asset: Option<String>,
    pub dividend_asset: Option<String>,
    pub quantity_per_unit: Option<i64>,
    pub fee_paid: i64,
    pub status: String,
    pub activation: Option<i64>,
    pub activate_index: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::dividend_activations::Entity")]
    DividendActivations,
}

impl Related<super::dividend_activations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DividendActivations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! Issuance entity for SeaORM

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "issuances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub tx_index: i64,
    #[sea_orm(unique)]
    pub tx_hash: String,
    pub block_index: i64,
    pub asset: String,
    pub quantity: i64,
    pub divisible: bool,
    pub issuer: String,
    pub locked: bool,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

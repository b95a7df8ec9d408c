//! Dividend activation entity for SeaORM

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "dividend_activations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub dividend_index: i64,
    #[sea_orm(unique)]
    pub dividend_hash: String,
    pub source: String,
    pub block_index: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::dividends::Entity",
        from = "Column::DividendIndex",
        to = "super::dividends::Column::TxIndex"
    )]
    Dividend,
}

impl Related<super::dividends::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Dividend.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

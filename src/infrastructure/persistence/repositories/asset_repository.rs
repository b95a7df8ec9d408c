use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::domain::models::Issuance;
use crate::domain::protocol::constants::{BTC, BTC_ASSET_ID, XCP, XCP_ASSET_ID};
use crate::infrastructure::persistence::entities::{assets, issuances};
use crate::infrastructure::persistence::error::{from_column, to_column, DbError};

const VALID: &str = "valid";

/// Repository for the asset registry and issuance history
pub struct AssetRepository<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> AssetRepository<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Valid issuances of an asset, oldest first
    pub async fn valid_issuances(&self, asset: &str) -> Result<Vec<Issuance>, DbError> {
        let results = issuances::Entity::find()
            .filter(issuances::Column::Asset.eq(asset))
            .filter(issuances::Column::Status.eq(VALID))
            .order_by_asc(issuances::Column::TxIndex)
            .all(self.conn)
            .await?;

        results
            .into_iter()
            .map(|model| {
                Ok(Issuance {
                    tx_index: from_column(model.tx_index, "tx_index")?,
                    quantity: from_column(model.quantity, "quantity")?,
                    asset: model.asset,
                    issuer: model.issuer,
                    divisible: model.divisible,
                    locked: model.locked,
                })
            })
            .collect()
    }

    /// Name registered for `asset_id` at or before `block_index`
    pub async fn name_for_id(&self, asset_id: u64, block_index: u64) -> Result<Option<String>, DbError> {
        match asset_id {
            BTC_ASSET_ID => return Ok(Some(BTC.to_string())),
            XCP_ASSET_ID => return Ok(Some(XCP.to_string())),
            _ => {}
        }

        let result = assets::Entity::find_by_id(asset_id.to_string())
            .filter(assets::Column::BlockIndex.lte(to_column(block_index, "block_index")?))
            .one(self.conn)
            .await?;

        Ok(result.map(|model| model.asset_name))
    }

    /// Id registered for `name` at or before `block_index`
    pub async fn id_for_name(&self, name: &str, block_index: u64) -> Result<Option<u64>, DbError> {
        match name {
            BTC => return Ok(Some(BTC_ASSET_ID)),
            XCP => return Ok(Some(XCP_ASSET_ID)),
            _ => {}
        }

        let result = assets::Entity::find()
            .filter(assets::Column::AssetName.eq(name))
            .filter(assets::Column::BlockIndex.lte(to_column(block_index, "block_index")?))
            .one(self.conn)
            .await?;

        result
            .map(|model| {
                model.asset_id.parse::<u64>().map_err(|_| {
                    DbError::QueryError(format!("asset {} has id {}", name, model.asset_id))
                })
            })
            .transpose()
    }

    /// Short name behind a sub-asset long name
    pub async fn name_for_longname(&self, longname: &str) -> Result<Option<String>, DbError> {
        let result = assets::Entity::find()
            .filter(assets::Column::AssetLongname.eq(longname))
            .one(self.conn)
            .await?;

        Ok(result.map(|model| model.asset_name))
    }
}

//! Relational ledger backend.
//!
//! `SqlLedger` owns whatever sea-orm connection it is given. The block
//! pipeline hands it a `DatabaseTransaction`, so everything one block does
//! commits or rolls back together.

use async_trait::async_trait;
use sea_orm::ConnectionTrait;

use crate::domain::errors::LedgerError;
use crate::domain::ledger::{DividendStore, LedgerMutation, LedgerQuery};
use crate::domain::models::{ActivationRecord, DividendRecord, DividendStatus, Holder, Issuance};
use crate::infrastructure::persistence::repositories::{
    ActivationRepository, AssetRepository, BalanceRepository, DividendRepository, Movement,
};

pub struct SqlLedger<C: ConnectionTrait> {
    conn: C,
}

impl<C: ConnectionTrait> SqlLedger<C> {
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    /// Give back the connection, e.g. to commit a transaction
    pub fn into_inner(self) -> C {
        self.conn
    }

    fn balances(&self) -> BalanceRepository<'_, C> {
        BalanceRepository::new(&self.conn)
    }

    fn assets(&self) -> AssetRepository<'_, C> {
        AssetRepository::new(&self.conn)
    }

    fn dividends(&self) -> DividendRepository<'_, C> {
        DividendRepository::new(&self.conn)
    }
}

#[async_trait]
impl<C: ConnectionTrait + Send + Sync> LedgerQuery for SqlLedger<C> {
    async fn holders(&self, asset: &str) -> Result<Vec<Holder>, LedgerError> {
        Ok(self.balances().holders(asset).await?)
    }

    async fn issuances(&self, asset: &str) -> Result<Vec<Issuance>, LedgerError> {
        Ok(self.assets().valid_issuances(asset).await?)
    }

    async fn balance(&self, address: &str, asset: &str) -> Result<Option<u64>, LedgerError> {
        Ok(self.balances().get_balance(address, asset).await?)
    }

    async fn resolve_subasset_name(&self, name: &str) -> Result<String, LedgerError> {
        let short = self.assets().name_for_longname(name).await?;
        Ok(short.unwrap_or_else(|| name.to_string()))
    }

    async fn asset_id_for_name(&self, name: &str, block_index: u64) -> Result<u64, LedgerError> {
        self.assets()
            .id_for_name(name, block_index)
            .await?
            .ok_or_else(|| LedgerError::UnknownAssetName(name.to_string()))
    }

    async fn name_for_asset_id(
        &self,
        asset_id: u64,
        block_index: u64,
    ) -> Result<String, LedgerError> {
        self.assets()
            .name_for_id(asset_id, block_index)
            .await?
            .ok_or(LedgerError::UnknownAssetId(asset_id))
    }
}

#[async_trait]
impl<C: ConnectionTrait + Send + Sync> LedgerMutation for SqlLedger<C> {
    async fn debit(
        &self,
        address: &str,
        asset: &str,
        quantity: u64,
        action: &str,
        event: &str,
    ) -> Result<(), LedgerError> {
        let balances = self.balances();
        let available = balances.get_balance(address, asset).await?.unwrap_or(0);
        let Some(remaining) = available.checked_sub(quantity) else {
            return Err(LedgerError::InsufficientBalance {
                address: address.to_string(),
                asset: asset.to_string(),
                available,
                requested: quantity,
            });
        };

        if quantity > 0 {
            balances.set_balance(address, asset, remaining).await?;
        }
        balances
            .record(Movement::Debit, address, asset, quantity, action, event)
            .await?;
        Ok(())
    }

    async fn credit(
        &self,
        address: &str,
        asset: &str,
        quantity: u64,
        action: &str,
        event: &str,
    ) -> Result<(), LedgerError> {
        let balances = self.balances();
        let current = balances.get_balance(address, asset).await?.unwrap_or(0);
        let updated = current
            .checked_add(quantity)
            .ok_or(LedgerError::QuantityOutOfRange(
                u128::from(current) + u128::from(quantity),
            ))?;

        balances.set_balance(address, asset, updated).await?;
        balances
            .record(Movement::Credit, address, asset, quantity, action, event)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl<C: ConnectionTrait + Send + Sync> DividendStore for SqlLedger<C> {
    async fn find_dividend(&self, tx_hash: &str) -> Result<Option<DividendRecord>, LedgerError> {
        Ok(self.dividends().get_by_hash(tx_hash).await?)
    }

    async fn insert_dividend(&self, record: &DividendRecord) -> Result<(), LedgerError> {
        Ok(self.dividends().save(record).await?)
    }

    async fn due_dividends(&self, block_index: u64) -> Result<Vec<DividendRecord>, LedgerError> {
        Ok(self.dividends().find_due(block_index).await?)
    }

    async fn update_status(
        &self,
        tx_hash: &str,
        status: &DividendStatus,
    ) -> Result<(), LedgerError> {
        if self.dividends().update_status(tx_hash, status).await? {
            Ok(())
        } else {
            Err(LedgerError::DividendNotFound(tx_hash.to_string()))
        }
    }

    async fn insert_activation(&self, activation: &ActivationRecord) -> Result<(), LedgerError> {
        Ok(ActivationRepository::new(&self.conn).save(activation).await?)
    }
}

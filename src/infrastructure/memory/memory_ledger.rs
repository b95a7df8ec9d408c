//! In-process ledger backend used by tests and dry runs.
//!
//! Holder order follows balance creation order, escrowed balances last, the
//! same order the relational backend returns.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::errors::LedgerError;
use crate::domain::ledger::{DividendStore, LedgerMutation, LedgerQuery};
use crate::domain::models::{ActivationRecord, DividendRecord, DividendStatus, Holder, Issuance};
use crate::domain::protocol::constants::{BTC, BTC_ASSET_ID, XCP, XCP_ASSET_ID};

/// One credit or debit journal line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub address: String,
    pub asset: String,
    pub quantity: u64,
    pub action: String,
    pub event: String,
}

#[derive(Debug, Clone)]
struct RegisteredAsset {
    asset_id: u64,
    name: String,
    longname: Option<String>,
    block_index: u64,
}

#[derive(Debug, Default)]
struct State {
    assets: Vec<RegisteredAsset>,
    issuances: Vec<Issuance>,
    /// (address, asset, quantity) in creation order
    balances: Vec<(String, String, u64)>,
    /// (asset, holder) in creation order
    escrows: Vec<(String, Holder)>,
    credits: Vec<LedgerEntry>,
    debits: Vec<LedgerEntry>,
    dividends: Vec<DividendRecord>,
    activations: Vec<ActivationRecord>,
}

impl State {
    fn balance(&self, address: &str, asset: &str) -> Option<u64> {
        self.balances
            .iter()
            .find(|(a, s, _)| a == address && s == asset)
            .map(|(_, _, quantity)| *quantity)
    }

    fn balance_mut(&mut self, address: &str, asset: &str) -> Option<&mut u64> {
        self.balances
            .iter_mut()
            .find(|(a, s, _)| a == address && s == asset)
            .map(|(_, _, quantity)| quantity)
    }
}

#[derive(Debug, Default)]
pub struct MemoryLedger {
    state: Mutex<State>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register a named asset under `asset_id` from `block_index` on
    pub fn register_asset(&self, asset_id: u64, name: &str, block_index: u64) -> &Self {
        self.state().assets.push(RegisteredAsset {
            asset_id,
            name: name.to_string(),
            longname: None,
            block_index,
        });
        self
    }

    /// Attach a sub-asset long name to an already registered asset
    pub fn set_longname(&self, name: &str, longname: &str) -> &Self {
        if let Some(asset) = self.state().assets.iter_mut().find(|a| a.name == name) {
            asset.longname = Some(longname.to_string());
        }
        self
    }

    pub fn add_issuance(&self, issuance: Issuance) -> &Self {
        let mut state = self.state();
        state.issuances.push(issuance);
        state.issuances.sort_by_key(|i| i.tx_index);
        self
    }

    pub fn set_balance(&self, address: &str, asset: &str, quantity: u64) -> &Self {
        let mut state = self.state();
        match state.balance_mut(address, asset) {
            Some(existing) => *existing = quantity,
            None => state
                .balances
                .push((address.to_string(), asset.to_string(), quantity)),
        }
        self
    }

    pub fn add_escrow(&self, address: &str, asset: &str, quantity: u64) -> &Self {
        self.state()
            .escrows
            .push((asset.to_string(), Holder::escrowed(address, quantity)));
        self
    }

    pub fn balance_of(&self, address: &str, asset: &str) -> u64 {
        self.state().balance(address, asset).unwrap_or(0)
    }

    pub fn dividend_records(&self) -> Vec<DividendRecord> {
        self.state().dividends.clone()
    }

    pub fn activation_records(&self) -> Vec<ActivationRecord> {
        self.state().activations.clone()
    }

    pub fn credits(&self) -> Vec<LedgerEntry> {
        self.state().credits.clone()
    }

    pub fn debits(&self) -> Vec<LedgerEntry> {
        self.state().debits.clone()
    }
}

#[async_trait]
impl LedgerQuery for MemoryLedger {
    async fn holders(&self, asset: &str) -> Result<Vec<Holder>, LedgerError> {
        let state = self.state();
        let held = state
            .balances
            .iter()
            .filter(|(_, s, quantity)| s == asset && *quantity > 0)
            .map(|(address, _, quantity)| Holder::new(address.clone(), *quantity));
        let escrowed = state
            .escrows
            .iter()
            .filter(|(s, holder)| s == asset && holder.address_quantity > 0)
            .map(|(_, holder)| holder.clone());
        Ok(held.chain(escrowed).collect())
    }

    async fn issuances(&self, asset: &str) -> Result<Vec<Issuance>, LedgerError> {
        Ok(self
            .state()
            .issuances
            .iter()
            .filter(|i| i.asset == asset)
            .cloned()
            .collect())
    }

    async fn balance(&self, address: &str, asset: &str) -> Result<Option<u64>, LedgerError> {
        Ok(self.state().balance(address, asset))
    }

    async fn resolve_subasset_name(&self, name: &str) -> Result<String, LedgerError> {
        Ok(self
            .state()
            .assets
            .iter()
            .find(|a| a.longname.as_deref() == Some(name))
            .map(|a| a.name.clone())
            .unwrap_or_else(|| name.to_string()))
    }

    async fn asset_id_for_name(&self, name: &str, block_index: u64) -> Result<u64, LedgerError> {
        match name {
            BTC => return Ok(BTC_ASSET_ID),
            XCP => return Ok(XCP_ASSET_ID),
            _ => {}
        }
        self.state()
            .assets
            .iter()
            .find(|a| a.name == name && a.block_index <= block_index)
            .map(|a| a.asset_id)
            .ok_or_else(|| LedgerError::UnknownAssetName(name.to_string()))
    }

    async fn name_for_asset_id(
        &self,
        asset_id: u64,
        block_index: u64,
    ) -> Result<String, LedgerError> {
        match asset_id {
            BTC_ASSET_ID => return Ok(BTC.to_string()),
            XCP_ASSET_ID => return Ok(XCP.to_string()),
            _ => {}
        }
        self.state()
            .assets
            .iter()
            .find(|a| a.asset_id == asset_id && a.block_index <= block_index)
            .map(|a| a.name.clone())
            .ok_or(LedgerError::UnknownAssetId(asset_id))
    }
}

#[async_trait]
impl LedgerMutation for MemoryLedger {
    async fn debit(
        &self,
        address: &str,
        asset: &str,
        quantity: u64,
        action: &str,
        event: &str,
    ) -> Result<(), LedgerError> {
        let mut state = self.state();
        let available = state.balance(address, asset).unwrap_or(0);
        if available < quantity {
            return Err(LedgerError::InsufficientBalance {
                address: address.to_string(),
                asset: asset.to_string(),
                available,
                requested: quantity,
            });
        }

        if let Some(balance) = state.balance_mut(address, asset) {
            *balance -= quantity;
        }
        state.debits.push(LedgerEntry {
            address: address.to_string(),
            asset: asset.to_string(),
            quantity,
            action: action.to_string(),
            event: event.to_string(),
        });
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
        let mut state = self.state();
        match state.balance_mut(address, asset) {
            Some(balance) => {
                *balance = balance.checked_add(quantity).ok_or(
                    LedgerError::QuantityOutOfRange(u128::from(*balance) + u128::from(quantity)),
                )?;
            }
            None => state
                .balances
                .push((address.to_string(), asset.to_string(), quantity)),
        }
        state.credits.push(LedgerEntry {
            address: address.to_string(),
            asset: asset.to_string(),
            quantity,
            action: action.to_string(),
            event: event.to_string(),
        });
        Ok(())
    }
}

#[async_trait]
impl DividendStore for MemoryLedger {
    async fn find_dividend(&self, tx_hash: &str) -> Result<Option<DividendRecord>, LedgerError> {
        Ok(self
            .state()
            .dividends
            .iter()
            .find(|d| d.tx_hash == tx_hash)
            .cloned())
    }

    async fn insert_dividend(&self, record: &DividendRecord) -> Result<(), LedgerError> {
        self.state().dividends.push(record.clone());
        Ok(())
    }

    async fn due_dividends(&self, block_index: u64) -> Result<Vec<DividendRecord>, LedgerError> {
        let mut due: Vec<DividendRecord> = self
            .state()
            .dividends
            .iter()
            .filter(|d| d.status == DividendStatus::Pending)
            .filter(|d| d.activate_index.is_some_and(|at| at <= block_index))
            .cloned()
            .collect();
        due.sort_by_key(|d| d.tx_index);
        Ok(due)
    }

    async fn update_status(
        &self,
        tx_hash: &str,
        status: &DividendStatus,
    ) -> Result<(), LedgerError> {
        let mut state = self.state();
        let record = state
            .dividends
            .iter_mut()
            .find(|d| d.tx_hash == tx_hash)
            .ok_or_else(|| LedgerError::DividendNotFound(tx_hash.to_string()))?;
        record.status = status.clone();
        Ok(())
    }

    async fn insert_activation(&self, activation: &ActivationRecord) -> Result<(), LedgerError> {
        self.state().activations.push(activation.clone());
        Ok(())
    }
}

//! Collaborator interfaces the dividend handler is written against.
//!
//! Queries must observe ledger state as of just before the transaction
//! being validated; the handler performs all reads of a transaction before
//! its first mutation.

use async_trait::async_trait;

use crate::domain::errors::LedgerError;
use crate::domain::models::{ActivationRecord, DividendRecord, DividendStatus, Holder, Issuance};

/// Read access to balances, issuances and the asset registry
#[async_trait]
pub trait LedgerQuery: Send + Sync {
    /// Current holders of `asset` in canonical order, escrowed balances included
    async fn holders(&self, asset: &str) -> Result<Vec<Holder>, LedgerError>;

    /// Valid issuances of `asset` ordered by `tx_index` ascending
    async fn issuances(&self, asset: &str) -> Result<Vec<Issuance>, LedgerError>;

    /// Balance of `address` in `asset`; `None` when no balance row exists
    async fn balance(&self, address: &str, asset: &str) -> Result<Option<u64>, LedgerError>;

    /// Short name for a sub-asset long name; other names are returned unchanged
    async fn resolve_subasset_name(&self, name: &str) -> Result<String, LedgerError>;

    async fn asset_id_for_name(&self, name: &str, block_index: u64) -> Result<u64, LedgerError>;

    async fn name_for_asset_id(&self, asset_id: u64, block_index: u64)
        -> Result<String, LedgerError>;
}

/// Balance mutations; both fail rather than drive a balance negative
#[async_trait]
pub trait LedgerMutation: Send + Sync {
    async fn debit(
        &self,
        address: &str,
        asset: &str,
        quantity: u64,
        action: &str,
        event: &str,
    ) -> Result<(), LedgerError>;

    async fn credit(
        &self,
        address: &str,
        asset: &str,
        quantity: u64,
        action: &str,
        event: &str,
    ) -> Result<(), LedgerError>;
}

/// Storage of dividend and activation records
#[async_trait]
pub trait DividendStore: Send + Sync {
    async fn find_dividend(&self, tx_hash: &str) -> Result<Option<DividendRecord>, LedgerError>;

    async fn insert_dividend(&self, record: &DividendRecord) -> Result<(), LedgerError>;

    /// Pending dividends with `activate_index <= block_index`, ordered by `tx_index`
    async fn due_dividends(&self, block_index: u64) -> Result<Vec<DividendRecord>, LedgerError>;

    async fn update_status(
        &self,
        tx_hash: &str,
        status: &DividendStatus,
    ) -> Result<(), LedgerError>;

    async fn insert_activation(&self, activation: &ActivationRecord) -> Result<(), LedgerError>;
}

/// Everything the block pipeline needs from a ledger backend
pub trait Ledger: LedgerQuery + LedgerMutation + DividendStore {}

impl<T: LedgerQuery + LedgerMutation + DividendStore> Ledger for T {}

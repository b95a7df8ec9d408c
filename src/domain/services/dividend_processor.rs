//! Dividend message state machine: unpack, validate, apply, record.
//!
//! ```text
//! decoded, no activation  -> valid     (paid now)
//! decoded, activation     -> pending   (escrowed, paid by the scheduler)
//! any failure             -> invalid: <reasons>
//! pending                 -> complete  (ActivationScheduler only)
//! ```

use crate::domain::errors::LedgerError;
use crate::domain::ledger::Ledger;
use crate::domain::models::{DividendRecord, DividendStatus, DividendTx};
use crate::domain::protocol::constants::{BTC, MAX_INT, XCP};
use crate::domain::protocol::{ProtocolParams, ProtocolRule};
use crate::domain::services::ledger_applier::{narrow, LedgerApplier};
use crate::domain::services::validator::{ConsensusValidator, DividendRequest};
use crate::domain::services::wire_codec::WireCodec;
use crate::utils::logging;

/// What happened to a dividend message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Applied (if valid or pending) and stored
    Recorded(DividendRecord),
    /// Overflowed; logged and dropped without a record
    Unstored(DividendRecord),
    /// A record with this hash already exists; nothing was touched
    AlreadyProcessed,
}

/// Dividend fields after asset ids are resolved
#[derive(Debug, Clone, PartialEq, Eq)]
struct UnpackedDividend {
    quantity_per_unit: u64,
    asset: String,
    dividend_asset: String,
    activation: Option<u64>,
}

pub struct DividendProcessor<'a, L: Ledger + ?Sized> {
    ledger: &'a L,
    params: &'a ProtocolParams,
}

impl<'a, L: Ledger + ?Sized> DividendProcessor<'a, L> {
    pub fn new(ledger: &'a L, params: &'a ProtocolParams) -> Self {
        Self { ledger, params }
    }

    pub async fn parse(&self, tx: &DividendTx, message: &[u8]) -> Result<ParseOutcome, LedgerError> {
        if self.ledger.find_dividend(&tx.tx_hash).await?.is_some() {
            logging::log_debug(&format!(
                "Dividend {} already recorded, skipping",
                tx.tx_hash
            ));
            return Ok(ParseOutcome::AlreadyProcessed);
        }

        let unpacked = self.unpack(message, tx.block_index).await?;
        let mut status = match &unpacked {
            None => DividendStatus::could_not_unpack(),
            Some(dividend) if dividend.dividend_asset == BTC => {
                DividendStatus::native_dividend_asset()
            }
            Some(dividend) if dividend.activation.is_some() => DividendStatus::Pending,
            Some(_) => DividendStatus::Valid,
        };

        let mut record = DividendRecord {
            tx_index: tx.tx_index,
            tx_hash: tx.tx_hash.clone(),
            block_index: tx.block_index,
            source: tx.source.clone(),
            asset: unpacked.as_ref().map(|d| d.asset.clone()),
            dividend_asset: unpacked.as_ref().map(|d| d.dividend_asset.clone()),
            quantity_per_unit: unpacked.as_ref().map(|d| d.quantity_per_unit.min(MAX_INT)),
            fee_paid: 0,
            status: status.clone(),
            activation: unpacked.as_ref().and_then(|d| d.activation).map(|a| a.min(MAX_INT)),
            activate_index: None,
        };

        if let (Some(dividend), false) = (&unpacked, status.is_invalid()) {
            let quantity_per_unit = dividend.quantity_per_unit.min(MAX_INT);
            let activation = dividend
                .activation
                .map(|delta| i64::try_from(delta).unwrap_or(i64::MAX));

            let validator = ConsensusValidator::new(self.ledger, self.params);
            let outcome = validator
                .validate(&DividendRequest {
                    source: &tx.source,
                    quantity_per_unit,
                    asset: &dividend.asset,
                    dividend_asset: &dividend.dividend_asset,
                    block_index: tx.block_index,
                    activation,
                })
                .await?;

            if !outcome.is_valid() {
                status = DividendStatus::from_problems(&outcome.problems);
            }
            // an oversized fee always carries the overflow problem
            if !status.is_overflow() {
                record.fee_paid = narrow(outcome.plan.fee)?;
            }

            let applier = LedgerApplier::new(self.ledger);
            let charge_fee = self
                .params
                .is_active(ProtocolRule::DividendFee, tx.block_index);
            match status {
                DividendStatus::Valid => {
                    applier
                        .pay_immediately(tx, &dividend.dividend_asset, &outcome.plan, charge_fee)
                        .await?;
                }
                DividendStatus::Pending => {
                    applier
                        .escrow_scheduled(tx, &dividend.dividend_asset, &outcome.plan, charge_fee)
                        .await?;
                    record.activate_index = dividend
                        .activation
                        .and_then(|delta| tx.block_index.checked_add(delta));
                }
                _ => {}
            }
        }

        record.status = status;

        if record.status.is_overflow() {
            logging::log_warning(&format!(
                "Not storing [dividend] tx [{}]: {}",
                record.tx_hash, record.status
            ));
            logging::log_debug(&format!(
                "Bindings: {}",
                serde_json::to_string(&record).unwrap_or_default()
            ));
            return Ok(ParseOutcome::Unstored(record));
        }

        self.ledger.insert_dividend(&record).await?;
        logging::log_info(&format!(
            "Dividend {} at block {}: {}",
            record.tx_hash, record.block_index, record.status
        ));
        Ok(ParseOutcome::Recorded(record))
    }

    /// Decode the payload; `None` stands for "could not unpack"
    async fn unpack(
        &self,
        message: &[u8],
        block_index: u64,
    ) -> Result<Option<UnpackedDividend>, LedgerError> {
        let decoded = match WireCodec::unpack(message, block_index, self.params) {
            Ok(decoded) => decoded,
            Err(e) => {
                logging::log_debug(&format!("Could not unpack dividend: {}", e));
                return Ok(None);
            }
        };

        let Some(asset) = self.asset_name(decoded.asset_id, block_index).await? else {
            return Ok(None);
        };
        let dividend_asset = match decoded.dividend_asset_id {
            Some(asset_id) => match self.asset_name(asset_id, block_index).await? {
                Some(name) => name,
                None => return Ok(None),
            },
            None => XCP.to_string(),
        };

        Ok(Some(UnpackedDividend {
            quantity_per_unit: decoded.quantity_per_unit,
            asset,
            dividend_asset,
            activation: decoded.activation,
        }))
    }

    async fn asset_name(&self, asset_id: u64, block_index: u64) -> Result<Option<String>, LedgerError> {
        match self.ledger.name_for_asset_id(asset_id, block_index).await {
            Ok(name) => Ok(Some(name)),
            Err(LedgerError::UnknownAssetId(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

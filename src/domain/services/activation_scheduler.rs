use crate::domain::errors::LedgerError;
use crate::domain::ledger::Ledger;
use crate::domain::models::{ActivationRecord, DividendRecord, DividendStatus};
use crate::domain::protocol::constants::{BTC, XCP};
use crate::domain::protocol::ProtocolParams;
use crate::domain::services::ledger_applier::LedgerApplier;
use crate::domain::services::payout_calculator::{PayoutCalculator, PayoutTerms};
use crate::utils::logging;

/// Pays out scheduled dividends whose activation height has been reached
///
/// Runs once per block after the block's own messages. Due dividends are
/// handled in `tx_index` order, each against the holder snapshot left by the
/// ones before it.
pub struct ActivationScheduler<'a, L: Ledger + ?Sized> {
    ledger: &'a L,
    params: &'a ProtocolParams,
}

impl<'a, L: Ledger + ?Sized> ActivationScheduler<'a, L> {
    pub fn new(ledger: &'a L, params: &'a ProtocolParams) -> Self {
        Self { ledger, params }
    }

    pub async fn activate(&self, block_index: u64) -> Result<Vec<ActivationRecord>, LedgerError> {
        let mut due = self.ledger.due_dividends(block_index).await?;
        due.sort_by_key(|dividend| dividend.tx_index);

        let mut activations = Vec::with_capacity(due.len());
        for dividend in &due {
            activations.push(self.activate_dividend(dividend, block_index).await?);
        }
        Ok(activations)
    }

    async fn activate_dividend(
        &self,
        dividend: &DividendRecord,
        block_index: u64,
    ) -> Result<ActivationRecord, LedgerError> {
        let complete = DividendStatus::Complete;
        if !dividend.status.can_transition_to(&complete) {
            return Err(LedgerError::InvalidTransition {
                tx_hash: dividend.tx_hash.clone(),
                from: dividend.status.to_string(),
                to: complete.to_string(),
            });
        }

        let (Some(asset), Some(dividend_asset), Some(quantity_per_unit)) = (
            dividend.asset.as_deref(),
            dividend.dividend_asset.as_deref(),
            dividend.quantity_per_unit,
        ) else {
            return Err(LedgerError::CorruptRecord(format!(
                "pending dividend {} has no assets",
                dividend.tx_hash
            )));
        };

        // BTC payouts are built as chain outputs elsewhere; nothing moves here
        let mut credited = 0usize;
        if dividend_asset != BTC {
            let terms = PayoutTerms {
                source: &dividend.source,
                dividend_asset,
                quantity_per_unit,
                held_divisible: self.divisible(asset).await?,
                dividend_divisible: self.divisible(dividend_asset).await?,
                block_index,
            };
            let holders = self.ledger.holders(asset).await?;
            let plan = PayoutCalculator::new(self.params).holder_payouts(&terms, &holders);
            LedgerApplier::new(self.ledger)
                .credit_outputs(dividend_asset, &plan.outputs, &dividend.tx_hash)
                .await?;
            credited = plan.outputs.len();
        }

        self.ledger
            .update_status(&dividend.tx_hash, &complete)
            .await?;
        let activation = ActivationRecord {
            dividend_index: dividend.tx_index,
            dividend_hash: dividend.tx_hash.clone(),
            source: dividend.source.clone(),
            block_index,
        };
        self.ledger.insert_activation(&activation).await?;

        logging::log_info(&format!(
            "Activated dividend {} at block {}: {} holders credited",
            dividend.tx_hash, block_index, credited
        ));
        Ok(activation)
    }

    async fn divisible(&self, asset: &str) -> Result<bool, LedgerError> {
        if asset == BTC || asset == XCP {
            return Ok(true);
        }
        self.ledger
            .issuances(asset)
            .await?
            .first()
            .map(|issuance| issuance.divisible)
            .ok_or_else(|| LedgerError::UnknownAssetName(asset.to_string()))
    }
}

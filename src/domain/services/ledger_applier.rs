use crate::domain::errors::LedgerError;
use crate::domain::ledger::LedgerMutation;
use crate::domain::models::{DividendTx, PayoutOutput, PayoutPlan};
use crate::domain::protocol::constants::{
    ACTION_DIVIDEND, ACTION_DIVIDEND_FEE, ACTION_PENDING_DIVIDEND, BTC, MAX_INT, XCP,
};

/// Applies a validated payout plan to the ledger in a fixed order
pub struct LedgerApplier<'a, M: LedgerMutation + ?Sized> {
    ledger: &'a M,
}

impl<'a, M: LedgerMutation + ?Sized> LedgerApplier<'a, M> {
    pub fn new(ledger: &'a M) -> Self {
        Self { ledger }
    }

    /// Debit the source, charge the fee, then credit every output in plan order
    pub async fn pay_immediately(
        &self,
        tx: &DividendTx,
        dividend_asset: &str,
        plan: &PayoutPlan,
        charge_fee: bool,
    ) -> Result<(), LedgerError> {
        self.debit(tx, dividend_asset, plan.total, ACTION_DIVIDEND)
            .await?;
        if charge_fee {
            self.debit(tx, XCP, plan.fee, ACTION_DIVIDEND_FEE).await?;
        }
        self.credit_outputs(dividend_asset, &plan.outputs, &tx.tx_hash)
            .await
    }

    /// Take the total and fee from the source; holders are credited on activation
    pub async fn escrow_scheduled(
        &self,
        tx: &DividendTx,
        dividend_asset: &str,
        plan: &PayoutPlan,
        charge_fee: bool,
    ) -> Result<(), LedgerError> {
        self.debit(tx, dividend_asset, plan.total, ACTION_PENDING_DIVIDEND)
            .await?;
        if charge_fee {
            self.debit(tx, XCP, plan.fee, ACTION_DIVIDEND_FEE).await?;
        }
        Ok(())
    }

    pub async fn credit_outputs(
        &self,
        dividend_asset: &str,
        outputs: &[PayoutOutput],
        event: &str,
    ) -> Result<(), LedgerError> {
        ensure_ledger_asset(dividend_asset)?;
        for output in outputs {
            self.ledger
                .credit(
                    &output.address,
                    dividend_asset,
                    narrow(output.dividend_quantity)?,
                    ACTION_DIVIDEND,
                    event,
                )
                .await?;
        }
        Ok(())
    }

    async fn debit(
        &self,
        tx: &DividendTx,
        asset: &str,
        quantity: u128,
        action: &str,
    ) -> Result<(), LedgerError> {
        ensure_ledger_asset(asset)?;
        self.ledger
            .debit(&tx.source, asset, narrow(quantity)?, action, &tx.tx_hash)
            .await
    }
}

fn ensure_ledger_asset(asset: &str) -> Result<(), LedgerError> {
    if asset == BTC {
        return Err(LedgerError::NativeAsset(asset.to_string()));
    }
    Ok(())
}

/// Storage-width quantity; the overflow rule has already rejected larger values
pub fn narrow(quantity: u128) -> Result<u64, LedgerError> {
    if quantity > u128::from(MAX_INT) {
        return Err(LedgerError::QuantityOutOfRange(quantity));
    }
    u64::try_from(quantity).map_err(|_| LedgerError::QuantityOutOfRange(quantity))
}

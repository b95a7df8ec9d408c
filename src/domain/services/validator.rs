//! Consensus rules for dividend messages.
//!
//! All rules are evaluated and every failure is collected; only a missing
//! held or dividend asset stops evaluation early, since nothing can be
//! priced without it. The validator only reads from the ledger.

use crate::domain::errors::LedgerError;
use crate::domain::ledger::LedgerQuery;
use crate::domain::models::{PayoutPlan, Problem};
use crate::domain::protocol::constants::{
    BTC, MAX_ACTIVATION_DELTA, MAX_INT, MIN_ACTIVATION_DELTA, PER_HOLDER_FEE,
    SCHEDULED_DIVIDEND_FEE, XCP,
};
use crate::domain::protocol::{ProtocolParams, ProtocolRule};
use crate::domain::services::payout_calculator::{PayoutCalculator, PayoutTerms};

/// A dividend as requested by its source
#[derive(Debug, Clone, Copy)]
pub struct DividendRequest<'a> {
    pub source: &'a str,
    pub quantity_per_unit: u64,
    pub asset: &'a str,
    pub dividend_asset: &'a str,
    pub block_index: u64,
    /// Block delta for a scheduled dividend
    pub activation: Option<i64>,
}

/// Result of validating a request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub plan: PayoutPlan,
    pub problems: Vec<Problem>,
    /// Known once the dividend asset has been examined
    pub dividend_divisible: Option<bool>,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        self.problems.is_empty()
    }

    fn abort(problems: Vec<Problem>) -> Self {
        Self {
            problems,
            ..Self::default()
        }
    }
}

pub struct ConsensusValidator<'a, Q: LedgerQuery + ?Sized> {
    ledger: &'a Q,
    params: &'a ProtocolParams,
}

impl<'a, Q: LedgerQuery + ?Sized> ConsensusValidator<'a, Q> {
    pub fn new(ledger: &'a Q, params: &'a ProtocolParams) -> Self {
        Self { ledger, params }
    }

    pub async fn validate(
        &self,
        request: &DividendRequest<'_>,
    ) -> Result<ValidationOutcome, LedgerError> {
        let block_index = request.block_index;
        let scheduled = request.activation.is_some();
        let mut problems = Vec::new();

        if request.asset == BTC {
            problems.push(Problem::ProtectedHeldAsset {
                asset: BTC.to_string(),
            });
        }
        if request.asset == XCP
            && !self
                .params
                .is_active(ProtocolRule::FeeAssetHolderDividends, block_index)
        {
            problems.push(Problem::ProtectedHeldAsset {
                asset: XCP.to_string(),
            });
        }

        if request.quantity_per_unit == 0 {
            problems.push(Problem::NonPositiveQuantityPerUnit);
        }
        if request.quantity_per_unit > MAX_INT {
            problems.push(Problem::IntegerOverflow);
        }

        if let Some(delta) = request.activation {
            problems.extend(self.activation_problems(delta, block_index));
        }

        // Held asset
        let issuances = self.ledger.issuances(request.asset).await?;
        let (Some(first), Some(latest)) = (issuances.first(), issuances.last()) else {
            problems.push(Problem::NoSuchAsset {
                asset: request.asset.to_string(),
            });
            return Ok(ValidationOutcome::abort(problems));
        };
        let held_divisible = first.divisible;

        if self
            .params
            .is_active(ProtocolRule::IssuerOnlyDividends, block_index)
            && latest.issuer != request.source
        {
            problems.push(Problem::NotIssuer {
                issuer: latest.issuer.clone(),
                payer: request.source.to_string(),
            });
        }

        if scheduled && !latest.locked {
            problems.push(Problem::AssetNotLocked {
                asset: request.asset.to_string(),
            });
        }

        // Dividend asset
        let dividend_divisible = if request.dividend_asset == BTC || request.dividend_asset == XCP {
            true
        } else {
            let dividend_issuances = self.ledger.issuances(request.dividend_asset).await?;
            let (Some(first), Some(latest)) =
                (dividend_issuances.first(), dividend_issuances.last())
            else {
                problems.push(Problem::NoSuchDividendAsset {
                    asset: request.dividend_asset.to_string(),
                });
                return Ok(ValidationOutcome::abort(problems));
            };
            if scheduled && !latest.locked {
                problems.push(Problem::AssetNotLocked {
                    asset: request.dividend_asset.to_string(),
                });
            }
            first.divisible
        };

        // Quantities
        let terms = PayoutTerms {
            source: request.source,
            dividend_asset: request.dividend_asset,
            quantity_per_unit: request.quantity_per_unit,
            held_divisible,
            dividend_divisible,
            block_index,
        };
        let calculator = PayoutCalculator::new(self.params);
        let mut plan = if scheduled {
            let issued: u128 = issuances.iter().map(|i| u128::from(i.quantity)).sum();
            calculator.scheduled_payout(&terms, issued)
        } else {
            let holders = self.ledger.holders(request.asset).await?;
            calculator.holder_payouts(&terms, &holders)
        };

        if plan.total == 0 {
            problems.push(Problem::ZeroDividend);
        }

        let mut dividend_balance = None;
        if request.dividend_asset != BTC {
            dividend_balance = self
                .ledger
                .balance(request.source, request.dividend_asset)
                .await?;
            if let Some(problem) =
                insufficient(request.dividend_asset, dividend_balance, plan.total)
            {
                problems.push(problem);
            }
        }

        if problems.is_empty()
            && request.dividend_asset != BTC
            && self.params.is_active(ProtocolRule::DividendFee, block_index)
        {
            plan.fee = if scheduled {
                u128::from(SCHEDULED_DIVIDEND_FEE)
            } else {
                u128::from(PER_HOLDER_FEE) * plan.holder_count() as u128
            };
            if plan.fee > 0 {
                let fee_balance = self.ledger.balance(request.source, XCP).await?;
                if let Some(problem) = insufficient(XCP, fee_balance, plan.fee) {
                    problems.push(problem);
                }
            }
        }

        // Paying in the fee asset: dividend and fee come out of the same balance
        if problems.is_empty() && request.dividend_asset == XCP {
            if let Some(problem) = insufficient(XCP, dividend_balance, plan.total + plan.fee) {
                problems.push(problem);
            }
        }

        if plan.fee > u128::from(MAX_INT) || plan.total > u128::from(MAX_INT) {
            problems.push(Problem::IntegerOverflow);
        }

        Ok(ValidationOutcome {
            plan,
            problems,
            dividend_divisible: Some(dividend_divisible),
        })
    }

    fn activation_problems(&self, delta: i64, block_index: u64) -> Vec<Problem> {
        if !self
            .params
            .is_active(ProtocolRule::ScheduledDividends, block_index)
        {
            return vec![Problem::ScheduledDividendsDisabled];
        }

        let mut problems = Vec::new();
        if delta < 0 {
            problems.push(Problem::NegativeActivation { delta });
        }
        if delta <= 0 {
            problems.push(Problem::ActivationNotInFuture { delta });
        }
        if delta < MIN_ACTIVATION_DELTA {
            problems.push(Problem::ActivationTooSoon {
                delta,
                minimum: MIN_ACTIVATION_DELTA,
            });
        }
        if delta > MAX_ACTIVATION_DELTA {
            problems.push(Problem::ActivationOverflow {
                delta,
                maximum: MAX_ACTIVATION_DELTA,
            });
        }
        problems
    }
}

fn insufficient(asset: &str, balance: Option<u64>, required: u128) -> Option<Problem> {
    match balance {
        Some(available) if u128::from(available) >= required => None,
        _ => Some(Problem::InsufficientFunds {
            asset: asset.to_string(),
            required,
            available: balance.unwrap_or(0),
        }),
    }
}

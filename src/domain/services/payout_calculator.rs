//! Per-holder dividend quantities.
//!
//! The arithmetic reproduces the historical ledger exactly: the product
//! `balance * quantity_per_unit` is exact, each division by `UNIT` rounds
//! once to the nearest double (integer / integer is rounded from the exact
//! quotient, double / integer is a plain IEEE division), and the result is
//! truncated toward zero. When the dividend asset is not divisible the
//! quantity is divided by `UNIT` a second time; that double adjustment is
//! part of consensus and must stay.

use crate::domain::models::{Holder, PayoutOutput, PayoutPlan};
use crate::domain::protocol::constants::{BTC, DEFAULT_MULTISIG_DUST_SIZE, UNIT};
use crate::domain::protocol::{ProtocolParams, ProtocolRule};

/// Inputs shared by every holder of one dividend
#[derive(Debug, Clone, Copy)]
pub struct PayoutTerms<'a> {
    pub source: &'a str,
    pub dividend_asset: &'a str,
    pub quantity_per_unit: u64,
    pub held_divisible: bool,
    pub dividend_divisible: bool,
    /// Height whose rules apply (message block, or activation block)
    pub block_index: u64,
}

pub struct PayoutCalculator<'a> {
    params: &'a ProtocolParams,
}

impl<'a> PayoutCalculator<'a> {
    pub fn new(params: &'a ProtocolParams) -> Self {
        Self { params }
    }

    /// Dividend owed on `units` of the held asset; `None` when it is BTC dust
    pub fn quantity_for(&self, terms: &PayoutTerms<'_>, units: u128) -> Option<u128> {
        let mut quantity = Scaled::Exact(units * u128::from(terms.quantity_per_unit));
        if terms.held_divisible {
            quantity = quantity.div_unit();
        }
        if !terms.dividend_divisible {
            quantity = quantity.div_unit();
        }
        if terms.dividend_asset == BTC && quantity.is_below(DEFAULT_MULTISIG_DUST_SIZE) {
            return None;
        }
        Some(quantity.truncate())
    }

    /// Plan for an immediate dividend over a holder snapshot
    pub fn holder_payouts(&self, terms: &PayoutTerms<'_>, holders: &[Holder]) -> PayoutPlan {
        let escrow_paid = self
            .params
            .is_active(ProtocolRule::EscrowedHoldersPaid, terms.block_index);
        let exclude_source = self
            .params
            .is_active(ProtocolRule::SourceExcludedFromPayout, terms.block_index);

        let mut plan = PayoutPlan::default();
        for holder in holders {
            if holder.escrow && !escrow_paid {
                continue;
            }
            if exclude_source && holder.address == terms.source {
                continue;
            }

            let Some(dividend_quantity) =
                self.quantity_for(terms, u128::from(holder.address_quantity))
            else {
                continue;
            };

            plan.total += dividend_quantity;
            plan.outputs.push(PayoutOutput {
                address: holder.address.clone(),
                address_quantity: holder.address_quantity,
                dividend_quantity,
            });
        }
        plan
    }

    /// Plan for a scheduled dividend: sized on total issuance, no outputs yet
    pub fn scheduled_payout(&self, terms: &PayoutTerms<'_>, issued: u128) -> PayoutPlan {
        PayoutPlan {
            total: self.quantity_for(terms, issued).unwrap_or(0),
            ..PayoutPlan::default()
        }
    }
}

/// Intermediate quantity: an exact integer until the first division
#[derive(Debug, Clone, Copy, PartialEq)]
enum Scaled {
    Exact(u128),
    Approx(f64),
}

impl Scaled {
    fn div_unit(self) -> Self {
        match self {
            Scaled::Exact(n) => Scaled::Approx(true_divide(n, u128::from(UNIT))),
            Scaled::Approx(x) => Scaled::Approx(x / UNIT as f64),
        }
    }

    fn is_below(self, threshold: u64) -> bool {
        match self {
            Scaled::Exact(n) => n < u128::from(threshold),
            Scaled::Approx(x) => x < threshold as f64,
        }
    }

    fn truncate(self) -> u128 {
        match self {
            Scaled::Exact(n) => n,
            Scaled::Approx(x) => x.trunc() as u128,
        }
    }
}

/// `n / d` rounded once, to nearest-even, from the exact rational quotient
fn true_divide(n: u128, d: u128) -> f64 {
    const SIGNIFICANT_BITS: i32 = 55;

    if n == 0 {
        return 0.0;
    }
    if n < (1u128 << 53) && d < (1u128 << 53) {
        return n as f64 / d as f64;
    }

    let n_bits = 128 - n.leading_zeros() as i32;
    let d_bits = 128 - d.leading_zeros() as i32;
    let shift = n_bits - d_bits - SIGNIFICANT_BITS;
    let (numerator, denominator) = if shift >= 0 {
        (n, d << shift)
    } else {
        (n << -shift, d)
    };

    // 55-56 bit quotient; the low bit doubles as sticky bit for the remainder
    let mut quotient = numerator / denominator;
    if numerator % denominator != 0 {
        quotient |= 1;
    }
    quotient as f64 * pow2(shift)
}

fn pow2(exponent: i32) -> f64 {
    f64::from_bits(((1023 + exponent) as u64) << 52)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::protocol::constants::XCP;

    const SOURCE: &str = "1Source";

    fn terms(quantity_per_unit: u64, held_divisible: bool, dividend_divisible: bool) -> PayoutTerms<'static> {
        PayoutTerms {
            source: SOURCE,
            dividend_asset: XCP,
            quantity_per_unit,
            held_divisible,
            dividend_divisible,
            block_index: 400_000,
        }
    }

    #[test]
    fn test_double_adjustment_truncates_to_zero() {
        let params = ProtocolParams::mainnet();
        let calculator = PayoutCalculator::new(&params);
        let mut t = terms(100, true, false);
        t.dividend_asset = "GOLD";

        // 5000 * 100 = 500000 -> 0.005 -> 5e-11 -> 0
        assert_eq!(calculator.quantity_for(&t, 5_000), Some(0));

        // 2 units held, 3 units per unit: 6e16 -> 6e8 -> 6
        let t = PayoutTerms {
            quantity_per_unit: 3 * UNIT,
            ..t
        };
        assert_eq!(calculator.quantity_for(&t, 2 * u128::from(UNIT)), Some(6));
    }

    #[test]
    fn test_single_adjustment_matches_integer_division_for_small_values() {
        let params = ProtocolParams::mainnet();
        let calculator = PayoutCalculator::new(&params);
        let t = terms(123_456_789, true, true);
        assert_eq!(calculator.quantity_for(&t, 999_999_999_999), Some(1_234_567_889_998));
    }

    #[test]
    fn test_wide_products_round_like_the_ledger() {
        let params = ProtocolParams::mainnet();
        let calculator = PayoutCalculator::new(&params);
        let max = i64::MAX as u64;
        let t = terms(max, true, true);
        // exact quotient would be 85070591730234615860...; the ledger rounds first
        assert_eq!(
            calculator.quantity_for(&t, u128::from(max)),
            Some(850_705_917_302_346_176_457_382_821_888)
        );

        let t = terms(3, true, true);
        assert_eq!(
            calculator.quantity_for(&t, 12_345_678_901_234_567_891),
            Some(370_370_367_037)
        );
    }

    #[test]
    fn test_no_scaling_for_indivisible_pairs() {
        let params = ProtocolParams::mainnet();
        let calculator = PayoutCalculator::new(&params);
        let t = terms(7, false, true);
        assert_eq!(calculator.quantity_for(&t, 11), Some(77));
    }

    #[test]
    fn test_btc_dust_is_skipped() {
        let params = ProtocolParams::mainnet();
        let calculator = PayoutCalculator::new(&params);
        let mut t = terms(1, false, true);
        t.dividend_asset = BTC;
        assert_eq!(calculator.quantity_for(&t, 7_799), None);
        assert_eq!(calculator.quantity_for(&t, 7_800), Some(7_800));
    }

    #[test]
    fn test_holder_rules_follow_height() {
        let params = ProtocolParams::mainnet();
        let calculator = PayoutCalculator::new(&params);
        let holders = vec![
            Holder::new("1Alice", 10),
            Holder::escrowed("1Bob", 20),
            Holder::new(SOURCE, 30),
        ];

        let early = PayoutTerms {
            block_index: 290_000,
            ..terms(2, false, true)
        };
        let plan = calculator.holder_payouts(&early, &holders);
        let paid: Vec<_> = plan.outputs.iter().map(|o| o.address.as_str()).collect();
        assert_eq!(paid, vec!["1Alice", SOURCE]);
        assert_eq!(plan.total, 80);

        let middle = PayoutTerms {
            block_index: 295_000,
            ..early
        };
        let plan = calculator.holder_payouts(&middle, &holders);
        assert_eq!(plan.outputs.len(), 3);
        assert_eq!(plan.total, 120);

        let late = PayoutTerms {
            block_index: 296_000,
            ..early
        };
        let plan = calculator.holder_payouts(&late, &holders);
        let paid: Vec<_> = plan.outputs.iter().map(|o| o.address.as_str()).collect();
        assert_eq!(paid, vec!["1Alice", "1Bob"]);
        assert_eq!(plan.total, 60);
    }

    #[test]
    fn test_total_is_sum_of_truncated_outputs() {
        let params = ProtocolParams::testnet();
        let calculator = PayoutCalculator::new(&params);
        let t = terms(33_333_333, true, true);
        let holders: Vec<Holder> = (1..=7)
            .map(|i| Holder::new(format!("1Holder{}", i), i * 1_000_003))
            .collect();

        let plan = calculator.holder_payouts(&t, &holders);
        let sum: u128 = plan.outputs.iter().map(|o| o.dividend_quantity).sum();
        assert_eq!(plan.total, sum);
        for output in &plan.outputs {
            assert_eq!(
                output.dividend_quantity,
                u128::from(output.address_quantity) * 33_333_333 / u128::from(UNIT)
            );
        }
    }

    #[test]
    fn test_scheduled_payout_uses_issuance() {
        let params = ProtocolParams::testnet();
        let calculator = PayoutCalculator::new(&params);
        let t = terms(50, false, true);
        let plan = calculator.scheduled_payout(&t, 1_000);
        assert_eq!(plan.total, 50_000);
        assert!(plan.outputs.is_empty());
    }
}

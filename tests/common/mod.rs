#![allow(dead_code)]

use dividend_indexer::domain::models::{DividendTx, Issuance};
use dividend_indexer::domain::protocol::constants::{UNIT, XCP};
use dividend_indexer::infrastructure::memory::MemoryLedger;

pub const ISSUER: &str = "1IssuerXXXXXXXXXXXXXXXXXXXXXXXXXX";
pub const ALICE: &str = "1AliceXXXXXXXXXXXXXXXXXXXXXXXXXXX";
pub const BOB: &str = "1BobXXXXXXXXXXXXXXXXXXXXXXXXXXXXX";

pub const GOLD: &str = "GOLD";
pub const GOLD_ID: u64 = 4_552_100;
pub const SILVER: &str = "SILVER";
pub const SILVER_ID: u64 = 1_208_513_530;

/// GOLD (divisible, 1000 units) held 400/100/500 by issuer, Alice and Bob.
/// The issuer also holds 100 XCP and all of SILVER (indivisible).
pub fn ledger() -> MemoryLedger {
    let ledger = MemoryLedger::new();
    ledger
        .register_asset(GOLD_ID, GOLD, 100)
        .register_asset(SILVER_ID, SILVER, 100)
        .add_issuance(Issuance {
            tx_index: 1,
            asset: GOLD.to_string(),
            issuer: ISSUER.to_string(),
            divisible: true,
            locked: true,
            quantity: 1_000 * UNIT,
        })
        .add_issuance(Issuance {
            tx_index: 2,
            asset: SILVER.to_string(),
            issuer: ISSUER.to_string(),
            divisible: false,
            locked: true,
            quantity: 1_000_000,
        })
        .set_balance(ISSUER, GOLD, 400 * UNIT)
        .set_balance(ALICE, GOLD, 100 * UNIT)
        .set_balance(BOB, GOLD, 500 * UNIT)
        .set_balance(ISSUER, XCP, 100 * UNIT)
        .set_balance(ISSUER, SILVER, 1_000_000);
    ledger
}

pub fn tx(tx_index: u64, block_index: u64, source: &str) -> DividendTx {
    DividendTx {
        tx_index,
        tx_hash: format!("{:064x}", tx_index),
        block_index,
        source: source.to_string(),
    }
}

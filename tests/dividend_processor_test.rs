mod common;

use common::{ledger, tx, ALICE, BOB, GOLD, GOLD_ID, ISSUER};
use dividend_indexer::domain::models::DividendStatus;
use dividend_indexer::domain::protocol::constants::{
    ACTION_DIVIDEND, ACTION_DIVIDEND_FEE, BTC_ASSET_ID, MAX_INT, UNIT, XCP, XCP_ASSET_ID,
};
use dividend_indexer::domain::protocol::ProtocolParams;
use dividend_indexer::domain::services::{DividendProcessor, ParseOutcome, WireCodec};
use dividend_indexer::infrastructure::persistence::repositories::dividend_repository::to_model;

const HEIGHT: u64 = 400_000;

#[tokio::test]
async fn test_immediate_dividend_moves_balances() {
    let ledger = ledger();
    let params = ProtocolParams::mainnet();
    let message = WireCodec::pack(1_000_000, GOLD_ID, XCP_ASSET_ID, None);
    let tx = tx(10, HEIGHT, ISSUER);

    let outcome = DividendProcessor::new(&ledger, &params)
        .parse(&tx, &message)
        .await
        .unwrap();

    let ParseOutcome::Recorded(record) = outcome else {
        panic!("expected a stored record, got {:?}", outcome);
    };
    assert_eq!(record.status, DividendStatus::Valid);
    assert_eq!(record.asset.as_deref(), Some(GOLD));
    assert_eq!(record.dividend_asset.as_deref(), Some(XCP));
    assert_eq!(record.quantity_per_unit, Some(1_000_000));
    assert_eq!(record.fee_paid, 40_000);

    assert_eq!(ledger.balance_of(ALICE, XCP), UNIT);
    assert_eq!(ledger.balance_of(BOB, XCP), 5 * UNIT);
    assert_eq!(ledger.balance_of(ISSUER, XCP), 100 * UNIT - 6 * UNIT - 40_000);

    let credited: u64 = ledger.credits().iter().map(|c| c.quantity).sum();
    assert_eq!(credited, 6 * UNIT);
    assert!(ledger.credits().iter().all(|c| c.event == tx.tx_hash));

    let debits = ledger.debits();
    assert_eq!(debits.len(), 2);
    assert_eq!(debits[0].action, ACTION_DIVIDEND);
    assert_eq!(debits[0].quantity, 6 * UNIT);
    assert_eq!(debits[1].action, ACTION_DIVIDEND_FEE);
    assert_eq!(debits[1].quantity, 40_000);

    assert_eq!(ledger.dividend_records(), vec![record]);
}

#[tokio::test]
async fn test_legacy_message_pays_in_fee_asset() {
    let ledger = ledger();
    let params = ProtocolParams::mainnet();
    let mut message = 1_000_000u64.to_be_bytes().to_vec();
    message.extend_from_slice(&GOLD_ID.to_be_bytes());

    let outcome = DividendProcessor::new(&ledger, &params)
        .parse(&tx(10, HEIGHT, ISSUER), &message)
        .await
        .unwrap();

    let ParseOutcome::Recorded(record) = outcome else {
        panic!("expected a stored record");
    };
    assert_eq!(record.dividend_asset.as_deref(), Some(XCP));
    assert_eq!(record.status, DividendStatus::Valid);
}

#[tokio::test]
async fn test_undecodable_message_is_recorded_invalid() {
    let ledger = ledger();
    let params = ProtocolParams::mainnet();
    let processor = DividendProcessor::new(&ledger, &params);

    let outcome = processor
        .parse(&tx(10, HEIGHT, ISSUER), &[0u8; 20])
        .await
        .unwrap();
    let ParseOutcome::Recorded(record) = outcome else {
        panic!("expected a stored record");
    };
    assert_eq!(record.status.to_string(), "invalid: could not unpack");
    assert_eq!(record.asset, None);
    assert_eq!(record.dividend_asset, None);
    assert_eq!(record.quantity_per_unit, None);

    // an asset id nobody registered is just as undecodable
    let message = WireCodec::pack(1_000_000, 999_999, XCP_ASSET_ID, None);
    let outcome = processor
        .parse(&tx(11, HEIGHT, ISSUER), &message)
        .await
        .unwrap();
    let ParseOutcome::Recorded(record) = outcome else {
        panic!("expected a stored record");
    };
    assert_eq!(record.status, DividendStatus::could_not_unpack());

    assert!(ledger.debits().is_empty());
    assert!(ledger.credits().is_empty());
}

#[tokio::test]
async fn test_btc_dividend_is_invalid_within_protocol() {
    let ledger = ledger();
    let params = ProtocolParams::mainnet();
    let message = WireCodec::pack(100, GOLD_ID, BTC_ASSET_ID, None);

    let outcome = DividendProcessor::new(&ledger, &params)
        .parse(&tx(10, HEIGHT, ISSUER), &message)
        .await
        .unwrap();

    let ParseOutcome::Recorded(record) = outcome else {
        panic!("expected a stored record");
    };
    assert_eq!(
        record.status.to_string(),
        "invalid: cannot pay BTC dividends within protocol"
    );
    assert_eq!(record.fee_paid, 0);
    assert!(ledger.debits().is_empty());
}

#[tokio::test]
async fn test_failed_rules_are_joined_into_status() {
    let ledger = ledger();
    let params = ProtocolParams::mainnet();
    let message = WireCodec::pack(1_000_000, GOLD_ID, XCP_ASSET_ID, None);

    let outcome = DividendProcessor::new(&ledger, &params)
        .parse(&tx(10, HEIGHT, ALICE), &message)
        .await
        .unwrap();

    let ParseOutcome::Recorded(record) = outcome else {
        panic!("expected a stored record");
    };
    assert_eq!(
        record.status.to_string(),
        "invalid: only issuer can pay dividends; insufficient funds (XCP)"
    );
    assert_eq!(ledger.balance_of(BOB, XCP), 0);
}

#[tokio::test]
async fn test_overflowing_dividend_is_not_stored() {
    let ledger = ledger();
    let params = ProtocolParams::mainnet();
    let message = WireCodec::pack(u64::MAX, GOLD_ID, XCP_ASSET_ID, None);

    let outcome = DividendProcessor::new(&ledger, &params)
        .parse(&tx(10, HEIGHT, ISSUER), &message)
        .await
        .unwrap();

    let ParseOutcome::Unstored(record) = outcome else {
        panic!("expected the record to be dropped, got {:?}", outcome);
    };
    assert_eq!(record.quantity_per_unit, Some(MAX_INT));
    assert!(record.status.is_overflow());
    assert!(ledger.dividend_records().is_empty());
    assert!(ledger.debits().is_empty());
    assert_eq!(ledger.balance_of(ISSUER, XCP), 100 * UNIT);
}

#[tokio::test]
async fn test_replayed_transaction_is_skipped() {
    let ledger = ledger();
    let params = ProtocolParams::mainnet();
    let processor = DividendProcessor::new(&ledger, &params);
    let message = WireCodec::pack(1_000_000, GOLD_ID, XCP_ASSET_ID, None);
    let tx = tx(10, HEIGHT, ISSUER);

    processor.parse(&tx, &message).await.unwrap();
    let second = processor.parse(&tx, &message).await.unwrap();

    assert_eq!(second, ParseOutcome::AlreadyProcessed);
    assert_eq!(ledger.dividend_records().len(), 1);
    assert_eq!(ledger.balance_of(ALICE, XCP), UNIT);
}

#[tokio::test]
async fn test_escrowed_holders_are_paid_after_rule_change() {
    let ledger = ledger();
    ledger.add_escrow(ALICE, GOLD, 50 * UNIT);
    let params = ProtocolParams::mainnet();
    let message = WireCodec::pack(1_000_000, GOLD_ID, XCP_ASSET_ID, None);

    DividendProcessor::new(&ledger, &params)
        .parse(&tx(10, HEIGHT, ISSUER), &message)
        .await
        .unwrap();

    // 1 XCP on the held balance, 0.5 XCP on the escrowed one
    assert_eq!(ledger.balance_of(ALICE, XCP), UNIT + UNIT / 2);
    // the fee counts addresses, not outputs
    assert_eq!(ledger.dividend_records()[0].fee_paid, 2 * 20_000);
}

#[tokio::test]
async fn test_out_of_range_activation_is_recorded_invalid() {
    let ledger = ledger();
    let params = ProtocolParams::testnet();
    let message = WireCodec::pack(1_000_000, GOLD_ID, XCP_ASSET_ID, Some(u64::MAX));

    let outcome = DividendProcessor::new(&ledger, &params)
        .parse(&tx(10, 1_000, ISSUER), &message)
        .await
        .unwrap();

    let ParseOutcome::Recorded(record) = outcome else {
        panic!("expected a stored record, got {:?}", outcome);
    };
    assert_eq!(record.status.to_string(), "invalid: activation overflow");
    assert_eq!(record.activation, Some(MAX_INT));
    assert_eq!(record.activate_index, None);
    assert!(to_model(&record).is_ok());
    assert!(ledger.debits().is_empty());
}

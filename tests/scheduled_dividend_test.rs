mod common;

use common::{ledger, tx, ALICE, BOB, GOLD_ID, ISSUER};
use dividend_indexer::application::{DividendBlock, DividendBlockProcessor};
use dividend_indexer::domain::errors::{BlockProcessorError, LedgerError};
use dividend_indexer::domain::models::DividendStatus;
use dividend_indexer::domain::protocol::constants::{
    ACTION_DIVIDEND_FEE, ACTION_PENDING_DIVIDEND, UNIT, XCP, XCP_ASSET_ID,
};
use dividend_indexer::domain::protocol::ProtocolParams;
use dividend_indexer::domain::services::ActivationScheduler;
use dividend_indexer::domain::services::WireCodec;

const HEIGHT: u64 = 1_000;

#[tokio::test]
async fn test_pending_dividend_completes_at_activation_height() {
    let ledger = ledger();
    let params = ProtocolParams::testnet();
    let processor = DividendBlockProcessor::new(&ledger, &params);
    let dividend_tx = tx(10, HEIGHT, ISSUER);
    let message = WireCodec::pack(1_000_000, GOLD_ID, XCP_ASSET_ID, Some(200));

    let summary = processor
        .process_block(&DividendBlock::new(HEIGHT).with_message(dividend_tx.clone(), message))
        .await
        .unwrap();
    assert_eq!(summary.pending, 1);
    assert_eq!(summary.activated, 0);

    let record = &ledger.dividend_records()[0];
    assert_eq!(record.status, DividendStatus::Pending);
    assert_eq!(record.activation, Some(200));
    assert_eq!(record.activate_index, Some(1_200));
    assert_eq!(record.fee_paid, 2_000_000);

    // the whole issuance is escrowed up front; nobody is paid yet
    let debits = ledger.debits();
    assert_eq!(debits[0].action, ACTION_PENDING_DIVIDEND);
    assert_eq!(debits[0].quantity, 10 * UNIT);
    assert_eq!(debits[1].action, ACTION_DIVIDEND_FEE);
    assert_eq!(ledger.balance_of(ISSUER, XCP), 100 * UNIT - 10 * UNIT - 2_000_000);
    assert!(ledger.credits().is_empty());

    let summary = processor
        .process_block(&DividendBlock::new(1_199))
        .await
        .unwrap();
    assert_eq!(summary.activated, 0);

    let summary = processor
        .process_block(&DividendBlock::new(1_200))
        .await
        .unwrap();
    assert_eq!(summary.activated, 1);
    assert_eq!(ledger.dividend_records()[0].status, DividendStatus::Complete);
    assert_eq!(ledger.balance_of(ALICE, XCP), UNIT);
    assert_eq!(ledger.balance_of(BOB, XCP), 5 * UNIT);

    let activations = ledger.activation_records();
    assert_eq!(activations.len(), 1);
    assert_eq!(activations[0].dividend_index, 10);
    assert_eq!(activations[0].dividend_hash, dividend_tx.tx_hash);
    assert_eq!(activations[0].block_index, 1_200);
}

#[tokio::test]
async fn test_completed_dividends_are_not_paid_twice() {
    let ledger = ledger();
    let params = ProtocolParams::testnet();
    let processor = DividendBlockProcessor::new(&ledger, &params);
    let message = WireCodec::pack(1_000_000, GOLD_ID, XCP_ASSET_ID, Some(144));

    processor
        .process_block(&DividendBlock::new(HEIGHT).with_message(tx(10, HEIGHT, ISSUER), message))
        .await
        .unwrap();

    let scheduler = ActivationScheduler::new(&ledger, &params);
    assert_eq!(scheduler.activate(1_144).await.unwrap().len(), 1);
    assert!(scheduler.activate(1_144).await.unwrap().is_empty());
    assert!(scheduler.activate(1_145).await.unwrap().is_empty());
    assert_eq!(ledger.balance_of(BOB, XCP), 5 * UNIT);
}

#[tokio::test]
async fn test_due_dividends_activate_in_message_order() {
    let ledger = ledger();
    let params = ProtocolParams::testnet();
    let processor = DividendBlockProcessor::new(&ledger, &params);

    let block = DividendBlock::new(HEIGHT)
        .with_message(
            tx(10, HEIGHT, ISSUER),
            WireCodec::pack(1_000_000, GOLD_ID, XCP_ASSET_ID, Some(300)),
        )
        .with_message(
            tx(11, HEIGHT, ISSUER),
            WireCodec::pack(2_000_000, GOLD_ID, XCP_ASSET_ID, Some(150)),
        );
    let summary = processor.process_block(&block).await.unwrap();
    assert_eq!(summary.pending, 2);

    // both are due by 1300, even though one became due earlier
    let activations = ActivationScheduler::new(&ledger, &params)
        .activate(1_300)
        .await
        .unwrap();
    let order: Vec<u64> = activations.iter().map(|a| a.dividend_index).collect();
    assert_eq!(order, vec![10, 11]);
    assert_eq!(ledger.balance_of(ALICE, XCP), UNIT + 2 * UNIT);
}

#[tokio::test]
async fn test_block_rejects_messages_out_of_order() {
    let ledger = ledger();
    let params = ProtocolParams::testnet();
    let processor = DividendBlockProcessor::new(&ledger, &params);
    let message = WireCodec::pack(1_000_000, GOLD_ID, XCP_ASSET_ID, None);

    let block = DividendBlock::new(HEIGHT)
        .with_message(tx(11, HEIGHT, ISSUER), message.clone())
        .with_message(tx(10, HEIGHT, ISSUER), message.clone());
    let result = processor.process_block(&block).await;
    assert!(matches!(result, Err(BlockProcessorError::ProcessingError(_))));

    let block = DividendBlock::new(HEIGHT).with_message(tx(10, HEIGHT + 1, ISSUER), message);
    let result = processor.process_block(&block).await;
    assert!(matches!(result, Err(BlockProcessorError::ProcessingError(_))));
    assert!(ledger.dividend_records().is_empty());
}

#[tokio::test]
async fn test_pending_record_without_assets_is_corrupt() {
    use dividend_indexer::domain::ledger::DividendStore;
    use dividend_indexer::domain::models::DividendRecord;

    let ledger = ledger();
    let params = ProtocolParams::testnet();
    ledger
        .insert_dividend(&DividendRecord {
            tx_index: 10,
            tx_hash: "ab".repeat(32),
            block_index: HEIGHT,
            source: ISSUER.to_string(),
            asset: None,
            dividend_asset: None,
            quantity_per_unit: None,
            fee_paid: 0,
            status: DividendStatus::Pending,
            activation: Some(200),
            activate_index: Some(1_200),
        })
        .await
        .unwrap();

    let result = ActivationScheduler::new(&ledger, &params).activate(1_200).await;
    assert!(matches!(result, Err(LedgerError::CorruptRecord(_))));
}

//! Per-block dividend pipeline

use serde::Serialize;

use crate::domain::errors::BlockProcessorError;
use crate::domain::ledger::Ledger;
use crate::domain::models::{DividendStatus, DividendTx};
use crate::domain::protocol::ProtocolParams;
use crate::domain::services::{ActivationScheduler, DividendProcessor, ParseOutcome};
use crate::utils::logging;

/// A dividend message as extracted from a transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockMessage {
    pub tx: DividendTx,
    /// Payload after the message type id
    pub data: Vec<u8>,
}

/// Dividend messages of one block, in transaction order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DividendBlock {
    pub block_index: u64,
    pub messages: Vec<BlockMessage>,
}

impl DividendBlock {
    pub fn new(block_index: u64) -> Self {
        Self {
            block_index,
            messages: Vec::new(),
        }
    }

    pub fn with_message(mut self, tx: DividendTx, data: Vec<u8>) -> Self {
        self.messages.push(BlockMessage { tx, data });
        self
    }
}

/// What one block did to the dividend tables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BlockSummary {
    pub block_index: u64,
    pub valid: usize,
    pub pending: usize,
    pub invalid: usize,
    pub unstored: usize,
    pub skipped: usize,
    pub activated: usize,
}

/// Applies a block's dividend messages, then pays out dividends that came due
pub struct DividendBlockProcessor<'a, L: Ledger + ?Sized> {
    ledger: &'a L,
    params: &'a ProtocolParams,
}

impl<'a, L: Ledger + ?Sized> DividendBlockProcessor<'a, L> {
    pub fn new(ledger: &'a L, params: &'a ProtocolParams) -> Self {
        Self { ledger, params }
    }

    pub async fn process_block(
        &self,
        block: &DividendBlock,
    ) -> Result<BlockSummary, BlockProcessorError> {
        self.check_order(block)?;

        let mut summary = BlockSummary {
            block_index: block.block_index,
            ..BlockSummary::default()
        };

        let processor = DividendProcessor::new(self.ledger, self.params);
        for message in &block.messages {
            match processor.parse(&message.tx, &message.data).await? {
                ParseOutcome::Recorded(record) => match record.status {
                    DividendStatus::Valid => summary.valid += 1,
                    DividendStatus::Pending => summary.pending += 1,
                    _ => summary.invalid += 1,
                },
                ParseOutcome::Unstored(_) => summary.unstored += 1,
                ParseOutcome::AlreadyProcessed => summary.skipped += 1,
            }
        }

        let activations = ActivationScheduler::new(self.ledger, self.params)
            .activate(block.block_index)
            .await?;
        summary.activated = activations.len();

        if !block.messages.is_empty() || summary.activated > 0 {
            logging::log_info(&format!(
                "Block {}: {} valid, {} pending, {} invalid, {} unstored, {} skipped, {} activated",
                summary.block_index,
                summary.valid,
                summary.pending,
                summary.invalid,
                summary.unstored,
                summary.skipped,
                summary.activated
            ));
        }

        Ok(summary)
    }

    /// Messages must belong to the block and arrive in ascending `tx_index`
    fn check_order(&self, block: &DividendBlock) -> Result<(), BlockProcessorError> {
        let mut previous: Option<u64> = None;
        for message in &block.messages {
            if message.tx.block_index != block.block_index {
                return Err(BlockProcessorError::ProcessingError(format!(
                    "tx {} belongs to block {}, not {}",
                    message.tx.tx_hash, message.tx.block_index, block.block_index
                )));
            }
            if previous.is_some_and(|prev| message.tx.tx_index <= prev) {
                return Err(BlockProcessorError::ProcessingError(format!(
                    "tx {} is out of order in block {}",
                    message.tx.tx_hash, block.block_index
                )));
            }
            previous = Some(message.tx.tx_index);
        }
        Ok(())
    }
}

use crate::application::block_processor::{BlockSummary, DividendBlock, DividendBlockProcessor};
use crate::config::AppConfig;
use crate::domain::errors::{BlockProcessorError, ComposeError};
use crate::domain::protocol::ProtocolParams;
use crate::domain::services::{ComposeRequest, ComposedDividend, DividendComposer};
use crate::infrastructure::persistence::{DbPool, SqlLedger};
use crate::utils::logging;

/// Dividend handler bound to the PostgreSQL ledger
pub struct DividendIndexer {
    pool: DbPool,
    params: ProtocolParams,
}

impl DividendIndexer {
    pub fn new(pool: DbPool, params: ProtocolParams) -> Self {
        Self { pool, params }
    }

    pub async fn connect(config: &AppConfig) -> Result<Self, BlockProcessorError> {
        let pool = DbPool::new(config).await?;
        Ok(Self::new(pool, config.protocol_params()))
    }

    pub fn params(&self) -> &ProtocolParams {
        &self.params
    }

    /// Process one block inside a single database transaction
    pub async fn process_block(
        &self,
        block: &DividendBlock,
    ) -> Result<BlockSummary, BlockProcessorError> {
        let txn = self.pool.begin().await?;
        let ledger = SqlLedger::new(txn);

        let result = DividendBlockProcessor::new(&ledger, &self.params)
            .process_block(block)
            .await;

        let txn = ledger.into_inner();
        match result {
            Ok(summary) => {
                txn.commit().await?;
                Ok(summary)
            }
            Err(e) => {
                logging::log_error(&format!(
                    "Block {} rolled back: {}",
                    block.block_index, e
                ));
                txn.rollback().await?;
                Err(e)
            }
        }
    }

    /// Pay out dividends due at `block_index` without new messages
    pub async fn activate(&self, block_index: u64) -> Result<BlockSummary, BlockProcessorError> {
        self.process_block(&DividendBlock::new(block_index)).await
    }

    pub async fn compose(&self, request: &ComposeRequest) -> Result<ComposedDividend, ComposeError> {
        let ledger = SqlLedger::new(self.pool.get_connection().clone());
        DividendComposer::new(&ledger, &self.params)
            .compose(request)
            .await
    }
}

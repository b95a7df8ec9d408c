pub mod block_processor;
pub mod indexer;

pub use block_processor::{BlockMessage, BlockSummary, DividendBlock, DividendBlockProcessor};
pub use indexer::DividendIndexer;

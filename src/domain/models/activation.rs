use serde::{Deserialize, Serialize};

/// Completion of a scheduled dividend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationRecord {
    /// `tx_index` of the dividend that completed
    pub dividend_index: u64,
    pub dividend_hash: String,
    pub source: String,
    /// Block in which the holders were credited
    pub block_index: u64,
}

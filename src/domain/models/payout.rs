use serde::{Deserialize, Serialize};

/// A single recipient of a dividend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutOutput {
    pub address: String,
    pub address_quantity: u64,
    pub dividend_quantity: u128,
}

/// Quantities a dividend moves; never persisted
///
/// Values are kept wide so that the overflow rule can see them before they
/// are narrowed to storage integers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutPlan {
    pub total: u128,
    pub fee: u128,
    pub outputs: Vec<PayoutOutput>,
}

impl PayoutPlan {
    /// Number of distinct addresses receiving an output
    pub fn holder_count(&self) -> usize {
        let mut addresses: Vec<&str> = self.outputs.iter().map(|o| o.address.as_str()).collect();
        addresses.sort_unstable();
        addresses.dedup();
        addresses.len()
    }
}

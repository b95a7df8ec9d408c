use serde::{Deserialize, Serialize};

/// One entry of a holder snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holder {
    pub address: String,
    pub address_quantity: u64,
    /// Balance is locked in an open order or bet rather than held directly
    pub escrow: bool,
}

impl Holder {
    pub fn new(address: impl Into<String>, address_quantity: u64) -> Self {
        Self {
            address: address.into(),
            address_quantity,
            escrow: false,
        }
    }

    pub fn escrowed(address: impl Into<String>, address_quantity: u64) -> Self {
        Self {
            address: address.into(),
            address_quantity,
            escrow: true,
        }
    }
}

/// A valid issuance of an asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issuance {
    pub tx_index: u64,
    pub asset: String,
    pub issuer: String,
    pub divisible: bool,
    pub locked: bool,
    pub quantity: u64,
}

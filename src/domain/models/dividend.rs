use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::models::Problem;
use crate::domain::protocol::constants::BTC;

const INVALID_PREFIX: &str = "invalid: ";
const COULD_NOT_UNPACK: &str = "could not unpack";

/// Envelope of a transaction carrying a dividend message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DividendTx {
    pub tx_index: u64,
    pub tx_hash: String,
    pub block_index: u64,
    /// Already authenticated by the transaction parser
    pub source: String,
}

/// Lifecycle state of a dividend record
///
/// `Pending -> Complete` is the only transition; every other state is final.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum DividendStatus {
    Valid,
    Pending,
    Complete,
    /// Rejected; holds the rendered reason without the `invalid: ` prefix
    Invalid(String),
}

#[derive(Debug, Error)]
#[error("unknown dividend status: {0}")]
pub struct StatusParseError(pub String);

impl DividendStatus {
    /// Status for a message that failed one or more rules
    pub fn from_problems(problems: &[Problem]) -> Self {
        let reason = problems
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        DividendStatus::Invalid(reason)
    }

    pub fn could_not_unpack() -> Self {
        DividendStatus::Invalid(COULD_NOT_UNPACK.to_string())
    }

    pub fn native_dividend_asset() -> Self {
        DividendStatus::Invalid(format!("cannot pay {} dividends within protocol", BTC))
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, DividendStatus::Invalid(_))
    }

    /// Overflowed messages are logged but never stored
    pub fn is_overflow(&self) -> bool {
        match self {
            DividendStatus::Invalid(reason) => {
                reason.contains(&Problem::IntegerOverflow.to_string())
            }
            _ => false,
        }
    }

    pub fn can_transition_to(&self, next: &DividendStatus) -> bool {
        matches!((self, next), (DividendStatus::Pending, DividendStatus::Complete))
    }

    pub fn parse(value: &str) -> Result<Self, StatusParseError> {
        match value {
            "valid" => Ok(DividendStatus::Valid),
            "pending" => Ok(DividendStatus::Pending),
            "complete" => Ok(DividendStatus::Complete),
            other => other
                .strip_prefix(INVALID_PREFIX)
                .map(|reason| DividendStatus::Invalid(reason.to_string()))
                .ok_or_else(|| StatusParseError(other.to_string())),
        }
    }
}

impl fmt::Display for DividendStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DividendStatus::Valid => write!(f, "valid"),
            DividendStatus::Pending => write!(f, "pending"),
            DividendStatus::Complete => write!(f, "complete"),
            DividendStatus::Invalid(reason) => write!(f, "{}{}", INVALID_PREFIX, reason),
        }
    }
}

impl From<DividendStatus> for String {
    fn from(status: DividendStatus) -> Self {
        status.to_string()
    }
}

impl TryFrom<String> for DividendStatus {
    type Error = StatusParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        DividendStatus::parse(&value)
    }
}

/// One processed dividend message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DividendRecord {
    pub tx_index: u64,
    pub tx_hash: String,
    pub block_index: u64,
    pub source: String,
    /// Asset whose holders are paid; absent when the message did not decode
    pub asset: Option<String>,
    /// Asset paid out
    pub dividend_asset: Option<String>,
    pub quantity_per_unit: Option<u64>,
    pub fee_paid: u64,
    pub status: DividendStatus,
    /// Block delta requested by a scheduled dividend
    pub activation: Option<u64>,
    /// Height at which a pending dividend becomes payable
    pub activate_index: Option<u64>,
}

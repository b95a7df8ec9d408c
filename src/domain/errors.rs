use std::error::Error;
use std::fmt;

use thiserror::Error;

use crate::domain::models::Problem;
use crate::infrastructure::persistence::error::DbError;

/// Error raised by a ledger collaborator
///
/// These are never consensus outcomes; a validation failure is a `Problem`.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("insufficient balance: {address} holds {available} {asset}, {requested} requested")]
    InsufficientBalance {
        address: String,
        asset: String,
        available: u64,
        requested: u64,
    },
    #[error("{0} cannot be moved through the ledger")]
    NativeAsset(String),
    #[error("quantity {0} exceeds the storage range")]
    QuantityOutOfRange(u128),
    #[error("no asset with id {0}")]
    UnknownAssetId(u64),
    #[error("no asset named {0}")]
    UnknownAssetName(String),
    #[error("dividend {tx_hash} cannot move from {from} to {to}")]
    InvalidTransition {
        tx_hash: String,
        from: String,
        to: String,
    },
    #[error("dividend {0} not found")]
    DividendNotFound(String),
    #[error("corrupt record: {0}")]
    CorruptRecord(String),
}

/// Error returned when composing a dividend message
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("{}", render_problems(.0))]
    Invalid(Vec<Problem>),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

fn render_problems(problems: &[Problem]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Error type for block processing operations
#[derive(Debug)]
pub enum BlockProcessorError {
    LedgerError(LedgerError),
    DbError(DbError),
    ProcessingError(String),
}

impl fmt::Display for BlockProcessorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockProcessorError::LedgerError(e) => write!(f, "Ledger error: {}", e),
            BlockProcessorError::DbError(e) => write!(f, "Database error: {}", e),
            BlockProcessorError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
        }
    }
}

impl Error for BlockProcessorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BlockProcessorError::LedgerError(e) => Some(e),
            BlockProcessorError::DbError(e) => Some(e),
            BlockProcessorError::ProcessingError(_) => None,
        }
    }
}

impl From<LedgerError> for BlockProcessorError {
    fn from(error: LedgerError) -> Self {
        BlockProcessorError::LedgerError(error)
    }
}

impl From<DbError> for BlockProcessorError {
    fn from(error: DbError) -> Self {
        BlockProcessorError::DbError(error)
    }
}

impl From<sea_orm::DbErr> for BlockProcessorError {
    fn from(error: sea_orm::DbErr) -> Self {
        BlockProcessorError::DbError(DbError::from(error))
    }
}

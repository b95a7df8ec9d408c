use thiserror::Error;

/// A consensus rule a dividend message failed
///
/// The rendered text is what gets stored in the record status and must not
/// change wording.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Problem {
    #[error("cannot pay dividends to holders of {asset}")]
    ProtectedHeldAsset { asset: String },
    #[error("non‐positive quantity per unit")]
    NonPositiveQuantityPerUnit,
    #[error("integer overflow")]
    IntegerOverflow,
    #[error("scheduled dividends are not enabled")]
    ScheduledDividendsDisabled,
    #[error("negative activation")]
    NegativeActivation { delta: i64 },
    #[error("activation must be future block height")]
    ActivationNotInFuture { delta: i64 },
    #[error("activation must be {minimum} or more blocks from now")]
    ActivationTooSoon { delta: i64, minimum: i64 },
    #[error("activation overflow")]
    ActivationOverflow { delta: i64, maximum: i64 },
    #[error("no such asset, {asset}.")]
    NoSuchAsset { asset: String },
    #[error("only issuer can pay dividends")]
    NotIssuer { issuer: String, payer: String },
    #[error("asset and dividend_asset must be locked")]
    AssetNotLocked { asset: String },
    #[error("no such dividend asset, {asset}.")]
    NoSuchDividendAsset { asset: String },
    #[error("zero dividend")]
    ZeroDividend,
    #[error("insufficient funds ({asset})")]
    InsufficientFunds {
        asset: String,
        required: u128,
        available: u64,
    },
}

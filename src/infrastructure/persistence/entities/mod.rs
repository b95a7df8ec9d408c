pub mod assets;
pub mod balances;
pub mod credits;
pub mod debits;
pub mod dividend_activations;
pub mod dividends;
pub mod escrows;
pub mod issuances;

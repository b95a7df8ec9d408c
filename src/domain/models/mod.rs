pub mod activation;
pub mod dividend;
pub mod holder;
pub mod payout;
pub mod problem;

pub use activation::ActivationRecord;
pub use dividend::{DividendRecord, DividendStatus, DividendTx, StatusParseError};
pub use holder::{Holder, Issuance};
pub use payout::{PayoutOutput, PayoutPlan};
pub use problem::Problem;

pub mod activation_scheduler;
pub mod compose;
pub mod dividend_processor;
pub mod ledger_applier;
pub mod payout_calculator;
pub mod validator;
pub mod wire_codec;

// Re-export services for direct imports
pub use activation_scheduler::ActivationScheduler;
pub use compose::{ComposeRequest, ComposedDividend, DividendComposer};
pub use dividend_processor::{DividendProcessor, ParseOutcome};
pub use ledger_applier::LedgerApplier;
pub use payout_calculator::{PayoutCalculator, PayoutTerms};
pub use validator::{ConsensusValidator, DividendRequest, ValidationOutcome};
pub use wire_codec::{CodecError, DividendMessage, Layout, WireCodec};

/// Base chain currency; never moved through the ledger
pub const BTC: &str = "BTC";

/// Protocol fee asset
pub const XCP: &str = "XCP";

/// Registry ids of the two native assets
pub const BTC_ASSET_ID: u64 = 0;
pub const XCP_ASSET_ID: u64 = 1;

/// Subunits per whole unit of a divisible asset
pub const UNIT: u64 = 100_000_000;

/// Largest quantity the storage layer can represent (signed 64-bit)
pub const MAX_INT: u64 = i64::MAX as u64;

/// Smallest BTC payout worth creating an output for
pub const DEFAULT_MULTISIG_DUST_SIZE: u64 = 7_800;

/// Minimum lead of a scheduled dividend, roughly one day of blocks
pub const MIN_ACTIVATION_DELTA: i64 = 144;

/// Furthest a scheduled dividend may be deferred, roughly one year of blocks
pub const MAX_ACTIVATION_DELTA: i64 = 52_560;

/// Flat fee of a scheduled dividend: int(0.02 * UNIT)
pub const SCHEDULED_DIVIDEND_FEE: u64 = 2_000_000;

/// Fee per distinct recipient of an immediate dividend: int(0.0002 * UNIT)
pub const PER_HOLDER_FEE: u64 = 20_000;

/// Message type identifier prefixed to composed dividend data
pub const MESSAGE_TYPE_ID: u32 = 50;

/// Ledger action labels
pub const ACTION_DIVIDEND: &str = "dividend";
pub const ACTION_PENDING_DIVIDEND: &str = "pending dividend";
pub const ACTION_DIVIDEND_FEE: &str = "dividend fee";

pub mod activation_repository;
pub mod asset_repository;
pub mod balance_repository;
pub mod dividend_repository;

pub use activation_repository::ActivationRepository;
pub use asset_repository::AssetRepository;
pub use balance_repository::{BalanceRepository, Movement};
pub use dividend_repository::DividendRepository;

pub mod errors;
pub mod ledger;
pub mod models;
pub mod protocol;
pub mod services;

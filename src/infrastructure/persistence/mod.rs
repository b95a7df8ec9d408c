pub mod connection;
pub mod entities;
pub mod error;
pub mod repositories;
pub mod sql_ledger;

pub use connection::DbPool;
pub use error::DbError;
pub use sql_ledger::SqlLedger;

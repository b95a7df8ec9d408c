use std::error::Error;
use std::fmt;

/// Error type for database operations
#[derive(Debug)]
pub enum DbError {
    /// Error from SeaORM
    SeaOrmError(sea_orm::DbErr),
    /// Connection error
    ConnectionError(String),
    /// Query error
    QueryError(String),
    /// A stored value does not fit the domain type, or the reverse
    OutOfRange(String),
}

impl fmt::Display for DbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbError::SeaOrmError(e) => write!(f, "Database error: {}", e),
            DbError::ConnectionError(msg) => write!(f, "Connection error: {}", msg),
            DbError::QueryError(msg) => write!(f, "Query error: {}", msg),
            DbError::OutOfRange(msg) => write!(f, "Value out of range: {}", msg),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            DbError::SeaOrmError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<sea_orm::DbErr> for DbError {
    fn from(err: sea_orm::DbErr) -> Self {
        DbError::SeaOrmError(err)
    }
}

/// Convert a domain quantity or height to a BIGINT column value
pub fn to_column(value: u64, what: &str) -> Result<i64, DbError> {
    i64::try_from(value).map_err(|_| DbError::OutOfRange(format!("{} {}", what, value)))
}

/// Convert a BIGINT column value back to a domain quantity or height
pub fn from_column(value: i64, what: &str) -> Result<u64, DbError> {
    u64::try_from(value).map_err(|_| DbError::OutOfRange(format!("{} {}", what, value)))
}

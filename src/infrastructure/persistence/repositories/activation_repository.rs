use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};

use crate::domain::models::ActivationRecord;
use crate::infrastructure::persistence::entities::dividend_activations;
use crate::infrastructure::persistence::error::{to_column, DbError};

/// Repository for completed scheduled dividends
pub struct ActivationRepository<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> ActivationRepository<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    pub async fn save(&self, activation: &ActivationRecord) -> Result<(), DbError> {
        let model = dividend_activations::ActiveModel {
            dividend_index: Set(to_column(activation.dividend_index, "dividend_index")?),
            dividend_hash: Set(activation.dividend_hash.clone()),
            source: Set(activation.source.clone()),
            block_index: Set(to_column(activation.block_index, "block_index")?),
        };

        model.insert(self.conn).await?;
        Ok(())
    }
}

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::models::Holder;
use crate::infrastructure::persistence::entities::{balances, credits, debits, escrows};
use crate::infrastructure::persistence::error::{from_column, to_column, DbError};

/// Which journal a balance movement is written to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Credit,
    Debit,
}

/// Repository for balances, escrowed balances and the credit/debit journals
pub struct BalanceRepository<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> BalanceRepository<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Holder snapshot: positive balances in row order, then escrowed balances
    pub async fn holders(&self, asset: &str) -> Result<Vec<Holder>, DbError> {
        let held = balances::Entity::find()
            .filter(balances::Column::Asset.eq(asset))
            .filter(balances::Column::Quantity.gt(0i64))
            .order_by_asc(balances::Column::Id)
            .all(self.conn)
            .await?;

        let escrowed = escrows::Entity::find()
            .filter(escrows::Column::Asset.eq(asset))
            .filter(escrows::Column::Quantity.gt(0i64))
            .order_by_asc(escrows::Column::Id)
            .all(self.conn)
            .await?;

        let mut holders = Vec::with_capacity(held.len() + escrowed.len());
        for model in held {
            holders.push(Holder::new(model.address, from_column(model.quantity, "quantity")?));
        }
        for model in escrowed {
            holders.push(Holder::escrowed(
                model.address,
                from_column(model.quantity, "quantity")?,
            ));
        }
        Ok(holders)
    }

    pub async fn get_balance(&self, address: &str, asset: &str) -> Result<Option<u64>, DbError> {
        let result = self.find(address, asset).await?;
        result
            .map(|model| from_column(model.quantity, "quantity"))
            .transpose()
    }

    /// Set a balance, creating the row on first use
    pub async fn set_balance(&self, address: &str, asset: &str, quantity: u64) -> Result<(), DbError> {
        let quantity = to_column(quantity, "quantity")?;

        match self.find(address, asset).await? {
            Some(existing) => {
                let mut model: balances::ActiveModel = existing.into();
                model.quantity = Set(quantity);
                model.update(self.conn).await?;
            }
            None => {
                let model = balances::ActiveModel {
                    address: Set(address.to_string()),
                    asset: Set(asset.to_string()),
                    quantity: Set(quantity),
                    ..Default::default()
                };
                model.insert(self.conn).await?;
            }
        }
        Ok(())
    }

    /// Append a journal entry for a balance movement
    pub async fn record(
        &self,
        movement: Movement,
        address: &str,
        asset: &str,
        quantity: u64,
        action: &str,
        event: &str,
    ) -> Result<(), DbError> {
        let quantity = to_column(quantity, "quantity")?;

        match movement {
            Movement::Credit => {
                let model = credits::ActiveModel {
                    address: Set(address.to_string()),
                    asset: Set(asset.to_string()),
                    quantity: Set(quantity),
                    action: Set(action.to_string()),
                    event: Set(event.to_string()),
                    ..Default::default()
                };
                model.insert(self.conn).await?;
            }
            Movement::Debit => {
                let model = debits::ActiveModel {
                    address: Set(address.to_string()),
                    asset: Set(asset.to_string()),
                    quantity: Set(quantity),
                    action: Set(action.to_string()),
                    event: Set(event.to_string()),
                    ..Default::default()
                };
                model.insert(self.conn).await?;
            }
        }
        Ok(())
    }

    async fn find(&self, address: &str, asset: &str) -> Result<Option<balances::Model>, DbError> {
        Ok(balances::Entity::find()
            .filter(balances::Column::Address.eq(address))
            .filter(balances::Column::Asset.eq(asset))
            .one(self.conn)
            .await?)
    }
}

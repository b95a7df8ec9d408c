use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::models::{DividendRecord, DividendStatus};
use crate::infrastructure::persistence::entities::dividends;
use crate::infrastructure::persistence::error::{from_column, to_column, DbError};

/// Repository for dividend records
///
/// Borrows any connection so the block pipeline can run it inside a transaction.
pub struct DividendRepository<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> DividendRepository<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Get a dividend by its transaction hash
    pub async fn get_by_hash(&self, tx_hash: &str) -> Result<Option<DividendRecord>, DbError> {
        let result = dividends::Entity::find()
            .filter(dividends::Column::TxHash.eq(tx_hash))
            .one(self.conn)
            .await?;

        result.map(to_domain_model).transpose()
    }

    /// Save a new dividend record
    pub async fn save(&self, record: &DividendRecord) -> Result<(), DbError> {
        let row = to_model(record)?;
        let model = dividends::ActiveModel {
            tx_index: Set(row.tx_index),
            tx_hash: Set(row.tx_hash),
            block_index: Set(row.block_index),
            source: Set(row.source),
            asset: Set(row.asset),
            dividend_asset: Set(row.dividend_asset),
            quantity_per_unit: Set(row.quantity_per_unit),
            fee_paid: Set(row.fee_paid),
            status: Set(row.status),
            activation: Set(row.activation),
            activate_index: Set(row.activate_index),
        };

        model.insert(self.conn).await?;
        Ok(())
    }

    /// Pending dividends payable at `block_index`, oldest message first
    pub async fn find_due(&self, block_index: u64) -> Result<Vec<DividendRecord>, DbError> {
        let results = dividends::Entity::find()
            .filter(dividends::Column::Status.eq(DividendStatus::Pending.to_string()))
            .filter(dividends::Column::ActivateIndex.lte(to_column(block_index, "block_index")?))
            .order_by_asc(dividends::Column::TxIndex)
            .all(self.conn)
            .await?;

        results.into_iter().map(to_domain_model).collect()
    }

    /// Update the status of an existing dividend; returns false if none matched
    pub async fn update_status(
        &self,
        tx_hash: &str,
        status: &DividendStatus,
    ) -> Result<bool, DbError> {
        let result = dividends::Entity::update_many()
            .col_expr(
                dividends::Column::Status,
                sea_orm::sea_query::Expr::value(status.to_string()),
            )
            .filter(dividends::Column::TxHash.eq(tx_hash))
            .exec(self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }
}

/// Row for a record; fails if a value exceeds the BIGINT range
pub fn to_model(record: &DividendRecord) -> Result<dividends::Model, DbError> {
    Ok(dividends::Model {
        tx_index: to_column(record.tx_index, "tx_index")?,
        tx_hash: record.tx_hash.clone(),
        block_index: to_column(record.block_index, "block_index")?,
        source: record.source.clone(),
        asset: record.asset.clone(),
        dividend_asset: record.dividend_asset.clone(),
        quantity_per_unit: optional_column(record.quantity_per_unit, "quantity_per_unit")?,
        fee_paid: to_column(record.fee_paid, "fee_paid")?,
        status: record.status.to_string(),
        activation: optional_column(record.activation, "activation")?,
        activate_index: optional_column(record.activate_index, "activate_index")?,
    })
}

pub fn to_domain_model(model: dividends::Model) -> Result<DividendRecord, DbError> {
    let status = DividendStatus::parse(&model.status)
        .map_err(|e| DbError::QueryError(format!("dividend {}: {}", model.tx_hash, e)))?;

    Ok(DividendRecord {
        tx_index: from_column(model.tx_index, "tx_index")?,
        block_index: from_column(model.block_index, "block_index")?,
        quantity_per_unit: model
            .quantity_per_unit
            .map(|q| from_column(q, "quantity_per_unit"))
            .transpose()?,
        fee_paid: from_column(model.fee_paid, "fee_paid")?,
        activation: model
            .activation
            .map(|a| from_column(a, "activation"))
            .transpose()?,
        activate_index: model
            .activate_index
            .map(|a| from_column(a, "activate_index"))
            .transpose()?,
        tx_hash: model.tx_hash,
        source: model.source,
        asset: model.asset,
        dividend_asset: model.dividend_asset,
        status,
    })
}

fn optional_column(value: Option<u64>, what: &str) -> Result<Option<i64>, DbError> {
    value.map(|v| to_column(v, what)).transpose()
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::*;
    use crate::domain::models::Problem;
    use crate::domain::protocol::constants::MAX_INT;

    fn record(tx_index: u64, status: DividendStatus) -> DividendRecord {
        DividendRecord {
            tx_index,
            tx_hash: format!("{:064x}", tx_index),
            block_index: 1_000,
            source: "1Source".to_string(),
            asset: Some("GOLD".to_string()),
            dividend_asset: Some("XCP".to_string()),
            quantity_per_unit: Some(1_000_000),
            fee_paid: 0,
            status,
            activation: None,
            activate_index: None,
        }
    }

    fn stored_shapes() -> Vec<DividendRecord> {
        let unpack_failed = DividendRecord {
            asset: None,
            dividend_asset: None,
            quantity_per_unit: None,
            ..record(1, DividendStatus::could_not_unpack())
        };
        let pending = DividendRecord {
            fee_paid: 2_000_000,
            activation: Some(200),
            activate_index: Some(1_200),
            ..record(2, DividendStatus::Pending)
        };
        let clamped = DividendRecord {
            quantity_per_unit: Some(MAX_INT),
            activation: Some(MAX_INT),
            ..record(
                3,
                DividendStatus::from_problems(&[Problem::ActivationOverflow {
                    delta: i64::MAX,
                    maximum: 52_560,
                }]),
            )
        };
        let paid = DividendRecord {
            fee_paid: 40_000,
            ..record(4, DividendStatus::Valid)
        };
        vec![unpack_failed, pending, clamped, paid]
    }

    #[test]
    fn test_records_round_trip_through_columns() {
        for record in stored_shapes() {
            let model = to_model(&record).unwrap();
            assert_eq!(to_domain_model(model).unwrap(), record);
        }
    }

    #[test]
    fn test_unclamped_delta_does_not_fit_a_column() {
        let record = DividendRecord {
            activation: Some(u64::MAX),
            ..record(5, DividendStatus::could_not_unpack())
        };
        assert!(matches!(to_model(&record), Err(DbError::OutOfRange(_))));
    }

    #[test]
    fn test_unknown_stored_status_is_rejected() {
        let mut model = to_model(&record(6, DividendStatus::Valid)).unwrap();
        model.status = "settled".to_string();
        assert!(matches!(to_domain_model(model), Err(DbError::QueryError(_))));
    }

    #[tokio::test]
    async fn test_find_due_orders_by_tx_index() {
        let due: Vec<dividends::Model> = stored_shapes()
            .iter()
            .filter(|r| r.status == DividendStatus::Pending)
            .map(|r| to_model(r).unwrap())
            .collect();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([due])
            .into_connection();

        let found = DividendRepository::new(&db).find_due(1_200).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].activate_index, Some(1_200));

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains(r#"ORDER BY \"dividends\".\"tx_index\" ASC"#), "{}", log);
        assert!(log.contains(r#"\"dividends\".\"activate_index\" <= $"#), "{}", log);
    }

    #[tokio::test]
    async fn test_get_by_hash_converts_stored_row() {
        let shapes = stored_shapes();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![to_model(&shapes[2]).unwrap()]])
            .into_connection();

        let found = DividendRepository::new(&db)
            .get_by_hash(&shapes[2].tx_hash)
            .await
            .unwrap();
        assert_eq!(found, Some(shapes[2].clone()));
    }
}

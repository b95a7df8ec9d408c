use serde::Serialize;

use crate::domain::errors::{ComposeError, LedgerError};
use crate::domain::ledger::LedgerQuery;
use crate::domain::models::Problem;
use crate::domain::protocol::constants::{BTC, MESSAGE_TYPE_ID, UNIT};
use crate::domain::protocol::ProtocolParams;
use crate::domain::services::ledger_applier::narrow;
use crate::domain::services::validator::{ConsensusValidator, DividendRequest};
use crate::domain::services::wire_codec::WireCodec;
use crate::utils::logging;

/// Parameters of a dividend to be composed
#[derive(Debug, Clone)]
pub struct ComposeRequest {
    pub source: String,
    pub quantity_per_unit: u64,
    /// Asset name or sub-asset long name
    pub asset: String,
    pub dividend_asset: String,
    pub activation: Option<i64>,
    /// Height the dividend is validated against
    pub block_index: u64,
}

/// Transaction contents for a dividend
///
/// BTC dividends carry no data; the holders are paid directly by outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComposedDividend {
    pub source: String,
    pub outputs: Vec<(String, u64)>,
    #[serde(serialize_with = "serialize_hex")]
    pub data: Option<Vec<u8>>,
}

fn serialize_hex<S: serde::Serializer>(data: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
    match data {
        Some(bytes) => serializer.serialize_some(&hex::encode(bytes)),
        None => serializer.serialize_none(),
    }
}

pub struct DividendComposer<'a, Q: LedgerQuery + ?Sized> {
    ledger: &'a Q,
    params: &'a ProtocolParams,
}

impl<'a, Q: LedgerQuery + ?Sized> DividendComposer<'a, Q> {
    pub fn new(ledger: &'a Q, params: &'a ProtocolParams) -> Self {
        Self { ledger, params }
    }

    pub async fn compose(&self, request: &ComposeRequest) -> Result<ComposedDividend, ComposeError> {
        let asset = self.ledger.resolve_subasset_name(&request.asset).await?;
        let dividend_asset = self
            .ledger
            .resolve_subasset_name(&request.dividend_asset)
            .await?;

        let outcome = ConsensusValidator::new(self.ledger, self.params)
            .validate(&DividendRequest {
                source: &request.source,
                quantity_per_unit: request.quantity_per_unit,
                asset: &asset,
                dividend_asset: &dividend_asset,
                block_index: request.block_index,
                activation: request.activation,
            })
            .await?;
        if !outcome.is_valid() {
            return Err(ComposeError::Invalid(outcome.problems));
        }

        logging::log_info(&format!(
            "Total quantity to be distributed in dividends: {} {}",
            format_quantity(outcome.plan.total, outcome.dividend_divisible.unwrap_or(true)),
            dividend_asset
        ));

        if dividend_asset == BTC {
            let outputs = outcome
                .plan
                .outputs
                .iter()
                .map(|output| Ok((output.address.clone(), narrow(output.dividend_quantity)?)))
                .collect::<Result<Vec<_>, LedgerError>>()?;
            return Ok(ComposedDividend {
                source: request.source.clone(),
                outputs,
                data: None,
            });
        }

        let activation = match request.activation {
            Some(delta) => Some(
                u64::try_from(delta)
                    .map_err(|_| ComposeError::Invalid(vec![Problem::NegativeActivation { delta }]))?,
            ),
            None => None,
        };
        let asset_id = self
            .ledger
            .asset_id_for_name(&asset, request.block_index)
            .await?;
        let dividend_asset_id = self
            .ledger
            .asset_id_for_name(&dividend_asset, request.block_index)
            .await?;

        let mut data = MESSAGE_TYPE_ID.to_be_bytes().to_vec();
        data.extend(WireCodec::pack(
            request.quantity_per_unit,
            asset_id,
            dividend_asset_id,
            activation,
        ));

        Ok(ComposedDividend {
            source: request.source.clone(),
            outputs: Vec::new(),
            data: Some(data),
        })
    }
}

/// Strip the message type prefix from composed data
pub fn message_payload(data: &[u8]) -> Option<&[u8]> {
    data.strip_prefix(MESSAGE_TYPE_ID.to_be_bytes().as_slice())
}

/// Quantity in display units
pub fn format_quantity(quantity: u128, divisible: bool) -> String {
    if divisible {
        let unit = u128::from(UNIT);
        format!("{}.{:08}", quantity / unit, quantity % unit)
    } else {
        quantity.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(1_250_000_000, true), "12.50000000");
        assert_eq!(format_quantity(7, true), "0.00000007");
        assert_eq!(format_quantity(7, false), "7");
    }

    #[test]
    fn test_message_payload_requires_prefix() {
        let mut data = MESSAGE_TYPE_ID.to_be_bytes().to_vec();
        data.extend([1, 2, 3]);
        assert_eq!(message_payload(&data), Some(&[1u8, 2, 3][..]));
        assert_eq!(message_payload(&[0, 0, 0, 20, 1]), None);
    }
}

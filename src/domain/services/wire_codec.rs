//! Binary layouts of the dividend message.
//!
//! | Layout    | Bytes | Fields (big-endian u64)                              |
//! |-----------|-------|------------------------------------------------------|
//! | Legacy    | 16    | quantity_per_unit, asset_id                          |
//! | Current   | 24    | quantity_per_unit, asset_id, dividend_asset_id       |
//! | Scheduled | 32    | as Current + activation delta                        |

use thiserror::Error;

use crate::domain::protocol::{ProtocolParams, ProtocolRule};

pub const LENGTH_LEGACY: usize = 16;
pub const LENGTH_CURRENT: usize = 24;
pub const LENGTH_SCHEDULED: usize = 32;

const FIELD_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Legacy,
    Current,
    Scheduled,
}

/// Dividend message fields before asset ids are resolved to names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DividendMessage {
    pub quantity_per_unit: u64,
    pub asset_id: u64,
    /// Absent in the legacy layout, where the fee asset is implied
    pub dividend_asset_id: Option<u64>,
    pub activation: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("no dividend layout of {length} bytes at block {block_index}")]
    UnsupportedLayout { length: usize, block_index: u64 },
}

pub struct WireCodec;

impl WireCodec {
    /// Layout a message of `length` bytes is read with at `block_index`
    pub fn layout_for(length: usize, block_index: u64, params: &ProtocolParams) -> Option<Layout> {
        let current = params.is_active(ProtocolRule::CurrentWireLayout, block_index);
        let scheduled = params.is_active(ProtocolRule::ScheduledDividends, block_index);

        match length {
            LENGTH_CURRENT if current => Some(Layout::Current),
            LENGTH_SCHEDULED if current && scheduled => Some(Layout::Scheduled),
            LENGTH_LEGACY => Some(Layout::Legacy),
            _ => None,
        }
    }

    pub fn unpack(
        message: &[u8],
        block_index: u64,
        params: &ProtocolParams,
    ) -> Result<DividendMessage, CodecError> {
        let layout = Self::layout_for(message.len(), block_index, params).ok_or(
            CodecError::UnsupportedLayout {
                length: message.len(),
                block_index,
            },
        )?;

        let fields = read_fields(message);
        let decoded = match layout {
            Layout::Legacy => DividendMessage {
                quantity_per_unit: fields[0],
                asset_id: fields[1],
                dividend_asset_id: None,
                activation: None,
            },
            Layout::Current => DividendMessage {
                quantity_per_unit: fields[0],
                asset_id: fields[1],
                dividend_asset_id: Some(fields[2]),
                activation: None,
            },
            Layout::Scheduled => DividendMessage {
                quantity_per_unit: fields[0],
                asset_id: fields[1],
                dividend_asset_id: Some(fields[2]),
                activation: Some(fields[3]),
            },
        };

        Ok(decoded)
    }

    /// Encode in the current layout, appending the activation delta when scheduled
    pub fn pack(
        quantity_per_unit: u64,
        asset_id: u64,
        dividend_asset_id: u64,
        activation: Option<u64>,
    ) -> Vec<u8> {
        let mut data = Vec::with_capacity(LENGTH_SCHEDULED);
        data.extend_from_slice(&quantity_per_unit.to_be_bytes());
        data.extend_from_slice(&asset_id.to_be_bytes());
        data.extend_from_slice(&dividend_asset_id.to_be_bytes());
        if let Some(activation) = activation {
            data.extend_from_slice(&activation.to_be_bytes());
        }
        data
    }
}

/// Split a layout-checked message into big-endian u64 fields
fn read_fields(message: &[u8]) -> Vec<u64> {
    message
        .chunks_exact(FIELD_SIZE)
        .map(|chunk| {
            let mut field = [0u8; FIELD_SIZE];
            field.copy_from_slice(chunk);
            u64::from_be_bytes(field)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy(quantity_per_unit: u64, asset_id: u64) -> Vec<u8> {
        let mut data = quantity_per_unit.to_be_bytes().to_vec();
        data.extend_from_slice(&asset_id.to_be_bytes());
        data
    }

    #[test]
    fn test_legacy_layout_at_any_height() {
        let params = ProtocolParams::mainnet();
        let message = legacy(5, 0x1_0000);

        for height in [100_000, 288_150, 400_000] {
            let decoded = WireCodec::unpack(&message, height, &params).unwrap();
            assert_eq!(decoded.quantity_per_unit, 5);
            assert_eq!(decoded.asset_id, 0x1_0000);
            assert_eq!(decoded.dividend_asset_id, None);
            assert_eq!(decoded.activation, None);
        }
    }

    #[test]
    fn test_current_layout_height_gate() {
        let params = ProtocolParams::mainnet();
        let message = WireCodec::pack(7, 26, 1, None);
        assert_eq!(message.len(), LENGTH_CURRENT);

        assert_eq!(
            WireCodec::unpack(&message, 288_150, &params),
            Err(CodecError::UnsupportedLayout {
                length: 24,
                block_index: 288_150
            })
        );

        let decoded = WireCodec::unpack(&message, 288_151, &params).unwrap();
        assert_eq!(decoded.dividend_asset_id, Some(1));

        // test networks accept it from genesis
        assert!(WireCodec::unpack(&message, 1, &ProtocolParams::testnet()).is_ok());
    }

    #[test]
    fn test_scheduled_layout_requires_feature() {
        let message = WireCodec::pack(7, 26, 1, Some(200));
        assert_eq!(message.len(), LENGTH_SCHEDULED);

        assert!(WireCodec::unpack(&message, 400_000, &ProtocolParams::mainnet()).is_err());

        let decoded = WireCodec::unpack(&message, 400_000, &ProtocolParams::testnet()).unwrap();
        assert_eq!(decoded.activation, Some(200));
    }

    #[test]
    fn test_unpack_is_total_over_lengths() {
        let params = ProtocolParams::testnet();
        for length in 0..=40 {
            let message = vec![0xff; length];
            let result = WireCodec::unpack(&message, 500_000, &params);
            let expected = matches!(length, 16 | 24 | 32);
            assert_eq!(result.is_ok(), expected, "length {}", length);
        }
    }

    #[test]
    fn test_fields_are_big_endian() {
        let message = hex::decode("00000000000000640000000000000abc0000000000000001").unwrap();
        let decoded = WireCodec::unpack(&message, 300_000, &ProtocolParams::mainnet()).unwrap();
        assert_eq!(decoded.quantity_per_unit, 100);
        assert_eq!(decoded.asset_id, 0xabc);
        assert_eq!(decoded.dividend_asset_id, Some(1));
    }
}

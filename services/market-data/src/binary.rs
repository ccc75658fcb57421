//! Binary depth snapshot codec
//!
//! Byte-exact interchange format, big-endian throughout:
//!
//! ```text
//! [magic: u32 = 'LOB1']
//! [version: u16 = 1]
//! [symbol_len: u8][reserved: u8 = 0]
//! [num_bids: u32][num_asks: u32]
//! [timestamp: u64][sequence_number: u64]
//! [symbol: symbol_len bytes]
//! [num_bids × { price: i64, quantity: u64 }]
//! [num_asks × { price: i64, quantity: u64 }]
//! [checksum: u32]  // CRC32C over all preceding bytes
//! ```
//!
//! Per-level order counts are not carried; decoded levels report zero.

use crc32c::crc32c;
use thiserror::Error;
use types::numeric::Price;

use crate::snapshot::{DepthSnapshot, PriceLevel};

/// 'LOB1' in ASCII.
const MAGIC: u32 = 0x4C4F_4231;
const VERSION: u16 = 1;
const HEADER_LEN: usize = 32;
const LEVEL_LEN: usize = 16;
const CHECKSUM_LEN: usize = 4;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("input too short: need {needed} bytes, have {have}")]
    TooShort { needed: usize, have: usize },

    #[error("bad magic: 0x{found:08X}")]
    BadMagic { found: u32 },

    #[error("unsupported version: {found}")]
    UnsupportedVersion { found: u16 },

    #[error("truncated payload: need {needed} bytes, have {have}")]
    Truncated { needed: usize, have: usize },

    #[error("checksum mismatch: computed 0x{computed:08X}, stored 0x{stored:08X}")]
    ChecksumMismatch { computed: u32, stored: u32 },
}

/// Serialize a depth snapshot to the binary wire format.
///
/// The symbol is truncated to 255 bytes if longer.
pub fn to_binary(snapshot: &DepthSnapshot) -> Vec<u8> {
    let symbol = snapshot.symbol.as_bytes();
    let symbol_len = symbol.len().min(u8::MAX as usize);
    let total = HEADER_LEN
        + symbol_len
        + (snapshot.bids.len() + snapshot.asks.len()) * LEVEL_LEN
        + CHECKSUM_LEN;

    let mut buf = Vec::with_capacity(total);
    buf.extend_from_slice(&MAGIC.to_be_bytes());
    buf.extend_from_slice(&VERSION.to_be_bytes());
    buf.push(symbol_len as u8);
    buf.push(0); // reserved
    buf.extend_from_slice(&(snapshot.bids.len() as u32).to_be_bytes());
    buf.extend_from_slice(&(snapshot.asks.len() as u32).to_be_bytes());
    buf.extend_from_slice(&snapshot.timestamp.to_be_bytes());
    buf.extend_from_slice(&snapshot.sequence_number.to_be_bytes());
    buf.extend_from_slice(&symbol[..symbol_len]);

    for level in snapshot.bids.iter().chain(snapshot.asks.iter()) {
        buf.extend_from_slice(&level.price.ticks().to_be_bytes());
        buf.extend_from_slice(&level.quantity.to_be_bytes());
    }

    let checksum = crc32c(&buf);
    buf.extend_from_slice(&checksum.to_be_bytes());
    buf
}

/// Deserialize a depth snapshot from the binary wire format.
pub fn from_binary(data: &[u8]) -> Result<DepthSnapshot, CodecError> {
    if data.len() < HEADER_LEN + CHECKSUM_LEN {
        return Err(CodecError::TooShort {
            needed: HEADER_LEN + CHECKSUM_LEN,
            have: data.len(),
        });
    }

    let magic = read_u32(data, 0);
    if magic != MAGIC {
        return Err(CodecError::BadMagic { found: magic });
    }

    let version = u16::from_be_bytes([data[4], data[5]]);
    if version != VERSION {
        return Err(CodecError::UnsupportedVersion { found: version });
    }

    let symbol_len = data[6] as usize;
    let num_bids = read_u32(data, 8) as usize;
    let num_asks = read_u32(data, 12) as usize;
    let timestamp = read_u64(data, 16);
    let sequence_number = read_u64(data, 24);

    let payload_len = HEADER_LEN + symbol_len + (num_bids + num_asks) * LEVEL_LEN;
    let total_len = payload_len + CHECKSUM_LEN;
    if data.len() < total_len {
        return Err(CodecError::Truncated {
            needed: total_len,
            have: data.len(),
        });
    }

    let stored = read_u32(data, payload_len);
    let computed = crc32c(&data[..payload_len]);
    if stored != computed {
        return Err(CodecError::ChecksumMismatch { computed, stored });
    }

    let symbol = String::from_utf8_lossy(&data[HEADER_LEN..HEADER_LEN + symbol_len]).into_owned();

    let mut offset = HEADER_LEN + symbol_len;
    let mut read_levels = |count: usize| -> Vec<PriceLevel> {
        let mut levels = Vec::with_capacity(count);
        for _ in 0..count {
            let price = i64::from_be_bytes(data[offset..offset + 8].try_into().expect("level slice"));
            let quantity = read_u64(data, offset + 8);
            levels.push(PriceLevel {
                price: Price::new(price),
                quantity,
                order_count: 0,
            });
            offset += LEVEL_LEN;
        }
        levels
    };

    let bids = read_levels(num_bids);
    let asks = read_levels(num_asks);

    Ok(DepthSnapshot {
        symbol,
        bids,
        asks,
        timestamp,
        sequence_number,
    })
}

fn read_u32(data: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes(data[offset..offset + 4].try_into().expect("u32 slice"))
}

fn read_u64(data: &[u8], offset: usize) -> u64 {
    u64::from_be_bytes(data[offset..offset + 8].try_into().expect("u64 slice"))
}

use crate::error::{Error, Result};
use crate::types::Value;

use super::BLOCK_CAPACITY;

const CRC_SIZE: usize = 4;
const COUNT_SIZE: usize = 4;
const VALUE_SIZE: usize = 8;
pub const HEADER_SIZE: usize = CRC_SIZE + COUNT_SIZE;

/// A block of values inside a run file.
///
/// On-disk format:
/// ```text
/// ┌──────────┬────────────┬───────────────────────────┐
/// │ CRC (4B) │ Count (4B) │ Count × value (8B each)   │
/// └──────────┴────────────┴───────────────────────────┘
/// ```
///
/// CRC covers everything after the CRC field itself. A block that fails
/// the check is reported as corruption; unlike log replay there is no
/// "valid prefix" to fall back on, since dropping values would break the
/// merge's exactly-once output.
///
/// `BlockHeader` is the first 8 bytes, read before the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    pub crc: u32,
    pub count: u32,
}

impl BlockHeader {
    pub fn decode(data: &[u8; HEADER_SIZE]) -> Result<Self> {
        let crc = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
        let count = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);

        if count == 0 || count as usize > BLOCK_CAPACITY {
            return Err(Error::Corruption(format!("invalid block count: {count}")));
        }

        Ok(BlockHeader { crc, count })
    }

    /// Bytes of payload that follow this header.
    pub fn payload_len(&self) -> usize {
        self.count as usize * VALUE_SIZE
    }

    /// Check the payload against the stored CRC and decode its values.
    pub fn decode_payload(&self, payload: &[u8]) -> Result<Vec<Value>> {
        if payload.len() != self.payload_len() {
            return Err(Error::Corruption("block payload truncated".into()));
        }

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&self.count.to_le_bytes());
        hasher.update(payload);
        if hasher.finalize() != self.crc {
            return Err(Error::Corruption("CRC mismatch".into()));
        }

        let values = payload
            .chunks_exact(VALUE_SIZE)
            .map(|chunk| {
                let mut bytes = [0u8; VALUE_SIZE];
                bytes.copy_from_slice(chunk);
                Value::from_le_bytes(bytes)
            })
            .collect();
        Ok(values)
    }
}

/// Serialize one block (including CRC header).
pub fn encode_block(values: &[Value]) -> Vec<u8> {
    debug_assert!(!values.is_empty() && values.len() <= BLOCK_CAPACITY);

    let mut buf = Vec::with_capacity(HEADER_SIZE + values.len() * VALUE_SIZE);

    // Reserve space for CRC (filled at the end)
    buf.extend_from_slice(&[0u8; CRC_SIZE]);
    buf.extend_from_slice(&(values.len() as u32).to_le_bytes());
    for value in values {
        buf.extend_from_slice(&value.to_le_bytes());
    }

    let crc = crc32fast::hash(&buf[CRC_SIZE..]);
    buf[0..CRC_SIZE].copy_from_slice(&crc.to_le_bytes());

    buf
}

//! Canonical Huffman tables rebuilt for every ADT block.
//!
//! Codes are numbered canonically from the per-length counts, then inserted
//! into a flat node arena. A child reference below the table length is a
//! leaf symbol; anything at or above it names another node, and the root
//! is node `table_len`.

use crate::bits::ByteBitReader;
use crate::error::{Codec, Corruption, DecodeError};

/// Longest length that takes part in the frequency count.
pub const MAX_COUNTED_LENGTH: u32 = 16;
/// Lengths of 17 still receive codes but are left out of the counts.
pub const EXCLUDED_LENGTH: u32 = 17;

const UNASSIGNED: u16 = u16::MAX;

/// Assign each symbol the next free code of its declared length.
///
/// Starting codes are kept as 16-bit values and wrap the same way the
/// asset tooling does, so malformed tables still number identically.
pub fn canonical_codes(lengths: &[u32]) -> Result<Vec<u16>, Corruption> {
    let mut freq = [0u16; MAX_COUNTED_LENGTH as usize + 1];
    for (symbol, &length) in lengths.iter().enumerate() {
        if length > EXCLUDED_LENGTH {
            return Err(Corruption::CodeLengthOutOfRange { symbol, length });
        }
        if length <= MAX_COUNTED_LENGTH {
            freq[length as usize] += 1;
        }
    }

    let mut next = [0u16; EXCLUDED_LENGTH as usize + 1];
    for length in 0..MAX_COUNTED_LENGTH as usize {
        next[length + 2] = next[length + 1].wrapping_add(freq[length + 1]) << 1;
    }

    let codes = lengths
        .iter()
        .map(|&length| {
            let slot = &mut next[length as usize];
            let code = *slot;
            *slot = slot.wrapping_add(1);
            code
        })
        .collect();
    Ok(codes)
}

/// Binary decode tree addressed by index.
#[derive(Debug, Clone)]
pub struct DecodeTree {
    table_len: usize,
    nodes: Vec<[u16; 2]>,
}

impl DecodeTree {
    pub fn build(lengths: &[u32]) -> Result<Self, Corruption> {
        let table_len = lengths.len();
        let codes = canonical_codes(lengths)?;
        let mut tree = DecodeTree {
            table_len,
            nodes: vec![[UNASSIGNED; 2]],
        };

        for (symbol, (&length, &code)) in lengths.iter().zip(&codes).enumerate() {
            tree.insert(symbol, code as u32, length)?;
        }
        Ok(tree)
    }

    fn insert(&mut self, symbol: usize, code: u32, length: u32) -> Result<(), Corruption> {
        let mut node = self.table_len;
        for depth in 0..length {
            let bit = ((code >> (length - depth - 1)) & 1) as usize;
            let child = self.nodes[node - self.table_len][bit];

            if depth + 1 == length {
                if child != UNASSIGNED {
                    return Err(Corruption::OverlappingCodes { symbol });
                }
                self.nodes[node - self.table_len][bit] = symbol as u16;
                break;
            }

            node = if child == UNASSIGNED {
                let next = self.table_len + self.nodes.len();
                self.nodes.push([UNASSIGNED; 2]);
                self.nodes[node - self.table_len][bit] = next as u16;
                next
            } else if (child as usize) < self.table_len {
                return Err(Corruption::OverlappingCodes { symbol });
            } else {
                child as usize
            };
        }
        Ok(())
    }

    #[inline]
    pub fn table_len(&self) -> usize {
        self.table_len
    }

    /// Node count including the root.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Walk from the root one bit at a time until a leaf is reached.
    pub fn decode(&self, reader: &mut ByteBitReader<'_>) -> Result<usize, DecodeError> {
        let mut node = self.table_len;
        loop {
            let bit = reader.read_bit() as usize;
            let child = self.nodes[node - self.table_len][bit];
            if child == UNASSIGNED {
                return Err(reader.fail(Codec::Adt, Corruption::UnassignedCode));
            }
            let child = child as usize;
            if child < self.table_len {
                return Ok(child);
            }
            node = child;
        }
    }
}

//! Bit cursors shared by the background codecs.
//!
//! Both readers hand out zero bits once the input is exhausted instead of
//! failing, so decoding keeps the legacy behaviour on short assets. Each
//! reader remembers whether that happened so callers can surface the
//! truncation at their API boundary.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Codec, Corruption, DecodeError};

/// MSB-first reader over single bytes, used by the ADT stream.
#[derive(Debug, Clone)]
pub struct ByteBitReader<'a> {
    data: &'a [u8],
    offset: usize,
    current: u8,
    remaining: u32,
    padded_bytes: usize,
}

impl<'a> ByteBitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            offset: 0,
            current: 0,
            remaining: 0,
            padded_bytes: 0,
        }
    }

    fn refill(&mut self) {
        if let Some(&byte) = self.data.get(self.offset) {
            self.current = byte;
            self.offset += 1;
        } else {
            self.current = 0;
            self.padded_bytes += 1;
        }
        self.remaining = 8;
    }

    pub fn read_bit(&mut self) -> u32 {
        if self.remaining == 0 {
            self.refill();
        }
        self.remaining -= 1;
        ((self.current >> self.remaining) & 1) as u32
    }

    /// Compose `count` bits (at most 32), most significant first.
    pub fn read_bits(&mut self, count: u32) -> u32 {
        debug_assert!(count <= 32);
        let mut value = 0u32;
        for _ in 0..count {
            value = (value << 1) | self.read_bit();
        }
        value
    }

    /// Number of real input bytes pulled into the cursor so far.
    #[cfg(test)]
    fn bytes_read(&self) -> usize {
        self.offset
    }

    /// True once at least one zero byte has been synthesised past the input.
    pub fn is_truncated(&self) -> bool {
        self.padded_bytes > 0
    }

    pub(crate) fn truncated(&self, codec: Codec) -> DecodeError {
        DecodeError::TruncatedInput {
            codec,
            len: self.data.len(),
        }
    }

    /// Report a corrupt condition, attributing it to truncation when the
    /// reader is already running on padding.
    pub(crate) fn fail(&self, codec: Codec, reason: Corruption) -> DecodeError {
        if self.is_truncated() {
            self.truncated(codec)
        } else {
            DecodeError::corrupt(codec, reason)
        }
    }
}

/// MSB-first reader over little-endian 16-bit words, used by MDEC frames.
#[derive(Debug, Clone)]
pub struct WordBitReader<'a> {
    data: &'a [u8],
    offset: usize,
    value: u16,
    remaining: u32,
    words_read: usize,
    padded_words: usize,
}

impl<'a> WordBitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            offset: 0,
            value: 0,
            remaining: 0,
            words_read: 0,
            padded_words: 0,
        }
    }

    fn refill(&mut self) {
        self.value = match self.data.get(self.offset..self.offset + 2) {
            Some(word) => LittleEndian::read_u16(word),
            None => {
                self.padded_words += 1;
                // An odd trailing byte still supplies the low half of the word.
                self.data.get(self.offset).copied().unwrap_or(0) as u16
            }
        };
        self.offset += 2;
        self.words_read += 1;
        self.remaining = 16;
    }

    pub fn read_bit(&mut self) -> u32 {
        if self.remaining == 0 {
            self.refill();
        }
        self.remaining -= 1;
        ((self.value >> self.remaining) & 1) as u32
    }

    pub fn read_bits(&mut self, count: u32) -> u32 {
        debug_assert!(count <= 32);
        let mut value = 0u32;
        for _ in 0..count {
            value = (value << 1) | self.read_bit();
        }
        value
    }

    /// Read `count` bits without advancing the cursor.
    pub fn peek_bits(&self, count: u32) -> u32 {
        self.clone().read_bits(count)
    }

    /// Asymmetric signed read used by the DC differences: a leading 1 selects
    /// the positive range `[2^(n-1), 2^n)`, a leading 0 the negative range
    /// `[-(2^n - 1), -2^(n-1)]`. This is not two's complement.
    pub fn read_signed(&mut self, count: u32) -> i32 {
        debug_assert!((1..32).contains(&count));
        if self.read_bit() != 0 {
            self.read_bits(count - 1) as i32 + (1 << (count - 1))
        } else {
            self.read_bits(count - 1) as i32 - (1 << count) + 1
        }
    }

    pub fn skip(&mut self, count: u32) {
        for _ in 0..count {
            self.read_bit();
        }
    }

    /// Bytes consumed, counted in whole 16-bit words.
    pub fn bytes_consumed(&self) -> usize {
        self.words_read * 2
    }

    pub fn input_len(&self) -> usize {
        self.data.len()
    }

    pub fn is_truncated(&self) -> bool {
        self.padded_words > 0
    }

    pub(crate) fn truncated(&self, codec: Codec) -> DecodeError {
        DecodeError::TruncatedInput {
            codec,
            len: self.data.len(),
        }
    }

    pub(crate) fn fail(&self, codec: Codec, reason: Corruption) -> DecodeError {
        if self.is_truncated() {
            self.truncated(codec)
        } else {
            DecodeError::corrupt(codec, reason)
        }
    }
}

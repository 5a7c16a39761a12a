#![allow(dead_code)]

use re_formats::huffman::canonical_codes;

/// MSB-first bit packer over bytes, the ADT stream order.
#[derive(Default)]
pub struct ByteBitWriter {
    bytes: Vec<u8>,
    used: u32,
}

impl ByteBitWriter {
    pub fn bit(&mut self, bit: u32) {
        if self.used % 8 == 0 {
            self.bytes.push(0);
        }
        if bit != 0 {
            let last = self.bytes.len() - 1;
            self.bytes[last] |= 0x80 >> (self.used % 8);
        }
        self.used += 1;
    }

    pub fn bits(&mut self, value: u32, count: u32) {
        for shift in (0..count).rev() {
            self.bit((value >> shift) & 1);
        }
    }

    /// `z` zeros, then `value` in `z + 1` bits, where `value` has `z + 1`
    /// significant bits.
    pub fn bitfield(&mut self, value: u32) {
        let zeros = 31 - value.leading_zeros();
        self.bits(0, zeros);
        self.bits(value, zeros + 1);
    }

    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }
}

/// MSB-first bit packer over little-endian 16-bit words, the MDEC order.
#[derive(Default)]
pub struct WordBitWriter {
    words: Vec<u16>,
    current: u16,
    used: u32,
}

impl WordBitWriter {
    /// Append a pattern such as `"0010 110"`; whitespace is ignored.
    pub fn pattern(&mut self, pattern: &str) -> &mut Self {
        for ch in pattern.chars().filter(|c| !c.is_whitespace()) {
            self.push(ch == '1');
        }
        self
    }

    pub fn value(&mut self, value: u32, count: u32) -> &mut Self {
        for shift in (0..count).rev() {
            self.push((value >> shift) & 1 != 0);
        }
        self
    }

    fn push(&mut self, bit: bool) {
        self.current = (self.current << 1) | u16::from(bit);
        self.used += 1;
        if self.used == 16 {
            self.words.push(self.current);
            self.current = 0;
            self.used = 0;
        }
    }

    pub fn finish(&mut self) -> Vec<u8> {
        if self.used > 0 {
            self.words.push(self.current << (16 - self.used));
            self.current = 0;
            self.used = 0;
        }
        self.words.iter().flat_map(|word| word.to_le_bytes()).collect()
    }
}

pub enum Token {
    Literal(u8),
    /// Copy `length` bytes (3..=258). Class 0 repeats the previous byte;
    /// class `c > 0` reaches `extra + 2^(c-1)` bytes further back.
    Copy { length: usize, class: u32, extra: u32 },
}

const SYMBOL_TABLE_LEN: usize = 512;
const COPY_LENGTH_BIAS: usize = 0xFD;

/// Sixteen 4-bit codes, so symbol `n` is written as `n` in four bits.
fn write_flat_table(w: &mut ByteBitWriter) {
    w.bit(1);
    w.bitfield(4);
    for _ in 1..16 {
        w.bit(0);
    }
}

/// Encode ADT blocks that each use a complete 9-bit symbol table.
pub fn encode_adt(blocks: &[Vec<Token>]) -> Vec<u8> {
    let codes = canonical_codes(&[9; SYMBOL_TABLE_LEN]).expect("flat table");
    let mut w = ByteBitWriter::default();
    for tokens in blocks {
        w.bits(tokens.len() as u32 & 0xFF, 8);
        w.bits(tokens.len() as u32 >> 8, 8);
        write_flat_table(&mut w);
        w.bit(1);
        w.bitfield(1);
        w.bits(9, 4);
        w.bitfield(511);
        write_flat_table(&mut w);

        for token in tokens {
            match *token {
                Token::Literal(byte) => w.bits(codes[byte as usize] as u32, 9),
                Token::Copy {
                    length,
                    class,
                    extra,
                } => {
                    w.bits(codes[length + COPY_LENGTH_BIAS] as u32, 9);
                    w.bits(class, 4);
                    if class > 0 {
                        w.bits(extra, class - 1);
                    }
                }
            }
        }
    }
    w.bits(0, 16);
    w.finish()
}

pub fn literals(text: &[u8]) -> Vec<Token> {
    text.iter().map(|&b| Token::Literal(b)).collect()
}

/// Tokens for `count` zero bytes following a zero already in the history.
pub fn zero_fill(mut count: usize) -> Vec<Token> {
    let mut tokens = Vec::new();
    while count > 0 {
        let length = if count > 258 {
            // Keep the tail at three bytes or more.
            if count - 258 < 3 { count - 3 } else { 258 }
        } else {
            count
        };
        tokens.push(Token::Copy {
            length,
            class: 0,
            extra: 0,
        });
        count -= length;
    }
    tokens
}

/// A ROOMCUT entry (magic + ADT stream) whose top-left pixel is pure red and
/// whose buffer carries `mask` after the image region.
pub fn adt_background_entry(mask: &[u8]) -> Vec<u8> {
    const MASK_OFFSET: usize = 320 * 256 * 2;
    let mut tokens = literals(&[0x1F, 0x00, 0x00]);
    tokens.extend(zero_fill(MASK_OFFSET - 3));
    tokens.extend(literals(mask));

    let mut entry = b"ADT\0".to_vec();
    entry.extend(encode_adt(&[tokens]));
    entry
}

/// ROOMCUT.BIN image: offset table followed by the payloads.
pub fn roomcut_archive(payloads: &[Vec<u8>]) -> Vec<u8> {
    let mut data = Vec::new();
    let mut offset = payloads.len() * 4;
    for payload in payloads {
        data.extend_from_slice(&(offset as u32).to_le_bytes());
        offset += payload.len();
    }
    for payload in payloads {
        data.extend_from_slice(payload);
    }
    data
}

/// Version 3 blocks with zero DC and no AC terms for one macroblock.
pub fn grey_macroblock(w: &mut WordBitWriter) {
    w.pattern("0010 0010");
    for _ in 0..4 {
        w.pattern("10010");
    }
}

/// Solid mid-grey 320x240 version 3 frame.
pub fn grey_frame() -> Vec<u8> {
    let mut w = WordBitWriter::default();
    for _ in 0..(20 * 15) {
        grey_macroblock(&mut w);
    }
    w.finish()
}

/// Compressed mask TIM unpacking to `[1, 2, 3, 4, 1, 2, 3, 4]`.
pub fn small_mask_tim() -> Vec<u8> {
    let mut mask = Vec::new();
    mask.extend_from_slice(&8u32.to_le_bytes());
    mask.extend_from_slice(&0xFFFFu16.to_le_bytes());
    mask.extend_from_slice(&[0x1C, 1, 2, 3, 4, 0xE1, 0xFC, 0xFF]);
    mask
}

pub fn bss_header(qscale: u16, version: u16) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&0u16.to_le_bytes());
    bytes.extend_from_slice(&0x3800u16.to_le_bytes());
    bytes.extend_from_slice(&qscale.to_le_bytes());
    bytes.extend_from_slice(&version.to_le_bytes());
    bytes
}

/// A BSS file of `cameras` grey sections, each followed by a small mask.
pub fn bss_file(section_size: usize, cameras: usize) -> Vec<u8> {
    let mut data = Vec::new();
    for camera in 0..cameras {
        let start = camera * section_size;
        data.resize(start, 0xAA);
        data.extend(bss_header(1, 3));
        data.extend(grey_frame());
        data.extend(small_mask_tim());
    }
    data
}

//! ADT room backgrounds: an adaptive Huffman + LZ byte stream.
//!
//! The stream is a run of blocks, each introduced by a 16-bit token count
//! and three code-length tables. Tokens are either literal bytes or copies
//! out of a 16 KiB ring of previously written output. A zero token count
//! ends the stream.

use anyhow::{Context, Result, ensure};
use byteorder::{ByteOrder, LittleEndian};

use crate::bits::ByteBitReader;
use crate::error::{Codec, Corruption, DecodeError};
use crate::huffman::DecodeTree;

/// Size of the buffer a background decompresses into: the 256x256 primary
/// image and 128x128 side image, followed by room for the mask payload.
pub const ADT_BUFFER_LEN: usize = 320 * 256 * 2 * 2;
pub const RING_LEN: usize = 0x4000;
const RING_MASK: usize = RING_LEN - 1;

const SELECTOR_TABLE_LEN: usize = 16;
const SYMBOL_TABLE_LEN: usize = 512;
const DISTANCE_TABLE_LEN: usize = 16;

const FIRST_COPY_SYMBOL: usize = 256;
const COPY_LENGTH_BIAS: usize = 0xFD;
const MAX_BITFIELD_ZEROS: u32 = 16;

/// Destination for decoded bytes.
pub trait ByteSink {
    fn push(&mut self, byte: u8) -> Result<(), DecodeError>;
    fn written(&self) -> usize;
}

struct SliceSink<'a> {
    out: &'a mut [u8],
    pos: usize,
}

impl ByteSink for SliceSink<'_> {
    fn push(&mut self, byte: u8) -> Result<(), DecodeError> {
        let available = self.out.len();
        let slot = self
            .out
            .get_mut(self.pos)
            .ok_or(DecodeError::OutputTooSmall {
                needed: self.pos + 1,
                available,
            })?;
        *slot = byte;
        self.pos += 1;
        Ok(())
    }

    fn written(&self) -> usize {
        self.pos
    }
}

impl ByteSink for Vec<u8> {
    fn push(&mut self, byte: u8) -> Result<(), DecodeError> {
        Vec::push(self, byte);
        Ok(())
    }

    fn written(&self) -> usize {
        self.len()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdtOptions {
    /// Accept streams that run off the end of the input, reading zero bits
    /// (and zeroed ring history) the way the game did.
    pub allow_zero_padding: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AdtDecoder {
    options: AdtOptions,
}

impl AdtDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: AdtOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> AdtOptions {
        self.options
    }

    /// Decompress `blob` into `out`, returning the number of bytes written.
    pub fn decode(&self, blob: &[u8], out: &mut [u8]) -> Result<usize, DecodeError> {
        let mut sink = SliceSink { out, pos: 0 };
        self.decode_into(blob, &mut sink)
    }

    pub fn decode_to_vec(&self, blob: &[u8]) -> Result<Vec<u8>, DecodeError> {
        let mut out = Vec::new();
        self.decode_into(blob, &mut out)?;
        Ok(out)
    }

    pub fn decode_into<S: ByteSink>(&self, blob: &[u8], sink: &mut S) -> Result<usize, DecodeError> {
        let mut session = Session::new(blob, !self.options.allow_zero_padding);
        session.run(sink)?;

        if session.reader.is_truncated() {
            if session.strict {
                return Err(session.reader.truncated(Codec::Adt));
            }
            log::warn!(
                "ADT stream read past its {} input bytes; decoded with zero padding",
                blob.len()
            );
        }
        Ok(sink.written())
    }
}

/// Decompress an ADT stream with strict truncation checks.
pub fn decode_adt(blob: &[u8], out: &mut [u8]) -> Result<usize, DecodeError> {
    AdtDecoder::new().decode(blob, out)
}

pub fn decode_adt_to_vec(blob: &[u8]) -> Result<Vec<u8>, DecodeError> {
    AdtDecoder::new().decode_to_vec(blob)
}

/// Per-call scratch state: the bit cursor plus the ring history.
struct Session<'a> {
    reader: ByteBitReader<'a>,
    ring: Box<[u8; RING_LEN]>,
    ring_pos: usize,
    history: usize,
    strict: bool,
}

struct BlockTables {
    symbols: DecodeTree,
    distances: DecodeTree,
}

impl<'a> Session<'a> {
    fn new(blob: &'a [u8], strict: bool) -> Self {
        Self {
            reader: ByteBitReader::new(blob),
            ring: Box::new([0u8; RING_LEN]),
            ring_pos: 0,
            history: 0,
            strict,
        }
    }

    fn run<S: ByteSink>(&mut self, sink: &mut S) -> Result<(), DecodeError> {
        let mut block_index = 0usize;
        loop {
            let token_count = self.read_block_len();
            if token_count == 0 {
                return Ok(());
            }

            let tables = self.read_block_tables()?;
            for _ in 0..token_count {
                let symbol = tables.symbols.decode(&mut self.reader)?;
                if symbol < FIRST_COPY_SYMBOL {
                    self.emit(symbol as u8, sink)?;
                } else {
                    self.copy(symbol - COPY_LENGTH_BIAS, &tables.distances, sink)?;
                }
            }

            log::debug!(
                "ADT block {block_index}: {token_count} tokens, {} bytes written",
                sink.written()
            );
            block_index += 1;
        }
    }

    fn read_block_len(&mut self) -> usize {
        let low = self.reader.read_bits(8);
        let high = self.reader.read_bits(8);
        (low | (high << 8)) as usize
    }

    fn emit<S: ByteSink>(&mut self, byte: u8, sink: &mut S) -> Result<(), DecodeError> {
        sink.push(byte)?;
        self.ring[self.ring_pos] = byte;
        self.ring_pos = (self.ring_pos + 1) & RING_MASK;
        self.history = (self.history + 1).min(RING_LEN);
        Ok(())
    }

    fn copy<S: ByteSink>(
        &mut self,
        count: usize,
        distances: &DecodeTree,
        sink: &mut S,
    ) -> Result<(), DecodeError> {
        let class = distances.decode(&mut self.reader)? as u32;
        let distance = if class > 0 {
            let extra_bits = class - 1;
            let extra = self.reader.read_bits(extra_bits) & 0xFFFF;
            (extra + (1 << extra_bits)) as usize & RING_MASK
        } else {
            0
        };

        if self.strict && distance >= self.history {
            return Err(self.reader.fail(
                Codec::Adt,
                Corruption::BackReferenceBeforeStart {
                    distance,
                    written: self.history,
                },
            ));
        }

        // Byte at a time: the source may overlap bytes written by this copy.
        let mut source = self.ring_pos.wrapping_sub(distance + 1) & RING_MASK;
        for _ in 0..count {
            let byte = self.ring[source];
            self.emit(byte, sink)?;
            source = (source + 1) & RING_MASK;
        }
        Ok(())
    }

    /// Unary-prefixed value: `z` zero bits, a one, then `z` more bits.
    fn read_bitfield(&mut self) -> Result<u32, DecodeError> {
        let mut zeros = 0u32;
        while self.reader.read_bit() == 0 {
            zeros += 1;
            if zeros > MAX_BITFIELD_ZEROS {
                return Err(self.reader.fail(
                    Codec::Adt,
                    Corruption::PrefixTooLong {
                        limit: MAX_BITFIELD_ZEROS,
                    },
                ));
            }
        }
        Ok((1 << zeros) | self.reader.read_bits(zeros))
    }

    /// Lengths coded as "keep the previous length" or "xor it with a bitfield".
    fn read_chained_lengths(&mut self, count: usize) -> Result<Vec<u32>, DecodeError> {
        let mut lengths = Vec::with_capacity(count);
        let mut previous = 0u32;
        for _ in 0..count {
            if self.reader.read_bit() != 0 {
                previous ^= self.read_bitfield()?;
            }
            lengths.push(previous);
        }
        Ok(lengths)
    }

    /// Symbol-table lengths: alternating runs of selector-coded deltas and
    /// zero deltas, accumulated with xor.
    fn read_symbol_lengths(&mut self, selector: &DecodeTree) -> Result<Vec<u32>, DecodeError> {
        let mut deltas = vec![0u32; SYMBOL_TABLE_LEN];
        let mut coded_run = self.reader.read_bit() != 0;
        let mut filled = 0usize;

        while filled < SYMBOL_TABLE_LEN {
            let run = self.read_bitfield()? as usize;
            let end = filled + run;
            if end > SYMBOL_TABLE_LEN {
                return Err(self.reader.fail(
                    Codec::Adt,
                    Corruption::TooManyCodeLengths {
                        end,
                        limit: SYMBOL_TABLE_LEN,
                    },
                ));
            }
            if coded_run {
                for delta in &mut deltas[filled..end] {
                    *delta = selector.decode(&mut self.reader)? as u32;
                }
            }
            filled = end;
            coded_run = !coded_run;
        }

        let mut length = 0u32;
        Ok(deltas
            .into_iter()
            .map(|delta| {
                length ^= delta;
                length
            })
            .collect())
    }

    fn read_block_tables(&mut self) -> Result<BlockTables, DecodeError> {
        let selector_lengths = self.read_chained_lengths(SELECTOR_TABLE_LEN)?;
        let selector = self.build_tree(&selector_lengths)?;
        let symbol_lengths = self.read_symbol_lengths(&selector)?;
        let distance_lengths = self.read_chained_lengths(DISTANCE_TABLE_LEN)?;

        Ok(BlockTables {
            symbols: self.build_tree(&symbol_lengths)?,
            distances: self.build_tree(&distance_lengths)?,
        })
    }

    fn build_tree(&self, lengths: &[u32]) -> Result<DecodeTree, DecodeError> {
        DecodeTree::build(lengths).map_err(|reason| self.reader.fail(Codec::Adt, reason))
    }
}

pub const BACKGROUND_WIDTH: u32 = 320;
pub const BACKGROUND_HEIGHT: u32 = 240;
/// Byte offset of the optional mask payload inside the decompressed buffer.
pub const MASK_OFFSET: usize = 320 * 256 * 2;
const NO_MASK_MARKER: u8 = 0xFF;
const ENTRY_MAGIC_LEN: usize = 4;
const PRIMARY_STRIDE: usize = 256;
const SIDE_BASE: usize = 256 * 256;
const SIDE_STRIDE: usize = 128;
const SIDE_SPLIT_ROW: usize = 128;

/// A decoded ADT background ready for upload.
#[derive(Debug, Clone)]
pub struct AdtBackground {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
    /// Raw mask TIM bytes appended after the image, when present.
    pub mask: Option<Vec<u8>>,
    pub decompressed_len: usize,
}

/// Decode a ROOMCUT entry (4-byte magic followed by an ADT stream).
pub fn decode_adt_background(entry: &[u8]) -> Result<AdtBackground> {
    decode_adt_background_with(entry, AdtOptions::default())
}

pub fn decode_adt_background_with(entry: &[u8], options: AdtOptions) -> Result<AdtBackground> {
    ensure!(
        entry.len() > ENTRY_MAGIC_LEN,
        "ADT entry shorter than its {ENTRY_MAGIC_LEN}-byte magic"
    );

    let mut buffer = vec![0u8; ADT_BUFFER_LEN];
    buffer[MASK_OFFSET] = NO_MASK_MARKER;
    let written = AdtDecoder::with_options(options)
        .decode(&entry[ENTRY_MAGIC_LEN..], &mut buffer)
        .context("decompressing ADT background")?;

    assemble_background(&buffer, written)
}

/// Lay out a decompressed ADT buffer as a 320x240 RGBA8 image.
pub fn assemble_background(buffer: &[u8], written: usize) -> Result<AdtBackground> {
    ensure!(
        buffer.len() >= MASK_OFFSET,
        "ADT buffer too small: {} < {MASK_OFFSET}",
        buffer.len()
    );
    if written < MASK_OFFSET {
        log::warn!("ADT stream produced {written} bytes; image region is {MASK_OFFSET} bytes");
    }

    let width = BACKGROUND_WIDTH as usize;
    let height = BACKGROUND_HEIGHT as usize;
    let word = |index: usize| LittleEndian::read_u16(&buffer[index * 2..index * 2 + 2]);

    let mut rgba = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        let primary = y * PRIMARY_STRIDE;
        for x in 0..PRIMARY_STRIDE {
            rgba.extend_from_slice(&rgb555_to_rgba(word(primary + x)));
        }

        let mut side = SIDE_BASE + y * SIDE_STRIDE;
        if y >= SIDE_SPLIT_ROW {
            // Rows past the split live in the right half of the side image.
            side -= SIDE_SPLIT_ROW * SIDE_STRIDE - (width - PRIMARY_STRIDE);
        }
        for x in 0..width - PRIMARY_STRIDE {
            rgba.extend_from_slice(&rgb555_to_rgba(word(side + x)));
        }
    }

    let mask = (written > MASK_OFFSET && buffer[MASK_OFFSET] != NO_MASK_MARKER)
        .then(|| buffer[MASK_OFFSET..written].to_vec());

    Ok(AdtBackground {
        width: BACKGROUND_WIDTH,
        height: BACKGROUND_HEIGHT,
        rgba,
        mask,
        decompressed_len: written,
    })
}

/// Red sits in the low five bits; channels are widened without replication.
fn rgb555_to_rgba(value: u16) -> [u8; 4] {
    let r = (value & 0x1F) as u8;
    let g = ((value >> 5) & 0x1F) as u8;
    let b = ((value >> 10) & 0x1F) as u8;
    [r << 3, g << 3, b << 3, 0xFF]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::huffman::canonical_codes;

    #[derive(Default)]
    struct BitWriter {
        bytes: Vec<u8>,
        used: u32,
    }

    impl BitWriter {
        fn bit(&mut self, bit: u32) {
            if self.used % 8 == 0 {
                self.bytes.push(0);
            }
            if bit != 0 {
                let last = self.bytes.len() - 1;
                self.bytes[last] |= 0x80 >> (self.used % 8);
            }
            self.used += 1;
        }

        fn bits(&mut self, value: u32, count: u32) {
            for shift in (0..count).rev() {
                self.bit((value >> shift) & 1);
            }
        }

        fn bitfield(&mut self, value: u32) {
            let zeros = 31 - value.leading_zeros();
            self.bits(0, zeros);
            self.bits(value, zeros + 1);
        }

        fn finish(self) -> Vec<u8> {
            self.bytes
        }
    }

    enum Token {
        Literal(u8),
        Copy { length: usize, class: u32, extra: u32 },
    }

    /// Sixteen 4-bit codes, so symbol `n` is written as `n` in four bits.
    fn write_flat_table(w: &mut BitWriter) {
        w.bit(1);
        w.bitfield(4);
        for _ in 1..16 {
            w.bit(0);
        }
    }

    /// One block using a complete 9-bit symbol table.
    fn write_block(w: &mut BitWriter, tokens: &[Token]) {
        let codes = canonical_codes(&[9; SYMBOL_TABLE_LEN]).unwrap();
        w.bits(tokens.len() as u32 & 0xFF, 8);
        w.bits(tokens.len() as u32 >> 8, 8);
        write_flat_table(w);
        // Deltas: 9 for symbol 0, then 511 zeros.
        w.bit(1);
        w.bitfield(1);
        w.bits(9, 4);
        w.bitfield(511);
        write_flat_table(w);

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

    fn encode(blocks: &[Vec<Token>]) -> Vec<u8> {
        let mut w = BitWriter::default();
        for tokens in blocks {
            write_block(&mut w, tokens);
        }
        w.bits(0, 16);
        w.finish()
    }

    fn literals(text: &[u8]) -> Vec<Token> {
        text.iter().map(|&b| Token::Literal(b)).collect()
    }

    /// A single block of four literal `A`s using one-bit codes.
    fn four_a_stream() -> Vec<u8> {
        let mut w = BitWriter::default();
        w.bits(4, 8);
        w.bits(0, 8);
        // Selector table: only symbol 1, with length 1.
        w.bit(0);
        w.bit(1);
        w.bitfield(1);
        w.bit(1);
        w.bitfield(1);
        w.bits(0, 13);
        // Symbol lengths: 65 zero deltas, two deltas of 1, then 445 zeros.
        w.bit(0);
        w.bitfield(65);
        w.bitfield(2);
        w.bit(0);
        w.bit(0);
        w.bitfield(445);
        // Empty distance table.
        w.bits(0, 16);
        for _ in 0..4 {
            w.bit(0);
        }
        w.bits(0, 16);
        w.finish()
    }

    #[test]
    fn decodes_hand_built_literal_block() {
        let stream = four_a_stream();
        let mut out = [0u8; 8];
        let written = decode_adt(&stream, &mut out).unwrap();
        assert_eq!(written, 4);
        assert_eq!(&out[..written], b"AAAA");
    }

    #[test]
    fn literal_only_stream_reproduces_its_literals() {
        let text = b"The quick brown fox jumps over the lazy dog";
        let stream = encode(&[literals(text)]);
        assert_eq!(decode_adt_to_vec(&stream).unwrap(), text.to_vec());
    }

    #[test]
    fn overlapping_copy_repeats_recent_bytes() {
        let mut tokens = literals(b"AB");
        // Class 1 has no extra bits and reaches one byte further back.
        tokens.push(Token::Copy {
            length: 3,
            class: 1,
            extra: 0,
        });
        let stream = encode(&[tokens]);
        assert_eq!(decode_adt_to_vec(&stream).unwrap(), b"ABABA".to_vec());
    }

    #[test]
    fn distance_zero_repeats_the_last_byte() {
        let mut tokens = literals(b"A");
        tokens.push(Token::Copy {
            length: 3,
            class: 0,
            extra: 0,
        });
        let stream = encode(&[tokens]);
        assert_eq!(decode_adt_to_vec(&stream).unwrap(), b"AAAA".to_vec());
    }

    #[test]
    fn longest_copy_symbol_copies_258_bytes() {
        let mut tokens = literals(b"z");
        tokens.push(Token::Copy {
            length: SYMBOL_TABLE_LEN - 1 - COPY_LENGTH_BIAS,
            class: 0,
            extra: 0,
        });
        let stream = encode(&[tokens]);
        let out = decode_adt_to_vec(&stream).unwrap();
        assert_eq!(out.len(), 259);
        assert!(out.iter().all(|&b| b == b'z'));
    }

    #[test]
    fn ring_history_survives_block_boundaries() {
        let second = vec![
            // Class 2: one extra bit, distance = extra + 2.
            Token::Copy {
                length: 3,
                class: 2,
                extra: 0,
            },
            Token::Literal(b'!'),
        ];
        let stream = encode(&[literals(b"xyz"), second]);
        assert_eq!(decode_adt_to_vec(&stream).unwrap(), b"xyzxyz!".to_vec());
    }

    #[test]
    fn strict_mode_rejects_references_before_history() {
        let tokens = vec![Token::Copy {
            length: 3,
            class: 0,
            extra: 0,
        }];
        let stream = encode(&[tokens]);
        let err = decode_adt_to_vec(&stream).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::CorruptInput {
                reason: Corruption::BackReferenceBeforeStart {
                    distance: 0,
                    written: 0
                },
                ..
            }
        ));

        let lenient = AdtDecoder::with_options(AdtOptions {
            allow_zero_padding: true,
        });
        assert_eq!(lenient.decode_to_vec(&stream).unwrap(), vec![0, 0, 0]);
    }

    #[test]
    fn truncated_stream_is_reported_unless_padding_allowed() {
        let stream = four_a_stream();
        let truncated = &stream[..stream.len() - 1];

        let err = decode_adt_to_vec(truncated).unwrap_err();
        assert!(err.is_truncation());

        let lenient = AdtDecoder::with_options(AdtOptions {
            allow_zero_padding: true,
        });
        assert_eq!(lenient.decode_to_vec(truncated).unwrap(), b"AAAA".to_vec());
    }

    #[test]
    fn empty_input_decodes_to_nothing_only_when_lenient() {
        assert!(decode_adt_to_vec(&[]).unwrap_err().is_truncation());
        let lenient = AdtDecoder::with_options(AdtOptions {
            allow_zero_padding: true,
        });
        assert!(lenient.decode_to_vec(&[]).unwrap().is_empty());
        assert!(decode_adt_to_vec(&[0, 0]).unwrap().is_empty());
    }

    #[test]
    fn undersized_output_is_an_error() {
        let stream = four_a_stream();
        let mut out = [0u8; 3];
        let err = decode_adt(&stream, &mut out).unwrap_err();
        assert_eq!(
            err,
            DecodeError::OutputTooSmall {
                needed: 4,
                available: 3
            }
        );
    }

    #[test]
    fn symbol_length_runs_may_not_overflow_the_table() {
        let mut w = BitWriter::default();
        w.bits(1, 8);
        w.bits(0, 8);
        write_flat_table(&mut w);
        // A zero run of 513 entries.
        w.bit(0);
        w.bitfield(513);
        w.bits(0, 32);
        let err = decode_adt_to_vec(&w.finish()).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::CorruptInput {
                reason: Corruption::TooManyCodeLengths { end: 513, .. },
                ..
            }
        ));
    }

    #[test]
    fn decoding_is_deterministic() {
        let mut tokens = literals(b"abcabc");
        tokens.push(Token::Copy {
            length: 5,
            class: 2,
            extra: 0,
        });
        let stream = encode(&[tokens]);
        let first = decode_adt_to_vec(&stream).unwrap();
        let second = decode_adt_to_vec(&stream).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, b"abcabcabcab".to_vec());
    }

    fn put_word(buffer: &mut [u8], index: usize, value: u16) {
        LittleEndian::write_u16(&mut buffer[index * 2..index * 2 + 2], value);
    }

    #[test]
    fn assembles_primary_and_side_strips() {
        let mut buffer = vec![0u8; ADT_BUFFER_LEN];
        buffer[MASK_OFFSET] = NO_MASK_MARKER;
        // Pure red at (0, 0), pure blue at (255, 239).
        put_word(&mut buffer, 0, 0x001F);
        put_word(&mut buffer, 239 * 256 + 255, 0x7C00);
        // Side strip: (256, 0) from the left half, (256, 128) from the right half.
        put_word(&mut buffer, SIDE_BASE, 0x03E0);
        put_word(&mut buffer, SIDE_BASE + 64, 0x7FFF);

        let background = assemble_background(&buffer, MASK_OFFSET).unwrap();
        let pixel = |x: usize, y: usize| {
            let offset = (y * 320 + x) * 4;
            background.rgba[offset..offset + 4].to_vec()
        };
        assert_eq!(background.rgba.len(), 320 * 240 * 4);
        assert_eq!(pixel(0, 0), vec![0xF8, 0, 0, 0xFF]);
        assert_eq!(pixel(255, 239), vec![0, 0, 0xF8, 0xFF]);
        assert_eq!(pixel(256, 0), vec![0, 0xF8, 0, 0xFF]);
        assert_eq!(pixel(256, 128), vec![0xF8, 0xF8, 0xF8, 0xFF]);
        assert!(background.mask.is_none());
    }

    #[test]
    fn mask_payload_follows_the_image_region() {
        let mut buffer = vec![0u8; ADT_BUFFER_LEN];
        buffer[MASK_OFFSET..MASK_OFFSET + 3].copy_from_slice(&[0x10, 0x00, 0x00]);
        let background = assemble_background(&buffer, MASK_OFFSET + 3).unwrap();
        assert_eq!(background.mask.as_deref(), Some(&[0x10, 0x00, 0x00][..]));

        buffer[MASK_OFFSET] = NO_MASK_MARKER;
        let background = assemble_background(&buffer, MASK_OFFSET + 3).unwrap();
        assert!(background.mask.is_none());
    }

    #[test]
    fn background_entry_skips_magic() {
        let mut entry = b"\x01\x02\x03\x04".to_vec();
        entry.extend_from_slice(&four_a_stream());
        let background = decode_adt_background(&entry).unwrap();
        assert_eq!(background.decompressed_len, 4);
        // "AA" = 0x4141: r = 1, g = 10, b = 16.
        assert_eq!(&background.rgba[..4], &[8, 80, 128, 0xFF]);
        assert!(background.mask.is_none());
    }
}

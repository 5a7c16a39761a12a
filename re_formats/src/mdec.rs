//! MDEC macroblock frames, the image format inside BSS backgrounds.
//!
//! A frame is a column-major sequence of 16x16 macroblocks. Each macroblock
//! carries six 8x8 blocks in the order Cr, Cb, Y0, Y1, Y2, Y3; every block
//! holds a DC term followed by run/level coded AC terms up to an end-of-block
//! code. Blocks go through dequantisation and a scaled integer IDCT before
//! the macroblock is converted to RGBA.

mod color;
mod idct;
mod tables;

use log::{debug, warn};

use crate::bits::WordBitReader;
use crate::error::{Codec, Corruption, DecodeError};

use self::tables::{AC_ENTRIES, AC_LUT_1, AC_LUT_6, AC_LUT_9, NO_ENTRY, QUANT, ZIGZAG};

pub const MACROBLOCK_SIZE: usize = 16;
pub const MAX_QSCALE: i32 = 63;

const BLOCKS_PER_MACROBLOCK: usize = 6;
const DC_BITS_V2: u32 = 10;
/// Longest run of DC prefix ones accepted in a version 3 stream.
const LONGEST_DC_PREFIX: u32 = 16;
/// Zero prefixes beyond this never resolve in any AC table.
const LONGEST_AC_PREFIX: u32 = 11;
const ESCAPE_PREFIX: u32 = 5;
const DC_RANGE: std::ops::RangeInclusive<i32> = -512..=511;

/// Round-to-nearest arithmetic shift used by dequantisation and colour.
#[inline]
pub(crate) fn round_shift(value: i32, shift: u32) -> i32 {
    value.wrapping_add((1 << shift) >> 1) >> shift
}

/// Bitstream revision, which changes how DC terms are coded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MdecVersion {
    /// Fixed 10-bit signed DC values.
    V2,
    /// Variable-length DC differences against a per-plane predictor.
    V3,
}

impl TryFrom<i32> for MdecVersion {
    type Error = DecodeError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(MdecVersion::V2),
            3 => Ok(MdecVersion::V3),
            other => Err(DecodeError::InvalidParameters(format!(
                "unsupported MDEC version {other}"
            ))),
        }
    }
}

/// Frame geometry and quantiser for one decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MdecParams {
    version: MdecVersion,
    width: usize,
    height: usize,
    qscale: i32,
}

impl MdecParams {
    pub fn new(version: i32, width: i32, height: i32, qscale: i32) -> Result<Self, DecodeError> {
        let version = MdecVersion::try_from(version)?;
        let width = frame_dimension("width", width)?;
        let height = frame_dimension("height", height)?;
        if !(0..=MAX_QSCALE).contains(&qscale) {
            return Err(DecodeError::InvalidParameters(format!(
                "qscale {qscale} outside 0..={MAX_QSCALE}"
            )));
        }
        Ok(Self {
            version,
            width,
            height,
            qscale,
        })
    }

    pub fn version(&self) -> MdecVersion {
        self.version
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn qscale(&self) -> i32 {
        self.qscale
    }

    /// Size of the RGBA8 raster the frame decodes into.
    pub fn output_len(&self) -> usize {
        self.width * self.height * 4
    }
}

fn frame_dimension(name: &str, value: i32) -> Result<usize, DecodeError> {
    if value <= 0 || value as usize % MACROBLOCK_SIZE != 0 {
        return Err(DecodeError::InvalidParameters(format!(
            "{name} {value} is not a positive multiple of {MACROBLOCK_SIZE}"
        )));
    }
    Ok(value as usize)
}

/// Decoder for MDEC frames of a fixed geometry.
///
/// Strict by default: a frame that reads past the end of its input is
/// reported as [`DecodeError::TruncatedInput`]. With zero padding allowed the
/// missing bits decode as zeros, which is how the game itself behaves.
#[derive(Debug, Clone)]
pub struct MdecDecoder {
    params: MdecParams,
    allow_zero_padding: bool,
}

impl MdecDecoder {
    pub fn new(params: MdecParams) -> Self {
        Self {
            params,
            allow_zero_padding: false,
        }
    }

    pub fn allow_zero_padding(mut self, allow: bool) -> Self {
        self.allow_zero_padding = allow;
        self
    }

    pub fn params(&self) -> &MdecParams {
        &self.params
    }

    /// Decode one frame into `out` and return the bytes of `data` consumed.
    pub fn decode(&self, data: &[u8], out: &mut [u8]) -> Result<usize, DecodeError> {
        let params = &self.params;
        let needed = params.output_len();
        if out.len() < needed {
            return Err(DecodeError::OutputTooSmall {
                needed,
                available: out.len(),
            });
        }

        let mut frame = FrameReader::new(data, params);
        for column in 0..params.width / MACROBLOCK_SIZE {
            for row in 0..params.height / MACROBLOCK_SIZE {
                let mut blocks = frame.decode_macroblock()?;
                for block in &mut blocks {
                    idct::idct(&mut block.coefficients, block.usage);
                }
                let planes = blocks.map(|block| block.coefficients);
                color::write_macroblock(&planes, out, params.width, column, row);
            }
        }

        let reader = &frame.reader;
        if reader.is_truncated() {
            if !self.allow_zero_padding {
                return Err(reader.truncated(Codec::Mdec));
            }
            warn!(
                "MDEC frame read past its {}-byte input; missing bits decoded as zero",
                reader.input_len()
            );
        }
        let consumed = reader.bytes_consumed();
        debug!(
            "decoded {}x{} MDEC {:?} frame (qscale {}), consumed {} bytes",
            params.width, params.height, params.version, params.qscale, consumed
        );
        Ok(consumed)
    }

    /// Decode into a freshly allocated raster.
    pub fn decode_to_vec(&self, data: &[u8]) -> Result<(Vec<u8>, usize), DecodeError> {
        let mut out = vec![0u8; self.params.output_len()];
        let consumed = self.decode(data, &mut out)?;
        Ok((out, consumed))
    }
}

/// Decode one strict MDEC frame into `out`, returning bytes consumed.
pub fn decode_mdec(
    blob: &[u8],
    version: i32,
    width: i32,
    height: i32,
    qscale: i32,
    out: &mut [u8],
) -> Result<usize, DecodeError> {
    let params = MdecParams::new(version, width, height, qscale)?;
    MdecDecoder::new(params).decode(blob, out)
}

/// Which DC predictor a block belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Plane {
    Cr,
    Cb,
    Luma,
}

impl Plane {
    fn predictor(self) -> usize {
        match self {
            Plane::Cr => 0,
            Plane::Cb => 1,
            Plane::Luma => 2,
        }
    }
}

const BLOCK_PLANES: [Plane; BLOCKS_PER_MACROBLOCK] = [
    Plane::Cr,
    Plane::Cb,
    Plane::Luma,
    Plane::Luma,
    Plane::Luma,
    Plane::Luma,
];

/// Columns of a block that carry energy below row 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnUsage {
    /// No AC terms at all; the block is flat.
    DcOnly,
    /// Bit `n` set when column `n` has a coefficient outside row 0.
    Columns(u8),
}

/// Dequantised coefficients in natural 8x8 order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Block {
    pub coefficients: [i32; 64],
    pub usage: ColumnUsage,
}

struct FrameReader<'a> {
    reader: WordBitReader<'a>,
    version: MdecVersion,
    qscale: i32,
    predictors: [i32; 3],
}

impl<'a> FrameReader<'a> {
    fn new(data: &'a [u8], params: &MdecParams) -> Self {
        Self {
            reader: WordBitReader::new(data),
            version: params.version,
            qscale: params.qscale,
            predictors: [0; 3],
        }
    }

    fn fail(&self, reason: Corruption) -> DecodeError {
        self.reader.fail(Codec::Mdec, reason)
    }

    fn decode_macroblock(&mut self) -> Result<[Block; BLOCKS_PER_MACROBLOCK], DecodeError> {
        let mut blocks = [Block {
            coefficients: [0; 64],
            usage: ColumnUsage::DcOnly,
        }; BLOCKS_PER_MACROBLOCK];
        for (block, plane) in blocks.iter_mut().zip(BLOCK_PLANES) {
            *block = self.decode_block(plane)?;
        }
        Ok(blocks)
    }

    fn decode_block(&mut self, plane: Plane) -> Result<Block, DecodeError> {
        let mut coefficients = [0i32; 64];
        let dc = self.read_dc(plane)?;
        coefficients[0] = round_shift(dc.wrapping_mul(QUANT[0]), 9);

        let mut index = 0usize;
        let mut columns = 0u8;
        while let Some((run, level)) = self.read_ac()? {
            index += run as usize + 1;
            if index >= 64 {
                return Err(self.fail(Corruption::CoefficientOverflow { index }));
            }
            let position = ZIGZAG[index] as usize;
            let value = level.wrapping_mul(QUANT[index]).wrapping_mul(self.qscale);
            coefficients[position] = round_shift(value, 12);
            if position > 7 {
                columns |= 1 << (position & 7);
            }
        }

        let usage = if index == 0 {
            ColumnUsage::DcOnly
        } else {
            ColumnUsage::Columns(columns)
        };
        Ok(Block {
            coefficients,
            usage,
        })
    }

    fn read_dc(&mut self, plane: Plane) -> Result<i32, DecodeError> {
        if self.version == MdecVersion::V2 {
            let raw = self.reader.read_bits(DC_BITS_V2) as i32;
            return Ok(if raw & 0x200 != 0 { raw - 0x400 } else { raw });
        }

        let delta = self.read_dc_delta(plane)?;
        let slot = plane.predictor();
        let value = self.predictors[slot] + (delta << 2);
        if !DC_RANGE.contains(&value) {
            return Err(self.fail(Corruption::DcOutOfRange { value }));
        }
        self.predictors[slot] = value;
        Ok(value)
    }

    fn read_dc_delta(&mut self, plane: Plane) -> Result<i32, DecodeError> {
        let mut ones = 0u32;
        while self.reader.read_bit() != 0 {
            ones += 1;
            if ones > LONGEST_DC_PREFIX {
                return Err(self.fail(Corruption::PrefixTooLong {
                    limit: LONGEST_DC_PREFIX,
                }));
            }
        }

        let reader = &mut self.reader;
        let delta = match (plane, ones) {
            (Plane::Luma, 0) => {
                if reader.read_bit() != 0 {
                    reader.read_signed(2)
                } else {
                    ((reader.read_bit() << 1) as i32) - 1
                }
            }
            (Plane::Luma, 1) => {
                if reader.read_bit() != 0 {
                    reader.read_signed(3)
                } else {
                    0
                }
            }
            (Plane::Luma, n) => reader.read_signed(n + 2),
            (_, 0) => {
                if reader.read_bit() != 0 {
                    ((reader.read_bit() << 1) as i32) - 1
                } else {
                    0
                }
            }
            (_, n) => reader.read_signed(n + 1),
        };
        Ok(delta)
    }

    /// Read one run/level pair, or `None` at the end-of-block code.
    fn read_ac(&mut self) -> Result<Option<(u32, i32)>, DecodeError> {
        let reader = &mut self.reader;
        if reader.read_bit() != 0 {
            if reader.read_bit() != 0 {
                let level = if reader.read_bit() != 0 { -1 } else { 1 };
                return Ok(Some((0, level)));
            }
            return Ok(None);
        }

        let mut zeros = 1u32;
        while reader.read_bit() == 0 {
            zeros += 1;
            if zeros > LONGEST_AC_PREFIX {
                break;
            }
        }

        if zeros == ESCAPE_PREFIX {
            let escape = reader.read_bits(16);
            let run = escape >> 10;
            let level = ((escape & 0x3FF) as i32) << 22 >> 22;
            return Ok(Some((run, level)));
        }

        let (lut, shift) = match zeros {
            0..=5 => (&AC_LUT_1, 1),
            6..=8 => (&AC_LUT_6, 6),
            _ => (&AC_LUT_9, 9),
        };
        let code = (0x80 | reader.peek_bits(7)) >> (zeros - shift);
        let slot = lut[code as usize];
        if slot == NO_ENTRY {
            return Err(self.fail(Corruption::UnknownAcCode { code, zeros }));
        }

        let entry = AC_ENTRIES[slot as usize];
        let length = entry.length as u32;
        let (Some(remaining), Some(sign_bit)) =
            (length.checked_sub(zeros + 1), (8 + shift).checked_sub(length))
        else {
            return Err(self.fail(Corruption::UnknownAcCode { code, zeros }));
        };
        reader.skip(remaining);
        let level = entry.level as i32;
        let level = if code & (1 << sign_bit) != 0 { -level } else { level };
        Ok(Some((entry.run as u32, level)))
    }
}

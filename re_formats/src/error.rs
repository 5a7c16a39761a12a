use std::fmt;

use thiserror::Error;

/// Which decoder raised an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    Adt,
    Mdec,
    MaskTim,
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Codec::Adt => "ADT",
            Codec::Mdec => "MDEC",
            Codec::MaskTim => "mask TIM",
        };
        f.write_str(name)
    }
}

/// Specific reason a stream was rejected as corrupt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Corruption {
    #[error("bitstream selected an unassigned Huffman code")]
    UnassignedCode,
    #[error("code for symbol {symbol} collides with an existing code")]
    OverlappingCodes { symbol: usize },
    #[error("code length {length} for symbol {symbol} exceeds 17 bits")]
    CodeLengthOutOfRange { symbol: usize, length: u32 },
    #[error("code length run ends at {end}, past the {limit}-entry table")]
    TooManyCodeLengths { end: usize, limit: usize },
    #[error("unary prefix longer than {limit} bits")]
    PrefixTooLong { limit: u32 },
    #[error("no AC table entry for code {code:#04x} after {zeros} leading zeros")]
    UnknownAcCode { code: u32, zeros: u32 },
    #[error("AC coefficient index {index} runs past the 8x8 block")]
    CoefficientOverflow { index: usize },
    #[error("DC predictor {value} left the [-512, 511] range")]
    DcOutOfRange { value: i32 },
    #[error("back-reference {distance} reaches before the {written} bytes of history")]
    BackReferenceBeforeStart { distance: usize, written: usize },
    #[error("declared size {size} exceeds the {limit}-byte limit")]
    SizeOutOfRange { size: usize, limit: usize },
    #[error("copy of {count} bytes at output offset {position} leaves the {limit}-byte image")]
    CopyOutOfRange {
        position: usize,
        count: usize,
        limit: usize,
    },
}

/// Error conditions returned by the codecs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("{codec} stream ran past the end of its {len}-byte input")]
    TruncatedInput { codec: Codec, len: usize },
    #[error("{codec} stream is corrupt: {reason}")]
    CorruptInput { codec: Codec, reason: Corruption },
    #[error("invalid decoder parameters: {0}")]
    InvalidParameters(String),
    #[error("output buffer too small: need {needed} bytes but only {available} are available")]
    OutputTooSmall { needed: usize, available: usize },
}

impl DecodeError {
    pub(crate) fn corrupt(codec: Codec, reason: Corruption) -> Self {
        DecodeError::CorruptInput { codec, reason }
    }

    pub fn is_truncation(&self) -> bool {
        matches!(self, DecodeError::TruncatedInput { .. })
    }
}

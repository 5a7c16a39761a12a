pub mod adt;
pub mod bits;
pub mod bss;
pub mod error;
pub mod huffman;
pub mod mdec;
pub mod roomcut;

pub use adt::{
    AdtBackground, AdtDecoder, AdtOptions, decode_adt, decode_adt_background,
    decode_adt_background_with, decode_adt_to_vec,
};
pub use bss::{BssBackground, BssFile, BssHeader, BssLayout, BssSection, unpack_mask_tim};
pub use error::{Codec, Corruption, DecodeError};
pub use mdec::{MdecDecoder, MdecParams, MdecVersion, decode_mdec};
pub use roomcut::{CameraView, RoomCutArchive, RoomCutEntry};

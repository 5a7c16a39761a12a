//! BSS room backgrounds.
//!
//! A BSS file holds one fixed-size section per camera. Each section starts
//! with a small header followed by an MDEC frame; the mask image for the
//! camera, when there is one, trails the frame as a compressed TIM.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, ensure};
use byteorder::{ByteOrder, LittleEndian};
use log::{debug, warn};
use memmap2::{Mmap, MmapOptions};
use serde::Serialize;

use crate::error::{Codec, Corruption, DecodeError};
use crate::mdec::{MdecDecoder, MdecParams};

pub const BSS_FRAME_ID: u16 = 0x3800;
pub const FRAME_WIDTH: u32 = 320;
pub const FRAME_HEIGHT: u32 = 240;

const HEADER_LEN: usize = 8;
/// The mask scan starts this far past the end of the frame data.
const MASK_SCAN_LEAD: usize = 3;
const MASK_HEADER_LEN: usize = 6;
const MASK_MARKER: u16 = 0xFFFF;
const MASK_TERMINATOR: u8 = 0xFF;
/// Largest unpacked mask accepted; real masks are a few tens of KiB.
pub const MAX_MASK_LEN: usize = 1 << 20;

/// Section size used by the game release that produced the file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BssLayout {
    /// 32 KiB per camera.
    Re1,
    /// 64 KiB per camera.
    #[default]
    Re2,
}

impl BssLayout {
    pub fn section_size(self) -> usize {
        match self {
            BssLayout::Re1 => 32 << 10,
            BssLayout::Re2 => 64 << 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BssHeader {
    pub length: u16,
    pub id: u16,
    pub qscale: u16,
    pub version: u16,
}

impl BssHeader {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        ensure!(
            bytes.len() >= HEADER_LEN,
            "BSS section header needs {HEADER_LEN} bytes, found {}",
            bytes.len()
        );
        let header = BssHeader {
            length: LittleEndian::read_u16(&bytes[0..2]),
            id: LittleEndian::read_u16(&bytes[2..4]),
            qscale: LittleEndian::read_u16(&bytes[4..6]),
            version: LittleEndian::read_u16(&bytes[6..8]),
        };
        ensure!(
            header.id == BSS_FRAME_ID,
            "BSS section id {:#06x} is not {BSS_FRAME_ID:#06x}",
            header.id
        );
        Ok(header)
    }
}

/// One camera's section, borrowed from the file bytes.
#[derive(Debug, Clone, Copy)]
pub struct BssSection<'a> {
    pub camera: usize,
    pub header: BssHeader,
    /// Bytes after the header, clipped to one section size and the file end.
    pub payload: &'a [u8],
}

/// A decoded camera background.
#[derive(Debug, Clone)]
pub struct BssBackground {
    pub camera: usize,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
    pub bytes_consumed: usize,
    /// Payload offset where the mask TIM was found.
    pub mask_offset: Option<usize>,
    /// Unpacked mask TIM image.
    pub mask: Option<Vec<u8>>,
}

/// Number of cameras whose header fits inside `len` bytes.
pub fn camera_count(len: usize, layout: BssLayout) -> usize {
    if len < HEADER_LEN {
        0
    } else {
        (len - HEADER_LEN) / layout.section_size() + 1
    }
}

pub fn parse_section(data: &[u8], layout: BssLayout, camera: usize) -> Result<BssSection<'_>> {
    let size = layout.section_size();
    let start = camera
        .checked_mul(size)
        .ok_or_else(|| anyhow!("BSS camera index {camera} overflows"))?;
    ensure!(
        start + HEADER_LEN <= data.len(),
        "BSS camera {camera} starts beyond the {}-byte file",
        data.len()
    );

    let header = BssHeader::parse(&data[start..start + HEADER_LEN])
        .with_context(|| format!("reading header for camera {camera}"))?;
    let payload_start = start + HEADER_LEN;
    let payload_end = (payload_start + size).min(data.len());

    Ok(BssSection {
        camera,
        header,
        payload: &data[payload_start..payload_end],
    })
}

impl BssSection<'_> {
    pub fn decode(&self, allow_zero_padding: bool) -> Result<BssBackground> {
        decode_section(self, allow_zero_padding)
    }
}

pub fn decode_section(section: &BssSection<'_>, allow_zero_padding: bool) -> Result<BssBackground> {
    let header = section.header;
    let params = MdecParams::new(
        header.version as i32,
        FRAME_WIDTH as i32,
        FRAME_HEIGHT as i32,
        header.qscale as i32,
    )
    .with_context(|| format!("camera {} header", section.camera))?;

    let (rgba, consumed) = MdecDecoder::new(params)
        .allow_zero_padding(allow_zero_padding)
        .decode_to_vec(section.payload)
        .with_context(|| format!("decoding camera {} frame", section.camera))?;

    let mask_offset = find_mask_offset(section.payload, consumed);
    let mask = match mask_offset {
        Some(offset) => match unpack_mask_tim(&section.payload[offset..]) {
            Ok(mask) => mask,
            Err(err) => {
                warn!(
                    "camera {}: mask at payload offset {offset} unreadable: {err}",
                    section.camera
                );
                None
            }
        },
        None => {
            warn!(
                "camera {}: no mask sentinel after {consumed} frame bytes",
                section.camera
            );
            None
        }
    };

    debug!(
        "camera {}: version {} qscale {}, {consumed} frame bytes, mask {}",
        section.camera,
        header.version,
        header.qscale,
        mask.as_ref().map_or(0, Vec::len)
    );

    Ok(BssBackground {
        camera: section.camera,
        width: FRAME_WIDTH,
        height: FRAME_HEIGHT,
        rgba,
        bytes_consumed: consumed,
        mask_offset,
        mask,
    })
}

/// Locate the mask TIM that follows a frame of `consumed` bytes.
///
/// The frame is word padded with no explicit length, so this looks for the
/// high byte of the TIM size followed by its marker word. The scan never
/// leaves the payload.
pub fn find_mask_offset(payload: &[u8], consumed: usize) -> Option<usize> {
    let mut probe = consumed.checked_add(MASK_SCAN_LEAD)?;
    while probe + 2 < payload.len() {
        let marker = LittleEndian::read_u16(&payload[probe + 1..probe + 3]);
        if payload[probe] == 0 && (marker == MASK_MARKER || marker == 0) {
            return Some(probe - MASK_SCAN_LEAD);
        }
        probe += 1;
    }
    None
}

/// Unpack a compressed mask TIM. Returns `None` when the header does not
/// carry the mask marker.
pub fn unpack_mask_tim(data: &[u8]) -> Result<Option<Vec<u8>>, DecodeError> {
    let truncated = || DecodeError::TruncatedInput {
        codec: Codec::MaskTim,
        len: data.len(),
    };
    if data.len() < MASK_HEADER_LEN {
        return Err(truncated());
    }
    if LittleEndian::read_u16(&data[4..6]) != MASK_MARKER {
        return Ok(None);
    }
    let size = LittleEndian::read_u32(&data[0..4]) as usize;
    if size > MAX_MASK_LEN {
        return Err(DecodeError::corrupt(
            Codec::MaskTim,
            Corruption::SizeOutOfRange {
                size,
                limit: MAX_MASK_LEN,
            },
        ));
    }

    let mut out: Vec<u8> = Vec::new();
    let mut pos = MASK_HEADER_LEN;
    let mut next = || {
        let byte = data.get(pos).copied().ok_or_else(truncated);
        pos += 1;
        byte
    };
    let overrun = |position: usize, count: usize| {
        DecodeError::corrupt(
            Codec::MaskTim,
            Corruption::CopyOutOfRange {
                position,
                count,
                limit: size,
            },
        )
    };

    loop {
        let control = next()?;
        if control & 0x10 == 0 {
            let low = next()?;
            let distance = ((((control & 0xE0) as i32) - 256) << 3) | low as i32;
            let back = distance.unsigned_abs() as usize;
            let mut count = (control & 0x0F) as usize;
            if count == 0x0F {
                count += next()? as usize;
            }
            count += 3;

            if back > out.len() {
                return Err(DecodeError::corrupt(
                    Codec::MaskTim,
                    Corruption::BackReferenceBeforeStart {
                        distance: back,
                        written: out.len(),
                    },
                ));
            }
            if out.len() + count > size {
                return Err(overrun(out.len(), count));
            }
            for _ in 0..count {
                let byte = out[out.len() - back];
                out.push(byte);
            }
            continue;
        }

        if control == MASK_TERMINATOR {
            break;
        }

        let mut run = 16 - (control & 0x0F) as usize;
        if run == 16 {
            run += next()? as usize;
        }
        if out.len() + run > size {
            return Err(overrun(out.len(), run));
        }
        for _ in 0..run {
            let byte = next()?;
            out.push(byte);
        }
    }

    if out.len() < size {
        warn!(
            "mask TIM stream ended after {} of {size} bytes; zero-filling",
            out.len()
        );
        out.resize(size, 0);
    }
    Ok(Some(out))
}

/// A memory-mapped BSS file.
#[derive(Debug)]
pub struct BssFile {
    path: PathBuf,
    mmap: Mmap,
    layout: BssLayout,
}

impl BssFile {
    pub fn open<P: AsRef<Path>>(path: P, layout: BssLayout) -> Result<Self> {
        let path_buf = path.as_ref().to_path_buf();
        let file = File::open(&path_buf)
            .with_context(|| format!("opening BSS file at {}", path_buf.display()))?;
        let len = file
            .metadata()
            .with_context(|| format!("reading metadata for {}", path_buf.display()))?
            .len();
        ensure!(len > 0, "BSS file {} is empty", path_buf.display());
        let mmap = unsafe { MmapOptions::new().map(&file) }
            .with_context(|| format!("memory-mapping BSS file {}", path_buf.display()))?;

        Ok(BssFile {
            path: path_buf,
            mmap,
            layout,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn layout(&self) -> BssLayout {
        self.layout
    }

    pub fn bytes(&self) -> &[u8] {
        &self.mmap
    }

    pub fn camera_count(&self) -> usize {
        camera_count(self.mmap.len(), self.layout)
    }

    pub fn section(&self, camera: usize) -> Result<BssSection<'_>> {
        parse_section(&self.mmap, self.layout, camera)
            .with_context(|| format!("reading {}", self.path.display()))
    }

    pub fn decode_camera(&self, camera: usize, allow_zero_padding: bool) -> Result<BssBackground> {
        let section = self.section(camera)?;
        decode_section(&section, allow_zero_padding)
            .with_context(|| format!("decoding {}", self.path.display()))
    }
}

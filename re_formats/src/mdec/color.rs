//! 4:2:0 YCbCr to RGBA conversion for one macroblock.

use super::{MACROBLOCK_SIZE, round_shift};

const CR_TO_R: i32 = 1434;
const CB_TO_G: i32 = -351;
const CR_TO_G: i32 = -728;
const CB_TO_B: i32 = 1807;
const LUMA_SHIFT: u32 = 10;
const OUTPUT_SHIFT: u32 = 20;

/// Clamp a signed sample to a byte, centred on 128.
#[inline]
fn clamp_biased(value: i32) -> u8 {
    if value < -128 {
        0
    } else if value > 127 {
        255
    } else {
        (value + 128) as u8
    }
}

fn channel(luma: i32, chroma: i32) -> u8 {
    clamp_biased(round_shift(luma.wrapping_add(chroma), OUTPUT_SHIFT))
}

pub(crate) fn ycbcr_to_rgba(y: i32, cb: i32, cr: i32) -> [u8; 4] {
    let luma = y << LUMA_SHIFT;
    let red = CR_TO_R.wrapping_mul(cr);
    let green = CB_TO_G
        .wrapping_mul(cb)
        .wrapping_add(CR_TO_G.wrapping_mul(cr));
    let blue = CB_TO_B.wrapping_mul(cb);
    [
        channel(luma, red),
        channel(luma, green),
        channel(luma, blue),
        255,
    ]
}

/// Write a transformed macroblock (`[Cr, Cb, Y0, Y1, Y2, Y3]`) into an RGBA
/// raster `width` pixels wide at macroblock `(column, row)`.
pub(crate) fn write_macroblock(
    blocks: &[[i32; 64]; 6],
    frame: &mut [u8],
    width: usize,
    column: usize,
    row: usize,
) {
    let [cr, cb, luma @ ..] = blocks;
    for py in 0..MACROBLOCK_SIZE {
        let line = (row * MACROBLOCK_SIZE + py) * width + column * MACROBLOCK_SIZE;
        for px in 0..MACROBLOCK_SIZE {
            let chroma = (py / 2) * 8 + px / 2;
            let quadrant = (py / 8) * 2 + px / 8;
            let y = luma[quadrant][(py % 8) * 8 + px % 8];
            let offset = (line + px) * 4;
            frame[offset..offset + 4].copy_from_slice(&ycbcr_to_rgba(y, cb[chroma], cr[chroma]));
        }
    }
}

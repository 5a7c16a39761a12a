//! Scaled AAN inverse DCT over 12-bit fixed point.
//!
//! Columns run first, then rows. Columns that never received a coefficient
//! below row 0 are filled from their top value instead of transformed, and a
//! block whose only live column is column 0 gets the same treatment per row.
//! The shortcuts produce exactly what the butterfly would for such input.

use std::num::Wrapping;

use super::ColumnUsage;

const CONST_BITS: usize = 12;
const FIX_1_082392200: Wrapping<i32> = Wrapping(4433);
const FIX_1_414213562: Wrapping<i32> = Wrapping(5793);
const FIX_1_847759065: Wrapping<i32> = Wrapping(7568);
const FIX_2_613125930: Wrapping<i32> = Wrapping(10703);

#[inline]
fn descale(value: Wrapping<i32>) -> Wrapping<i32> {
    value >> CONST_BITS
}

/// One 8-point pass. Arithmetic wraps like the 32-bit hardware path.
fn butterfly(input: [i32; 8]) -> [i32; 8] {
    let p = input.map(Wrapping);

    let z10 = p[0] + p[4];
    let z11 = p[0] - p[4];
    let z13 = p[2] + p[6];
    let z12 = descale((p[2] - p[6]) * FIX_1_414213562) - z13;

    let tmp0 = z10 + z13;
    let tmp3 = z10 - z13;
    let tmp1 = z11 + z12;
    let tmp2 = z11 - z12;

    let z13 = p[3] + p[5];
    let z10 = p[3] - p[5];
    let z11 = p[1] + p[7];
    let z12 = p[1] - p[7];

    let tmp7 = z11 + z13;
    let z5 = (z12 - z10) * FIX_1_847759065;
    let tmp6 = descale(z10 * FIX_2_613125930 + z5) - tmp7;
    let tmp5 = descale((z11 - z13) * FIX_1_414213562) - tmp6;
    let tmp4 = descale(z12 * FIX_1_082392200 - z5) + tmp5;

    [
        tmp0 + tmp7,
        tmp1 + tmp6,
        tmp2 + tmp5,
        tmp3 - tmp4,
        tmp3 + tmp4,
        tmp2 - tmp5,
        tmp1 - tmp6,
        tmp0 - tmp7,
    ]
    .map(|value| value.0)
}

/// Transform a dequantised block in place into spatial samples.
pub(crate) fn idct(block: &mut [i32; 64], usage: ColumnUsage) {
    let mut used = match usage {
        ColumnUsage::DcOnly => {
            let dc = block[0];
            block.fill(dc);
            return;
        }
        ColumnUsage::Columns(mask) => mask,
    };

    for column in 0..8 {
        if used & (1 << column) == 0 {
            let top = block[column];
            if top != 0 {
                for row in 1..8 {
                    block[row * 8 + column] = top;
                }
                used |= 1 << column;
            }
            continue;
        }

        let input = std::array::from_fn(|row| block[row * 8 + column]);
        for (row, value) in butterfly(input).into_iter().enumerate() {
            block[row * 8 + column] = value;
        }
    }

    if used == 1 {
        for row in block.chunks_exact_mut(8) {
            let first = row[0];
            row.fill(first);
        }
    } else {
        for row in block.chunks_exact_mut(8) {
            let input = std::array::from_fn(|i| row[i]);
            row.copy_from_slice(&butterfly(input));
        }
    }
}

use std::ops::Deref;

use super::error::{QRError, QRResult};
use super::metadata::Color;
use crate::builder::QR;

#[derive(Debug, PartialEq, Eq, Copy, Clone, PartialOrd, Ord)]
pub struct MaskPattern(u8);

impl MaskPattern {
    pub fn new(pattern: u8) -> QRResult<Self> {
        if pattern < 8 {
            Ok(Self(pattern))
        } else {
            Err(QRError::InvalidMaskingPattern)
        }
    }
}

impl Deref for MaskPattern {
    type Target = u8;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

mod mask_functions {
    pub fn checkerboard(r: i16, c: i16) -> bool {
        (r + c) & 1 == 0
    }

    pub fn horizontal_lines(r: i16, _: i16) -> bool {
        r & 1 == 0
    }

    pub fn vertical_lines(_: i16, c: i16) -> bool {
        c % 3 == 0
    }

    pub fn diagonal_lines(r: i16, c: i16) -> bool {
        (r + c) % 3 == 0
    }

    pub fn large_checkerboard(r: i16, c: i16) -> bool {
        ((r >> 1) + (c / 3)) & 1 == 0
    }

    pub fn fields(r: i16, c: i16) -> bool {
        ((r * c) & 1) + ((r * c) % 3) == 0
    }

    pub fn diamonds(r: i16, c: i16) -> bool {
        (((r * c) & 1) + ((r * c) % 3)) & 1 == 0
    }

    pub fn meadow(r: i16, c: i16) -> bool {
        (((r + c) & 1) + ((r * c) % 3)) & 1 == 0
    }
}

impl MaskPattern {
    pub fn mask_function(self) -> fn(i16, i16) -> bool {
        match *self {
            0b000 => mask_functions::checkerboard,
            0b001 => mask_functions::horizontal_lines,
            0b010 => mask_functions::vertical_lines,
            0b011 => mask_functions::diagonal_lines,
            0b100 => mask_functions::large_checkerboard,
            0b101 => mask_functions::fields,
            0b110 => mask_functions::diamonds,
            0b111 => mask_functions::meadow,
            _ => unreachable!("Invalid pattern"),
        }
    }
}

/// Evaluates all 8 patterns and applies the one with the lowest penalty.
/// Ties break towards the lowest pattern index.
pub fn apply_best_mask(qr: &mut QR) -> MaskPattern {
    let best_mask = (0..8)
        .min_by_key(|m| {
            let mut qr = qr.clone();
            qr.apply_mask(MaskPattern(*m));
            compute_total_penalty(&qr)
        })
        .expect("At least 1 mask is evaluated");
    let best_mask = MaskPattern(best_mask);
    qr.apply_mask(best_mask);
    best_mask
}

pub fn compute_total_penalty(qr: &QR) -> u32 {
    let adj_pen = compute_adjacent_penalty(qr);
    let blk_pen = compute_block_penalty(qr);
    let fp_pen_h = compute_finder_pattern_penalty(qr, true);
    let fp_pen_v = compute_finder_pattern_penalty(qr, false);
    let bal_pen = compute_balance_penalty(qr);
    adj_pen + blk_pen + fp_pen_h + fp_pen_v + bal_pen
}

// 3 points per same colored run of 5, plus 1 per extra module
fn compute_adjacent_penalty(qr: &QR) -> u32 {
    let mut pen = 0;
    let w = qr.width() as i16;
    for i in 0..w {
        let mut row_run = (Color::Light, 0u32);
        let mut col_run = (Color::Light, 0u32);
        for j in 0..w {
            let row_clr = *qr.get(i, j);
            if row_run.0 != row_clr || j == 0 {
                row_run = (row_clr, 0);
            }
            row_run.1 += 1;
            if row_run.1 == 5 {
                pen += 3;
            } else if row_run.1 > 5 {
                pen += 1;
            }
            let col_clr = *qr.get(j, i);
            if col_run.0 != col_clr || j == 0 {
                col_run = (col_clr, 0);
            }
            col_run.1 += 1;
            if col_run.1 == 5 {
                pen += 3;
            } else if col_run.1 > 5 {
                pen += 1;
            }
        }
    }
    pen
}

// 3 points per 2x2 block of a single color
fn compute_block_penalty(qr: &QR) -> u32 {
    let mut pen = 0;
    let w = qr.width() as i16;
    for r in 0..w - 1 {
        for c in 0..w - 1 {
            let clr = *qr.get(r, c);
            if clr == *qr.get(r + 1, c) && clr == *qr.get(r, c + 1) && clr == *qr.get(r + 1, c + 1)
            {
                pen += 3;
            }
        }
    }
    pen
}

// 40 points per 1011101 run flanked by 4 light modules on either side.
// Cells beyond the symbol count as light, matching the quiet zone.
fn compute_finder_pattern_penalty(qr: &QR, is_hor: bool) -> u32 {
    static PATTERN: [Color; 7] = [
        Color::Dark,
        Color::Light,
        Color::Dark,
        Color::Dark,
        Color::Dark,
        Color::Light,
        Color::Dark,
    ];
    let mut pen = 0;
    let w = qr.width() as i16;
    for i in 0..w {
        let get = |x: i16| -> Color {
            if x < 0 || x >= w {
                return Color::Light;
            }
            if is_hor {
                *qr.get(i, x)
            } else {
                *qr.get(x, i)
            }
        };
        for j in 0..w - 6 {
            if (j..j + 7).map(&get).ne(PATTERN.iter().copied()) {
                continue;
            }
            let light_flank =
                |range: std::ops::Range<i16>| range.map(&get).all(|clr| clr == Color::Light);
            if light_flank(j - 4..j) || light_flank(j + 7..j + 11) {
                pen += 40;
            }
        }
    }
    pen
}

// 10 points per 5% deviation of the dark module share from 50%
fn compute_balance_penalty(qr: &QR) -> u32 {
    let dark_cnt = qr.count_dark_modules();
    let tot = qr.width() * qr.width();
    let percent = dark_cnt * 100 / tot;
    let deviation = if percent < 50 { 50 - percent } else { percent - 50 };
    (deviation / 5) as u32 * 10
}

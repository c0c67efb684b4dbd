use image::{Rgb, RgbImage};

use crate::builder::QR;
use crate::common::metadata::Color;

// Image render
//------------------------------------------------------------------------------

/// Presentation parameters. `module_size` scales the drawn square of data
/// modules relative to the cell; function patterns always fill their cell so
/// scanners can still lock onto them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub module_px: u32,
    pub quiet_zone: u32,
    pub module_size: f64,
    pub light: Rgb<u8>,
    pub dark: Rgb<u8>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            module_px: 8,
            quiet_zone: 4,
            module_size: 1.0,
            light: Rgb([255, 255, 255]),
            dark: Rgb([0, 0, 0]),
        }
    }
}

pub fn to_image(qr: &QR, opts: &RenderOptions) -> RgbImage {
    let module_px = opts.module_px.max(1);
    let w = qr.width() as u32;
    let qz_px = opts.quiet_zone * module_px;
    let total_px = qz_px + w * module_px + qz_px;

    let frac = opts.module_size.clamp(0.0, 1.0);
    let dot_px = (module_px as f64 * frac).round() as u32;
    let dot_off = (module_px - dot_px) / 2;

    let mut canvas = RgbImage::from_pixel(total_px, total_px, opts.light);
    for r in 0..w {
        for c in 0..w {
            let module = qr.get(r as i16, c as i16);
            if *module != Color::Dark {
                continue;
            }
            let x0 = qz_px + c * module_px;
            let y0 = qz_px + r * module_px;
            let (off, sz) = if module.module_type().is_functional() {
                (0, module_px)
            } else {
                (dot_off, dot_px)
            };
            for y in y0 + off..y0 + off + sz {
                for x in x0 + off..x0 + off + sz {
                    canvas.put_pixel(x, y, opts.dark);
                }
            }
        }
    }

    canvas
}

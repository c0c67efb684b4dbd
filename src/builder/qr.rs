use std::ops::Deref;

use crate::common::iter::EncRegionIter;
use crate::common::mask::MaskPattern;
use crate::common::metadata::{
    format_info, Color, ECLevel, Version, FORMAT_INFO_BIT_LEN, FORMAT_INFO_COORDS_MAIN,
    FORMAT_INFO_COORDS_SIDE, MAX_QR_SIZE, VERSION_INFO_BIT_LEN, VERSION_INFO_COORDS_BL,
    VERSION_INFO_COORDS_TR,
};
use crate::common::BitStream;

// Module
//------------------------------------------------------------------------------

/// A single cell of the symbol, tagged with the structure it belongs to.
/// Separators and remainder cells are always light, so they carry no color.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Module {
    Empty,
    Finder(Color),
    Separator,
    Timing(Color),
    Alignment(Color),
    Format(Color),
    Version(Color),
    Data(Color),
    Remainder,
}

impl Deref for Module {
    type Target = Color;
    fn deref(&self) -> &Self::Target {
        match self {
            Module::Empty | Module::Separator | Module::Remainder => &Color::Light,
            Module::Finder(c)
            | Module::Timing(c)
            | Module::Alignment(c)
            | Module::Format(c)
            | Module::Version(c)
            | Module::Data(c) => c,
        }
    }
}

impl Module {
    pub fn module_type(self) -> ModuleType {
        match self {
            Module::Finder(_) => ModuleType::Finder,
            Module::Separator => ModuleType::Separator,
            Module::Timing(_) => ModuleType::Timing,
            Module::Alignment(_) => ModuleType::Alignment,
            Module::Format(_) => ModuleType::FormatInfo,
            Module::Version(_) => ModuleType::VersionInfo,
            Module::Empty | Module::Data(_) => ModuleType::Data,
            Module::Remainder => ModuleType::Remainder,
        }
    }
}

/// Structural role of a cell, exposed alongside the color matrix so callers
/// can treat function patterns and payload modules differently.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum ModuleType {
    Finder,
    Separator,
    Timing,
    Alignment,
    FormatInfo,
    VersionInfo,
    Data,
    Remainder,
}

impl ModuleType {
    /// Function patterns and info fields carry symbol structure rather than
    /// message payload.
    pub fn is_functional(self) -> bool {
        !matches!(self, ModuleType::Data | ModuleType::Remainder)
    }
}

// QR type for builder
//------------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct QR {
    grid: Box<[Module; MAX_QR_SIZE]>,
    w: usize,
    ver: Version,
    ecl: ECLevel,
    mask: Option<MaskPattern>,
}

impl QR {
    pub fn new(ver: Version, ecl: ECLevel) -> Self {
        let w = ver.width();
        Self { grid: Box::new([Module::Empty; MAX_QR_SIZE]), w, ver, ecl, mask: None }
    }

    pub fn grid(&self) -> &[Module] {
        &self.grid[..self.w * self.w]
    }

    pub fn version(&self) -> Version {
        self.ver
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn ec_level(&self) -> ECLevel {
        self.ecl
    }

    pub fn mask(&self) -> Option<MaskPattern> {
        self.mask
    }

    pub fn count_dark_modules(&self) -> usize {
        self.grid().iter().filter(|&m| matches!(**m, Color::Dark)).count()
    }

    /// Color and structural role of every cell, row major.
    pub fn to_matrices(&self) -> (Vec<Vec<bool>>, Vec<Vec<ModuleType>>) {
        let w = self.w as i16;
        let mut colors = Vec::with_capacity(self.w);
        let mut types = Vec::with_capacity(self.w);
        for r in 0..w {
            let mut color_row = Vec::with_capacity(self.w);
            let mut type_row = Vec::with_capacity(self.w);
            for c in 0..w {
                let m = self.get(r, c);
                debug_assert!(m != Module::Empty, "Empty module at {r} {c}");
                color_row.push(*m == Color::Dark);
                type_row.push(m.module_type());
            }
            colors.push(color_row);
            types.push(type_row);
        }
        (colors, types)
    }

    #[cfg(test)]
    pub fn to_debug_str(&self) -> String {
        let w = self.w as i16;
        let mut res = String::with_capacity((w * (w + 1)) as usize);
        res.push('\n');
        for i in 0..w {
            for j in 0..w {
                let c = match self.get(i, j) {
                    Module::Empty => '.',
                    Module::Finder(Color::Dark) => 'f',
                    Module::Finder(Color::Light) => 'F',
                    Module::Separator => 'S',
                    Module::Timing(Color::Dark) => 't',
                    Module::Timing(Color::Light) => 'T',
                    Module::Alignment(Color::Dark) => 'a',
                    Module::Alignment(Color::Light) => 'A',
                    Module::Format(Color::Dark) => 'm',
                    Module::Format(Color::Light) => 'M',
                    Module::Version(Color::Dark) => 'v',
                    Module::Version(Color::Light) => 'V',
                    Module::Data(Color::Dark) => 'd',
                    Module::Data(Color::Light) => 'D',
                    Module::Remainder => 'R',
                };
                res.push(c);
            }
            res.push('\n');
        }
        res
    }

    fn coord_to_index(&self, r: i16, c: i16) -> usize {
        let w = self.w as i16;
        debug_assert!(-w <= r && r < w, "row out of bounds: {r}");
        debug_assert!(-w <= c && c < w, "column out of bounds: {c}");

        let r = if r < 0 { r + w } else { r };
        let c = if c < 0 { c + w } else { c };
        (r * w + c) as _
    }

    pub fn get(&self, r: i16, c: i16) -> Module {
        self.grid[self.coord_to_index(r, c)]
    }

    pub fn set(&mut self, r: i16, c: i16, module: Module) {
        let index = self.coord_to_index(r, c);
        self.grid[index] = module;
    }
}


// Finder patterns and separators
//------------------------------------------------------------------------------

impl QR {
    fn draw_finder_patterns(&mut self) {
        self.draw_finder_pattern_at(3, 3);
        self.draw_finder_pattern_at(3, -4);
        self.draw_finder_pattern_at(-4, 3);
    }

    fn draw_finder_pattern_at(&mut self, r: i16, c: i16) {
        let (dr_left, dr_right) = if r > 0 { (-3, 4) } else { (-4, 3) };
        let (dc_top, dc_bottom) = if c > 0 { (-3, 4) } else { (-4, 3) };
        for i in dr_left..=dr_right {
            for j in dc_top..=dc_bottom {
                self.set(
                    r + i,
                    c + j,
                    match (i, j) {
                        (4 | -4, _) | (_, 4 | -4) => Module::Separator,
                        (3 | -3, _) | (_, 3 | -3) => Module::Finder(Color::Dark),
                        (2 | -2, _) | (_, 2 | -2) => Module::Finder(Color::Light),
                        _ => Module::Finder(Color::Dark),
                    },
                );
            }
        }
    }
}


// Timing patterns
//------------------------------------------------------------------------------

impl QR {
    fn draw_timing_pattern(&mut self) {
        let w = self.w as i16;
        self.draw_line(6, 8, 6, w - 9);
        self.draw_line(8, 6, w - 9, 6);
    }

    fn draw_line(&mut self, r1: i16, c1: i16, r2: i16, c2: i16) {
        debug_assert!(r1 == r2 || c1 == c2, "Line is neither vertical nor horizontal");

        if r1 == r2 {
            for j in c1..=c2 {
                let clr = if j & 1 == 0 { Color::Dark } else { Color::Light };
                self.set(r1, j, Module::Timing(clr));
            }
        } else {
            for i in r1..=r2 {
                let clr = if i & 1 == 0 { Color::Dark } else { Color::Light };
                self.set(i, c1, Module::Timing(clr));
            }
        }
    }
}


// Alignment patterns
//------------------------------------------------------------------------------

impl QR {
    fn draw_alignment_patterns(&mut self) {
        let poses = self.ver.alignment_pattern();
        for &r in poses {
            for &c in poses {
                self.draw_alignment_pattern_at(r, c)
            }
        }
    }

    // Centers colliding with the three finders are skipped
    fn draw_alignment_pattern_at(&mut self, r: i16, c: i16) {
        let w = self.w as i16;
        if (r == 6 && (c == 6 || c - w == -7)) || (r - w == -7 && c == 6) {
            return;
        }
        for i in -2..=2 {
            for j in -2..=2 {
                self.set(
                    r + i,
                    c + j,
                    match (i, j) {
                        (-2 | 2, _) | (_, -2 | 2) | (0, 0) => Module::Alignment(Color::Dark),
                        _ => Module::Alignment(Color::Light),
                    },
                )
            }
        }
    }
}

#[cfg(test)]
mod alignment_pattern_tests {
    use crate::builder::QR;
    use crate::common::metadata::{ECLevel, Version};

    #[test]
    fn test_alignment_pattern_1() {
        let mut qr = QR::new(Version::new(1).unwrap(), ECLevel::L);
        qr.draw_finder_patterns();
        qr.draw_alignment_patterns();
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             fffffffS.....Sfffffff\n\
             fFFFFFfS.....SfFFFFFf\n\
             fFfffFfS.....SfFfffFf\n\
             fFfffFfS.....SfFfffFf\n\
             fFfffFfS.....SfFfffFf\n\
             fFFFFFfS.....SfFFFFFf\n\
             fffffffS.....Sfffffff\n\
             SSSSSSSS.....SSSSSSSS\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             .....................\n\
             SSSSSSSS.............\n\
             fffffffS.............\n\
             fFFFFFfS.............\n\
             fFfffFfS.............\n\
             fFfffFfS.............\n\
             fFfffFfS.............\n\
             fFFFFFfS.............\n\
             fffffffS.............\n"
        );
    }

    #[test]
    fn test_alignment_pattern_3() {
        let mut qr = QR::new(Version::new(3).unwrap(), ECLevel::L);
        qr.draw_finder_patterns();
        qr.draw_alignment_patterns();
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             fffffffS.............Sfffffff\n\
             fFFFFFfS.............SfFFFFFf\n\
             fFfffFfS.............SfFfffFf\n\
             fFfffFfS.............SfFfffFf\n\
             fFfffFfS.............SfFfffFf\n\
             fFFFFFfS.............SfFFFFFf\n\
             fffffffS.............Sfffffff\n\
             SSSSSSSS.............SSSSSSSS\n\
             .............................\n\
             .............................\n\
             .............................\n\
             .............................\n\
             .............................\n\
             .............................\n\
             .............................\n\
             .............................\n\
             .............................\n\
             .............................\n\
             .............................\n\
             .............................\n\
             ....................aaaaa....\n\
             SSSSSSSS............aAAAa....\n\
             fffffffS............aAaAa....\n\
             fFFFFFfS............aAAAa....\n\
             fFfffFfS............aaaaa....\n\
             fFfffFfS.....................\n\
             fFfffFfS.....................\n\
             fFFFFFfS.....................\n\
             fffffffS.....................\n"
        );
    }
}

// All function patterns
//------------------------------------------------------------------------------

impl QR {
    pub fn draw_all_function_patterns(&mut self) {
        self.draw_finder_patterns();
        self.draw_timing_pattern();
        self.draw_alignment_patterns();
    }
}

#[cfg(test)]
mod all_function_patterns_test {
    use crate::builder::QR;
    use crate::common::metadata::{ECLevel, Version};

    #[test]
    fn test_all_function_patterns() {
        let mut qr = QR::new(Version::new(3).unwrap(), ECLevel::L);
        qr.draw_all_function_patterns();
        assert_eq!(
            qr.to_debug_str(),
            "\n\
             fffffffS.............Sfffffff\n\
             fFFFFFfS.............SfFFFFFf\n\
             fFfffFfS.............SfFfffFf\n\
             fFfffFfS.............SfFfffFf\n\
             fFfffFfS.............SfFfffFf\n\
             fFFFFFfS.............SfFFFFFf\n\
             fffffffStTtTtTtTtTtTtSfffffff\n\
             SSSSSSSS.............SSSSSSSS\n\
             ......t......................\n\
             ......T......................\n\
             ......t......................\n\
             ......T......................\n\
             ......t......................\n\
             ......T......................\n\
             ......t......................\n\
             ......T......................\n\
             ......t......................\n\
             ......T......................\n\
             ......t......................\n\
             ......T......................\n\
             ......t.............aaaaa....\n\
             SSSSSSSS............aAAAa....\n\
             fffffffS............aAaAa....\n\
             fFFFFFfS............aAAAa....\n\
             fFfffFfS............aaaaa....\n\
             fFfffFfS.....................\n\
             fFfffFfS.....................\n\
             fFFFFFfS.....................\n\
             fffffffS.....................\n"
        );
    }
}

// Format & version info
//------------------------------------------------------------------------------

impl QR {
    fn reserve_format_area(&mut self) {
        self.draw_format_info((1 << FORMAT_INFO_BIT_LEN) - 1);
    }

    fn draw_format_info(&mut self, format_info: u32) {
        self.draw_number(
            format_info,
            FORMAT_INFO_BIT_LEN,
            Module::Format(Color::Light),
            Module::Format(Color::Dark),
            &FORMAT_INFO_COORDS_MAIN,
        );
        self.draw_number(
            format_info,
            FORMAT_INFO_BIT_LEN,
            Module::Format(Color::Light),
            Module::Format(Color::Dark),
            &FORMAT_INFO_COORDS_SIDE,
        );
        // Dark module beside the bottom left finder, always set
        self.set(-8, 8, Module::Format(Color::Dark));
    }

    fn draw_version_info(&mut self) {
        if *self.ver < 7 {
            return;
        }
        let ver_info = self.ver.info();
        self.draw_number(
            ver_info,
            VERSION_INFO_BIT_LEN,
            Module::Version(Color::Light),
            Module::Version(Color::Dark),
            &VERSION_INFO_COORDS_BL,
        );
        self.draw_number(
            ver_info,
            VERSION_INFO_BIT_LEN,
            Module::Version(Color::Light),
            Module::Version(Color::Dark),
            &VERSION_INFO_COORDS_TR,
        );
    }

    fn draw_number(
        &mut self,
        number: u32,
        bit_len: usize,
        off_clr: Module,
        on_clr: Module,
        coords: &[(i16, i16)],
    ) {
        let mut mask = 1 << (bit_len - 1);
        for (r, c) in coords {
            if number & mask == 0 {
                self.set(*r, *c, off_clr);
            } else {
                self.set(*r, *c, on_clr);
            }
            mask >>= 1;
        }
    }
}


// Encoding region
//------------------------------------------------------------------------------

impl QR {
    pub fn draw_encoding_region(&mut self, payload: BitStream) {
        self.reserve_format_area();
        self.draw_version_info();
        self.draw_payload(payload);

        let sz = self.w * self.w;
        debug_assert!(!self.grid[..sz].contains(&Module::Empty), "Empty module found in debug");
    }

    fn draw_payload(&mut self, payload: BitStream) {
        let mut coords = EncRegionIter::new(self.ver);
        for bit in payload {
            let module = Module::Data(if bit { Color::Dark } else { Color::Light });
            for (r, c) in coords.by_ref() {
                if matches!(self.get(r, c), Module::Empty) {
                    self.set(r, c, module);
                    break;
                }
            }
        }
        self.fill_remainder_bits(coords);
    }

    // The cells left over after the last codeword stay light and are exempt
    // from masking
    fn fill_remainder_bits(&mut self, coords: impl Iterator<Item = (i16, i16)>) {
        let mut n = 0;
        for (r, c) in coords {
            if matches!(self.get(r, c), Module::Empty) {
                self.set(r, c, Module::Remainder);
                n += 1;
            }
        }
        debug_assert_eq!(n, self.ver.remainder_bits(), "Unexpected remainder cell count");
    }

    pub fn apply_mask(&mut self, pattern: MaskPattern) {
        self.mask = Some(pattern);
        let mask_fn = pattern.mask_function();
        let w = self.w as i16;
        for r in 0..w {
            for c in 0..w {
                if mask_fn(r, c) {
                    if let Module::Data(clr) = self.get(r, c) {
                        self.set(r, c, Module::Data(!clr))
                    }
                }
            }
        }
        let format_info = format_info(self.ecl, pattern);
        self.draw_format_info(format_info);
    }
}

// Terminal render
//------------------------------------------------------------------------------

impl QR {
    pub fn to_str(&self, module_sz: usize) -> String {
        let qz_sz = 4 * module_sz;
        let qr_sz = self.w * module_sz;
        let total_sz = qz_sz + qr_sz + qz_sz;

        let mut canvas = String::new();
        for i in 0..total_sz {
            for j in 0..total_sz {
                if i < qz_sz || i >= qz_sz + qr_sz || j < qz_sz || j >= qz_sz + qr_sz {
                    canvas.push(' ');
                    continue;
                }
                let r = ((i - qz_sz) / module_sz) as i16;
                let c = ((j - qz_sz) / module_sz) as i16;
                canvas.push(self.get(r, c).select('█', ' '));
            }
            canvas.push('\n');
        }

        canvas
    }
}

#[cfg(test)]
mod encoding_region_tests {
    use crate::builder::{ModuleType, QRBuilder};
    use crate::common::mask::MaskPattern;
    use crate::common::metadata::{ECLevel, Version};

    #[test]
    fn test_encoding_region_is_full() {
        for v in [1, 2, 7, 14, 21, 28, 40] {
            let ver = Version::new(v).unwrap();
            let ecl = ECLevel::Q;
            let qr = QRBuilder::new(b"REGION FILL").version(ver).ec_level(ecl).build().unwrap();
            let (colors, types) = qr.to_matrices();
            assert_eq!(colors.len(), ver.width());
            let data_cells =
                types.iter().flatten().filter(|t| matches!(t, ModuleType::Data)).count();
            assert_eq!(data_cells, ver.total_codewords(ecl) * 8);
            let remainder_cells =
                types.iter().flatten().filter(|t| matches!(t, ModuleType::Remainder)).count();
            assert_eq!(remainder_cells, ver.remainder_bits());
        }
    }

    #[test]
    fn test_remainder_cells_stay_light() {
        let ver = Version::new(2).unwrap();
        for m in 0..8 {
            let qr = QRBuilder::new(b"REMAINDER")
                .version(ver)
                .ec_level(ECLevel::L)
                .mask(MaskPattern::new(m).unwrap())
                .build()
                .unwrap();
            let (colors, types) = qr.to_matrices();
            for (color_row, type_row) in colors.iter().zip(types.iter()) {
                for (clr, ty) in color_row.iter().zip(type_row.iter()) {
                    if matches!(ty, ModuleType::Remainder) {
                        assert!(!clr, "Remainder cell must stay light");
                    }
                }
            }
        }
    }
}

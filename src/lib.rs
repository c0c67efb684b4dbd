//! # qrdot
//!
//! A QR code generator with Reed-Solomon error correction and a renderer that
//! can shrink data modules into dots while keeping function patterns intact.
//!
//! ## Quick Start
//!
//! ```rust
//! use qrdot::{encode, ECLevel};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (modules, types) = encode("Hello, World!", ECLevel::M)?;
//! assert_eq!(modules.len(), types.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Full Configuration
//!
//! ```rust
//! use qrdot::{render, ECLevel, MaskPattern, QRBuilder, RenderOptions, Version};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new(b"Hello, World!")
//!     .version(Version::new(2)?)     // If not provided, smallest version that fits
//!     .ec_level(ECLevel::Q)          // Defaults to ECLevel::M
//!     .mask(MaskPattern::new(3)?)    // If not provided, best mask by penalty score
//!     .build()?;
//!
//! let opts = RenderOptions { module_size: 0.6, ..Default::default() };
//! let img = render::to_image(&qr, &opts);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod render;

pub(crate) mod common;

pub use builder::{Module, ModuleType, QRBuilder, QR};
pub use common::error::{QRError, QRResult};
pub use common::mask::MaskPattern;
pub use common::metadata::{Color, ECLevel, Version};
pub use render::RenderOptions;

/// Encodes `text` into a QR symbol at the given error correction level,
/// choosing the smallest version, most compact mode and best mask. Returns
/// the color matrix and the matching structural classification, row major.
pub fn encode(text: &str, ec_level: ECLevel) -> QRResult<(Vec<Vec<bool>>, Vec<Vec<ModuleType>>)> {
    let qr = QRBuilder::new(text.as_bytes()).ec_level(ec_level).build()?;
    Ok(qr.to_matrices())
}

#[cfg(test)]
mod lib_tests {
    use super::{encode, ECLevel, ModuleType};

    #[test]
    fn test_encode_dimensions() {
        let (modules, types) = encode("HELLO WORLD", ECLevel::L).unwrap();
        assert_eq!(modules.len(), 21);
        assert!(modules.iter().all(|r| r.len() == 21));
        assert_eq!(types.len(), 21);
    }

    #[test]
    fn test_encode_empty_input() {
        // An empty message still yields a well formed version 1 symbol
        let (modules, types) = encode("", ECLevel::M).unwrap();
        assert_eq!(modules.len(), 21);
        assert!(types[0][0] == ModuleType::Finder);
    }

    #[test]
    fn test_encode_capacity_exceeded() {
        let data = "1".repeat(3058);
        assert!(encode(&data, ECLevel::H).is_err());
    }
}

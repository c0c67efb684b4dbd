use std::cmp::Ordering;

pub use encode::*;

// Mode
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Mode {
    Numeric = 0b0001,
    Alphanumeric = 0b0010,
    Byte = 0b0100,
}

impl PartialOrd for Mode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Mode {
    fn cmp(&self, other: &Self) -> Ordering {
        match (*self, *other) {
            (a, b) if a == b => Ordering::Equal,
            (Self::Numeric, _) | (_, Self::Byte) => Ordering::Less,
            (_, Self::Numeric) | (Self::Byte, _) => Ordering::Greater,
            _ => unreachable!(),
        }
    }
}

impl Mode {
    /// Most compact mode whose character set covers every byte of the data.
    pub fn select(data: &[u8]) -> Self {
        if data.iter().all(|b| Self::Numeric.contains(*b)) {
            Self::Numeric
        } else if data.iter().all(|b| Self::Alphanumeric.contains(*b)) {
            Self::Alphanumeric
        } else {
            Self::Byte
        }
    }

    #[inline]
    fn numeric_digit(char: u8) -> u16 {
        debug_assert!(Mode::Numeric.contains(char), "Invalid numeric data: {char}");
        (char - b'0') as u16
    }

    #[inline]
    fn alphanumeric_digit(char: u8) -> u16 {
        debug_assert!(Mode::Alphanumeric.contains(char), "Invalid alphanumeric data: {char}");
        match char {
            b'0'..=b'9' => (char - b'0') as u16,
            b'A'..=b'Z' => (char - b'A' + 10) as u16,
            b' ' => 36,
            b'$' => 37,
            b'%' => 38,
            b'*' => 39,
            b'+' => 40,
            b'-' => 41,
            b'.' => 42,
            b'/' => 43,
            b':' => 44,
            _ => unreachable!("Invalid alphanumeric {char}"),
        }
    }

    pub fn encode_chunk(&self, data: &[u8]) -> u16 {
        let len = data.len();
        match self {
            Self::Numeric => {
                debug_assert!(len <= 3, "Chunk is too long for numeric conversion: {len}");
                data.iter().fold(0_u16, |n, b| n * 10 + Self::numeric_digit(*b))
            }
            Self::Alphanumeric => {
                debug_assert!(len <= 2, "Chunk is too long for alphanumeric conversion: {len}");
                data.iter().fold(0_u16, |n, b| n * 45 + Self::alphanumeric_digit(*b))
            }
            Self::Byte => {
                debug_assert!(len == 1, "Chunk is too long for byte conversion: {len}");
                data[0] as u16
            }
        }
    }

    pub fn contains(&self, byte: u8) -> bool {
        match self {
            Self::Numeric => byte.is_ascii_digit(),
            Self::Alphanumeric => {
                matches!(byte, b'0'..=b'9' | b'A'..=b'Z' | b' ' | b'$' | b'%' | b'*' | b'+' | b'-' | b'.' | b'/' | b':')
            }
            Self::Byte => true,
        }
    }

    /// Encoded bit length of `len` characters in this mode.
    pub fn encoded_len(&self, len: usize) -> usize {
        match *self {
            Self::Numeric => (len * 10 + 2) / 3,
            Self::Alphanumeric => (len * 11 + 1) / 2,
            Self::Byte => len * 8,
        }
    }
}

#[cfg(test)]
mod mode_tests {
    use super::Mode;
    use super::Mode::*;

    #[test]
    fn test_comparison() {
        assert!(Numeric == Numeric);
        assert!(Numeric < Alphanumeric);
        assert!(Numeric < Byte);
        assert!(Alphanumeric == Alphanumeric);
        assert!(Alphanumeric < Byte);
        assert!(Byte == Byte);
    }

    #[test]
    fn test_select() {
        assert_eq!(Mode::select(b"0123456789"), Numeric);
        assert_eq!(Mode::select(b"HELLO WORLD"), Alphanumeric);
        assert_eq!(Mode::select(b"A-1:5%"), Alphanumeric);
        assert_eq!(Mode::select(b"Hello"), Byte);
        assert_eq!(Mode::select(b"123!"), Byte);
        assert_eq!(Mode::select(b""), Numeric);
    }

    #[test]
    fn test_numeric_digit() {
        assert_eq!(Mode::numeric_digit(b'0'), 0);
        assert_eq!(Mode::numeric_digit(b'9'), 9);
    }

    #[test]
    #[should_panic]
    fn test_invalid_numeric_digit() {
        Mode::numeric_digit(b'A');
    }

    #[test]
    fn test_alphanumeric_digit() {
        assert_eq!(Mode::alphanumeric_digit(b'0'), 0);
        assert_eq!(Mode::alphanumeric_digit(b'9'), 9);
        assert_eq!(Mode::alphanumeric_digit(b'A'), 10);
        assert_eq!(Mode::alphanumeric_digit(b'Z'), 35);
        assert_eq!(Mode::alphanumeric_digit(b' '), 36);
        assert_eq!(Mode::alphanumeric_digit(b':'), 44);
    }

    #[test]
    #[should_panic]
    fn test_invalid_alphanumeric_digit() {
        Mode::alphanumeric_digit(b'a');
    }

    #[test]
    fn test_numeric_encoding() {
        assert_eq!(Numeric.encode_chunk("012".as_bytes()), 0b0000001100);
        assert_eq!(Numeric.encode_chunk("345".as_bytes()), 0b0101011001);
        assert_eq!(Numeric.encode_chunk("901".as_bytes()), 0b1110000101);
        assert_eq!(Numeric.encode_chunk("67".as_bytes()), 0b1000011);
        assert_eq!(Numeric.encode_chunk("8".as_bytes()), 0b1000);
    }

    #[test]
    fn test_alphanumeric_encoding() {
        assert_eq!(Alphanumeric.encode_chunk("AC".as_bytes()), 0b00111001110);
        assert_eq!(Alphanumeric.encode_chunk("-4".as_bytes()), 0b11100111001);
        assert_eq!(Alphanumeric.encode_chunk("2".as_bytes()), 0b000010);
    }

    #[test]
    fn test_encoded_len() {
        assert_eq!(Numeric.encoded_len(3), 10);
        assert_eq!(Numeric.encoded_len(2), 7);
        assert_eq!(Numeric.encoded_len(1), 4);
        assert_eq!(Alphanumeric.encoded_len(2), 11);
        assert_eq!(Alphanumeric.encoded_len(1), 6);
        assert_eq!(Byte.encoded_len(1), 8);
    }
}

// Segment
//------------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Segment<'a> {
    mode: Mode,
    mode_bits: usize,
    len_bits: usize, // Bit len of char count
    data: &'a [u8],  // Reference to raw data
}

impl<'a> Segment<'a> {
    pub fn new(mode: Mode, mode_bits: usize, len_bits: usize, data: &'a [u8]) -> Self {
        Self { mode, mode_bits, len_bits, data }
    }

    pub fn bit_len(&self) -> usize {
        let encoded_bits = self.mode.encoded_len(self.data.len());
        self.mode_bits + self.len_bits + encoded_bits
    }
}

#[cfg(test)]
mod segment_tests {
    use super::{Mode, Segment};
    use crate::common::metadata::Version;

    #[test]
    fn test_bit_len_numeric() {
        for (v, exp_lens) in [(1, [24, 21, 18]), (10, [26, 23, 20]), (27, [28, 25, 22])] {
            let ver = Version::new(v).unwrap();
            let mode = Mode::Numeric;
            let mode_bits = ver.mode_bits();
            let len_bits = ver.char_cnt_bits(mode);
            let seg = Segment::new(mode, mode_bits, len_bits, "123".as_bytes());
            assert_eq!(seg.bit_len(), exp_lens[0]);
            let seg = Segment::new(mode, mode_bits, len_bits, "45".as_bytes());
            assert_eq!(seg.bit_len(), exp_lens[1]);
            let seg = Segment::new(mode, mode_bits, len_bits, "6".as_bytes());
            assert_eq!(seg.bit_len(), exp_lens[2]);
        }
    }

    #[test]
    fn test_bit_len_alphanumeric() {
        for (v, exp_lens) in [(1, [24, 19]), (10, [26, 21]), (27, [28, 23])] {
            let ver = Version::new(v).unwrap();
            let mode = Mode::Alphanumeric;
            let mode_bits = ver.mode_bits();
            let len_bits = ver.char_cnt_bits(mode);
            let seg = Segment::new(mode, mode_bits, len_bits, "AZ".as_bytes());
            assert_eq!(seg.bit_len(), exp_lens[0]);
            let seg = Segment::new(mode, mode_bits, len_bits, "-".as_bytes());
            assert_eq!(seg.bit_len(), exp_lens[1]);
        }
    }

    #[test]
    fn test_bit_len_byte() {
        for (v, exp_len) in [(1, 20), (10, 28), (27, 28)] {
            let ver = Version::new(v).unwrap();
            let mode = Mode::Byte;
            let mode_bits = ver.mode_bits();
            let len_bits = ver.char_cnt_bits(mode);
            let seg = Segment::new(mode, mode_bits, len_bits, "a".as_bytes());
            assert_eq!(seg.bit_len(), exp_len);
        }
    }
}

// Writer for encoded data
//------------------------------------------------------------------------------

mod writer {
    use crate::common::{codec::PADDING_CODEWORDS, BitStream};

    use super::{Mode, Segment};

    pub fn push_segment(seg: &Segment, out: &mut BitStream) {
        push_header(seg, out);
        match seg.mode {
            Mode::Numeric => push_numeric_data(seg.data, out),
            Mode::Alphanumeric => push_alphanumeric_data(seg.data, out),
            Mode::Byte => push_byte_data(seg.data, out),
        }
    }

    fn push_header(seg: &Segment, out: &mut BitStream) {
        out.push_bits(seg.mode as u8, seg.mode_bits);
        let char_cnt = seg.data.len();
        debug_assert!(
            char_cnt < (1 << seg.len_bits),
            "Char count exceeds bit length: Char count {char_cnt}, Char count bits {}",
            seg.len_bits
        );
        out.push_bits(char_cnt as u16, seg.len_bits);
    }

    fn push_numeric_data(data: &[u8], out: &mut BitStream) {
        for chunk in data.chunks(3) {
            let len = (chunk.len() * 10 + 2) / 3;
            let data = Mode::Numeric.encode_chunk(chunk);
            out.push_bits(data, len);
        }
    }

    fn push_alphanumeric_data(data: &[u8], out: &mut BitStream) {
        for chunk in data.chunks(2) {
            let len = (chunk.len() * 11 + 1) / 2;
            let data = Mode::Alphanumeric.encode_chunk(chunk);
            out.push_bits(data, len);
        }
    }

    fn push_byte_data(data: &[u8], out: &mut BitStream) {
        for chunk in data.chunks(1) {
            let data = Mode::Byte.encode_chunk(chunk);
            out.push_bits(data, 8);
        }
    }

    pub fn push_terminator(out: &mut BitStream) {
        let bit_len = out.len();
        let bit_capacity = out.capacity();
        if bit_len < bit_capacity {
            let term_len = std::cmp::min(4, bit_capacity - bit_len);
            out.push_bits(0u8, term_len);
        }
    }

    pub fn pad_remaining_capacity(out: &mut BitStream) {
        push_padding_bits(out);
        push_padding_codewords(out);
    }

    fn push_padding_bits(out: &mut BitStream) {
        let offset = out.len() & 7;
        if offset > 0 {
            let padding_bits_len = 8 - offset;
            out.push_bits(0u8, padding_bits_len);
        }
    }

    fn push_padding_codewords(out: &mut BitStream) {
        let offset = out.len() & 7;
        debug_assert!(
            offset == 0,
            "Bit offset should be zero before padding codewords: {}",
            offset
        );

        let remain_byte_capacity = (out.capacity() - out.len()) >> 3;
        PADDING_CODEWORDS.iter().copied().cycle().take(remain_byte_capacity).for_each(|pc| {
            out.push_bits(pc, 8);
        });
    }

}

// Encoder
//------------------------------------------------------------------------------

mod encode {
    use crate::common::{
        error::{QRError, QRResult},
        metadata::{ECLevel, Version},
        BitStream, Mode,
    };

    use super::{
        writer::{pad_remaining_capacity, push_segment, push_terminator},
        Segment,
    };

    /// Packs data into a bit stream for the smallest version that fits it.
    /// The whole input is encoded as a single segment in the most compact
    /// mode covering its character set. Empty data yields a valid stream of
    /// nothing but terminator and padding.
    pub fn encode(data: &[u8], ecl: ECLevel) -> QRResult<(BitStream, Version)> {
        let mode = Mode::select(data);
        let ver = find_smallest_version(data.len(), mode, ecl)?;
        Ok((build_bit_stream(data, mode, ecl, ver), ver))
    }

    /// Same as [`encode`], but for a caller-chosen version.
    pub fn encode_with_version(
        data: &[u8],
        ecl: ECLevel,
        ver: Version,
    ) -> QRResult<BitStream> {
        let mode = Mode::select(data);
        if segment_bit_len(data.len(), mode, ver) > ver.data_bit_capacity(ecl) {
            return Err(QRError::CapacityExceeded);
        }
        Ok(build_bit_stream(data, mode, ecl, ver))
    }

    fn build_bit_stream(data: &[u8], mode: Mode, ecl: ECLevel, ver: Version) -> BitStream {
        let mut bs = BitStream::new(ver.data_bit_capacity(ecl));
        if !data.is_empty() {
            let seg = Segment::new(mode, ver.mode_bits(), ver.char_cnt_bits(mode), data);
            push_segment(&seg, &mut bs);
        }
        push_terminator(&mut bs);
        pad_remaining_capacity(&mut bs);
        bs
    }

    fn find_smallest_version(data_len: usize, mode: Mode, ecl: ECLevel) -> QRResult<Version> {
        for v in 1..=40 {
            let ver = Version::new(v)?;
            if segment_bit_len(data_len, mode, ver) <= ver.data_bit_capacity(ecl) {
                return Ok(ver);
            }
        }
        Err(QRError::CapacityExceeded)
    }

    fn segment_bit_len(data_len: usize, mode: Mode, ver: Version) -> usize {
        if data_len == 0 {
            return 0;
        }
        ver.mode_bits() + ver.char_cnt_bits(mode) + mode.encoded_len(data_len)
    }

}

// Global constants
//------------------------------------------------------------------------------

static PADDING_CODEWORDS: [u8; 2] = [0b1110_1100, 0b0001_0001];

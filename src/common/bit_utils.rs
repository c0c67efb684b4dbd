use std::{fmt::Display, mem};

use num_traits::PrimInt;

// Bit stream
//------------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct BitStream {
    data: [u8; MAX_PAYLOAD_SIZE],
    // Bit length
    len: usize,
    // Max bit capacity
    capacity: usize,
    // Read position for the bit iterator
    cursor: usize,
}

impl BitStream {
    pub fn new(capacity: usize) -> Self {
        debug_assert!(
            capacity <= MAX_PAYLOAD_SIZE << 3,
            "Capacity exceeds max payload size: {capacity}"
        );

        Self { data: [0; MAX_PAYLOAD_SIZE], len: 0, capacity, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn data(&self) -> &[u8] {
        &self.data[..(self.len + 7) >> 3]
    }
}

// Bit writers
//------------------------------------------------------------------------------

impl BitStream {
    pub fn push_bits<T>(&mut self, bits: T, size: usize)
    where
        T: PrimInt + Display,
    {
        let max_bits = mem::size_of::<T>() * 8;
        debug_assert!(
            size >= max_bits - bits.leading_zeros() as usize,
            "Bit count shouldn't exceed bit length: Length {size}, Bits {bits}"
        );
        debug_assert!(
            self.len + size <= self.capacity,
            "Insufficient capacity: Capacity {}, Size {}",
            self.capacity,
            self.len + size
        );

        match size {
            0 => (),
            1..=8 => {
                let bits = bits.to_u8().unwrap();
                let offset = self.len & 7;
                let pos = self.len >> 3;

                if offset + size <= 8 {
                    self.data[pos] |= bits << (8 - size - offset);
                } else {
                    self.data[pos] |= bits >> (size + offset - 8);
                    self.data[pos + 1] = bits << (16 - size - offset);
                }

                self.len += size;
            }
            9..=16 => {
                self.push_bits((bits >> 8).to_u8().unwrap(), size - 8);
                self.push_bits((bits & T::from(0xFF).unwrap()).to_u8().unwrap(), 8);
            }
            _ => unreachable!("Bits from only u8 and u16 can be pushed"),
        }
    }

    pub fn extend(&mut self, arr: &[u8]) {
        debug_assert!(
            (self.len & 7) == 0,
            "Bit offset must be zero to extend from another array: Bit offset {}",
            self.len & 7
        );

        let pos = self.len >> 3;
        let arr_bits = arr.len() << 3;
        debug_assert!(
            self.len + arr_bits <= self.capacity,
            "Extension shouldn't overflow capacity: Capacity {}, Size {}",
            self.capacity,
            self.len + arr_bits
        );

        self.data[pos..pos + arr.len()].copy_from_slice(arr);
        self.len += arr_bits;
    }
}

impl Iterator for BitStream {
    type Item = bool;
    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.len {
            return None;
        }
        let bit = self.data[self.cursor >> 3] & (0b1000_0000 >> (self.cursor & 7)) != 0;
        self.cursor += 1;
        Some(bit)
    }
}

#[cfg(test)]
mod bit_stream_tests {
    use super::BitStream;

    #[test]
    fn test_len() {
        let bit_capacity = 152;
        let mut bs = BitStream::new(bit_capacity);
        assert_eq!(bs.len(), 0);
        bs.push_bits(0u8, 0);
        assert_eq!(bs.len(), 0);
        bs.push_bits(0b1000u8, 4);
        assert_eq!(bs.len(), 4);
        bs.push_bits(0b1000u8, 8);
        assert_eq!(bs.len(), 12);
        bs.push_bits(0b1000u8, 4);
        assert_eq!(bs.len(), 16);
        bs.push_bits(0b1111111u8, 7);
        assert_eq!(bs.len(), 23);
    }

    #[test]
    fn test_push_bits_spanning_bytes() {
        let mut bs = BitStream::new(64);
        bs.push_bits(0b11010u8, 5);
        bs.push_bits(0b0100011u8, 7);
        bs.push_bits(0b01001000u8, 8);
        bs.push_bits(0b1101_0010_0011_0100u16, 16);
        assert_eq!(bs.data(), [0b11010010, 0b00110100, 0b10001101, 0b00100011, 0b01000000]);
        assert_eq!(bs.len(), 36);
    }

    #[test]
    fn test_extend() {
        let mut bs = BitStream::new(64);
        bs.push_bits(0xA5u8, 8);
        bs.extend(&[0x0F, 0xF0]);
        assert_eq!(bs.data(), [0xA5, 0x0F, 0xF0]);
        assert_eq!(bs.len(), 24);
    }

    #[test]
    fn test_bit_iterator() {
        let mut bs = BitStream::new(16);
        bs.push_bits(0b1011_0001u8, 8);
        bs.push_bits(0b01u8, 2);
        let bits = bs.collect::<Vec<_>>();
        let exp_bits =
            [true, false, true, true, false, false, false, true, false, true].to_vec();
        assert_eq!(bits, exp_bits);
    }

    #[test]
    #[should_panic]
    fn test_push_bits_capacity_overflow() {
        let bit_capacity = 152;
        let capacity = (bit_capacity + 7) >> 3;
        let mut bs = BitStream::new(bit_capacity);
        for _ in 0..capacity {
            bs.push_bits(0b1u8, 8);
        }
        bs.push_bits(0b1u8, 1)
    }
}

// Global constants
//------------------------------------------------------------------------------

// Largest total codeword count is 3706 for version 40
const MAX_PAYLOAD_SIZE: usize = 4096;

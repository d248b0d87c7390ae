use bitvec::prelude::*;
use byteorder::{BigEndian, ByteOrder};
use failure::ensure;
use std::fmt;

/// Number of bits in one byte unit. Register widths are given in bytes.
pub const BYTE_LENGTH: usize = 8;

/// Widest register we can read back as a single `u128`.
pub const MAX_WIDTH: usize = 16;

/// A single bit, as carried out of shifts and arithmetic.
pub type Bit = bool;

#[derive(Clone, PartialEq, Eq)]
// where msb0 is big endian.
pub struct Register {
    vec: BitVec<u8, Msb0>,
}

/// Register is a fixed-width run of bytes holding an unsigned value. Bit 0 of
/// the underlying BitVec is the most significant bit, so the raw bytes can be
/// read back as a big endian integer.
impl Register {
    pub fn new(width: usize) -> Result<Self, failure::Error> {
        ensure!(
            width > 0 && width <= MAX_WIDTH,
            "register width should be between 1 and {} bytes, got {}",
            MAX_WIDTH,
            width
        );
        Ok(Register::zeroed(width))
    }

    /// Callers must already know `width` is within `1..=MAX_WIDTH`.
    pub(crate) fn zeroed(width: usize) -> Self {
        Register {
            vec: bitvec![u8, Msb0; 0; width * BYTE_LENGTH],
        }
    }

    pub fn width(&self) -> usize {
        self.vec.len() / BYTE_LENGTH
    }

    pub fn width_in_bits(&self) -> usize {
        self.vec.len()
    }

    fn mask(&self) -> u128 {
        match self.width_in_bits() {
            128 => u128::MAX,
            bits => (1u128 << bits) - 1,
        }
    }

    pub fn to_num(&self) -> u128 {
        BigEndian::read_uint128(self.vec.as_raw_slice(), self.width())
    }

    /// Two's complement reading of the register.
    pub fn to_signed(&self) -> i128 {
        let unused = 128 - self.width_in_bits() as u32;
        ((self.to_num() << unused) as i128) >> unused
    }

    /// Stores `value`, dropping whatever does not fit in the register.
    pub fn set(&mut self, value: u128) -> &mut Self {
        let mut bytes = vec![0u8; self.width()];
        BigEndian::write_uint128(&mut bytes, value & self.mask(), self.width());
        self.vec = BitVec::from_vec(bytes);
        self
    }

    /// Shifts every bit one place towards the top, filling the bottom with 0.
    /// Returns the bit that fell off the top.
    pub fn shift_left(&mut self) -> Bit {
        let carry = self.vec[0];
        self.vec.shift_left(1);
        carry
    }

    /// Shifts every bit one place towards the bottom, filling the top with
    /// `fill`. Returns the bit that fell off the bottom.
    pub fn shift_right(&mut self, fill: Bit) -> Bit {
        let evicted = self.vec[self.vec.len() - 1];
        self.vec.shift_right(1);
        self.vec.set(0, fill);
        evicted
    }

    /// Wrapping addition. Returns the carry out of the top bit.
    pub fn add(&mut self, other: &Register) -> Bit {
        let (sum, overflowed) = self.to_num().overflowing_add(other.to_num());
        let carry = overflowed || sum > self.mask();
        self.set(sum);
        carry
    }

    /// Wrapping subtraction. Returns whether a borrow occurred, i.e. whether
    /// the register now holds a negative two's complement value.
    pub fn subtract(&mut self, other: &Register) -> Bit {
        let (minuend, subtrahend) = (self.to_num(), other.to_num());
        self.set(minuend.wrapping_sub(subtrahend));
        minuend < subtrahend
    }

    pub fn formatted_bin(&self) -> String {
        self.vec
            .as_raw_slice()
            .iter()
            .map(|byte| format!("{:08b}", byte))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.formatted_bin())
    }
}

impl fmt::Debug for Register {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Register({})", self.formatted_bin())
    }
}

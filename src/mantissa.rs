use crate::format::Format;
use crate::register::{Bit, Register, MAX_WIDTH};
use log::{debug, trace};
use malachite::base::num::basic::traits::Zero;
use malachite::base::num::conversion::traits::WrappingFrom;
use malachite::Natural;
use std::fmt;

/// Width in bytes of the register every mantissa is stored in.
pub const MANTISSA_WIDTH: usize = 2;

const _: () = assert!(MANTISSA_WIDTH > 0 && MANTISSA_WIDTH <= MAX_WIDTH);

/// Which trail width an operation keeps clear. The extended grid is one bit
/// narrower, leaving room for the hidden one below the stored digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitGrid {
    Regular,
    Extended,
}

impl BitGrid {
    fn trail_width(self, zero_trail_width: usize) -> usize {
        match self {
            BitGrid::Regular => zero_trail_width,
            BitGrid::Extended => zero_trail_width.saturating_sub(1),
        }
    }
}

impl From<bool> for BitGrid {
    fn from(extended: bool) -> Self {
        if extended {
            BitGrid::Extended
        } else {
            BitGrid::Regular
        }
    }
}

/// Mantissa keeps its digits left-aligned in a register, with the low
/// `zero_trail_width` bits always zero. For hidden-one formats the leading
/// digit is not stored and is put back by `number`.
#[derive(Clone, PartialEq, Eq)]
pub struct Mantissa {
    data: Register,
    format: Format,
    zero_trail_width: usize,
}

impl Mantissa {
    pub fn new(number: u128, format: Format) -> Self {
        Mantissa::from_natural(Natural::from(number), format)
    }

    /// Builds a mantissa from a value of any size. Values with a digit set
    /// right above the stored field count as already normalized in hidden-one
    /// formats; anything else is normalized first. Bits that do not fit in
    /// the register are dropped.
    pub fn from_natural(number: Natural, format: Format) -> Self {
        let mut data = Register::zeroed(MANTISSA_WIDTH);
        let zero_trail_width = data.width_in_bits() - format.bits_used();

        let overflowed_digit = format.digit(&number, format.digits_amount());
        let to_store = if format.hidden_one() && overflowed_digit != Natural::ZERO {
            number
        } else {
            let normalized = Mantissa::normalize_value(number, &format);
            if format.hidden_one() {
                // the explicit leading one moves out of the stored field
                normalized << format.digit_width() as u64
            } else {
                normalized
            }
        };

        let with_trail = to_store << zero_trail_width as u64;
        data.set(u128::wrapping_from(&with_trail));

        let mantissa = Mantissa {
            data,
            format,
            zero_trail_width,
        };
        trace!("raw mantissa {}", mantissa.raw());
        mantissa
    }

    pub fn format(&self) -> &Format {
        &self.format
    }

    pub fn zero_trail_width(&self) -> usize {
        self.zero_trail_width
    }

    pub fn register(&self) -> &Register {
        &self.data
    }

    /// The stored bits with the trail stripped. Hidden-one formats read on
    /// the extended grid, so the stored digits sit one bit above the bottom.
    pub fn raw_number(&self) -> u128 {
        let grid = BitGrid::from(self.format.hidden_one());
        self.data.to_num() >> grid.trail_width(self.zero_trail_width)
    }

    /// The logical value, including the leading one for hidden-one formats.
    pub fn number(&self) -> u128 {
        if self.format.hidden_one() {
            peek_logical_value(&self.data, &self.format)
        } else {
            self.raw_number()
        }
    }

    /// Every bit of the register, trail included.
    pub fn raw(&self) -> String {
        self.data.formatted_bin()
    }

    /// A fresh register holding `number`.
    pub fn without_trail(&self) -> Register {
        let mut register = Register::zeroed(MANTISSA_WIDTH);
        register.set(self.number());
        register
    }

    /// Shifts right by one digit, feeding the hidden one in at the top. The
    /// trail is left as is.
    pub fn recover_hidden_one(&mut self) -> &mut Self {
        recover_hidden_one(&mut self.data, &self.format);
        self
    }

    pub fn shift_right_fill_with_one(&mut self) -> &mut Self {
        self.recover_hidden_one();
        self.zero_trail(BitGrid::from(self.format.hidden_one()))
    }

    pub fn shift_right(&mut self, grid: BitGrid) -> &mut Self {
        trace!("shifting right");
        for _ in 0..self.format.digit_width() {
            self.data.shift_right(false);
        }
        self.zero_trail(grid)
    }

    pub fn shift_left(&mut self, grid: BitGrid) -> &mut Self {
        trace!("shifting left");
        for _ in 0..self.format.digit_width() {
            self.data.shift_left();
        }
        self.zero_trail(grid)
    }

    /// Clears the trail by pushing it out of the bottom and shifting back.
    pub fn zero_trail(&mut self, grid: BitGrid) -> &mut Self {
        let width = grid.trail_width(self.zero_trail_width);
        for _ in 0..width {
            self.data.shift_right(false);
        }
        for _ in 0..width {
            self.data.shift_left();
        }
        self
    }

    /// Shifts `number` (no trail) left a digit at a time until its most
    /// significant digit is set. Gives up after `digits_amount` shifts, which
    /// is what stops zero from looping forever.
    pub fn normalize_value(mut number: Natural, format: &Format) -> Natural {
        for _ in 0..format.digits_amount() {
            if !Mantissa::is_right_denormalized(&number, format) {
                break;
            }
            number <<= format.digit_width() as u64;
        }
        number
    }

    pub fn is_right_denormalized(number: &Natural, format: &Format) -> bool {
        let most_significant_digit = format.digits_amount() - 1;
        format.digit(number, most_significant_digit) == Natural::ZERO
    }

    /// Shifts left until the most significant digit is set. Returns the
    /// number of digits shifted, which the exponent has to absorb.
    pub fn normalize(&mut self) -> usize {
        debug!("normalizing {}", self.raw());
        let mut count = 0;
        for _ in 0..self.format.digits_amount() {
            let raw_number = Natural::from(self.raw_number());
            if !Mantissa::is_right_denormalized(&raw_number, &self.format) {
                break;
            }
            self.shift_left(BitGrid::Regular);
            count += 1;
        }
        debug!("normalized after {} shifts", count);
        count
    }

    /// Adds the registers as they are. Renormalizing is up to the caller.
    pub fn add(&mut self, other: &Mantissa) -> Bit {
        self.data.add(&other.data)
    }

    /// Subtracts `other`. On borrow the register is replaced by the magnitude
    /// of the result and `true` is returned so the caller can flip the sign.
    pub fn subtract(&mut self, other: &Mantissa) -> Bit {
        debug!("subtracting {} - {}", self.raw(), other.raw());
        let borrow = self.data.subtract(&other.data);
        debug!("mantissa right after subtraction {}", self.raw());

        if borrow {
            let magnitude = self.data.to_signed().unsigned_abs();
            self.data.set(magnitude);
        }
        borrow
    }
}

fn recover_hidden_one(data: &mut Register, format: &Format) {
    data.shift_right(true);
    for _ in 1..format.digit_width() {
        data.shift_right(false);
    }
}

/// Reads the value of a hidden-one register with its leading one restored,
/// working on a copy so `data` is never touched. The trail is whatever part of
/// `data` the format does not use.
pub fn peek_logical_value(data: &Register, format: &Format) -> u128 {
    let zero_trail_width = data.width_in_bits().saturating_sub(format.bits_used());
    let mut recovered = data.clone();
    recover_hidden_one(&mut recovered, format);
    recovered.to_num() >> BitGrid::Extended.trail_width(zero_trail_width)
}

impl fmt::Debug for Mantissa {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Mantissa")
            .field("raw", &self.raw())
            .field("format", &self.format)
            .finish()
    }
}

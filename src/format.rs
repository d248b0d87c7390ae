use crate::mantissa::MANTISSA_WIDTH;
use crate::register::BYTE_LENGTH;
use failure::Fail;
use malachite::base::num::logic::traits::LowMask;
use malachite::Natural;

#[derive(Debug, Fail, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    #[fail(display = "bits used ({}) and digit width ({}) must be non-zero", bits_used, digit_width)]
    ZeroWidth { bits_used: usize, digit_width: usize },
    #[fail(display = "digit width {} does not divide {} bits", digit_width, bits_used)]
    DigitMisaligned { bits_used: usize, digit_width: usize },
    #[fail(display = "{} bits do not fit in a {}-bit mantissa register", needed, available)]
    TooWide { needed: usize, available: usize },
}

/// Layout of a mantissa: how many bits it occupies, how wide one digit is and
/// whether the leading digit is implied rather than stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Format {
    bits_used: usize,
    digit_width: usize,
    hidden_one: bool,
}

impl Format {
    /// Three hex-style digits, leading digit stored.
    pub const F1: Format = Format {
        bits_used: 12,
        digit_width: 4,
        hidden_one: false,
    };

    /// IEEE-style binary significand with an implicit leading one.
    pub const F2: Format = Format {
        bits_used: 11,
        digit_width: 1,
        hidden_one: true,
    };

    pub fn new(bits_used: usize, digit_width: usize, hidden_one: bool) -> Result<Self, FormatError> {
        if bits_used == 0 || digit_width == 0 {
            return Err(FormatError::ZeroWidth { bits_used, digit_width });
        }
        if bits_used % digit_width != 0 {
            return Err(FormatError::DigitMisaligned { bits_used, digit_width });
        }
        // a hidden one needs a spare trail bit for the extended bit grid
        let needed = bits_used + hidden_one as usize;
        let available = MANTISSA_WIDTH * BYTE_LENGTH;
        if needed > available {
            return Err(FormatError::TooWide { needed, available });
        }

        Ok(Format {
            bits_used,
            digit_width,
            hidden_one,
        })
    }

    pub fn bits_used(&self) -> usize {
        self.bits_used
    }

    pub fn digit_width(&self) -> usize {
        self.digit_width
    }

    pub fn hidden_one(&self) -> bool {
        self.hidden_one
    }

    pub fn digits_amount(&self) -> usize {
        self.bits_used / self.digit_width
    }

    /// Bits of digit group `index` (0 is the least significant) of a value
    /// without trail. The digit is masked in place, not shifted down.
    pub fn digit(&self, number: &Natural, index: usize) -> Natural {
        let width = self.digit_width as u64;
        let mask = Natural::low_mask(width) << (width * index as u64);
        number & &mask
    }
}

impl Default for Format {
    fn default() -> Self {
        Format::F1
    }
}

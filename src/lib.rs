//! Mantissa field of a configurable floating point format.
//!
//! A mantissa lives in a fixed-width [`Register`], left-aligned, with the
//! unused low bits (the zero trail) always kept at zero:
//!
//! ```text
//!  [      bits_used      ]  [ zero trail ]
//!   digit .. digit digit      0 0 .. 0
//! ```
//!
//! The [`Format`] decides how many bits are used, how wide a digit is (the
//! unit of shifting and normalization) and whether the leading digit is
//! implied instead of stored, IEEE style.
//!
//! ```
//! use mantissa::{Format, Mantissa};
//!
//! let hex = Mantissa::new(0xf05, Format::F1);
//! assert_eq!(hex.raw(), "11110000 01010000");
//! assert_eq!(hex.number(), 0xf05);
//!
//! // the leading one is not stored, but `number` puts it back
//! let binary = Mantissa::new(0b10001, Format::F2);
//! assert_eq!(binary.raw(), "00010000 00000000");
//! assert_eq!(binary.number(), 0b1000_1000_0000);
//! ```

mod format;
mod mantissa;
mod register;

pub use crate::format::{Format, FormatError};
pub use crate::mantissa::{peek_logical_value, BitGrid, Mantissa, MANTISSA_WIDTH};
pub use crate::register::{Bit, Register, BYTE_LENGTH, MAX_WIDTH};

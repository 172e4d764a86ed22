//! Parsing user input into a price.

use alloy_primitives::U256;
use std::{fmt, str::FromStr};

/// A price in wei.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(U256);

impl Price {
    pub const fn new(value: U256) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> U256 {
        self.0
    }

    /// Ensures the price fits into an unsigned integer of `bits` bits.
    pub fn check_bits(self, bits: usize) -> Result<Self, PriceError> {
        if bits < 256 && self.0.bit_len() > bits {
            return Err(PriceError::Overflow { bits });
        }
        Ok(self)
    }
}

impl From<U256> for Price {
    fn from(value: U256) -> Self {
        Self(value)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Parses user input into a [`Price`].
///
/// See the [`FromStr`] implementation of [`Price`] for the accepted format.
pub fn parse_price(input: &str) -> Result<Price, PriceError> {
    input.parse()
}

/// Parses a decimal amount of wei.
///
/// Surrounding whitespace is ignored. A fractional part is accepted only if it is all zeros
/// (`"100.0"` is `100`).
impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PriceError::Empty);
        }

        let (negative, unsigned) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

        let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !is_digits(whole) || !is_digits(fraction) || (whole.is_empty() && fraction.is_empty()) {
            return Err(PriceError::NotANumber);
        }

        let is_zero = |part: &str| part.bytes().all(|b| b == b'0');
        if negative && !(is_zero(whole) && is_zero(fraction)) {
            return Err(PriceError::Negative);
        }
        if !is_zero(fraction) {
            return Err(PriceError::Fractional);
        }
        if whole.is_empty() {
            return Ok(Self(U256::ZERO));
        }

        U256::from_str_radix(whole, 10).map(Self).map_err(|_| PriceError::Overflow { bits: 256 })
    }
}

/// Why an input is not a valid price.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PriceError {
    #[error("price is empty")]
    Empty,
    #[error("price is not a number")]
    NotANumber,
    #[error("price cannot be negative")]
    Negative,
    #[error("price must be a whole number of wei")]
    Fractional,
    #[error("price is too large for uint{bits}")]
    Overflow { bits: usize },
}

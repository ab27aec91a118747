//! Fixed-point decimal with two fractional digits.
//!
//! # Responsibility
//! - Represent hour estimates and material costs without float drift.
//! - Parse user-typed decimal text and render it back with scale 2.
//!
//! # Invariants
//! - The value is stored as an integer count of hundredths.
//! - Parsing never rounds: more than two fractional digits is rejected.
//! - Magnitude never exceeds `Decimal::MAX` (99999.99), the widest value a
//!   `DECIMAL(7, 2)` column holds. Larger values would come back from SQLite
//!   as a lossy REAL.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static DECIMAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(-)?([0-9]+)(?:\.([0-9]*))?$").expect("valid decimal regex")
});

const SCALE: i64 = 100;
const MAX_FRACTION_DIGITS: usize = 2;
const MAX_HUNDREDTHS: i64 = 9_999_999;

/// Decimal value with exactly two fractional digits.
///
/// Serialized as its canonical text form (`"12.50"`) so JSON consumers never
/// see a binary float.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Decimal {
    hundredths: i64,
}

/// Reasons a decimal text can be rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseDecimalError {
    /// Input does not look like `[-]digits[.digits]`.
    InvalidFormat(String),
    /// Input carries more than two fractional digits.
    TooManyFractionDigits(String),
    /// Input is wider than `DECIMAL(7, 2)`.
    OutOfRange(String),
}

impl Display for ParseDecimalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFormat(input) => write!(f, "{input} is not a valid decimal number"),
            Self::TooManyFractionDigits(input) => write!(
                f,
                "{input} has more than {MAX_FRACTION_DIGITS} decimal places"
            ),
            Self::OutOfRange(input) => write!(f, "{input} is out of range"),
        }
    }
}

impl Error for ParseDecimalError {}

impl Decimal {
    pub const ZERO: Decimal = Decimal { hundredths: 0 };
    pub const MAX: Decimal = Decimal {
        hundredths: MAX_HUNDREDTHS,
    };
    pub const MIN: Decimal = Decimal {
        hundredths: -MAX_HUNDREDTHS,
    };

    /// Builds a value from a raw count of hundredths (`1250` is `12.50`).
    ///
    /// Returns `None` outside `MIN..=MAX`.
    pub fn from_hundredths(hundredths: i64) -> Option<Self> {
        (-MAX_HUNDREDTHS..=MAX_HUNDREDTHS)
            .contains(&hundredths)
            .then_some(Self { hundredths })
    }

    /// Builds a value from a whole number.
    pub fn from_whole(whole: i64) -> Option<Self> {
        whole.checked_mul(SCALE).and_then(Self::from_hundredths)
    }

    /// Converts a floating value read back from storage.
    ///
    /// Returns `None` for non-finite or out-of-range inputs.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let scaled = (value * SCALE as f64).round();
        if scaled.abs() > MAX_HUNDREDTHS as f64 {
            return None;
        }
        Self::from_hundredths(scaled as i64)
    }

    /// Raw count of hundredths.
    pub const fn hundredths(self) -> i64 {
        self.hundredths
    }
}

impl FromStr for Decimal {
    type Err = ParseDecimalError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let input = value.trim();
        let captures = DECIMAL_RE
            .captures(input)
            .ok_or_else(|| ParseDecimalError::InvalidFormat(input.to_string()))?;

        let negative = captures.get(1).is_some();
        let whole_digits = captures.get(2).map_or("", |m| m.as_str());
        let fraction_digits = captures.get(3).map_or("", |m| m.as_str());

        // Trailing zeros beyond scale carry no information ("1.500" == "1.50").
        let fraction_digits = if fraction_digits.len() > MAX_FRACTION_DIGITS {
            let (kept, rest) = fraction_digits.split_at(MAX_FRACTION_DIGITS);
            if rest.bytes().any(|b| b != b'0') {
                return Err(ParseDecimalError::TooManyFractionDigits(input.to_string()));
            }
            kept
        } else {
            fraction_digits
        };

        let out_of_range = || ParseDecimalError::OutOfRange(input.to_string());
        let whole: i64 = whole_digits.parse().map_err(|_| out_of_range())?;
        let fraction: i64 = match fraction_digits.len() {
            0 => 0,
            1 => fraction_digits.parse::<i64>().map_err(|_| out_of_range())? * 10,
            _ => fraction_digits.parse().map_err(|_| out_of_range())?,
        };

        let magnitude = whole
            .checked_mul(SCALE)
            .and_then(|scaled| scaled.checked_add(fraction))
            .ok_or_else(out_of_range)?;

        Self::from_hundredths(if negative { -magnitude } else { magnitude })
            .ok_or_else(out_of_range)
    }
}

impl Display for Decimal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let sign = if self.hundredths < 0 { "-" } else { "" };
        let magnitude = self.hundredths.unsigned_abs();
        write!(f, "{sign}{}.{:02}", magnitude / 100, magnitude % 100)
    }
}

impl TryFrom<String> for Decimal {
    type Error = ParseDecimalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Decimal> for String {
    fn from(value: Decimal) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{Decimal, ParseDecimalError};

    #[test]
    fn parses_whole_and_fractional_forms() {
        assert_eq!("12".parse::<Decimal>().unwrap().hundredths(), 1200);
        assert_eq!("12.5".parse::<Decimal>().unwrap().hundredths(), 1250);
        assert_eq!("12.05".parse::<Decimal>().unwrap().hundredths(), 1205);
        assert_eq!(" 0.75 ".parse::<Decimal>().unwrap().hundredths(), 75);
        assert_eq!("-3.10".parse::<Decimal>().unwrap().hundredths(), -310);
        assert_eq!("4.".parse::<Decimal>().unwrap().hundredths(), 400);
    }

    #[test]
    fn accepts_redundant_trailing_zeros() {
        assert_eq!("1.500".parse::<Decimal>().unwrap().hundredths(), 150);
    }

    #[test]
    fn rejects_extra_precision_instead_of_rounding() {
        let err = "1.234".parse::<Decimal>().unwrap_err();
        assert!(matches!(err, ParseDecimalError::TooManyFractionDigits(_)));
    }

    #[test]
    fn rejects_non_numeric_text() {
        for input in ["abc", "", "1.2.3", "1,5", "+-1", ".5"] {
            let err = input.parse::<Decimal>().unwrap_err();
            assert!(
                matches!(err, ParseDecimalError::InvalidFormat(_)),
                "{input} should be a format error"
            );
        }
    }

    #[test]
    fn rejects_values_that_overflow() {
        let err = "999999999999999999999".parse::<Decimal>().unwrap_err();
        assert!(matches!(err, ParseDecimalError::OutOfRange(_)));
    }

    #[test]
    fn range_matches_decimal_7_2_column() {
        assert_eq!("99999.99".parse::<Decimal>().unwrap(), Decimal::MAX);
        assert_eq!("-99999.99".parse::<Decimal>().unwrap(), Decimal::MIN);
        for input in ["100000", "-100000.00", "12345678.9"] {
            let err = input.parse::<Decimal>().unwrap_err();
            assert!(
                matches!(err, ParseDecimalError::OutOfRange(_)),
                "{input} should be out of range"
            );
        }
        assert!(Decimal::from_hundredths(10_000_000).is_none());
        assert!(Decimal::from_whole(100_000).is_none());
        assert!(Decimal::from_f64(1.0e15).is_none());
    }

    #[test]
    fn display_always_uses_two_fraction_digits() {
        assert_eq!(Decimal::from_hundredths(1200).unwrap().to_string(), "12.00");
        assert_eq!(Decimal::from_hundredths(5).unwrap().to_string(), "0.05");
        assert_eq!(Decimal::from_hundredths(-5).unwrap().to_string(), "-0.05");
        assert_eq!(Decimal::MAX.to_string(), "99999.99");
        assert_eq!(Decimal::ZERO.to_string(), "0.00");
    }

    #[test]
    fn float_conversion_rounds_to_hundredths() {
        assert_eq!(Decimal::from_f64(12.5).unwrap().hundredths(), 1250);
        assert_eq!(Decimal::from_f64(0.1 + 0.2).unwrap().hundredths(), 30);
        assert!(Decimal::from_f64(f64::NAN).is_none());
        assert!(Decimal::from_f64(f64::INFINITY).is_none());
    }

    #[test]
    fn from_whole_detects_overflow() {
        assert_eq!(Decimal::from_whole(3).unwrap().hundredths(), 300);
        assert!(Decimal::from_whole(i64::MAX).is_none());
    }
}

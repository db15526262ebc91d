//! Fixed-point price with two fractional digits.
//!
//! # Invariants
//! - Stored as integer minor units (cents); never as floating point.
//! - Magnitude fits `decimal(10,2)`: at most 8 integer digits.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const CENTS_PER_UNIT: i64 = 100;
const MAX_INTEGER_DIGITS: usize = 8;
const MAX_FRACTION_DIGITS: usize = 2;
/// Largest representable magnitude: `99999999.99`.
pub const MAX_PRICE_CENTS: i64 = 9_999_999_999;

/// Book price in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(i64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    Empty,
    Malformed(String),
    TooPrecise(String),
    OutOfRange(String),
}

impl Display for PriceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "price must not be empty"),
            Self::Malformed(raw) => write!(f, "malformed price `{raw}`"),
            Self::TooPrecise(raw) => write!(
                f,
                "price `{raw}` has more than {MAX_FRACTION_DIGITS} fractional digits"
            ),
            Self::OutOfRange(raw) => write!(f, "price `{raw}` does not fit decimal(10,2)"),
        }
    }
}

impl Error for PriceError {}

impl Price {
    /// Builds a price from minor units, rejecting values beyond `decimal(10,2)`.
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        if cents.unsigned_abs() > MAX_PRICE_CENTS as u64 {
            return Err(PriceError::OutOfRange(cents.to_string()));
        }
        Ok(Self(cents))
    }

    pub fn cents(self) -> i64 {
        self.0
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(PriceError::Empty);
        }

        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text),
        };
        let (integer, fraction) = match unsigned.split_once('.') {
            Some((integer, fraction)) => (integer, Some(fraction)),
            None => (unsigned, None),
        };

        let malformed = || PriceError::Malformed(text.to_string());
        if integer.is_empty() || !integer.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }

        let fraction = fraction.unwrap_or("");
        if unsigned.contains('.') && fraction.is_empty() {
            return Err(malformed());
        }
        if !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        if fraction.len() > MAX_FRACTION_DIGITS {
            return Err(PriceError::TooPrecise(text.to_string()));
        }

        let significant = integer.trim_start_matches('0');
        if significant.len() > MAX_INTEGER_DIGITS {
            return Err(PriceError::OutOfRange(text.to_string()));
        }

        let units = if significant.is_empty() {
            0
        } else {
            significant.parse::<i64>().map_err(|_| malformed())?
        };
        let cents_part = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| malformed())? * 10,
            _ => fraction.parse::<i64>().map_err(|_| malformed())?,
        };

        let magnitude = units * CENTS_PER_UNIT + cents_part;
        Self::from_cents(if negative { -magnitude } else { magnitude })
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        let per_unit = CENTS_PER_UNIT as u64;
        write!(
            f,
            "{sign}{}.{:02}",
            magnitude / per_unit,
            magnitude % per_unit
        )
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PriceVisitor)
    }
}

struct PriceVisitor;

impl Visitor<'_> for PriceVisitor {
    type Value = Price;

    fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "a decimal price such as \"12.50\" or 12.5")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Price, E> {
        value.parse().map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Price, E> {
        value
            .checked_mul(CENTS_PER_UNIT)
            .ok_or_else(|| E::custom(PriceError::OutOfRange(value.to_string())))
            .and_then(|cents| Price::from_cents(cents).map_err(E::custom))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Price, E> {
        let signed = i64::try_from(value)
            .map_err(|_| E::custom(PriceError::OutOfRange(value.to_string())))?;
        self.visit_i64(signed)
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Price, E> {
        if !value.is_finite() {
            return Err(E::custom(PriceError::Malformed(value.to_string())));
        }
        value.to_string().parse().map_err(E::custom)
    }
}

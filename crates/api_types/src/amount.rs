use std::{fmt, str::FromStr};

use serde::{Serialize, Serializer};
use serde_json::{Number, Value};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("empty amount")]
    Empty,
    #[error("invalid amount")]
    Invalid,
    #[error("too many decimals")]
    TooManyDecimals,
    #[error("amount too large")]
    Overflow,
}

/// Decimal amount of an entry, represented as **integer cents**.
///
/// The wire format is a plain JSON number (`10.5`), but values typed into a
/// form arrive as text, so [`FromStr`] accepts both `.` and `,` as decimal
/// separator.
///
/// ```rust
/// use api_types::Amount;
///
/// assert_eq!("10".parse::<Amount>().unwrap().cents(), 1000);
/// assert_eq!("10,5".parse::<Amount>().unwrap().cents(), 1050);
/// assert!("12.345".parse::<Amount>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Amount(i64);

impl Amount {
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Reads an amount from a JSON number or a decimal string.
    ///
    /// Returns `None` for anything that is not an exact two-decimal value.
    pub fn from_json(raw: &Value) -> Option<Self> {
        match raw {
            Value::Number(number) => {
                if let Some(units) = number.as_i64() {
                    return units.checked_mul(100).map(Amount);
                }
                let scaled = number.as_f64()? * 100.0;
                let rounded = scaled.round();
                if !rounded.is_finite()
                    || (scaled - rounded).abs() > 1e-6
                    || rounded.abs() > i64::MAX as f64
                {
                    return None;
                }
                Some(Amount(rounded as i64))
            }
            Value::String(text) => text.parse().ok(),
            _ => None,
        }
    }

    /// JSON number for the wire: integral amounts stay integers.
    pub fn to_json(self) -> Value {
        if self.0 % 100 == 0 {
            return Value::Number(Number::from(self.0 / 100));
        }
        Number::from_f64(self.0 as f64 / 100.0)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`;
    /// at most 2 fractional digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        let rest = rest.trim().replace(',', ".");
        if rest.is_empty() {
            return Err(AmountError::Empty);
        }

        let mut parts = rest.split('.');
        let units_str = parts.next().ok_or(AmountError::Invalid)?;
        let fraction = parts.next();
        if parts.next().is_some() {
            return Err(AmountError::Invalid);
        }

        if units_str.is_empty() || !units_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(AmountError::Invalid);
        }
        let units: i64 = units_str.parse().map_err(|_| AmountError::Overflow)?;

        let cents: i64 = match fraction {
            None | Some("") => 0,
            Some(frac) if !frac.chars().all(|c| c.is_ascii_digit()) => {
                return Err(AmountError::Invalid);
            }
            Some(frac) if frac.len() == 1 => frac.parse::<i64>().map_err(|_| AmountError::Invalid)? * 10,
            Some(frac) if frac.len() == 2 => frac.parse().map_err(|_| AmountError::Invalid)?,
            Some(_) => return Err(AmountError::TooManyDecimals),
        };

        let total = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or(AmountError::Overflow)?;

        Ok(Amount(if negative { -total } else { total }))
    }
}

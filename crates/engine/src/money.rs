use std::{fmt, str::FromStr};

use thiserror::Error;

/// Signed money amount represented as **integer cents**.
///
/// Use this type for **all** monetary values in the engine (expense amounts,
/// category budgets, aggregated totals) to avoid floating-point drift. On the
/// wire amounts are plain JSON numbers; conversion happens at the edges with
/// [`Money::from_f64`] and [`Money::as_f64`].
///
/// # Examples
///
/// ```rust
/// use engine::Money;
///
/// let amount = Money::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Parsing from user input (accepts `.` or `,` as decimal separator; rejects >
/// 2 decimals):
///
/// ```rust
/// use engine::Money;
///
/// assert_eq!("10".parse::<Money>().unwrap().cents(), 1000);
/// assert_eq!("10,5".parse::<Money>().unwrap().cents(), 1050);
/// assert!("12.345".parse::<Money>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(i64);

/// Reasons a decimal amount could not be turned into [`Money`].
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ParseMoneyError {
    #[error("empty amount")]
    Empty,
    #[error("invalid amount")]
    Invalid,
    #[error("too many decimals")]
    TooManyDecimals,
    #[error("amount too large")]
    Overflow,
}

impl Money {
    pub const ZERO: Money = Money(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Adds two amounts, `None` on overflow.
    #[must_use]
    pub const fn checked_add(self, rhs: Money) -> Option<Money> {
        match self.0.checked_add(rhs.0) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    /// Subtracts two amounts, `None` on overflow.
    #[must_use]
    pub const fn checked_sub(self, rhs: Money) -> Option<Money> {
        match self.0.checked_sub(rhs.0) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    /// Converts a JSON number into cents.
    ///
    /// The shortest decimal representation of `value` is parsed, so `0.1`
    /// becomes 10 cents and `12.345` is rejected instead of being rounded.
    pub fn from_f64(value: f64) -> Result<Self, ParseMoneyError> {
        if !value.is_finite() {
            return Err(ParseMoneyError::Invalid);
        }
        value.to_string().parse()
    }

    /// Returns the amount as a floating point number of whole units.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Formats the amount without trailing zeros (`30`, `12.5`, `12.34`).
    #[must_use]
    pub fn to_plain_string(self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;
        match cents {
            0 => format!("{sign}{units}"),
            c if c % 10 == 0 => format!("{sign}{units}.{}", c / 10),
            c => format!("{sign}{units}.{c:02}"),
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let units = abs / 100;
        let cents = abs % 100;
        write!(f, "{sign}{units}.{cents:02}")
    }
}

impl FromStr for Money {
    type Err = ParseMoneyError;

    /// Parses a decimal string into cents.
    ///
    /// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`.
    ///
    /// Validation rules:
    /// - max 2 fractional digits (rejects `12.345`)
    /// - rejects empty/invalid strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseMoneyError::Empty);
        }

        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped)
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped)
        } else {
            (false, trimmed)
        };

        let rest = rest.trim();
        if rest.is_empty() {
            return Err(ParseMoneyError::Empty);
        }

        let rest = rest.replace(',', ".");
        let mut parts = rest.split('.');
        let units_str = parts.next().ok_or(ParseMoneyError::Invalid)?;
        let cents_str = parts.next();

        if parts.next().is_some() {
            return Err(ParseMoneyError::Invalid);
        }

        if units_str.is_empty() || !units_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(ParseMoneyError::Invalid);
        }

        let units: i64 = units_str.parse().map_err(|_| ParseMoneyError::Overflow)?;

        let cents: i64 = match cents_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(ParseMoneyError::Invalid);
                }
                // Trailing zeros never carry precision ("1.50" == "1.5").
                let frac = frac.trim_end_matches('0');
                match frac.len() {
                    0 => 0,
                    1 => frac.parse::<i64>().map_err(|_| ParseMoneyError::Invalid)? * 10,
                    2 => frac.parse::<i64>().map_err(|_| ParseMoneyError::Invalid)?,
                    _ => return Err(ParseMoneyError::TooManyDecimals),
                }
            }
        };

        let total = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or(ParseMoneyError::Overflow)?;

        let signed = if negative {
            total.checked_neg().ok_or(ParseMoneyError::Overflow)?
        } else {
            total
        };

        Ok(Money(signed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_always_shows_cents() {
        assert_eq!(Money::new(0).to_string(), "0.00");
        assert_eq!(Money::new(1).to_string(), "0.01");
        assert_eq!(Money::new(1050).to_string(), "10.50");
        assert_eq!(Money::new(-1050).to_string(), "-10.50");
    }

    #[test]
    fn plain_string_drops_trailing_zeros() {
        assert_eq!(Money::new(3000).to_plain_string(), "30");
        assert_eq!(Money::new(1250).to_plain_string(), "12.5");
        assert_eq!(Money::new(1234).to_plain_string(), "12.34");
        assert_eq!(Money::new(5).to_plain_string(), "0.05");
        assert_eq!(Money::new(-1000).to_plain_string(), "-10");
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!("10".parse::<Money>().unwrap().cents(), 1000);
        assert_eq!("10.5".parse::<Money>().unwrap().cents(), 1050);
        assert_eq!("10,50".parse::<Money>().unwrap().cents(), 1050);
        assert_eq!("-0.01".parse::<Money>().unwrap().cents(), -1);
        assert_eq!("+1.00".parse::<Money>().unwrap().cents(), 100);
        assert_eq!("  2.30 ".parse::<Money>().unwrap().cents(), 230);
        assert_eq!("1.500".parse::<Money>().unwrap().cents(), 150);
    }

    #[test]
    fn parse_rejects_more_than_two_decimals() {
        assert_eq!(
            "12.345".parse::<Money>(),
            Err(ParseMoneyError::TooManyDecimals)
        );
        assert_eq!("0.001".parse::<Money>(), Err(ParseMoneyError::TooManyDecimals));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!("".parse::<Money>(), Err(ParseMoneyError::Empty));
        assert_eq!("abc".parse::<Money>(), Err(ParseMoneyError::Invalid));
        assert_eq!("1.2.3".parse::<Money>(), Err(ParseMoneyError::Invalid));
        assert_eq!("1e3".parse::<Money>(), Err(ParseMoneyError::Invalid));
    }

    #[test]
    fn from_f64_uses_shortest_representation() {
        assert_eq!(Money::from_f64(0.1).unwrap().cents(), 10);
        assert_eq!(Money::from_f64(30.0).unwrap().cents(), 3000);
        assert_eq!(Money::from_f64(19.99).unwrap().cents(), 1999);
        assert_eq!(Money::from_f64(-5.0).unwrap().cents(), -500);
        assert!(Money::from_f64(f64::NAN).is_err());
        assert!(Money::from_f64(1e30).is_err());
    }

    #[test]
    fn adds_and_converts_back() {
        let total = Money::new(3000).checked_add(Money::new(8000)).unwrap();
        assert_eq!(total.cents(), 11000);
        assert!((total.as_f64() - 110.0).abs() < f64::EPSILON);
    }

    #[test]
    fn checked_arithmetic_reports_overflow() {
        let big = Money::new(i64::MAX - 1);
        assert_eq!(big.checked_add(Money::new(1)), Some(Money::new(i64::MAX)));
        assert_eq!(big.checked_add(Money::new(2)), None);
        assert_eq!(Money::new(i64::MIN).checked_sub(Money::new(1)), None);
        assert_eq!(
            Money::new(100).checked_sub(Money::new(250)),
            Some(Money::new(-150))
        );
    }
}

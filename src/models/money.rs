//! Money type for representing currency amounts
//!
//! Internally stores amounts in centavos (i64) to avoid floating-point
//! drift when summing. On disk and in backups the amount is a plain decimal
//! number (`150.5`), so files stay compatible with other tools.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// A monetary amount in Brazilian reais, stored as centavos
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Create a Money amount from centavos
    ///
    /// # Examples
    /// ```
    /// use backoffice::models::Money;
    /// let amount = Money::from_cents(1050); // R$ 10,50
    /// ```
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Create a Money amount from reais and centavos
    pub const fn from_reais_cents(reais: i64, cents: i64) -> Self {
        Self(reais * 100 + cents)
    }

    /// Create a Money amount from a decimal number, rounded to the centavo
    pub fn from_decimal(value: f64) -> Self {
        Self((value * 100.0).round() as i64)
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// The amount as a decimal number
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Whole reais (truncated toward zero)
    pub const fn reais(&self) -> i64 {
        self.0 / 100
    }

    /// Centavos portion (0-99)
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub const fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Parse an amount typed by a person
    ///
    /// Accepts "1234.56", "1234,56", "1.234,56", "R$ 1.234,56", "R$ 2.000",
    /// "-10" and "10,5". A comma is always the decimal separator. Without a
    /// comma, dots are thousands separators when the input carries the
    /// "R$" prefix or is grouped in threes ("1.500"); otherwise a single dot
    /// is the decimal point. Fractions have one or two digits.
    pub fn parse(s: &str) -> Result<Self, MoneyParseError> {
        let invalid = || MoneyParseError::InvalidFormat(s.to_string());
        let trimmed = s.trim();

        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(stripped) => (true, stripped.trim()),
            None => (false, trimmed),
        };

        let (prefixed, rest) = match rest.strip_prefix("R$") {
            Some(stripped) => (true, stripped.trim()),
            None => (false, rest),
        };

        let (whole, fraction) = match rest.split_once(',') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None if prefixed || is_grouped(rest) => (rest, None),
            None => match rest.split_once('.') {
                Some((whole, fraction)) => (whole, Some(fraction)),
                None => (rest, None),
            },
        };

        if whole.is_empty() && fraction.is_none() {
            return Err(invalid());
        }

        let reais = parse_whole(whole).ok_or_else(invalid)?;
        let cents = match fraction {
            Some(fraction) => parse_fraction(fraction).ok_or_else(invalid)?,
            None => 0,
        };
        let total = reais
            .checked_mul(100)
            .and_then(|r| r.checked_add(cents))
            .ok_or_else(invalid)?;

        Ok(Self(if negative { -total } else { total }))
    }

    /// Parse the value of a masked currency input field
    ///
    /// Every non-digit is dropped and the remaining digits are read as
    /// centavos, so "R$ 1.234,56" becomes 1234.56. Blank input is zero; more
    /// digits than fit in centavos is an error.
    pub fn parse_masked(s: &str) -> Result<Self, MoneyParseError> {
        let negative = s.trim_start().starts_with('-');
        let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return Ok(Self::zero());
        }
        let cents = digits
            .parse::<i64>()
            .map_err(|_| MoneyParseError::InvalidFormat(s.to_string()))?;
        Ok(Self(if negative { -cents } else { cents }))
    }

    /// Format as Brazilian currency: `R$ 1.234,56`
    pub fn format_brl(&self) -> String {
        let reais = group_thousands(self.reais().unsigned_abs());
        let sign = if self.is_negative() { "-" } else { "" };
        format!("{}R$ {},{:02}", sign, reais, self.cents_part())
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// "1.500", "12.345.678": a 1-3 digit head followed by dot-separated triples
fn is_grouped(s: &str) -> bool {
    let groups: Vec<&str> = s.split('.').collect();
    groups.len() > 1
        && (1..=3).contains(&groups[0].len())
        && groups.iter().all(|g| is_digits(g))
        && groups[1..].iter().all(|g| g.len() == 3)
}

fn parse_whole(s: &str) -> Option<i64> {
    if s.is_empty() {
        return Some(0);
    }
    if s.contains('.') && !is_grouped(s) {
        return None;
    }
    let digits = s.replace('.', "");
    if !is_digits(&digits) {
        return None;
    }
    digits.parse().ok()
}

fn parse_fraction(s: &str) -> Option<i64> {
    if !is_digits(s) || s.len() > 2 {
        return None;
    }
    let value: i64 = s.parse().ok()?;
    Some(if s.len() == 1 { value * 10 } else { value })
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.format_brl())
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        if !value.is_finite() {
            return Err(serde::de::Error::custom("monetary value must be finite"));
        }
        Ok(Self::from_decimal(value))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

/// Error type for money parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    InvalidFormat(String),
}

impl fmt::Display for MoneyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoneyParseError::InvalidFormat(s) => write!(f, "Invalid money format: {}", s),
        }
    }
}

impl std::error::Error for MoneyParseError {}

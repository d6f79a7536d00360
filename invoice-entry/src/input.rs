//! Classification of raw text typed into a numeric field.

use std::{fmt, str::FromStr};

use bigdecimal::BigDecimal;

/// Bound on the significant digits of a typed value and on its scale in either direction.
const MAX_PRECISION: i64 = 28;

/// The two editable numeric fields of a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericField {
    Qty,
    Discount,
}

impl fmt::Display for NumericField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericField::Qty => write!(f, "qty"),
            NumericField::Discount => write!(f, "discount"),
        }
    }
}

/// What a keystroke in a numeric field amounts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawInput {
    /// The user cleared the field to retype it.
    Blank,
    Number(BigDecimal),
    /// Anything that does not parse as a decimal.
    Invalid,
}

impl RawInput {
    /// Classify raw field text. Surrounding whitespace is ignored, so a field holding only
    /// spaces counts as blank. Numbers with more than 28 significant digits, or with a scale
    /// beyond 28 in either direction, are invalid.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return RawInput::Blank;
        }
        match BigDecimal::from_str(trimmed) {
            Ok(n) if within_precision(&n) => RawInput::Number(n),
            _ => RawInput::Invalid,
        }
    }
}

fn within_precision(n: &BigDecimal) -> bool {
    let (_, scale) = n.as_bigint_and_exponent();
    n.digits() <= MAX_PRECISION as u64 && (-MAX_PRECISION..=MAX_PRECISION).contains(&scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_whitespace() {
        assert_eq!(RawInput::parse(""), RawInput::Blank);
        assert_eq!(RawInput::parse("   "), RawInput::Blank);
    }

    #[test]
    fn numbers() {
        assert_eq!(RawInput::parse(" 12 "), RawInput::Number(BigDecimal::from(12)));
        assert_eq!(
            RawInput::parse("-2.5"),
            RawInput::Number(BigDecimal::from_str("-2.5").unwrap())
        );
        assert_eq!(RawInput::parse("1e2"), RawInput::Number(BigDecimal::from(100)));
    }

    #[test]
    fn huge_exponents_and_precision_are_invalid() {
        assert_eq!(RawInput::parse("1e100000000"), RawInput::Invalid);
        assert_eq!(RawInput::parse("1e9223372036854775807"), RawInput::Invalid);
        assert_eq!(RawInput::parse("1e-100000000"), RawInput::Invalid);
        assert_eq!(RawInput::parse(&"9".repeat(40)), RawInput::Invalid);
        assert_eq!(
            RawInput::parse("1e28"),
            RawInput::Number(BigDecimal::from_str("1e28").unwrap())
        );
        assert_eq!(
            RawInput::parse("0.25"),
            RawInput::Number(BigDecimal::from_str("0.25").unwrap())
        );
    }

    #[test]
    fn garbage_is_invalid() {
        assert_eq!(RawInput::parse("abc"), RawInput::Invalid);
        assert_eq!(RawInput::parse("1,5"), RawInput::Invalid);
        assert_eq!(RawInput::parse("12kg"), RawInput::Invalid);
    }
}

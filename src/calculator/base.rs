//! Conversion between 64-bit integers and their text form in bases 2, 8, 10 and 16.
//!
//! Rendering follows the programmer-panel conventions: binary is grouped in
//! nibbles, octal carries a leading `0`, hexadecimal carries `0x` with upper-case
//! digits. Negative values in bases 2, 8 and 16 are rendered as raw 64-bit
//! two's complement (the same bit pattern `{:b}`/`{:o}`/`{:X}` produce).

use std::fmt;

use thiserror::Error;

/// A failed conversion. The caller decides whether to surface or swallow it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("base {0} is not supported (expected 2, 8, 10 or 16)")]
    UnsupportedBase(u32),
    #[error("nothing to convert")]
    Empty,
    #[error("'{digit}' is not a valid digit in base {base}")]
    InvalidDigit { digit: char, base: u32 },
    #[error("'{text}' does not fit in 64 bits (base {base})")]
    Overflow { text: String, base: u32 },
}

/// One of the four number bases the calculator understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Base {
    Binary,
    Octal,
    #[default]
    Decimal,
    Hexadecimal,
}

impl Base {
    /// All bases, in the order the programmer panel lists them.
    pub const ALL: [Base; 4] = [
        Base::Hexadecimal,
        Base::Decimal,
        Base::Octal,
        Base::Binary,
    ];

    /// The numeric radix.
    pub fn radix(self) -> u32 {
        match self {
            Self::Binary => 2,
            Self::Octal => 8,
            Self::Decimal => 10,
            Self::Hexadecimal => 16,
        }
    }

    /// Short label used by the programmer panel and the CLI.
    pub fn label(self) -> &'static str {
        match self {
            Self::Binary => "BIN",
            Self::Octal => "OCT",
            Self::Decimal => "DEC",
            Self::Hexadecimal => "HEX",
        }
    }

    /// Whether `c` is a digit of this base (hex letters in either case).
    pub fn accepts_digit(self, c: char) -> bool {
        c.is_digit(self.radix())
    }
}

impl TryFrom<u32> for Base {
    type Error = ConversionError;

    fn try_from(radix: u32) -> Result<Self, Self::Error> {
        match radix {
            2 => Ok(Self::Binary),
            8 => Ok(Self::Octal),
            10 => Ok(Self::Decimal),
            16 => Ok(Self::Hexadecimal),
            other => Err(ConversionError::UnsupportedBase(other)),
        }
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Render `value` in `base` with the base's prefix and grouping.
pub fn render(value: i64, base: Base) -> String {
    match base {
        Base::Binary => group_nibbles(&format!("{:b}", value)),
        Base::Octal => format!("0{:o}", value),
        Base::Decimal => value.to_string(),
        Base::Hexadecimal => format!("0x{:X}", value),
    }
}

/// Parse text produced by [`render`] (or typed by hand) back into an integer.
///
/// Binary drops interior spaces, octal drops one leading `0`, hexadecimal drops
/// a leading `0x`/`0X`. Bases 2, 8 and 16 accept full 64-bit two's complement
/// patterns, so negative renderings parse back to the same value.
pub fn parse(text: &str, base: Base) -> Result<i64, ConversionError> {
    let text = text.trim();
    match base {
        Base::Binary => {
            let digits: String = text.chars().filter(|c| *c != ' ').collect();
            parse_unsigned(&digits, base)
        }
        Base::Octal => parse_unsigned(text.strip_prefix('0').unwrap_or(text), base),
        Base::Decimal => parse_decimal(text),
        Base::Hexadecimal => {
            let digits = text
                .strip_prefix("0x")
                .or_else(|| text.strip_prefix("0X"))
                .unwrap_or(text);
            parse_unsigned(digits, base)
        }
    }
}

/// Bare digits of `value` in `base`: no prefix, no grouping, sign-magnitude.
///
/// This is the form the engine keeps in its editable display buffer.
pub fn render_digits(value: i64, base: Base) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let magnitude = value.unsigned_abs();
    match base {
        Base::Binary => format!("{sign}{magnitude:b}"),
        Base::Octal => format!("{sign}{magnitude:o}"),
        Base::Decimal => value.to_string(),
        Base::Hexadecimal => format!("{sign}{magnitude:X}"),
    }
}

/// Inverse of [`render_digits`]: an optional leading `-` followed by bare digits.
pub fn parse_digits(text: &str, base: Base) -> Result<i64, ConversionError> {
    if base == Base::Decimal {
        return parse_decimal(text);
    }
    match text.strip_prefix('-') {
        Some(magnitude) => {
            validate(magnitude, base)?;
            let value = u64::from_str_radix(magnitude, base.radix())
                .map_err(|_| overflow(text, base))?;
            0i64.checked_sub_unsigned(value)
                .ok_or_else(|| overflow(text, base))
        }
        None => {
            validate(text, base)?;
            let value =
                i64::from_str_radix(text, base.radix()).map_err(|_| overflow(text, base))?;
            Ok(value)
        }
    }
}

fn parse_unsigned(digits: &str, base: Base) -> Result<i64, ConversionError> {
    validate(digits, base)?;
    let value = u64::from_str_radix(digits, base.radix()).map_err(|_| overflow(digits, base))?;
    // Two's complement: a full 64-bit pattern maps back onto the negative range.
    Ok(value as i64)
}

fn parse_decimal(text: &str) -> Result<i64, ConversionError> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    validate(digits, Base::Decimal)?;
    text.parse::<i64>()
        .map_err(|_| overflow(text, Base::Decimal))
}

fn validate(digits: &str, base: Base) -> Result<(), ConversionError> {
    if digits.is_empty() {
        return Err(ConversionError::Empty);
    }
    match digits.chars().find(|c| !base.accepts_digit(*c)) {
        Some(digit) => Err(ConversionError::InvalidDigit {
            digit,
            base: base.radix(),
        }),
        None => Ok(()),
    }
}

fn overflow(text: &str, base: Base) -> ConversionError {
    ConversionError::Overflow {
        text: text.to_string(),
        base: base.radix(),
    }
}

/// Insert a space every four digits, counting from the least-significant end.
fn group_nibbles(bits: &str) -> String {
    let len = bits.len();
    let mut grouped = String::with_capacity(len + len / 4);
    for (i, c) in bits.chars().enumerate() {
        if i > 0 && (len - i) % 4 == 0 {
            grouped.push(' ');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_conventions() {
        assert_eq!(render(255, Base::Hexadecimal), "0xFF");
        assert_eq!(render(8, Base::Octal), "010");
        assert_eq!(render(-42, Base::Decimal), "-42");
        assert_eq!(render(0, Base::Binary), "0");
        assert_eq!(render(5, Base::Binary), "101");
        assert_eq!(render(10, Base::Binary), "1010");
        assert_eq!(render(37, Base::Binary), "10 0101");
        assert_eq!(render(255, Base::Binary), "1111 1111");
    }

    #[test]
    fn test_negative_binary_is_twos_complement() {
        let rendered = render(-1, Base::Binary);
        assert_eq!(rendered.replace(' ', ""), "1".repeat(64));
        assert_eq!(rendered.split(' ').count(), 16);
    }

    #[test]
    fn test_parse_strips_prefixes() {
        assert_eq!(parse("0xFF", Base::Hexadecimal), Ok(255));
        assert_eq!(parse("0Xff", Base::Hexadecimal), Ok(255));
        assert_eq!(parse("ff", Base::Hexadecimal), Ok(255));
        assert_eq!(parse("010", Base::Octal), Ok(8));
        assert_eq!(parse("17", Base::Octal), Ok(15));
        assert_eq!(parse("10 0101", Base::Binary), Ok(37));
        assert_eq!(parse("-123", Base::Decimal), Ok(-123));
    }

    #[test]
    fn test_round_trip() {
        let samples = [0, 1, 7, 8, 15, 16, 255, 1024, 123_456_789, i64::MAX, -1, -255, i64::MIN];
        for base in Base::ALL {
            for value in samples {
                assert_eq!(
                    parse(&render(value, base), base),
                    Ok(value),
                    "{value} in {base}"
                );
            }
        }
    }

    #[test]
    fn test_parse_rejects_malformed_text() {
        assert_eq!(
            parse("102", Base::Binary),
            Err(ConversionError::InvalidDigit { digit: '2', base: 2 })
        );
        assert_eq!(
            parse("0x1G", Base::Hexadecimal),
            Err(ConversionError::InvalidDigit { digit: 'G', base: 16 })
        );
        assert_eq!(
            parse("12a", Base::Decimal),
            Err(ConversionError::InvalidDigit { digit: 'a', base: 10 })
        );
        assert_eq!(parse("0x", Base::Hexadecimal), Err(ConversionError::Empty));
        assert_eq!(parse("", Base::Decimal), Err(ConversionError::Empty));
        assert!(parse("+5", Base::Hexadecimal).is_err());
        assert!(matches!(
            parse("1".repeat(65).as_str(), Base::Binary),
            Err(ConversionError::Overflow { .. })
        ));
    }

    #[test]
    fn test_unsupported_base_rejected_up_front() {
        assert_eq!(Base::try_from(16), Ok(Base::Hexadecimal));
        assert_eq!(
            Base::try_from(3),
            Err(ConversionError::UnsupportedBase(3))
        );
    }

    #[test]
    fn test_bare_digits() {
        assert_eq!(render_digits(-26, Base::Hexadecimal), "-1A");
        assert_eq!(render_digits(5, Base::Binary), "101");
        assert_eq!(parse_digits("-1A", Base::Hexadecimal), Ok(-26));
        assert_eq!(parse_digits("1a", Base::Hexadecimal), Ok(26));
        assert_eq!(parse_digits("777", Base::Octal), Ok(511));
        assert_eq!(
            parse_digits(&render_digits(i64::MIN, Base::Hexadecimal), Base::Hexadecimal),
            Ok(i64::MIN)
        );
        assert_eq!(parse_digits("-", Base::Binary), Err(ConversionError::Empty));
    }
}

//! Advertised-value decoding. Each function kind advertises its primary
//! value as a short string; these helpers turn it back into numbers. A
//! malformed advertisement is logged and dropped by the caller, it never
//! reaches the cache.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("not a decimal number: {0:?}")]
    Number(String),
    #[error("not a hex color word: {0:?}")]
    HexColor(String),
    #[error("unknown keyword: {0:?}")]
    UnknownKeyword(String),
}

pub(crate) fn decimal_f64(raw: &str) -> Result<f64, ParseError> {
    raw.trim()
        .parse()
        .map_err(|_| ParseError::Number(raw.to_owned()))
}

pub(crate) fn decimal_i64(raw: &str) -> Result<i64, ParseError> {
    raw.trim()
        .parse()
        .map_err(|_| ParseError::Number(raw.to_owned()))
}

/// Accepts `RRGGBB` with or without a `0x` prefix.
pub(crate) fn hex_rgb(raw: &str) -> Result<i64, ParseError> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let value = i64::from_str_radix(digits, 16)
        .map_err(|_| ParseError::HexColor(raw.to_owned()))?;
    if value > 0xFF_FFFF {
        return Err(ParseError::HexColor(raw.to_owned()));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimals() {
        assert_eq!(decimal_f64("440.0"), Ok(440.0));
        assert_eq!(decimal_f64(" -12.5 "), Ok(-12.5));
        assert_eq!(decimal_i64("1250"), Ok(1250));
        assert!(decimal_f64("4a0").is_err());
        assert!(decimal_i64("12.5").is_err());
    }

    #[test]
    fn hex_colors() {
        assert_eq!(hex_rgb("0x1E90FF"), Ok(0x1E90FF));
        assert_eq!(hex_rgb("1E90FF"), Ok(0x1E90FF));
        assert_eq!(hex_rgb("0X00ff00"), Ok(0x00FF00));
        assert!(hex_rgb("0x1000000").is_err());
        assert!(hex_rgb("red").is_err());
    }
}

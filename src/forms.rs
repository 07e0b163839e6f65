//! Helpers for parsing numeric form fields.
//!
//! HTML forms submit every field as a string and optional number inputs
//! arrive as empty strings. These helpers coerce that boundary into the
//! integers the rest of the crate works with, so empty-string-means-zero
//! exists only here and never inside the billing arithmetic.

use crate::Error;

/// Parse a non-negative integer form field, treating an empty field as zero.
///
/// # Errors
///
/// Returns [Error::InvalidNumber] naming `field` if the value is not a
/// number or is negative.
pub fn parse_non_negative(field: &'static str, raw: &str) -> Result<i64, Error> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Ok(0);
    }

    match trimmed.parse::<i64>() {
        Ok(value) if value >= 0 => Ok(value),
        _ => Err(Error::InvalidNumber(field)),
    }
}

/// Parse a non-negative decimal form field, treating an empty field as zero.
///
/// # Errors
///
/// Returns [Error::InvalidNumber] naming `field` if the value is not a
/// number or is negative.
pub fn parse_non_negative_f64(field: &'static str, raw: &str) -> Result<f64, Error> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Ok(0.0);
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value >= 0.0 => Ok(value),
        _ => Err(Error::InvalidNumber(field)),
    }
}

/// Parse a month form field into a number from 1 to 12.
///
/// # Errors
///
/// Returns [Error::InvalidNumber] if the value is not a number, or
/// [Error::InvalidMonth] if it is a number outside 1 to 12.
pub fn parse_month(raw: &str) -> Result<u8, Error> {
    let month: i64 = raw
        .trim()
        .parse()
        .map_err(|_| Error::InvalidNumber("month"))?;

    if (1..=12).contains(&month) {
        Ok(month as u8)
    } else {
        Err(Error::InvalidMonth(month))
    }
}

#[cfg(test)]
mod parse_non_negative_tests {
    use crate::{Error, forms::parse_non_negative};

    #[test]
    fn parses_plain_number() {
        assert_eq!(parse_non_negative("room_price", "2000000"), Ok(2_000_000));
    }

    #[test]
    fn empty_string_is_zero() {
        assert_eq!(parse_non_negative("trash_fee", ""), Ok(0));
        assert_eq!(parse_non_negative("trash_fee", "   "), Ok(0));
    }

    #[test]
    fn rejects_negative_number() {
        assert_eq!(
            parse_non_negative("elect_start", "-5"),
            Err(Error::InvalidNumber("elect_start"))
        );
    }

    #[test]
    fn rejects_non_numeric_text() {
        assert_eq!(
            parse_non_negative("water_end", "lots"),
            Err(Error::InvalidNumber("water_end"))
        );
    }
}

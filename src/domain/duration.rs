// SPDX-License-Identifier: MIT OR Apache-2.0

//! Duration text grammar.
//!
//! A duration is an optionally signed sequence of decimal numbers, each with an
//! optional fraction and a mandatory unit suffix, such as `"300ms"`, `"-1.5h"` or
//! `"2h45m"`. Valid units are `ns`, `us` (or `µs`/`μs`), `ms`, `s`, `m` and `h`.
//! The bare string `"0"` is also accepted. Results are limited to the range of a
//! signed 64-bit nanosecond count.

use chrono::TimeDelta;
use thiserror::Error;

const NANOSECOND: u64 = 1;
const MICROSECOND: u64 = 1_000 * NANOSECOND;
const MILLISECOND: u64 = 1_000 * MICROSECOND;
const SECOND: u64 = 1_000 * MILLISECOND;
const MINUTE: u64 = 60 * SECOND;
const HOUR: u64 = 60 * MINUTE;

// Magnitude of i64::MIN, the largest value a negative duration may reach.
const MAX_MAGNITUDE: u64 = 1 << 63;

/// Reasons a duration string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    /// The text does not follow the duration grammar.
    #[error("invalid duration {0:?}")]
    Invalid(String),

    /// A number is not followed by a unit.
    #[error("missing unit in duration {0:?}")]
    MissingUnit(String),

    /// A unit suffix is not recognized.
    #[error("unknown unit {unit:?} in duration {input:?}")]
    UnknownUnit {
        /// The unrecognized suffix
        unit: String,
        /// The complete input
        input: String,
    },

    /// The value does not fit a signed 64-bit nanosecond count.
    #[error("duration {0:?} out of range")]
    Overflow(String),
}

fn unit_nanos(unit: &str) -> Option<u64> {
    match unit {
        "ns" => Some(NANOSECOND),
        "us" | "\u{00b5}s" | "\u{03bc}s" => Some(MICROSECOND),
        "ms" => Some(MILLISECOND),
        "s" => Some(SECOND),
        "m" => Some(MINUTE),
        "h" => Some(HOUR),
        _ => None,
    }
}

/// Parses a duration string into a signed nanosecond `TimeDelta`.
///
/// # Examples
///
/// ```
/// use chrono::TimeDelta;
/// use typedcfg::domain::duration::parse_duration;
///
/// assert_eq!(parse_duration("5s").unwrap(), TimeDelta::seconds(5));
/// assert_eq!(parse_duration("1h30m").unwrap(), TimeDelta::minutes(90));
/// assert_eq!(parse_duration("-1.5s").unwrap(), TimeDelta::milliseconds(-1500));
/// assert!(parse_duration("soon").is_err());
/// ```
pub fn parse_duration(input: &str) -> Result<TimeDelta, DurationError> {
    let nanos = parse_nanos(input)?;
    Ok(TimeDelta::nanoseconds(nanos))
}

/// Parses a duration string into a signed nanosecond count.
pub fn parse_nanos(input: &str) -> Result<i64, DurationError> {
    let invalid = || DurationError::Invalid(input.to_string());
    let overflow = || DurationError::Overflow(input.to_string());

    let mut rest = input;
    let mut negative = false;
    if let Some(stripped) = rest.strip_prefix('-') {
        negative = true;
        rest = stripped;
    } else if let Some(stripped) = rest.strip_prefix('+') {
        rest = stripped;
    }

    if rest == "0" {
        return Ok(0);
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total: u64 = 0;
    while !rest.is_empty() {
        if !rest.starts_with(|c: char| c == '.' || c.is_ascii_digit()) {
            return Err(invalid());
        }

        let (whole, after_whole, has_whole) = leading_int(rest).ok_or_else(overflow)?;
        rest = after_whole;

        let mut fraction = 0u64;
        let mut scale = 1f64;
        let mut has_fraction = false;
        if let Some(after_dot) = rest.strip_prefix('.') {
            let (f, s, after_fraction, consumed) = leading_fraction(after_dot);
            fraction = f;
            scale = s;
            has_fraction = consumed;
            rest = after_fraction;
        }
        if !has_whole && !has_fraction {
            return Err(invalid());
        }

        let unit_len = rest
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(rest.len());
        if unit_len == 0 {
            return Err(DurationError::MissingUnit(input.to_string()));
        }
        let (unit, after_unit) = rest.split_at(unit_len);
        rest = after_unit;
        let unit = unit_nanos(unit).ok_or_else(|| DurationError::UnknownUnit {
            unit: unit.to_string(),
            input: input.to_string(),
        })?;

        if whole > MAX_MAGNITUDE / unit {
            return Err(overflow());
        }
        let mut value = whole * unit;
        if fraction > 0 {
            // Truncation toward zero is intended; the fraction is bounded by one unit.
            value += (fraction as f64 * (unit as f64 / scale)) as u64;
            if value > MAX_MAGNITUDE {
                return Err(overflow());
            }
        }

        total = total.checked_add(value).ok_or_else(overflow)?;
        if total > MAX_MAGNITUDE {
            return Err(overflow());
        }
    }

    if negative {
        // total <= 2^63, so the negation fits
        Ok(-(total as i128) as i64)
    } else {
        i64::try_from(total).map_err(|_| overflow())
    }
}

/// Consumes leading decimal digits. Returns `None` when the number exceeds 2^63.
fn leading_int(s: &str) -> Option<(u64, &str, bool)> {
    let digits = s.bytes().take_while(u8::is_ascii_digit).count();
    let mut value: u64 = 0;
    for b in s[..digits].bytes() {
        value = value
            .checked_mul(10)?
            .checked_add(u64::from(b - b'0'))?;
        if value > MAX_MAGNITUDE {
            return None;
        }
    }
    Some((value, &s[digits..], digits > 0))
}

/// Consumes leading fraction digits, keeping as much precision as fits.
fn leading_fraction(s: &str) -> (u64, f64, &str, bool) {
    let digits = s.bytes().take_while(u8::is_ascii_digit).count();
    let mut value: u64 = 0;
    let mut scale = 1f64;
    let mut overflowed = false;
    for b in s[..digits].bytes() {
        if overflowed {
            continue;
        }
        match value
            .checked_mul(10)
            .and_then(|v| v.checked_add(u64::from(b - b'0')))
        {
            Some(next) if next <= MAX_MAGNITUDE => {
                value = next;
                scale *= 10.0;
            }
            _ => overflowed = true,
        }
    }
    (value, scale, &s[digits..], digits > 0)
}

// SPDX-License-Identifier: MIT OR Apache-2.0

//! Type-directed coercion of source values.
//!
//! Each function here takes one source [`Value`] and either produces a value that
//! is exactly representable in the target type or an [`InvalidValue`] citing the
//! offending input. Integer overflow fails instead of wrapping, and fractional
//! floats are never truncated into integers.

use crate::domain::decode::{decode_scalar, DecodeText, Field, Kind};
use crate::domain::duration;
use crate::domain::errors::{FieldError, InvalidValue};
use crate::domain::value::Value;
use chrono::{DateTime, FixedOffset, TimeDelta};
use std::str::FromStr;

const NANOS_PER_MILLI: i64 = 1_000_000;

fn invalid(kind: Kind, value: &Value) -> InvalidValue {
    InvalidValue::new(kind.type_name(), value.to_string())
}

/// Coerces a value to an integer within the bounds of `kind`.
///
/// Accepts integers, floats without a fractional part, and base-10 text.
pub fn integer(kind: Kind, value: &Value) -> Result<i128, InvalidValue> {
    let (min, max) = kind.int_bounds().ok_or_else(|| invalid(kind, value))?;
    let n = match value {
        Value::Int(i) => i128::from(*i),
        Value::Uint(u) => i128::from(*u),
        Value::Float(f) => whole_float(*f).ok_or_else(|| invalid(kind, value))?,
        Value::String(s) => parse_int_text(kind, s).ok_or_else(|| invalid(kind, value))?,
        Value::Nil | Value::Bool(_) | Value::List(_) | Value::Map(_) => {
            return Err(invalid(kind, value))
        }
    };
    if n < min || n > max {
        return Err(invalid(kind, value));
    }
    Ok(n)
}

fn whole_float(f: f64) -> Option<i128> {
    // 1e38 keeps the cast inside i128 while covering every 64-bit bound.
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e38 {
        Some(f as i128)
    } else {
        None
    }
}

fn parse_int_text(kind: Kind, s: &str) -> Option<i128> {
    if kind.is_unsigned() {
        s.parse::<u64>().ok().map(i128::from)
    } else {
        s.parse::<i64>().ok().map(i128::from)
    }
}

/// Coerces a value to an `f64`.
pub fn float64(value: &Value) -> Result<f64, InvalidValue> {
    match value {
        Value::String(s) => parse_float_text::<f64>(s, |f| f.is_infinite())
            .ok_or_else(|| invalid(Kind::F64, value)),
        other => numeric_f64(other).ok_or_else(|| invalid(Kind::F64, value)),
    }
}

/// Coerces a value to an `f32`. Finite sources beyond the `f32` range fail.
pub fn float32(value: &Value) -> Result<f32, InvalidValue> {
    match value {
        Value::String(s) => parse_float_text::<f32>(s, |f| f.is_infinite())
            .ok_or_else(|| invalid(Kind::F32, value)),
        other => {
            let f = numeric_f64(other).ok_or_else(|| invalid(Kind::F32, value))?;
            if f.is_finite() && f.abs() > f64::from(f32::MAX) {
                return Err(invalid(Kind::F32, value));
            }
            Ok(f as f32)
        }
    }
}

fn numeric_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Int(i) => Some(*i as f64),
        Value::Uint(u) => Some(*u as f64),
        Value::Float(f) => Some(*f),
        Value::Nil | Value::Bool(_) | Value::String(_) | Value::List(_) | Value::Map(_) => None,
    }
}

// Text that overflows to infinity is out of range unless it spells infinity.
fn parse_float_text<T: FromStr>(s: &str, is_infinite: impl Fn(&T) -> bool) -> Option<T> {
    let parsed = s.parse::<T>().ok()?;
    if is_infinite(&parsed) && !spells_infinity(s) {
        return None;
    }
    Some(parsed)
}

fn spells_infinity(s: &str) -> bool {
    let unsigned = s.trim_start_matches(['+', '-']);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

/// Coerces a value to a `bool`.
///
/// Text must be one of `1 t T TRUE true True` or `0 f F FALSE false False`.
pub fn boolean(value: &Value) -> Result<bool, InvalidValue> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => match s.as_str() {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            _ => Err(invalid(Kind::Bool, value)),
        },
        _ => Err(invalid(Kind::Bool, value)),
    }
}

/// Coerces any scalar to its canonical text.
pub fn text(value: &Value) -> Result<String, InvalidValue> {
    value
        .scalar_text()
        .ok_or_else(|| invalid(Kind::String, value))
}

/// Coerces a value to a signed nanosecond duration.
///
/// Numbers count nanoseconds. Text holding a bare integer counts milliseconds;
/// any other text goes through the [duration grammar](crate::domain::duration).
pub fn duration(value: &Value) -> Result<TimeDelta, InvalidValue> {
    let fail = || invalid(Kind::Duration, value);
    let nanos = match value {
        Value::Int(i) => *i,
        Value::Uint(u) => i64::try_from(*u).map_err(|_| fail())?,
        Value::Float(f) => whole_float(*f)
            .and_then(|n| i64::try_from(n).ok())
            .ok_or_else(fail)?,
        Value::String(s) => match s.parse::<i64>() {
            Ok(millis) => millis.checked_mul(NANOS_PER_MILLI).ok_or_else(fail)?,
            Err(_) => duration::parse_nanos(s).map_err(|_| fail())?,
        },
        Value::Nil | Value::Bool(_) | Value::List(_) | Value::Map(_) => {
            return Err(fail())
        }
    };
    Ok(TimeDelta::nanoseconds(nanos))
}

/// Coerces RFC 3339 text to a timestamp.
pub fn time(value: &Value) -> Result<DateTime<FixedOffset>, InvalidValue> {
    match value {
        Value::String(s) => {
            DateTime::parse_from_rfc3339(s).map_err(|_| invalid(Kind::Time, value))
        }
        _ => Err(invalid(Kind::Time, value)),
    }
}

/// Stringifies a scalar and hands it to `T`'s own parser.
pub fn self_decoding<T: DecodeText>(value: &Value) -> Result<T, InvalidValue> {
    let text = value
        .scalar_text()
        .ok_or_else(|| InvalidValue::new(T::TYPE_NAME, value.to_string()))?;
    T::decode_text(&text).map_err(|e| InvalidValue::new(T::TYPE_NAME, text.as_str()).with_cause(e))
}

macro_rules! int_field {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(impl Field for $ty {
            const KIND: Kind = Kind::$kind;

            fn decode_field(
                key: &str,
                value: Option<&Value>,
                errors: &mut Vec<FieldError>,
            ) -> Option<Self> {
                decode_scalar(key, value, errors, |v| {
                    let n = integer(Self::KIND, v)?;
                    <$ty>::try_from(n).map_err(|_| invalid(Self::KIND, v))
                })
            }
        })*
    };
}

int_field!(
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
);

macro_rules! scalar_field {
    ($($ty:ty => $kind:ident, $coerce:path;)*) => {
        $(impl Field for $ty {
            const KIND: Kind = Kind::$kind;

            fn decode_field(
                key: &str,
                value: Option<&Value>,
                errors: &mut Vec<FieldError>,
            ) -> Option<Self> {
                decode_scalar(key, value, errors, $coerce)
            }
        })*
    };
}

scalar_field! {
    f32 => F32, float32;
    f64 => F64, float64;
    bool => Bool, boolean;
    String => String, text;
    TimeDelta => Duration, duration;
    DateTime<FixedOffset> => Time, time;
}

impl<T: Field> Field for Option<T> {
    const KIND: Kind = T::KIND;
    const NULLABLE: bool = true;

    fn decode_field(key: &str, value: Option<&Value>, errors: &mut Vec<FieldError>) -> Option<Self> {
        match value {
            None | Some(Value::Nil) => None,
            Some(_) => T::decode_field(key, value, errors).map(Some),
        }
    }
}

impl<T: DecodeText> Field for T {
    const KIND: Kind = Kind::SelfDecoding(T::TYPE_NAME);

    fn decode_field(key: &str, value: Option<&Value>, errors: &mut Vec<FieldError>) -> Option<Self> {
        decode_scalar(key, value, errors, self_decoding::<T>)
    }
}

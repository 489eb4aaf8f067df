// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structured decoding of source values into typed shapes.
//!
//! A target structure is described by a static table of [`FieldDescriptor`]s, one
//! per field, each carrying the field's mapping key and [`Kind`] tag. The table is
//! normally generated by [`config_shape!`](crate::config_shape). Decoding walks the
//! table, looks each key up in the source mapping, coerces the value, and collects
//! every failure instead of stopping at the first one.
//!
//! # Examples
//!
//! ```
//! use typedcfg::config_shape;
//! use typedcfg::domain::{decode, Value};
//!
//! config_shape! {
//!     #[derive(Debug, Default, PartialEq)]
//!     pub struct Server {
//!         pub host: String => "host",
//!         pub port: u16 => "port",
//!         pub workers: Option<u8> => "workers",
//!     }
//! }
//!
//! let source = Value::map([("host", Value::from("localhost")), ("port", Value::from("8080"))]);
//! let server: Server = decode(&source).unwrap();
//! assert_eq!(server.port, 8080);
//! assert_eq!(server.workers, None);
//!
//! let source = Value::map([("port", Value::from(70000)), ("workers", Value::from(-1))]);
//! let err = decode::<Server>(&source).unwrap_err();
//! assert_eq!(err.len(), 2);
//! ```

use crate::domain::errors::{DecodeError, FieldError, InvalidValue};
use crate::domain::value::{Map, Value};
use std::fmt;
use tracing::debug;

/// Type tag of a declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// `i8`
    I8,
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `isize`
    Isize,
    /// `u8`
    U8,
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u64`
    U64,
    /// `usize`
    Usize,
    /// `f32`
    F32,
    /// `f64`
    F64,
    /// `bool`
    Bool,
    /// `String`
    String,
    /// Signed nanosecond duration
    Duration,
    /// Point in time with a UTC offset
    Time,
    /// A nested shape, by name
    Nested(&'static str),
    /// A type that parses itself from text, by name
    SelfDecoding(&'static str),
}

impl Kind {
    /// Type name used in diagnostics.
    pub const fn type_name(self) -> &'static str {
        match self {
            Kind::I8 => "i8",
            Kind::I16 => "i16",
            Kind::I32 => "i32",
            Kind::I64 => "i64",
            Kind::Isize => "isize",
            Kind::U8 => "u8",
            Kind::U16 => "u16",
            Kind::U32 => "u32",
            Kind::U64 => "u64",
            Kind::Usize => "usize",
            Kind::F32 => "f32",
            Kind::F64 => "f64",
            Kind::Bool => "bool",
            Kind::String => "string",
            Kind::Duration => "duration",
            Kind::Time => "time",
            Kind::Nested(name) | Kind::SelfDecoding(name) => name,
        }
    }

    /// Inclusive bounds for integer kinds.
    pub const fn int_bounds(self) -> Option<(i128, i128)> {
        match self {
            Kind::I8 => Some((i8::MIN as i128, i8::MAX as i128)),
            Kind::I16 => Some((i16::MIN as i128, i16::MAX as i128)),
            Kind::I32 => Some((i32::MIN as i128, i32::MAX as i128)),
            Kind::I64 => Some((i64::MIN as i128, i64::MAX as i128)),
            Kind::Isize => Some((isize::MIN as i128, isize::MAX as i128)),
            Kind::U8 => Some((0, u8::MAX as i128)),
            Kind::U16 => Some((0, u16::MAX as i128)),
            Kind::U32 => Some((0, u32::MAX as i128)),
            Kind::U64 => Some((0, u64::MAX as i128)),
            Kind::Usize => Some((0, usize::MAX as i128)),
            _ => None,
        }
    }

    /// Returns `true` for the unsigned integer kinds.
    pub const fn is_unsigned(self) -> bool {
        matches!(
            self,
            Kind::U8 | Kind::U16 | Kind::U32 | Kind::U64 | Kind::Usize
        )
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A type that can be declared as a field of a [`Shape`].
///
/// Implemented for the integer and float primitives, `bool`, `String`,
/// [`chrono::TimeDelta`], `chrono::DateTime<FixedOffset>`, `Option<T>` (the
/// nullable form of any field type), every [`DecodeText`] type, and every shape
/// declared with [`config_shape!`](crate::config_shape).
pub trait Field: Sized {
    /// Type tag of the field.
    const KIND: Kind;

    /// `true` when the field is left unset while its key is absent.
    const NULLABLE: bool = false;

    /// Decodes the value found under `key`.
    ///
    /// `value` is `None` when the key is absent. Failures are pushed onto `errors`.
    /// Returning `None` leaves the target slot untouched.
    fn decode_field(key: &str, value: Option<&Value>, errors: &mut Vec<FieldError>)
        -> Option<Self>;
}

/// Capability of types that convert themselves from text.
///
/// Non-string scalar sources are stringified first, so `1234` and `"1234"` reach
/// [`DecodeText::decode_text`] identically. A returned error becomes the cause of
/// the field's entry in the aggregate.
///
/// # Examples
///
/// ```
/// use typedcfg::domain::DecodeText;
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Limit(i64);
///
/// impl DecodeText for Limit {
///     const TYPE_NAME: &'static str = "Limit";
///     type Err = std::num::ParseIntError;
///
///     fn decode_text(text: &str) -> Result<Self, Self::Err> {
///         if text == "unlimited" {
///             return Ok(Limit(-1));
///         }
///         text.parse().map(Limit)
///     }
/// }
/// ```
pub trait DecodeText: Sized {
    /// Type name used in diagnostics.
    const TYPE_NAME: &'static str;

    /// Error produced by [`DecodeText::decode_text`].
    type Err: fmt::Display;

    /// Parses the value from its textual form.
    fn decode_text(text: &str) -> Result<Self, Self::Err>;
}

/// One entry of a shape's field table.
pub struct FieldDescriptor<S: 'static> {
    /// Key used to look the field up in the source mapping
    pub key: &'static str,
    /// Type tag of the field
    pub kind: Kind,
    /// Whether the field is a nullable indirection
    pub nullable: bool,
    decode: fn(&mut S, Option<&Value>, &mut Vec<FieldError>),
}

impl<S: 'static> FieldDescriptor<S> {
    /// Creates a descriptor. `decode` writes the decoded value into the target.
    pub const fn new(
        key: &'static str,
        kind: Kind,
        nullable: bool,
        decode: fn(&mut S, Option<&Value>, &mut Vec<FieldError>),
    ) -> Self {
        FieldDescriptor {
            key,
            kind,
            nullable,
            decode,
        }
    }

    /// Decodes this field of `target` from `value`.
    pub fn decode(&self, target: &mut S, value: Option<&Value>, errors: &mut Vec<FieldError>) {
        (self.decode)(target, value, errors)
    }
}

impl<S: 'static> fmt::Debug for FieldDescriptor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("key", &self.key)
            .field("kind", &self.kind)
            .field("nullable", &self.nullable)
            .finish()
    }
}

/// A statically typed decode target.
pub trait Shape: Default + Sized + 'static {
    /// Name used in diagnostics.
    const NAME: &'static str;

    /// The field table, in declaration order.
    const FIELDS: &'static [FieldDescriptor<Self>];

    /// Looks up a field descriptor by mapping key.
    fn field(key: &str) -> Option<&'static FieldDescriptor<Self>> {
        Self::FIELDS.iter().find(|field| field.key == key)
    }
}

/// Decodes `source` into a fresh `S::default()`.
///
/// # Errors
///
/// Returns every failing field at once as a [`DecodeError`].
pub fn decode<S: Shape>(source: &Value) -> Result<S, DecodeError> {
    let mut target = S::default();
    decode_into(source, &mut target)?;
    Ok(target)
}

/// Decodes `source` into an existing target.
///
/// Fields whose keys are absent keep their current value, as do fields that fail.
/// A `Nil` source leaves the target untouched; any other non-mapping source yields
/// a single error keyed `''`.
///
/// # Errors
///
/// Returns every failing field at once as a [`DecodeError`].
pub fn decode_into<S: Shape>(source: &Value, target: &mut S) -> Result<(), DecodeError> {
    let mut errors = Vec::new();
    match source {
        Value::Nil => {}
        Value::Map(map) => decode_fields(target, map, &mut errors),
        other => {
            debug!(shape = S::NAME, found = other.kind_name(), "source is not a mapping");
            errors.push(FieldError::new(
                "",
                InvalidValue::new(S::NAME, other.to_string()),
            ));
        }
    }

    match DecodeError::from_errors(errors) {
        None => Ok(()),
        Some(err) => {
            debug!(shape = S::NAME, errors = err.len(), "decoding finished with errors");
            Err(err)
        }
    }
}

fn decode_fields<S: Shape>(target: &mut S, map: &Map, errors: &mut Vec<FieldError>) {
    for field in S::FIELDS {
        field.decode(target, map.get(field.key), errors);
    }
}

/// Decodes one field into its slot, leaving the slot alone when nothing was decoded.
///
/// Used by the code [`config_shape!`](crate::config_shape) generates.
pub fn decode_slot<T: Field>(
    slot: &mut T,
    key: &str,
    value: Option<&Value>,
    errors: &mut Vec<FieldError>,
) {
    if let Some(decoded) = T::decode_field(key, value, errors) {
        *slot = decoded;
    }
}

/// Decodes a nested shape.
///
/// A mapping recurses over the shape's fields, reporting their errors under their
/// own keys. An absent or `Nil` value recurses over an empty mapping.
pub fn decode_nested<S: Shape>(
    key: &str,
    value: Option<&Value>,
    errors: &mut Vec<FieldError>,
) -> Option<S> {
    let empty = Map::new();
    let map = match value {
        None | Some(Value::Nil) => &empty,
        Some(Value::Map(map)) => map,
        Some(other) => {
            debug!(key, expected = S::NAME, found = other.kind_name(), "nested value is not a mapping");
            errors.push(FieldError::new(
                key,
                InvalidValue::new(S::NAME, other.to_string()),
            ));
            return None;
        }
    };

    let mut target = S::default();
    decode_fields(&mut target, map, errors);
    Some(target)
}

/// Decodes a scalar field with `coerce`, recording its failure under `key`.
///
/// Absent and `Nil` values decode to `None` without error.
pub fn decode_scalar<T>(
    key: &str,
    value: Option<&Value>,
    errors: &mut Vec<FieldError>,
    coerce: impl FnOnce(&Value) -> Result<T, InvalidValue>,
) -> Option<T> {
    let value = match value {
        None | Some(Value::Nil) => return None,
        Some(value) => value,
    };
    match coerce(value) {
        Ok(decoded) => Some(decoded),
        Err(invalid) => {
            errors.push(FieldError::new(key, invalid));
            None
        }
    }
}

/// Declares a struct together with its decode field table.
///
/// Each field is written as `name: Type => "mapping key"`. The struct must derive
/// (or implement) `Default`; that value is what absent and failing fields keep.
/// The generated type implements [`Shape`] and [`Field`], so it can be nested in
/// other shapes, directly or as `Option<_>`.
///
/// # Examples
///
/// ```
/// use typedcfg::config_shape;
/// use typedcfg::domain::{decode, Shape, Value};
///
/// config_shape! {
///     #[derive(Debug, Default)]
///     pub struct Database {
///         pub url: String => "url",
///         pub pool: u32 => "poolSize",
///     }
/// }
///
/// config_shape! {
///     #[derive(Debug, Default)]
///     pub struct App {
///         pub database: Database => "database",
///         pub replica: Option<Database> => "replica",
///     }
/// }
///
/// assert_eq!(App::FIELDS.len(), 2);
/// let source = Value::map([("database", Value::map([("poolSize", Value::from("16"))]))]);
/// let app: App = decode(&source).unwrap();
/// assert_eq!(app.database.pool, 16);
/// assert!(app.replica.is_none());
/// ```
#[macro_export]
macro_rules! config_shape {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty => $key:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::domain::decode::Shape for $name {
            const NAME: &'static str = ::core::stringify!($name);

            const FIELDS: &'static [$crate::domain::decode::FieldDescriptor<Self>] = &[
                $(
                    $crate::domain::decode::FieldDescriptor::new(
                        $key,
                        <$ty as $crate::domain::decode::Field>::KIND,
                        <$ty as $crate::domain::decode::Field>::NULLABLE,
                        |target: &mut $name,
                         value: ::core::option::Option<&$crate::domain::value::Value>,
                         errors: &mut ::std::vec::Vec<$crate::domain::errors::FieldError>| {
                            $crate::domain::decode::decode_slot(&mut target.$field, $key, value, errors)
                        },
                    ),
                )*
            ];
        }

        impl $crate::domain::decode::Field for $name {
            const KIND: $crate::domain::decode::Kind =
                $crate::domain::decode::Kind::Nested(::core::stringify!($name));

            fn decode_field(
                key: &str,
                value: ::core::option::Option<&$crate::domain::value::Value>,
                errors: &mut ::std::vec::Vec<$crate::domain::errors::FieldError>,
            ) -> ::core::option::Option<Self> {
                $crate::domain::decode::decode_nested::<Self>(key, value, errors)
            }
        }
    };
}

// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing the decoder and its types.
//!
//! This module holds the loosely-typed [`Value`] model, the typed [`Shape`] and
//! [`Field`] descriptions, the coercion rules between them, and the error types.
//! It performs no I/O.

pub mod coerce;
pub mod decode;
pub mod duration;
pub mod errors;
pub mod value;

// Re-export commonly used types
pub use decode::{decode, decode_into, DecodeText, Field, FieldDescriptor, Kind, Shape};
pub use errors::{ConfigError, DecodeError, FieldError, InvalidValue, Result};
pub use value::{Map, Value};

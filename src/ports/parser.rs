// SPDX-License-Identifier: MIT OR Apache-2.0

//! Value parser trait definition.
//!
//! This module defines the `ValueParser` trait, which turns the text of a
//! configuration document into a [`Value`] tree ready for decoding.

use crate::domain::{Result, Value};

/// A trait for parsing configuration documents.
///
/// Parsers keep the nesting of the document: mappings become [`Value::Map`],
/// sequences become [`Value::List`], and every mapping level is string-keyed.
///
/// # Examples
///
/// ```rust
/// use typedcfg::ports::ValueParser;
/// use typedcfg::domain::{Result, Value};
///
/// struct KeyEqualsValue;
///
/// impl ValueParser for KeyEqualsValue {
///     fn parse(&self, content: &str) -> Result<Value> {
///         Ok(Value::map(content.lines().filter_map(|line| {
///             let (key, value) = line.split_once('=')?;
///             Some((key.trim(), Value::from(value.trim())))
///         })))
///     }
///
///     fn supported_extensions(&self) -> &[&str] {
///         &["env"]
///     }
/// }
///
/// let value = KeyEqualsValue.parse("port = 8080").unwrap();
/// assert_eq!(value.get("port"), Some(&Value::from("8080")));
/// ```
pub trait ValueParser {
    /// Parses document text into a value tree.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` when the text is not a valid document.
    fn parse(&self, content: &str) -> Result<Value>;

    /// Returns the file extensions supported by this parser, without the leading dot.
    fn supported_extensions(&self) -> &[&str];
}

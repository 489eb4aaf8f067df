// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON document parser.

use crate::domain::{ConfigError, Result, Value};
use crate::ports::ValueParser;

/// JSON parser implementation.
///
/// # Examples
///
/// ```rust
/// use typedcfg::adapters::JsonParser;
/// use typedcfg::domain::Value;
/// use typedcfg::ports::ValueParser;
///
/// let value = JsonParser::new().parse(r#"{"timeout": "5s"}"#).unwrap();
/// assert_eq!(value.get("timeout"), Some(&Value::from("5s")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonParser;

impl JsonParser {
    /// Creates a new JSON parser.
    pub fn new() -> Self {
        JsonParser
    }
}

impl ValueParser for JsonParser {
    fn parse(&self, content: &str) -> Result<Value> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError {
            message: format!("Failed to parse JSON: {}", e),
            source: Some(Box::new(e)),
        })
    }

    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }
}

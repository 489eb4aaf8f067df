// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML document parser.

use crate::domain::{ConfigError, Result, Value};
use crate::ports::ValueParser;

/// YAML parser implementation.
///
/// Mapping keys that YAML types as numbers or booleans are stored as their text,
/// so `1: one` is reachable under the key `"1"`.
///
/// # Examples
///
/// ```rust
/// use typedcfg::adapters::YamlParser;
/// use typedcfg::domain::Value;
/// use typedcfg::ports::ValueParser;
///
/// let parser = YamlParser::new();
/// let value = parser.parse("database:\n  host: localhost\n  port: 5432").unwrap();
/// let database = value.get("database").unwrap();
/// assert_eq!(database.get("port"), Some(&Value::Int(5432)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct YamlParser;

impl YamlParser {
    /// Creates a new YAML parser.
    pub fn new() -> Self {
        YamlParser
    }
}

impl ValueParser for YamlParser {
    fn parse(&self, content: &str) -> Result<Value> {
        // An empty document is an empty mapping, not an error.
        if content.trim().is_empty() {
            return Ok(Value::Map(Default::default()));
        }
        serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
            message: format!("Failed to parse YAML: {}", e),
            source: Some(Box::new(e)),
        })
    }

    fn supported_extensions(&self) -> &[&str] {
        &["yaml", "yml"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_parser_nested() {
        let yaml = r#"
app:
  database:
    connection:
      host: localhost
      port: 5432
"#;
        let value = YamlParser::new().parse(yaml).unwrap();
        let connection = value
            .get("app")
            .and_then(|v| v.get("database"))
            .and_then(|v| v.get("connection"))
            .unwrap();
        assert_eq!(connection.get("host"), Some(&Value::from("localhost")));
        assert_eq!(connection.get("port"), Some(&Value::Int(5432)));
    }

    #[test]
    fn test_yaml_parser_mixed_types() {
        let yaml = r#"
string_value: hello
number_value: 42
float_value: 1.5
bool_value: true
null_value: null
list_value: [a, b]
"#;
        let value = YamlParser::new().parse(yaml).unwrap();
        assert_eq!(value.get("string_value"), Some(&Value::from("hello")));
        assert_eq!(value.get("number_value"), Some(&Value::Int(42)));
        assert_eq!(value.get("float_value"), Some(&Value::Float(1.5)));
        assert_eq!(value.get("bool_value"), Some(&Value::Bool(true)));
        assert_eq!(value.get("null_value"), Some(&Value::Nil));
        assert_eq!(
            value.get("list_value"),
            Some(&Value::List(vec![Value::from("a"), Value::from("b")]))
        );
    }

    #[test]
    fn test_yaml_parser_empty_document() {
        let value = YamlParser::new().parse("  \n").unwrap();
        assert_eq!(value, Value::Map(Default::default()));
    }

    #[test]
    fn test_yaml_parser_invalid() {
        let result = YamlParser::new().parse("invalid: yaml: content:");
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_yaml_parser_supported_extensions() {
        let parser = YamlParser::default();
        assert_eq!(parser.supported_extensions(), &["yaml", "yml"]);
    }
}

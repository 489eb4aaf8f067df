// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the configuration crate.
//!
//! Decoding failures are never raised one at a time: every failing field becomes a
//! [`FieldError`], and the whole set is returned as a single [`DecodeError`]. The
//! crate-wide [`ConfigError`] wraps that aggregate alongside the parsing, source and
//! watcher failures. All errors use `thiserror`.

use thiserror::Error;

/// A value that could not be coerced to the declared type of a field.
///
/// Renders as `invalid <type> "<raw>"`, followed by `: <cause>` when the coercion
/// produced a richer diagnostic (self-decoding types report their own message here).
///
/// # Examples
///
/// ```
/// use typedcfg::domain::InvalidValue;
///
/// let invalid = InvalidValue::new("u8", "-1");
/// assert_eq!(invalid.to_string(), "invalid u8 \"-1\"");
///
/// let invalid = InvalidValue::new("Limit", "lots").with_cause("not a number");
/// assert_eq!(invalid.to_string(), "invalid Limit \"lots\": not a number");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {type_name} {raw:?}{}", cause_suffix(.cause))]
pub struct InvalidValue {
    /// Declared type name of the target
    pub type_name: &'static str,
    /// Textual form of the offending source value
    pub raw: String,
    /// Underlying diagnostic, if any
    pub cause: Option<String>,
}

impl InvalidValue {
    /// Creates an `InvalidValue` without a cause.
    pub fn new(type_name: &'static str, raw: impl Into<String>) -> Self {
        InvalidValue {
            type_name,
            raw: raw.into(),
            cause: None,
        }
    }

    /// Attaches an underlying diagnostic.
    pub fn with_cause(mut self, cause: impl ToString) -> Self {
        self.cause = Some(cause.to_string());
        self
    }
}

fn cause_suffix(cause: &Option<String>) -> String {
    cause.as_ref().map(|c| format!(": {c}")).unwrap_or_default()
}

/// A decode failure attributed to one field.
///
/// The key is the field's own mapping key. Fields of nested shapes are reported
/// with their local key, never qualified by the parent's key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("error decoding '{key}': {invalid}")]
pub struct FieldError {
    /// Mapping key of the failing field
    pub key: String,
    /// What was wrong with the value
    #[source]
    pub invalid: InvalidValue,
}

impl FieldError {
    /// Creates a new field error.
    pub fn new(key: impl Into<String>, invalid: InvalidValue) -> Self {
        FieldError {
            key: key.into(),
            invalid,
        }
    }
}

/// Every field failure of one decode call.
///
/// The textual rendering is a stable format that callers may match on:
///
/// ```text
/// 2 error(s) decoding:
///
/// * error decoding 'port': invalid u16 "70000"
/// * error decoding 'timeout': invalid duration "soon"
/// ```
///
/// Entry lines are sorted so that the text is deterministic. [`DecodeError::errors`]
/// keeps the order in which the fields were walked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} error(s) decoding:\n\n{}", .errors.len(), bullet_list(.errors))]
pub struct DecodeError {
    errors: Vec<FieldError>,
}

impl DecodeError {
    /// Builds the aggregate, or returns `None` when there is nothing to report.
    pub fn from_errors(errors: Vec<FieldError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(DecodeError { errors })
        }
    }

    /// The individual field errors, in walk order.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Number of failing fields.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Always `false`; an empty aggregate is never constructed.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Consumes the aggregate and returns the field errors.
    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }
}

fn bullet_list(errors: &[FieldError]) -> String {
    let mut points: Vec<String> = errors.iter().map(|e| format!("* {e}")).collect();
    points.sort();
    points.join("\n")
}

/// The main error type for configuration operations.
///
/// This enum is marked as `#[non_exhaustive]` to allow for future additions without
/// breaking backwards compatibility.
///
/// # Examples
///
/// ```
/// use typedcfg::domain::errors::ConfigError;
///
/// fn wait_for_changes() -> Result<(), ConfigError> {
///     Err(ConfigError::Cancelled)
/// }
///
/// assert!(wait_for_changes().unwrap_err().is_cancelled());
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// One or more fields could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// An error occurred in a configuration source.
    #[error("Configuration source '{source_name}' error: {message}")]
    SourceError {
        /// The name of the source that encountered the error
        source_name: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Failed to parse a configuration document.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The change watcher could not be set up or failed while listening.
    #[error("{message}")]
    WatcherError {
        /// The error message, prefixed with the failing stage
        message: String,
        /// The underlying error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The watch was told to stop.
    #[error("watch cancelled")]
    Cancelled,

    /// An I/O error occurred while reading configuration.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConfigError {
    /// Creates a `WatcherError` whose message is `"<context>: <err>"`.
    pub fn watcher(
        context: &str,
        err: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        let source = err.into();
        ConfigError::WatcherError {
            message: format!("{context}: {source}"),
            source: Some(source),
        }
    }

    /// Returns `true` when the error only reports a requested cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ConfigError::Cancelled)
    }
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration file loading.
//!
//! This module provides [`ConfigFile`], which reads a document from disk, parses it
//! into a [`Value`] tree with the parser matching its extension, and decodes it into
//! typed shapes on demand.

use crate::domain::{decode, decode_into, ConfigError, Result, Shape, Value};
use crate::ports::ValueParser;
use directories::ProjectDirs;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Maximum allowed size of a configuration file (10MB)
const MAX_CONFIG_FILE_SIZE: u64 = 10 * 1024 * 1024;

const SOURCE_NAME: &str = "config-file";

/// A parsed configuration file.
///
/// # Examples
///
/// ```rust,no_run
/// use typedcfg::adapters::ConfigFile;
/// use typedcfg::config_shape;
///
/// config_shape! {
///     #[derive(Debug, Default)]
///     pub struct Settings {
///         pub port: u16 => "port",
///     }
/// }
///
/// # fn main() -> typedcfg::domain::Result<()> {
/// let file = ConfigFile::from_file("/etc/myapp/config.yaml")?;
/// let settings: Settings = file.decode()?;
/// println!("listening on {}", settings.port);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ConfigFile {
    /// Canonical path to the file
    file_path: PathBuf,
    /// Parsed document
    value: Value,
    /// Parser for the file's format
    parser: Arc<dyn ValueParser + Send + Sync>,
}

impl ConfigFile {
    /// Loads a file, choosing the parser from its extension.
    ///
    /// `yaml` and `yml` need the `yaml` feature; `json` is always available.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::SourceError` when the extension is not supported or the
    /// file cannot be read, and `ConfigError::ParseError` when it is malformed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let parser = parser_for(path.as_ref())?;
        Self::with_parser(path, parser)
    }

    /// Loads a file with an explicit parser.
    pub fn with_parser<P, T>(path: P, parser: T) -> Result<Self>
    where
        P: AsRef<Path>,
        T: ValueParser + Send + Sync + 'static,
    {
        let file_path = path.as_ref().to_path_buf();

        // Canonicalize path to prevent directory traversal attacks
        let canonical_path = file_path.canonicalize().map_err(|e| {
            source_error(
                format!("Invalid or inaccessible path: {}", display_name(&file_path)),
                e,
            )
        })?;

        let content = read_document(&canonical_path)?;
        let value = parser.parse(&content)?;
        debug!(path = %canonical_path.display(), "loaded configuration file");

        Ok(Self {
            file_path: canonical_path,
            value,
            parser: Arc::new(parser),
        })
    }

    /// Loads `config.yaml` from the OS-appropriate configuration directory.
    ///
    /// # Arguments
    ///
    /// * `app_name` - The application name (e.g., "myapp")
    /// * `qualifier` - The organization/qualifier (e.g., "com.example")
    pub fn from_default_location(app_name: &str, qualifier: &str) -> Result<Self> {
        Self::with_filename(app_name, qualifier, "config.yaml")
    }

    /// Loads a custom file name from the OS-appropriate configuration directory.
    pub fn with_filename(app_name: &str, qualifier: &str, filename: &str) -> Result<Self> {
        let proj_dirs =
            ProjectDirs::from(qualifier, "", app_name).ok_or_else(|| ConfigError::SourceError {
                source_name: SOURCE_NAME.to_string(),
                message: "Failed to determine project directories".to_string(),
                source: None,
            })?;

        Self::from_file(proj_dirs.config_dir().join(filename))
    }

    /// Returns the canonical path to the configuration file.
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Returns the parsed document.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Re-reads and re-parses the file. On failure the previous document is kept.
    pub fn reload(&mut self) -> Result<()> {
        let content = read_document(&self.file_path)?;
        self.value = self.parser.parse(&content)?;
        debug!(path = %self.file_path.display(), "reloaded configuration file");
        Ok(())
    }

    /// Decodes the document into a fresh `S`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Decode` carrying every failing field.
    pub fn decode<S: Shape>(&self) -> Result<S> {
        Ok(decode(&self.value)?)
    }

    /// Decodes the document over an existing `S`, keeping fields that are absent.
    pub fn decode_into<S: Shape>(&self, target: &mut S) -> Result<()> {
        Ok(decode_into(&self.value, target)?)
    }
}

impl fmt::Debug for ConfigFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigFile")
            .field("file_path", &self.file_path)
            .field("value", &self.value)
            .field("extensions", &self.parser.supported_extensions())
            .finish()
    }
}

fn parser_for(path: &Path) -> Result<Box<dyn ValueParser + Send + Sync>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let mut parsers: Vec<Box<dyn ValueParser + Send + Sync>> = Vec::new();
    #[cfg(feature = "yaml")]
    parsers.push(Box::new(crate::adapters::YamlParser::new()));
    parsers.push(Box::new(crate::adapters::JsonParser::new()));

    parsers
        .into_iter()
        .find(|p| p.supported_extensions().contains(&extension.as_str()))
        .ok_or_else(|| ConfigError::SourceError {
            source_name: SOURCE_NAME.to_string(),
            message: format!("Unsupported configuration file extension: {:?}", extension),
            source: None,
        })
}

impl ValueParser for Box<dyn ValueParser + Send + Sync> {
    fn parse(&self, content: &str) -> Result<Value> {
        (**self).parse(content)
    }

    fn supported_extensions(&self) -> &[&str] {
        (**self).supported_extensions()
    }
}

fn read_document(path: &Path) -> Result<String> {
    // Check file size before reading to prevent DoS via large files
    let metadata = fs::metadata(path).map_err(|e| {
        source_error(
            format!("Failed to read file metadata: {}", display_name(path)),
            e,
        )
    })?;

    if metadata.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::SourceError {
            source_name: SOURCE_NAME.to_string(),
            message: format!(
                "Configuration file too large: {} bytes (max {} bytes)",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            ),
            source: None,
        });
    }

    fs::read_to_string(path).map_err(|e| {
        source_error(
            format!("Failed to read configuration file: {}", display_name(path)),
            e,
        )
    })
}

fn source_error(message: String, err: std::io::Error) -> ConfigError {
    ConfigError::SourceError {
        source_name: SOURCE_NAME.to_string(),
        message,
        source: Some(Box::new(err)),
    }
}

fn display_name(path: &Path) -> &str {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config_shape;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    config_shape! {
        #[derive(Debug, Default, PartialEq)]
        struct Database {
            host: String => "host",
            port: u16 => "port",
        }
    }

    fn temp_with(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_from_json_file() {
        let file = temp_with(".json", r#"{"host": "db", "port": 5432}"#);
        let config = ConfigFile::from_file(file.path()).unwrap();
        assert_eq!(config.value().get("host"), Some(&Value::from("db")));

        let database: Database = config.decode().unwrap();
        assert_eq!(database.port, 5432);
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_from_yaml_file() {
        let file = temp_with(".yaml", "host: localhost\nport: \"5432\"\n");
        let config = ConfigFile::from_file(file.path()).unwrap();
        let database: Database = config.decode().unwrap();
        assert_eq!(
            database,
            Database {
                host: "localhost".to_string(),
                port: 5432
            }
        );
    }

    #[test]
    fn test_decode_failure_is_decode_error() {
        let file = temp_with(".json", r#"{"port": 70000}"#);
        let config = ConfigFile::from_file(file.path()).unwrap();
        let err = config.decode::<Database>().unwrap_err();
        match err {
            ConfigError::Decode(decode) => {
                assert_eq!(decode.len(), 1);
                assert_eq!(decode.errors()[0].key, "port");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_decode_into_keeps_absent_fields() {
        let file = temp_with(".json", r#"{"port": 1}"#);
        let config = ConfigFile::from_file(file.path()).unwrap();
        let mut database = Database {
            host: "kept".to_string(),
            port: 0,
        };
        config.decode_into(&mut database).unwrap();
        assert_eq!(database.host, "kept");
        assert_eq!(database.port, 1);
    }

    #[test]
    fn test_reload() {
        let file = temp_with(".json", r#"{"port": 1}"#);
        let mut config = ConfigFile::from_file(file.path()).unwrap();

        fs::write(file.path(), r#"{"port": 2}"#).unwrap();
        config.reload().unwrap();
        assert_eq!(config.value().get("port"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_reload_parse_failure_keeps_previous_value() {
        let file = temp_with(".json", r#"{"port": 1}"#);
        let mut config = ConfigFile::from_file(file.path()).unwrap();

        fs::write(file.path(), "{broken").unwrap();
        assert!(matches!(config.reload(), Err(ConfigError::ParseError { .. })));
        assert_eq!(config.value().get("port"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_file_path_is_canonical() {
        let file = temp_with(".json", "{}");
        let config = ConfigFile::from_file(file.path()).unwrap();
        assert_eq!(config.file_path(), file.path().canonicalize().unwrap());
    }

    #[test]
    fn test_unsupported_extension() {
        let file = temp_with(".ini", "port=1");
        let err = ConfigFile::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::SourceError { .. }));
        assert!(err.to_string().contains("Unsupported configuration file extension"));
    }

    #[test]
    fn test_nonexistent_file() {
        let result = ConfigFile::from_file("/nonexistent/path/to/config.json");
        assert!(matches!(result, Err(ConfigError::SourceError { .. })));
    }

    #[test]
    fn test_file_too_large() {
        let file = Builder::new().suffix(".json").tempfile().unwrap();
        file.as_file().set_len(MAX_CONFIG_FILE_SIZE + 1).unwrap();
        let err = ConfigFile::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Configuration file too large"));
    }
}

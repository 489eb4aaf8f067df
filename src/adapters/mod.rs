// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing parser and change source implementations.
//!
//! This module contains concrete implementations of the traits defined in the ports
//! layer, plus [`ConfigFile`], which ties a parser to a file on disk.

pub mod config_file;
pub mod json;
#[cfg(feature = "yaml")]
pub mod yaml;

pub mod watchers;

// Re-export adapters based on feature flags
pub use config_file::ConfigFile;
pub use json::JsonParser;
#[cfg(feature = "reload")]
pub use watchers::NotifyChangeSource;
#[cfg(feature = "yaml")]
pub use yaml::YamlParser;

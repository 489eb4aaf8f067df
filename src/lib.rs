// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed configuration decoding with aggregated diagnostics.
//!
//! This crate decodes a loosely-typed configuration document into a statically
//! typed structure. Every field is coerced independently, with exact numeric
//! semantics, and all failures come back together in one report instead of
//! stopping at the first bad value. A companion notifier watches a directory
//! and signals, at most once per 500ms, that the configuration changed.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: `Value`, the `Shape`/`Field` descriptions, coercion rules, errors
//! - **Ports**: Trait definitions for parsers (`ValueParser`) and raw change sources (`ChangeSource`)
//! - **Adapters**: YAML and JSON parsers, `ConfigFile`, the `notify`-backed change source
//! - **Service**: The debounced change notifier
//!
//! # Feature Flags
//!
//! - `yaml`: Enable YAML document support (default)
//! - `reload`: Enable the file watcher and debounced notifier (default)
//! - `full`: Enable all features
//!
//! # Quick Start
//!
//! ```rust
//! use typedcfg::prelude::*;
//! use typedcfg::config_shape;
//! use chrono::TimeDelta;
//!
//! config_shape! {
//!     #[derive(Debug, Default)]
//!     pub struct Server {
//!         pub port: u16 => "port",
//!         pub timeout: TimeDelta => "timeout",
//!         pub verbose: Option<bool> => "verbose",
//!     }
//! }
//!
//! let source = Value::map([
//!     ("port", Value::from("8080")),
//!     ("timeout", Value::from("1m30s")),
//! ]);
//! let server: Server = decode(&source).unwrap();
//! assert_eq!(server.port, 8080);
//! assert_eq!(server.timeout, TimeDelta::seconds(90));
//! assert_eq!(server.verbose, None);
//!
//! let source = Value::map([("port", Value::from(-1)), ("verbose", Value::from("maybe"))]);
//! let err = decode::<Server>(&source).unwrap_err();
//! assert_eq!(
//!     err.to_string(),
//!     "2 error(s) decoding:\n\n\
//!      * error decoding 'port': invalid u16 \"-1\"\n\
//!      * error decoding 'verbose': invalid bool \"maybe\""
//! );
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
#[cfg(feature = "reload")]
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::adapters::{ConfigFile, JsonParser};
    pub use crate::domain::{
        decode, decode_into, ConfigError, DecodeError, DecodeText, Field, FieldError,
        InvalidValue, Kind, Result, Shape, Value,
    };
    pub use crate::ports::ValueParser;

    // Re-export adapters based on feature flags
    #[cfg(feature = "yaml")]
    pub use crate::adapters::YamlParser;
    #[cfg(feature = "reload")]
    pub use crate::adapters::NotifyChangeSource;
    #[cfg(feature = "reload")]
    pub use crate::ports::{ChangeKind, ChangeSource, RawEvent, Subscription};
    #[cfg(feature = "reload")]
    pub use crate::service::{DebouncedNotifier, QUANTUM};
}

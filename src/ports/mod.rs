// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the trait definitions (ports) the library talks to the
//! outside world through: parsers that produce [`Value`](crate::domain::Value)
//! trees, and raw change sources consumed by the debounced notifier.

#[cfg(feature = "reload")]
pub mod change_source;
pub mod parser;

// Re-export commonly used types
#[cfg(feature = "reload")]
pub use change_source::{
    ChangeKind, ChangeSource, RawEvent, RawEventResult, RawWatchError, Subscription,
};
pub use parser::ValueParser;

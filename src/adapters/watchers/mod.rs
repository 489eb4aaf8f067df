// SPDX-License-Identifier: MIT OR Apache-2.0

//! Raw change sources.
//!
//! This module contains implementations of the `ChangeSource` trait.

#[cfg(feature = "reload")]
pub mod file_watcher;

#[cfg(feature = "reload")]
pub use file_watcher::NotifyChangeSource;

// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer containing the debounced change notifier.
//!
//! The notifier ties a raw change source from the adapters layer to a coalescing
//! loop and reports changes to the caller over a channel.

pub mod notifier;

// Re-export commonly used types
pub use notifier::{watch, DebouncedNotifier, QUANTUM};

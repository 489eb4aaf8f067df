// SPDX-License-Identifier: MIT OR Apache-2.0

//! Raw change source trait definition.
//!
//! A [`ChangeSource`] reports "something changed under this path" events without
//! any coalescing. The debounced notifier in the service layer consumes one
//! [`Subscription`] per watch.

use crate::domain::Result;
use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;

/// The kind of a raw filesystem change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// A file or directory was created
    Create,
    /// File contents were written
    Write,
    /// A file or directory was removed
    Remove,
    /// A file or directory was renamed
    Rename,
    /// Metadata or any other change
    Other,
}

impl ChangeKind {
    /// Returns `true` for the kinds that indicate new content: creation and writes.
    pub fn is_content_change(self) -> bool {
        matches!(self, ChangeKind::Create | ChangeKind::Write)
    }
}

/// One raw change reported by a [`ChangeSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    /// What happened
    pub kind: ChangeKind,
    /// The path it happened to
    pub path: PathBuf,
}

impl RawEvent {
    /// Creates a new raw event.
    pub fn new(kind: ChangeKind, path: impl Into<PathBuf>) -> Self {
        RawEvent {
            kind,
            path: path.into(),
        }
    }
}

/// An error reported by the raw source while listening.
pub type RawWatchError = Box<dyn Error + Send + Sync>;

/// An item of a subscription's stream.
pub type RawEventResult = std::result::Result<RawEvent, RawWatchError>;

/// A live subscription to a [`ChangeSource`].
///
/// The subscription owns whatever keeps the underlying watch registered. Dropping
/// it releases the watch; since it cannot be cloned, that happens exactly once.
pub struct Subscription {
    events: UnboundedReceiver<RawEventResult>,
    guard: Option<Box<dyn Send>>,
}

impl Subscription {
    /// Creates a subscription from an event stream and the guard that keeps the
    /// source registered.
    pub fn new(events: UnboundedReceiver<RawEventResult>, guard: impl Send + 'static) -> Self {
        Subscription {
            events,
            guard: Some(Box::new(guard)),
        }
    }

    /// Waits for the next raw event. Returns `None` once the source has shut down.
    pub async fn next(&mut self) -> Option<RawEventResult> {
        self.events.recv().await
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.guard.is_some())
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(guard) = self.guard.take() {
            drop(guard);
            debug!("released raw change subscription");
        }
    }
}

/// A trait for sources of raw change events.
///
/// # Examples
///
/// ```rust
/// use typedcfg::domain::Result;
/// use typedcfg::ports::{ChangeKind, ChangeSource, RawEvent, Subscription};
/// use std::path::Path;
///
/// struct OneShot;
///
/// impl ChangeSource for OneShot {
///     fn subscribe(&mut self, dir: &Path) -> Result<Subscription> {
///         let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
///         let _ = tx.send(Ok(RawEvent::new(ChangeKind::Write, dir.join("app.yaml"))));
///         Ok(Subscription::new(rx, tx))
///     }
/// }
/// ```
pub trait ChangeSource: Send {
    /// Starts watching `dir` and returns the subscription.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::WatcherError` when the watch cannot be set up.
    fn subscribe(&mut self, dir: &Path) -> Result<Subscription>;
}

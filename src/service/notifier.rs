// SPDX-License-Identifier: MIT OR Apache-2.0

//! Debounced change notification.
//!
//! [`DebouncedNotifier`] turns the raw event stream of a [`ChangeSource`] into at
//! most one zero-payload notification per [`QUANTUM`]. Two loops race in one task:
//! the first consumes raw events and flags qualifying ones into a capacity-1 queue,
//! the second drains that queue into a pending flag and publishes on every tick
//! where the flag is set. The first loop to finish ends the watch and drops the
//! other, even one parked on a full notification channel.
//!
//! # Examples
//!
//! ```rust,no_run
//! use tokio::sync::{mpsc, watch};
//!
//! # async fn run() -> typedcfg::domain::Result<()> {
//! let (cancel_tx, cancel_rx) = watch::channel(false);
//! let (notify_tx, mut notify_rx) = mpsc::channel(1);
//!
//! let watcher = tokio::spawn(typedcfg::service::watch(cancel_rx, "/etc/myapp", notify_tx));
//! while notify_rx.recv().await.is_some() {
//!     println!("configuration changed");
//! #   break;
//! }
//!
//! cancel_tx.send(true).ok();
//! let result = watcher.await.expect("watch task panicked");
//! assert!(result.unwrap_err().is_cancelled());
//! # Ok(())
//! # }
//! ```

use crate::adapters::NotifyChangeSource;
use crate::domain::{ConfigError, Result};
use crate::ports::{ChangeSource, Subscription};
use std::path::Path;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// The coalescing window.
pub const QUANTUM: Duration = Duration::from_millis(500);

/// Coalesces raw change events into periodic notifications.
#[derive(Debug)]
pub struct DebouncedNotifier<S = NotifyChangeSource> {
    source: S,
    quantum: Duration,
}

impl DebouncedNotifier<NotifyChangeSource> {
    /// Creates a notifier over the local file system.
    pub fn new() -> Self {
        Self::with_source(NotifyChangeSource::new())
    }
}

impl Default for DebouncedNotifier<NotifyChangeSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ChangeSource> DebouncedNotifier<S> {
    /// Creates a notifier over a custom raw change source.
    pub fn with_source(source: S) -> Self {
        DebouncedNotifier {
            source,
            quantum: QUANTUM,
        }
    }

    /// Overrides the coalescing window.
    pub fn with_quantum(mut self, quantum: Duration) -> Self {
        self.quantum = quantum;
        self
    }

    /// Returns the coalescing window.
    pub fn quantum(&self) -> Duration {
        self.quantum
    }

    /// Watches `dir` until cancelled or until the raw source fails.
    ///
    /// Creation and write events under `dir` are coalesced; every tick of the
    /// quantum during which at least one occurred sends one `()` on `notify_tx`.
    /// Cancellation is `true` on `cancel`, or its sender being dropped.
    ///
    /// # Errors
    ///
    /// This never returns `Ok`. It returns `ConfigError::Cancelled` when told to
    /// stop, and `ConfigError::WatcherError` when the watch cannot be set up, when
    /// the raw source fails (`"watcher listen error: …"`), or when `notify_tx` is
    /// closed. The raw subscription is released before returning in every case.
    pub async fn watch(
        mut self,
        cancel: watch::Receiver<bool>,
        dir: impl AsRef<Path>,
        notify_tx: mpsc::Sender<()>,
    ) -> Result<()> {
        let dir = dir.as_ref().to_path_buf();
        let mut subscription = self.source.subscribe(&dir)?;
        info!(
            dir = %dir.display(),
            quantum_ms = self.quantum.as_millis() as u64,
            "watching for configuration changes"
        );

        let (event_tx, event_rx) = mpsc::channel(1);
        let dir_text = dir.to_string_lossy().into_owned();
        let result = tokio::select! {
            biased;

            result = consume(&mut subscription, &dir_text, event_tx, cancel.clone()) => result,
            result = publish(event_rx, notify_tx, self.quantum, cancel) => result,
        };

        drop(subscription);
        result
    }
}

/// Watches `dir` on the local file system with the default quantum.
///
/// See [`DebouncedNotifier::watch`].
pub async fn watch(
    cancel: watch::Receiver<bool>,
    dir: impl AsRef<Path>,
    notify_tx: mpsc::Sender<()>,
) -> Result<()> {
    DebouncedNotifier::new().watch(cancel, dir, notify_tx).await
}

async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    // A dropped sender also ends the watch.
    let _ = cancel.wait_for(|stop| *stop).await;
}

async fn consume(
    subscription: &mut Subscription,
    dir: &str,
    event_tx: mpsc::Sender<()>,
    mut cancel: watch::Receiver<bool>,
) -> Result<()> {
    loop {
        tokio::select! {
            biased;

            _ = cancelled(&mut cancel) => {
                debug!("change watch cancelled");
                return Err(ConfigError::Cancelled);
            }

            item = subscription.next() => match item {
                Some(Ok(event)) => {
                    if !event.kind.is_content_change()
                        || !event.path.to_string_lossy().contains(dir)
                    {
                        continue;
                    }
                    debug!(path = %event.path.display(), kind = ?event.kind, "change detected");
                    // Full means a signal is already pending.
                    let _ = event_tx.try_send(());
                }
                Some(Err(e)) => {
                    warn!(error = %e, "raw change source failed");
                    return Err(ConfigError::watcher("watcher listen error", e));
                }
                None => {
                    warn!("raw change source closed");
                    return Err(ConfigError::watcher("watcher listen error", "event stream closed"));
                }
            },
        }
    }
}

async fn publish(
    mut event_rx: mpsc::Receiver<()>,
    notify_tx: mpsc::Sender<()>,
    quantum: Duration,
    mut cancel: watch::Receiver<bool>,
) -> Result<()> {
    let mut ticker = interval_at(Instant::now() + quantum, quantum);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut pending = false;

    loop {
        tokio::select! {
            biased;

            _ = cancelled(&mut cancel) => return Err(ConfigError::Cancelled),

            received = event_rx.recv() => match received {
                Some(()) => pending = true,
                None => return Err(ConfigError::watcher("watcher listen error", "event queue closed")),
            },

            _ = ticker.tick() => {
                if !pending {
                    continue;
                }
                pending = false;

                tokio::select! {
                    biased;

                    _ = cancelled(&mut cancel) => return Err(ConfigError::Cancelled),

                    sent = notify_tx.send(()) => {
                        if sent.is_err() {
                            debug!("notification receiver dropped");
                            return Err(ConfigError::WatcherError {
                                message: "notification channel closed".to_string(),
                                source: None,
                            });
                        }
                        debug!("published change notification");
                    }
                }
            }
        }
    }
}

// SPDX-License-Identifier: MIT OR Apache-2.0

//! File system change source backed by the `notify` crate.
//!
//! This module provides a [`ChangeSource`] that registers a non-recursive watch on
//! a directory and forwards every raw event, one per affected path, without any
//! debouncing. Coalescing is the job of the
//! [`DebouncedNotifier`](crate::service::DebouncedNotifier).

use crate::domain::{ConfigError, Result};
use crate::ports::{ChangeKind, ChangeSource, RawEvent, RawEventResult, RawWatchError, Subscription};
use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use tokio::sync::mpsc::unbounded_channel;
use tracing::debug;

/// Raw change source for local directories.
///
/// # Examples
///
/// ```rust,no_run
/// use typedcfg::adapters::NotifyChangeSource;
/// use typedcfg::ports::ChangeSource;
///
/// # async fn run() -> typedcfg::domain::Result<()> {
/// let mut source = NotifyChangeSource::new();
/// let mut subscription = source.subscribe("/etc/myapp".as_ref())?;
/// while let Some(Ok(event)) = subscription.next().await {
///     println!("{:?} {}", event.kind, event.path.display());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct NotifyChangeSource {
    config: notify::Config,
}

impl NotifyChangeSource {
    /// Creates a change source with the default `notify` configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a change source with a custom `notify` configuration.
    pub fn with_config(config: notify::Config) -> Self {
        NotifyChangeSource { config }
    }
}

/// Maps a `notify` event kind to a [`ChangeKind`].
pub fn change_kind(kind: &EventKind) -> ChangeKind {
    match kind {
        EventKind::Create(_) => ChangeKind::Create,
        EventKind::Modify(ModifyKind::Data(_)) | EventKind::Modify(ModifyKind::Any) => {
            ChangeKind::Write
        }
        EventKind::Modify(ModifyKind::Name(_)) => ChangeKind::Rename,
        EventKind::Remove(_) => ChangeKind::Remove,
        _ => ChangeKind::Other,
    }
}

fn raw_events(res: notify::Result<Event>) -> Vec<RawEventResult> {
    match res {
        Ok(event) => {
            let kind = change_kind(&event.kind);
            event
                .paths
                .into_iter()
                .map(|path| Ok(RawEvent::new(kind, path)))
                .collect()
        }
        Err(e) => vec![Err(Box::new(e) as RawWatchError)],
    }
}

impl ChangeSource for NotifyChangeSource {
    fn subscribe(&mut self, dir: &Path) -> Result<Subscription> {
        let (event_tx, event_rx) = unbounded_channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                for item in raw_events(res) {
                    // The receiver is gone once the subscription is dropped.
                    let _ = event_tx.send(item);
                }
            },
            self.config,
        )
        .map_err(|e| ConfigError::watcher("failed to create watcher", e))?;

        watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .map_err(|e| ConfigError::watcher("watcher error", e))?;

        debug!(dir = %dir.display(), "registered file system watch");
        Ok(Subscription::new(event_rx, watcher))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, MetadataKind, RemoveKind, RenameMode};
    use std::fs;
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_change_kind_mapping() {
        assert_eq!(change_kind(&EventKind::Create(CreateKind::File)), ChangeKind::Create);
        assert_eq!(
            change_kind(&EventKind::Modify(ModifyKind::Data(DataChange::Content))),
            ChangeKind::Write
        );
        assert_eq!(change_kind(&EventKind::Modify(ModifyKind::Any)), ChangeKind::Write);
        assert_eq!(
            change_kind(&EventKind::Modify(ModifyKind::Name(RenameMode::Both))),
            ChangeKind::Rename
        );
        assert_eq!(
            change_kind(&EventKind::Modify(ModifyKind::Metadata(MetadataKind::Any))),
            ChangeKind::Other
        );
        assert_eq!(change_kind(&EventKind::Remove(RemoveKind::File)), ChangeKind::Remove);
        assert_eq!(change_kind(&EventKind::Access(notify::event::AccessKind::Any)), ChangeKind::Other);
    }

    #[test]
    fn test_raw_events_one_per_path() {
        let event = Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/tmp/a"))
            .add_path(PathBuf::from("/tmp/b"));
        let items = raw_events(Ok(event));
        assert_eq!(items.len(), 2);
        let paths: Vec<PathBuf> = items.into_iter().map(|i| i.unwrap().path).collect();
        assert_eq!(paths, vec![PathBuf::from("/tmp/a"), PathBuf::from("/tmp/b")]);
    }

    #[test]
    fn test_raw_events_error() {
        let items = raw_events(Err(notify::Error::generic("queue overflow")));
        assert_eq!(items.len(), 1);
        assert!(items[0].is_err());
    }

    #[tokio::test]
    async fn test_subscribe_nonexistent_dir() {
        let mut source = NotifyChangeSource::new();
        let err = source
            .subscribe(Path::new("/nonexistent/path/to/dir"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::WatcherError { .. }));
        assert!(err.to_string().starts_with("watcher error"));
    }

    #[tokio::test]
    async fn test_subscribe_reports_writes() {
        let dir = TempDir::new().unwrap();
        let mut source = NotifyChangeSource::new();
        let mut subscription = source.subscribe(dir.path()).unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;
        fs::write(dir.path().join("app.yaml"), "port: 1\n").unwrap();

        // File system timing varies between platforms; only check what arrives.
        if let Ok(Some(Ok(event))) =
            tokio::time::timeout(Duration::from_secs(2), subscription.next()).await
        {
            assert!(event.path.ends_with("app.yaml"));
        } else {
            eprintln!("Warning: no file system event arrived (this can happen in test environments)");
        }
    }
}

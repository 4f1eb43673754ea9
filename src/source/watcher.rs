//! Configuration directory watcher for hot reload.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::source::loader::{domain_for, read_changed_block};
use crate::source::SourceEvent;

/// Watches a configuration directory and emits a `SourceEvent` for every
/// source file that is created or modified.
pub struct SourceWatcher {
    dir: PathBuf,
    poll_interval: Duration,
    event_tx: mpsc::UnboundedSender<SourceEvent>,
}

impl SourceWatcher {
    /// Create a new SourceWatcher.
    ///
    /// Returns the watcher and a receiver for source events.
    pub fn new(dir: &Path, poll_interval: Duration) -> (Self, mpsc::UnboundedReceiver<SourceEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        (
            Self {
                dir: dir.to_path_buf(),
                poll_interval,
                event_tx,
            },
            event_rx,
        )
    }

    /// Start watching in the background.
    ///
    /// Watching stops when the returned watcher is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.event_tx;

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if !(event.kind.is_modify() || event.kind.is_create()) {
                        return;
                    }
                    for path in &event.paths {
                        let Some(domain) = domain_for(path) else {
                            continue;
                        };
                        match read_changed_block(path) {
                            Ok(Some(block)) => {
                                tracing::info!(domain = %domain, path = ?path, "Config source change detected");
                                let _ = tx.send(SourceEvent { domain, block });
                            }
                            // Truncated mid-write; the write that follows raises another event.
                            Ok(None) => {
                                tracing::debug!(domain = %domain, path = ?path, "Skipping blank config source");
                            }
                            // Partially written TOML lands here; the next event retries.
                            Err(e) => {
                                tracing::error!(domain = %domain, error = %e, "Failed to read config source. Keeping current value.");
                            }
                        }
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(self.poll_interval),
        )?;

        watcher.watch(&self.dir, RecursiveMode::NonRecursive)?;

        tracing::info!(dir = ?self.dir, "Config source watcher started");
        Ok(watcher)
    }
}

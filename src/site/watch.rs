//! Content directory watcher.
//!
//! Rebuilds the site data whenever a content file is created, changed or
//! removed. Filesystem events are debounced so an editor's save burst
//! triggers a single rebuild.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebounceEventResult};
use thiserror::Error;
use tokio::sync::mpsc;

use super::build::{BuildSummary, SiteBuilder};
use crate::content::store::EXTENSIONS;

/// Errors that can occur with the watcher
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("Content directory does not exist: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

/// Configuration for the watcher
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Directory holding the content files
    pub content_dir: PathBuf,

    /// Where rebuilt site data is written
    pub out_dir: PathBuf,

    /// Quiet period before a burst of events triggers a rebuild
    pub debounce: Duration,
}

impl WatchConfig {
    pub fn new(content_dir: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            content_dir: content_dir.into(),
            out_dir: out_dir.into(),
            debounce: Duration::from_millis(500),
        }
    }

    /// Check if the content directory exists
    pub fn validate(&self) -> Result<(), WatchError> {
        if !self.content_dir.is_dir() {
            return Err(WatchError::DirectoryNotFound(self.content_dir.clone()));
        }
        Ok(())
    }
}

/// Outcome of one rebuild, sent to the caller
#[derive(Debug)]
pub enum RebuildEvent {
    Built(BuildSummary),
    Failed(String),
}

/// Watches the content directory and rebuilds on change
pub struct ContentWatcher {
    config: WatchConfig,
    builder: SiteBuilder,
}

impl ContentWatcher {
    pub fn new(config: WatchConfig, builder: SiteBuilder) -> Self {
        Self { config, builder }
    }

    pub fn config(&self) -> &WatchConfig {
        &self.config
    }

    /// Start watching. Rebuild outcomes arrive on the returned channel
    /// until the handle is stopped.
    pub fn watch(self) -> Result<(mpsc::Receiver<RebuildEvent>, WatchHandle), WatchError> {
        self.config.validate()?;

        let (event_tx, event_rx) = mpsc::channel::<RebuildEvent>(16);
        let (stop_tx, mut stop_rx) = mpsc::channel::<()>(1);

        let task = tokio::spawn(async move {
            if let Err(e) = run_watcher(self.config, self.builder, event_tx, &mut stop_rx).await {
                tracing::error!("Watcher error: {}", e);
            }
        });

        Ok((event_rx, WatchHandle { stop_tx, task }))
    }
}

/// Handle to control the watcher
pub struct WatchHandle {
    stop_tx: mpsc::Sender<()>,
    task: tokio::task::JoinHandle<()>,
}

impl WatchHandle {
    /// Stop the watcher
    pub async fn stop(self) -> Result<()> {
        let _ = self.stop_tx.send(()).await;
        self.task.await?;
        Ok(())
    }
}

/// Check if a path names a content file
pub fn is_content_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// Internal watcher loop
async fn run_watcher(
    config: WatchConfig,
    builder: SiteBuilder,
    event_tx: mpsc::Sender<RebuildEvent>,
    stop_rx: &mut mpsc::Receiver<()>,
) -> Result<(), WatchError> {
    let (tx, mut rx) = mpsc::channel::<DebounceEventResult>(16);

    // The debouncer calls this from its own thread, outside the runtime
    let mut debouncer = new_debouncer(config.debounce, move |result: DebounceEventResult| {
        if tx.blocking_send(result).is_err() {
            tracing::debug!("Watcher loop gone, dropping filesystem event");
        }
    })?;
    debouncer
        .watcher()
        .watch(&config.content_dir, RecursiveMode::NonRecursive)?;

    tracing::info!("Watching {} for content changes", config.content_dir.display());

    loop {
        let changed = tokio::select! {
            _ = stop_rx.recv() => {
                tracing::info!("Watcher stopping...");
                break;
            }
            result = rx.recv() => match result {
                Some(Ok(events)) => events.iter().any(|event| is_content_file(&event.path)),
                Some(Err(e)) => {
                    tracing::warn!("Watcher error: {:?}", e);
                    false
                }
                None => {
                    tracing::error!("Watcher channel disconnected");
                    break;
                }
            },
        };

        if changed {
            tracing::info!("Content changed, rebuilding");
            let outcome = match builder.build(&config.out_dir).await {
                Ok(summary) => RebuildEvent::Built(summary),
                Err(e) => {
                    tracing::warn!("Rebuild failed: {}", e);
                    RebuildEvent::Failed(e.to_string())
                }
            };
            if event_tx.send(outcome).await.is_err() {
                tracing::debug!("Rebuild receiver dropped");
            }
        }
    }

    Ok(())
}

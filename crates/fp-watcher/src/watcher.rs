//! File watcher with async event streaming.
//!
//! This module provides the [`FileWatcher`] type that bridges the synchronous
//! `notify` watcher to the async tokio runtime.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Blocking Thread (spawn_blocking)             │
//! │  owns RecommendedWatcher, signals readiness, waits for stop     │
//! └─────────────────────────────────────────────────────────────────┘
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    notify backend thread                        │
//! │  ┌──────────────────┐    ┌──────────────────┐                   │
//! │  │ callback         │ -> │ decode + mask    │ -- blocking_send  │
//! │  └──────────────────┘    └──────────────────┘         │         │
//! └───────────────────────────────────────────────────────│─────────┘
//!                                                         ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Async Runtime (tokio)                        │
//! │  FileWatcher ── bounded mpsc::Receiver ──► orchestration loop   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unlike a debounced watcher, every backend notification is forwarded. The
//! channel is deliberately small: a slow consumer stalls the backend thread
//! instead of growing an unbounded queue.

use camino::{Utf8Path, Utf8PathBuf};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use fp_core::WatchConfig;

use crate::error::WatchError;
use crate::events::{decode, ObservedEvent};
use crate::mask::EventMask;

/// Items delivered on the event channel.
///
/// Backend errors travel in-band so the consumer sees them in arrival order.
pub type EventResult = Result<ObservedEvent, WatchError>;

/// A watch on a directory subtree that streams decoded events.
///
/// # Lifecycle
///
/// 1. **Creation**: `FileWatcher::new()` validates the path, spawns a
///    blocking task that owns the `notify` watcher, and returns only after
///    the watch is installed.
///
/// 2. **Event Reception**: Use `recv()` or `try_recv()`.
///
/// 3. **Shutdown**: Call `shutdown()` to stop the watch and await the task,
///    or drop the watcher, which sends the stop signal without awaiting.
///
/// # Examples
///
/// ```no_run
/// use fp_core::WatchConfig;
/// use fp_watcher::{EventMask, FileWatcher};
/// use camino::Utf8Path;
///
/// # async fn example() -> Result<(), fp_watcher::WatchError> {
/// let mut watcher = FileWatcher::new(
///     Utf8Path::new("./testing_monitor/source"),
///     &WatchConfig::default(),
///     EventMask::ALL,
/// ).await?;
///
/// while let Some(event) = watcher.recv().await {
///     let event = event?;
///     println!("{}: {}", event.basename, event.kind);
/// }
/// # Ok(())
/// # }
/// ```
pub struct FileWatcher {
    /// Stop signal sender. `None` after shutdown is initiated.
    shutdown_tx: Option<oneshot::Sender<()>>,

    /// Handle to the blocking task owning the backend watcher.
    task_handle: Option<JoinHandle<Result<(), WatchError>>>,

    /// Event receiver for async consumption.
    event_rx: mpsc::Receiver<EventResult>,

    /// The canonical path being watched.
    watch_path: Utf8PathBuf,

    /// Kinds delivered by this watch.
    mask: EventMask,
}

impl std::fmt::Debug for FileWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWatcher")
            .field("watch_path", &self.watch_path)
            .field("mask", &self.mask)
            .field("is_running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl FileWatcher {
    /// Installs a watch on `path` and starts streaming events.
    ///
    /// Resolves once the backend has accepted the watch, so filesystem
    /// operations issued afterwards are observed.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::PathNotFound`] if the path doesn't exist,
    /// [`WatchError::Notify`] if the backend refuses the watch, and
    /// [`WatchError::ChannelClosed`] if the watcher task dies before
    /// reporting readiness.
    pub async fn new(
        path: &Utf8Path,
        config: &WatchConfig,
        mask: EventMask,
    ) -> Result<Self, WatchError> {
        if !path.exists() {
            return Err(WatchError::path_not_found(path));
        }

        let watch_path = path.canonicalize_utf8().map_err(WatchError::Io)?;

        // tokio panics on a zero-capacity channel.
        let (event_tx, event_rx) = mpsc::channel(config.channel_capacity.max(1));
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let (ready_tx, ready_rx) = oneshot::channel();

        let task_path = watch_path.clone();
        let mode = if config.recursive {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };

        let task_handle = tokio::task::spawn_blocking(move || {
            run_watcher_loop(&task_path, mode, mask, event_tx, ready_tx, shutdown_rx)
        });

        match ready_rx.await {
            Ok(Ok(())) => {}
            Ok(Err(error)) => {
                let _ = task_handle.await;
                return Err(error);
            }
            Err(_) => {
                return Err(match task_handle.await {
                    Ok(Err(error)) => error,
                    Ok(Ok(())) | Err(_) => WatchError::ChannelClosed,
                });
            }
        }

        tracing::info!(path = %watch_path, recursive = config.recursive, %mask, "File watcher started");

        Ok(Self {
            shutdown_tx: Some(shutdown_tx),
            task_handle: Some(task_handle),
            event_rx,
            watch_path,
            mask,
        })
    }

    /// Receives the next event asynchronously.
    ///
    /// Returns `None` once the watcher has been shut down and the channel
    /// is drained.
    pub async fn recv(&mut self) -> Option<EventResult> {
        self.event_rx.recv().await
    }

    /// Tries to receive an event without waiting.
    pub fn try_recv(&mut self) -> Result<EventResult, mpsc::error::TryRecvError> {
        self.event_rx.try_recv()
    }

    /// Returns the canonical path being watched.
    #[must_use]
    pub fn watch_path(&self) -> &Utf8Path {
        &self.watch_path
    }

    /// Returns the subscription mask.
    #[must_use]
    pub const fn mask(&self) -> EventMask {
        self.mask
    }

    /// Returns `true` if the watcher is still running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.shutdown_tx.is_some() && self.task_handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stops the watch and awaits the watcher task.
    ///
    /// The receiver is closed first, releasing a backend thread blocked on a
    /// full channel. Events still buffered are discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if the watcher task panicked or failed.
    pub async fn shutdown(mut self) -> Result<(), WatchError> {
        self.event_rx.close();

        if let Some(tx) = self.shutdown_tx.take() {
            // Ignore error if the task already exited
            let _ = tx.send(());
        }

        if let Some(handle) = self.task_handle.take() {
            match handle.await {
                Ok(result) => result?,
                Err(_join_error) => return Err(WatchError::ChannelClosed),
            }
        }

        Ok(())
    }
}

impl Drop for FileWatcher {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Creates the backend watcher with a callback forwarding decoded events.
fn install(
    path: &Utf8Path,
    mode: RecursiveMode,
    mask: EventMask,
    event_tx: mpsc::Sender<EventResult>,
) -> Result<RecommendedWatcher, WatchError> {
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        let decoded = res.map_err(WatchError::from).and_then(|event| decode(event, mask));
        match decoded {
            Ok(events) => {
                for event in events {
                    // Send via blocking_send for sync context
                    if event_tx.blocking_send(Ok(event)).is_err() {
                        tracing::debug!("Event channel closed, dropping notification");
                        return;
                    }
                }
            }
            Err(error) => {
                tracing::warn!(error = %error, "Watch error");
                let _ = event_tx.blocking_send(Err(error));
            }
        }
    })?;

    watcher.watch(path.as_std_path(), mode)?;
    Ok(watcher)
}

/// Runs the backend watcher in a blocking context until stopped.
fn run_watcher_loop(
    path: &Utf8Path,
    mode: RecursiveMode,
    mask: EventMask,
    event_tx: mpsc::Sender<EventResult>,
    ready_tx: oneshot::Sender<Result<(), WatchError>>,
    shutdown_rx: oneshot::Receiver<()>,
) -> Result<(), WatchError> {
    let watcher = match install(path, mode, mask, event_tx) {
        Ok(watcher) => watcher,
        Err(error) => {
            let _ = ready_tx.send(Err(error));
            return Ok(());
        }
    };

    if ready_tx.send(Ok(())).is_err() {
        tracing::debug!(path = %path, "Watcher creator went away before readiness");
        return Ok(());
    }

    // Block until shutdown signal is received (or the sender is dropped)
    let _ = shutdown_rx.blocking_recv();

    drop(watcher);
    tracing::info!(path = %path, "File watcher stopped");

    Ok(())
}

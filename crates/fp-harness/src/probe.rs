//! Probe orchestration.
//!
//! A run goes through these phases, strictly in order:
//!
//! ```text
//! setup ─► watch ─► pause ─► drive ║ collect ─► drain ─► shutdown ─► report
//! ```
//!
//! Fixture files are created before the watch exists so they are never
//! observed. The driver then performs every action on a blocking thread
//! while the collector consumes the watcher's stream on this task. After
//! the last action the driver waits out the settle delay and signals
//! completion; whatever is already buffered is drained before the watch is
//! torn down. Any error anywhere aborts the run without a report.

use std::io;
use std::sync::Arc;

use fp_actions::ActionRegistry;
use fp_core::{EventCollector, ProbeConfig};
use fp_watcher::{EventMask, EventResult, FileWatcher, WatchError};
use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::HarnessError;
use crate::report;

/// Result of a completed probe run.
#[derive(Debug)]
pub struct ProbeOutcome {
    /// The registry the run drove, in report order.
    pub registry: Arc<ActionRegistry>,
    /// Everything observed under the watched root.
    pub collector: EventCollector,
}

impl ProbeOutcome {
    /// Renders the report for this outcome into a string.
    #[must_use]
    pub fn report(&self) -> String {
        report::render_to_string(self.registry.names(), &self.collector)
    }
}

/// Runs actions against a watched root and collects what the backend saw.
#[derive(Debug, Clone, Default)]
pub struct Probe {
    config: ProbeConfig,
}

impl Probe {
    /// Creates a probe with the given configuration.
    #[must_use]
    pub const fn new(config: ProbeConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Runs the probe and writes the report to `out`.
    ///
    /// # Errors
    ///
    /// Returns the first error from any phase. Nothing is written on error.
    pub async fn run<W: io::Write + ?Sized>(
        &self,
        registry: ActionRegistry,
        out: &mut W,
    ) -> Result<ProbeOutcome, HarnessError> {
        emit(self.observe(registry).await, out)
    }

    /// Runs the probe and returns what was observed without rendering it.
    ///
    /// The registry's root must already exist.
    ///
    /// # Errors
    ///
    /// Returns the first error from any phase.
    pub async fn observe(&self, mut registry: ActionRegistry) -> Result<ProbeOutcome, HarnessError> {
        registry.run_setup()?;

        let mut watcher = FileWatcher::new(registry.root(), &self.config.watch, EventMask::ALL).await?;
        tokio::time::sleep(self.config.watch.registration_pause()).await;

        let registry = Arc::new(registry);
        let (done_tx, mut done_rx) = oneshot::channel();
        let driver = spawn_driver(Arc::clone(&registry), &self.config, done_tx);

        let gathered = gather(&mut watcher, &mut done_rx).await;
        let collector = match gathered {
            Ok(collector) => collector,
            Err(e) => {
                // The driver may still be touching the tree
                driver.abort();
                if let Err(shutdown_err) = watcher.shutdown().await {
                    warn!(error = %shutdown_err, "Error shutting down watcher after failed run");
                }
                return Err(e);
            }
        };
        watcher.shutdown().await?;

        info!(
            events = collector.total(),
            basenames = collector.basenames().len(),
            "Probe complete"
        );
        Ok(ProbeOutcome {
            registry,
            collector,
        })
    }
}

/// Performs every action on a blocking thread, then waits out the settle
/// delay and reports through `done`.
fn spawn_driver(
    registry: Arc<ActionRegistry>,
    config: &ProbeConfig,
    done: oneshot::Sender<Result<(), HarnessError>>,
) -> JoinHandle<()> {
    let settle = config.driver.settle();
    tokio::spawn(async move {
        let result = match tokio::task::spawn_blocking(move || registry.run_actions()).await {
            Ok(Ok(())) => {
                debug!(?settle, "Actions done, settling");
                tokio::time::sleep(settle).await;
                Ok(())
            }
            Ok(Err(e)) => Err(HarnessError::from(e)),
            Err(join_error) => Err(HarnessError::DriverPanicked(join_error.to_string())),
        };
        // The collector is gone if it already failed
        let _ = done.send(result);
    })
}

/// Writes the report for a finished run. A failed run writes nothing.
fn emit<W: io::Write + ?Sized>(
    outcome: Result<ProbeOutcome, HarnessError>,
    out: &mut W,
) -> Result<ProbeOutcome, HarnessError> {
    let outcome = outcome?;
    report::render(outcome.registry.names(), &outcome.collector, out)?;
    Ok(outcome)
}

/// Stream of decoded events the collection loop consumes.
trait EventSource {
    async fn recv(&mut self) -> Option<EventResult>;

    fn try_recv(&mut self) -> Result<EventResult, TryRecvError>;
}

impl EventSource for FileWatcher {
    async fn recv(&mut self) -> Option<EventResult> {
        FileWatcher::recv(self).await
    }

    fn try_recv(&mut self) -> Result<EventResult, TryRecvError> {
        FileWatcher::try_recv(self)
    }
}

impl EventSource for mpsc::Receiver<EventResult> {
    async fn recv(&mut self) -> Option<EventResult> {
        mpsc::Receiver::recv(self).await
    }

    fn try_recv(&mut self) -> Result<EventResult, TryRecvError> {
        mpsc::Receiver::try_recv(self)
    }
}

/// Collects until completion, then drains what is buffered.
async fn gather<S: EventSource>(
    source: &mut S,
    done: &mut oneshot::Receiver<Result<(), HarnessError>>,
) -> Result<EventCollector, HarnessError> {
    let mut collector = EventCollector::new();
    collect(source, &mut collector, done).await?;
    drain(source, &mut collector)?;
    Ok(collector)
}

/// Records events until the driver signals completion.
///
/// Events are preferred over the completion signal so anything already
/// delivered when the driver finishes is recorded here rather than left to
/// the drain.
async fn collect<S: EventSource>(
    source: &mut S,
    collector: &mut EventCollector,
    done: &mut oneshot::Receiver<Result<(), HarnessError>>,
) -> Result<(), HarnessError> {
    loop {
        tokio::select! {
            biased;

            event = source.recv() => {
                let event = event.ok_or(WatchError::ChannelClosed)??;
                collector.record(&event.basename, event.kind);
            }

            result = &mut *done => {
                return result.map_err(|_| HarnessError::DriverLost)?;
            }
        }
    }
}

/// Records whatever is buffered without waiting for more.
fn drain<S: EventSource>(source: &mut S, collector: &mut EventCollector) -> Result<(), HarnessError> {
    let mut drained = 0_usize;
    loop {
        match source.try_recv() {
            Ok(event) => {
                let event = event?;
                collector.record(&event.basename, event.kind);
                drained += 1;
            }
            Err(TryRecvError::Empty) => break,
            Err(TryRecvError::Disconnected) => return Err(WatchError::ChannelClosed.into()),
        }
    }
    debug!(drained, "Drained buffered events");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8Path;
    use fp_actions::Scenario;
    use fp_core::EventKind;
    use fp_watcher::ObservedEvent;
    use tempfile::TempDir;

    fn observed(name: &str, kind: EventKind) -> EventResult {
        Ok(ObservedEvent::new(
            Utf8Path::new("/scratch/source").join(name),
            kind,
        ))
    }

    fn outcome_from(gathered: Result<EventCollector, HarnessError>) -> Result<ProbeOutcome, HarnessError> {
        gathered.map(|collector| ProbeOutcome {
            registry: Arc::new(ActionRegistry::new(Utf8Path::new("/scratch/source"))),
            collector,
        })
    }

    fn quick_probe() -> Probe {
        let mut config = ProbeConfig::default();
        config.driver.settle_ms = 300;
        Probe::new(config)
    }

    fn watched_root(temp_dir: &TempDir) -> camino::Utf8PathBuf {
        let root = Utf8Path::from_path(temp_dir.path())
            .expect("Invalid path")
            .join("source");
        std::fs::create_dir(&root).expect("Failed to create watched root");
        root
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_observe_empty_registry() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = watched_root(&temp_dir);
        let registry = ActionRegistry::from_scenarios(&root, []).unwrap();

        let outcome = quick_probe().observe(registry).await.unwrap();
        assert!(outcome.collector.is_empty());
        assert_eq!(outcome.report(), "");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_observe_create() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = watched_root(&temp_dir);
        let registry = ActionRegistry::from_scenarios(&root, [Scenario::Empty]).unwrap();

        let outcome = quick_probe().observe(registry).await.unwrap();
        assert_eq!(outcome.collector.count("empty", EventKind::Create), 1);
        assert!(outcome.report().starts_with("empty: C"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_action_failure_aborts_run() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = watched_root(&temp_dir);
        // Occupy the target name with a directory so creating the file fails
        std::fs::create_dir(root.join("empty")).unwrap();
        let registry = ActionRegistry::from_scenarios(&root, [Scenario::Empty]).unwrap();

        let mut out = Vec::new();
        let err = quick_probe().run(registry, &mut out).await.unwrap_err();
        assert!(matches!(err, HarnessError::Action(_)));
        assert!(out.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_missing_root_fails_before_acting() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = Utf8Path::from_path(temp_dir.path())
            .expect("Invalid path")
            .join("absent");
        let registry = ActionRegistry::from_scenarios(&root, [Scenario::Empty]).unwrap();

        let err = quick_probe().observe(registry).await.unwrap_err();
        assert!(matches!(err, HarnessError::Watch(_)));
    }

    #[tokio::test]
    async fn test_gather_records_until_completion() {
        let (tx, mut rx) = mpsc::channel(5);
        let (done_tx, mut done_rx) = oneshot::channel();
        tx.send(observed("1byte", EventKind::Create)).await.unwrap();
        tx.send(observed("1byte", EventKind::Write)).await.unwrap();
        done_tx.send(Ok(())).unwrap();

        let collector = gather(&mut rx, &mut done_rx).await.unwrap();
        assert_eq!(collector.tokens_for("1byte"), vec!['C', 'W']);
        drop(tx);
    }

    #[tokio::test]
    async fn test_unrecognized_event_aborts_collection() {
        let (tx, mut rx) = mpsc::channel(5);
        let (_done_tx, mut done_rx) = oneshot::channel();
        tx.send(observed("empty", EventKind::Create)).await.unwrap();
        tx.send(Err(WatchError::unrecognized(&notify::EventKind::Other, None)))
            .await
            .unwrap();

        let err = gather(&mut rx, &mut done_rx).await.unwrap_err();
        assert!(err.is_protocol_violation());

        let mut out = Vec::new();
        assert!(emit(outcome_from(Err(err)), &mut out).is_err());
        assert!(out.is_empty());
        drop(tx);
    }

    #[tokio::test]
    async fn test_closed_stream_aborts_collection() {
        let (tx, mut rx) = mpsc::channel::<EventResult>(5);
        let (_done_tx, mut done_rx) = oneshot::channel();
        drop(tx);

        let err = gather(&mut rx, &mut done_rx).await.unwrap_err();
        assert!(matches!(err, HarnessError::Watch(WatchError::ChannelClosed)));

        let mut out = Vec::new();
        assert!(emit(outcome_from(Err(err)), &mut out).is_err());
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_dropped_driver_is_driver_lost() {
        let (_tx, mut rx) = mpsc::channel::<EventResult>(5);
        let (done_tx, mut done_rx) = oneshot::channel();
        drop(done_tx);

        let err = gather(&mut rx, &mut done_rx).await.unwrap_err();
        assert!(matches!(err, HarnessError::DriverLost));
    }

    #[tokio::test]
    async fn test_driver_error_aborts_collection() {
        let (_tx, mut rx) = mpsc::channel::<EventResult>(5);
        let (done_tx, mut done_rx) = oneshot::channel();
        done_tx
            .send(Err(HarnessError::DriverPanicked("boom".to_owned())))
            .unwrap();

        let err = gather(&mut rx, &mut done_rx).await.unwrap_err();
        assert!(matches!(err, HarnessError::DriverPanicked(_)));
    }

    #[tokio::test]
    async fn test_drain_reports_closed_stream() {
        let (tx, mut rx) = mpsc::channel(5);
        tx.send(observed("delete", EventKind::Delete)).await.unwrap();
        drop(tx);

        let mut collector = EventCollector::new();
        let err = drain(&mut rx, &mut collector).unwrap_err();
        assert!(matches!(err, HarnessError::Watch(WatchError::ChannelClosed)));
        assert_eq!(collector.count("delete", EventKind::Delete), 1);
    }

    #[tokio::test]
    async fn test_drain_stops_when_empty() {
        let (tx, mut rx) = mpsc::channel(5);
        tx.send(observed("move aside", EventKind::Rename)).await.unwrap();

        let mut collector = EventCollector::new();
        drain(&mut rx, &mut collector).unwrap();
        assert_eq!(collector.total(), 1);
        drop(tx);
    }

    #[tokio::test]
    async fn test_drain_propagates_stream_error() {
        let (tx, mut rx) = mpsc::channel(5);
        tx.send(Err(WatchError::unrecognized(&notify::EventKind::Any, None)))
            .await
            .unwrap();

        let err = drain(&mut rx, &mut EventCollector::new()).unwrap_err();
        assert!(err.is_protocol_violation());
        drop(tx);
    }

    #[test]
    fn test_emit_writes_report_for_successful_run() {
        let mut collector = EventCollector::new();
        collector.record("delete", EventKind::Delete);

        let mut out = Vec::new();
        emit(outcome_from(Ok(collector)), &mut out).unwrap();
        let report = String::from_utf8(out).unwrap();
        assert_eq!(report.lines().count(), 8);
        assert!(report.contains("delete: D\n"));
    }
}

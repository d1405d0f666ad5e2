//! Tick scheduling
//!
//! Fires the orchestrator's all-sources pass on a fixed wall-clock interval
//! until told to stop. The first pass runs one full interval after start,
//! never eagerly at startup. A tick that would fire while the previous pass
//! is still running is dropped (skip-if-busy), so at most one pass is in
//! flight at any time.

use crate::config::SearchConfig;
use crate::harvest::FetchOrchestrator;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

/// Lifecycle of the tick scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Built but not started; no timer is armed
    Idle,
    /// Interval timer active; zero or one dispatch executing
    Running,
    /// Terminal: timer cancelled, no further ticks will fire
    Stopped,
}

/// Periodic driver for [`FetchOrchestrator::run_all`]
pub struct TickScheduler {
    orchestrator: FetchOrchestrator,
    config: Arc<SearchConfig>,
    interval: Duration,
}

/// Handle to a running scheduler
///
/// Dropping the handle without calling [`stop`](Self::stop) also ends the
/// scheduling loop; `stop` additionally waits for an in-flight dispatch to
/// finish.
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl TickScheduler {
    /// Creates a scheduler ticking at the configured polling interval
    pub fn new(orchestrator: FetchOrchestrator, config: Arc<SearchConfig>) -> Self {
        let interval = config.tick_interval();
        Self::with_interval(orchestrator, config, interval)
    }

    /// Creates a scheduler with an explicit tick interval
    pub fn with_interval(
        orchestrator: FetchOrchestrator,
        config: Arc<SearchConfig>,
        interval: Duration,
    ) -> Self {
        Self {
            orchestrator,
            config,
            interval,
        }
    }

    /// Starts the interval timer: Idle -> Running
    ///
    /// The first dispatch fires one full interval from now.
    pub fn start(self) -> SchedulerHandle {
        let (shutdown, mut signal) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker =
                time::interval_at(Instant::now() + self.interval, self.interval);
            let mut in_flight: Option<JoinHandle<()>> = None;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let busy = in_flight
                            .as_ref()
                            .map(|dispatch| !dispatch.is_finished())
                            .unwrap_or(false);

                        if busy {
                            tracing::warn!("previous dispatch still running, skipping tick");
                            continue;
                        }

                        let orchestrator = self.orchestrator.clone();
                        let config = Arc::clone(&self.config);
                        in_flight = Some(tokio::spawn(async move {
                            orchestrator.run_all(&config).await;
                        }));
                    }
                    _ = signal.changed() => {
                        // Stop requested, or the handle was dropped
                        break;
                    }
                }
            }

            // Running -> Stopped: let an in-flight dispatch finish, schedule
            // nothing further
            if let Some(dispatch) = in_flight.take() {
                if let Err(e) = dispatch.await {
                    tracing::error!(error = %e, "in-flight dispatch panicked during shutdown");
                }
            }
        });

        SchedulerHandle { shutdown, task }
    }
}

impl SchedulerHandle {
    /// Current lifecycle state
    pub fn state(&self) -> SchedulerState {
        if self.task.is_finished() {
            SchedulerState::Stopped
        } else {
            SchedulerState::Running
        }
    }

    /// Stops the scheduler: Running -> Stopped
    ///
    /// Cancels the interval timer and waits for an in-flight dispatch to
    /// finish. No new tick is scheduled afterward.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "scheduler task panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{FetchError, RawListing, SourceFetcher};
    use crate::harvest::Pacing;
    use crate::normalize::ListingNormalizer;
    use crate::storage::{ListingStore, StorageResult, StoredEntry};
    use crate::config::SourceId;
    use crate::normalize::ListingEntry;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingFetcher {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl SourceFetcher for CountingFetcher {
        async fn fetch(
            &self,
            _source: &SourceId,
            _pages: u32,
        ) -> Result<Vec<RawListing>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
    }

    struct NullStore;

    impl ListingStore for NullStore {
        fn insert_if_absent(&self, _entry: &ListingEntry) -> StorageResult<bool> {
            Ok(true)
        }

        fn count_entries(&self) -> StorageResult<u64> {
            Ok(0)
        }

        fn count_entries_for_source(&self, _source: &SourceId) -> StorageResult<u64> {
            Ok(0)
        }

        fn count_by_source(&self) -> StorageResult<Vec<(String, u64)>> {
            Ok(Vec::new())
        }

        fn recent_entries(&self, _limit: usize) -> StorageResult<Vec<StoredEntry>> {
            Ok(Vec::new())
        }
    }

    fn test_scheduler(
        interval: Duration,
    ) -> (TickScheduler, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let orchestrator = FetchOrchestrator::new(
            Arc::new(CountingFetcher {
                calls: Arc::clone(&calls),
            }),
            Arc::new(ListingNormalizer::new()),
            Arc::new(NullStore),
            Pacing::none(),
        );
        let config = Arc::new(SearchConfig {
            groups: vec![SourceId::from("g1")],
            pages: 1,
            ..Default::default()
        });
        (
            TickScheduler::with_interval(orchestrator, config, interval),
            calls,
        )
    }

    #[tokio::test]
    async fn test_first_tick_fires_after_interval_not_at_start() {
        let (scheduler, calls) = test_scheduler(Duration::from_millis(300));
        let handle = scheduler.start();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0, "must not fire eagerly");

        tokio::time::sleep(Duration::from_millis(350)).await;
        assert!(calls.load(Ordering::SeqCst) >= 1);

        handle.stop().await;
    }

    #[tokio::test]
    async fn test_stop_prevents_further_ticks() {
        let (scheduler, calls) = test_scheduler(Duration::from_millis(50));
        let handle = scheduler.start();

        tokio::time::sleep(Duration::from_millis(80)).await;
        handle.stop().await;

        let after_stop = calls.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(calls.load(Ordering::SeqCst), after_stop);
    }

    #[tokio::test]
    async fn test_handle_reports_running() {
        let (scheduler, _calls) = test_scheduler(Duration::from_millis(500));
        let handle = scheduler.start();

        assert_eq!(handle.state(), SchedulerState::Running);

        handle.stop().await;
    }
}

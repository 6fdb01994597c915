//! Native refresh loop.
//!
//! # Design
//! - The first cycle starts immediately, then one starts every
//!   [`REFRESH_INTERVAL`], whatever the previous cycle is doing.
//! - Every cycle runs as its own task; the loop never waits on a fetch.
//! - Each cycle gets a child of the shutdown token, so stopping the schedule
//!   also abandons in-flight fetches. Abandoned cycles render nothing.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info};

use crate::REFRESH_INTERVAL;
use crate::poller::StatusPoller;
use crate::sink::RenderSink;
use crate::source::StatusSource;

/// What a new cycle does to cycles still in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverlapPolicy {
    /// Leave them running; whichever response resolves last is displayed.
    #[default]
    Overlap,
    /// Cancel the previous cycle before starting the next one.
    CancelStale,
}

/// Timer that drives a [`StatusPoller`] until shut down.
#[derive(Debug, Clone)]
pub struct RefreshSchedule {
    period: Duration,
    policy: OverlapPolicy,
    shutdown: CancellationToken,
}

impl RefreshSchedule {
    /// Schedule on the fixed refresh interval, stopping when `shutdown` fires.
    #[must_use]
    pub const fn new(shutdown: CancellationToken) -> Self {
        Self {
            period: REFRESH_INTERVAL,
            policy: OverlapPolicy::Overlap,
            shutdown,
        }
    }

    /// Choose how overlapping cycles are treated.
    #[must_use]
    pub const fn with_policy(mut self, policy: OverlapPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run the loop on a background task.
    pub fn spawn<S, K>(self, poller: Arc<StatusPoller<S, K>>) -> JoinHandle<()>
    where
        S: StatusSource + Send + Sync + 'static,
        K: RenderSink + Send + Sync + 'static,
    {
        tokio::spawn(self.run(poller))
    }

    /// Run the loop until the shutdown token is cancelled, then wait for the
    /// remaining cycles to unwind.
    pub async fn run<S, K>(self, poller: Arc<StatusPoller<S, K>>)
    where
        S: StatusSource + Send + Sync + 'static,
        K: RenderSink + Send + Sync + 'static,
    {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let cycles = TaskTracker::new();
        let mut previous: Option<CancellationToken> = None;
        let mut cycle: u64 = 0;

        info!(
            period_ms = u64::try_from(self.period.as_millis()).unwrap_or(u64::MAX),
            policy = ?self.policy,
            "refresh schedule started"
        );

        loop {
            tokio::select! {
                biased;
                () = self.shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }

            cycle += 1;
            let token = self.shutdown.child_token();
            if self.policy == OverlapPolicy::CancelStale
                && let Some(stale) = previous.replace(token.clone())
            {
                stale.cancel();
            }
            cycles.spawn(run_cycle(Arc::clone(&poller), token, cycle));
        }

        cycles.close();
        cycles.wait().await;
        info!(cycles = cycle, "refresh schedule stopped");
    }
}

async fn run_cycle<S, K>(poller: Arc<StatusPoller<S, K>>, token: CancellationToken, cycle: u64)
where
    S: StatusSource + Send + Sync + 'static,
    K: RenderSink + Send + Sync + 'static,
{
    debug!(cycle, "refresh cycle started");
    let outcome = tokio::select! {
        biased;
        () = token.cancelled() => {
            debug!(cycle, "refresh cycle abandoned");
            return;
        }
        outcome = poller.fetch() => outcome,
    };
    poller.render(outcome);
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::PoisonError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use reach_api_models::StatusSnapshot;
    use reach_test_support::fixtures::started_snapshot;
    use tokio::time::{Instant, sleep};

    use super::*;
    use crate::error::RefreshError;
    use crate::sink::recording::RecordingSink;

    /// Records when each fetch starts; every other fetch fails.
    struct ClockedSource {
        origin: Instant,
        starts: Mutex<Vec<u128>>,
    }

    impl ClockedSource {
        fn new() -> Self {
            Self {
                origin: Instant::now(),
                starts: Mutex::new(Vec::new()),
            }
        }

        fn starts(&self) -> Vec<u128> {
            self.starts
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }
    }

    #[async_trait]
    impl StatusSource for ClockedSource {
        async fn fetch_status(&self) -> Result<StatusSnapshot, RefreshError> {
            let mut starts = self.starts.lock().unwrap_or_else(PoisonError::into_inner);
            starts.push(self.origin.elapsed().as_millis());
            if starts.len() % 2 == 0 {
                Err(RefreshError::transport("connection refused"))
            } else {
                Ok(started_snapshot())
            }
        }
    }

    /// The first fetch hangs for twelve seconds; later fetches answer at once
    /// with a different total so the two are distinguishable.
    struct SlowFirstSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl StatusSource for SlowFirstSource {
        async fn fetch_status(&self) -> Result<StatusSnapshot, RefreshError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            let mut snapshot = started_snapshot();
            if call == 0 {
                sleep(Duration::from_secs(12)).await;
                snapshot.total_users = 1;
            } else {
                snapshot.total_users = 2;
            }
            Ok(snapshot)
        }
    }

    fn total_users(sink: &RecordingSink) -> Option<String> {
        sink.display().counters.map(|counters| counters.total_users)
    }

    #[tokio::test(start_paused = true)]
    async fn cycles_start_immediately_then_every_interval() {
        let shutdown = CancellationToken::new();
        let poller = Arc::new(StatusPoller::new(
            ClockedSource::new(),
            RecordingSink::default(),
        ));
        let handle = RefreshSchedule::new(shutdown.clone()).spawn(Arc::clone(&poller));

        sleep(Duration::from_millis(15_500)).await;
        shutdown.cancel();
        handle.await.expect("schedule task");

        assert_eq!(poller.source().starts(), vec![0, 5_000, 10_000, 15_000]);
    }

    #[tokio::test(start_paused = true)]
    async fn failures_do_not_stop_the_timer() {
        let shutdown = CancellationToken::new();
        let poller = Arc::new(StatusPoller::new(
            ClockedSource::new(),
            RecordingSink::default(),
        ));
        let handle = RefreshSchedule::new(shutdown.clone()).spawn(Arc::clone(&poller));

        sleep(Duration::from_millis(5_500)).await;
        assert_eq!(total_users(poller.sink()).as_deref(), Some("Error"));

        sleep(Duration::from_millis(5_000)).await;
        assert_eq!(total_users(poller.sink()).as_deref(), Some("10"));

        shutdown.cancel();
        handle.await.expect("schedule task");
        assert_eq!(poller.source().starts().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_cycles_last_resolved_wins() {
        let shutdown = CancellationToken::new();
        let poller = Arc::new(StatusPoller::new(
            SlowFirstSource {
                calls: AtomicUsize::new(0),
            },
            RecordingSink::default(),
        ));
        let handle = RefreshSchedule::new(shutdown.clone()).spawn(Arc::clone(&poller));

        sleep(Duration::from_millis(10_500)).await;
        assert_eq!(total_users(poller.sink()).as_deref(), Some("2"));

        // The first request resolves at t=12s and overwrites the newer data.
        sleep(Duration::from_millis(2_000)).await;
        assert_eq!(total_users(poller.sink()).as_deref(), Some("1"));

        shutdown.cancel();
        handle.await.expect("schedule task");
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stale_drops_superseded_cycle() {
        let shutdown = CancellationToken::new();
        let poller = Arc::new(StatusPoller::new(
            SlowFirstSource {
                calls: AtomicUsize::new(0),
            },
            RecordingSink::default(),
        ));
        let handle = RefreshSchedule::new(shutdown.clone())
            .with_policy(OverlapPolicy::CancelStale)
            .spawn(Arc::clone(&poller));

        sleep(Duration::from_millis(12_500)).await;
        assert_eq!(total_users(poller.sink()).as_deref(), Some("2"));
        assert_eq!(poller.sink().display().renders, 2);

        shutdown.cancel();
        handle.await.expect("schedule task");
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_abandons_in_flight_cycles() {
        let shutdown = CancellationToken::new();
        let poller = Arc::new(StatusPoller::new(
            SlowFirstSource {
                calls: AtomicUsize::new(0),
            },
            RecordingSink::default(),
        ));
        let handle = RefreshSchedule::new(shutdown.clone()).spawn(Arc::clone(&poller));

        sleep(Duration::from_millis(1_000)).await;
        shutdown.cancel();
        handle.await.expect("schedule task");

        assert!(poller.sink().display().counters.is_none());
    }
}

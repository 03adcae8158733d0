//! Fixed-cadence health poller

use super::types::{MetricsSnapshot, MetricsView};
use super::HealthSource;
use crate::telemetry::{increment, set_gauge, CounterMetric, GaugeMetric};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Smallest accepted polling interval
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Polls a [`HealthSource`] immediately and then at a fixed interval
///
/// Failures never reach the caller: the last good snapshot (or the
/// default) stays published and the next tick simply tries again.
pub struct MetricsPoller {
    source: Arc<dyn HealthSource>,
    interval: Duration,
}

impl MetricsPoller {
    pub fn new(source: Arc<dyn HealthSource>, interval: Duration) -> Self {
        Self {
            source,
            interval: interval.max(MIN_INTERVAL),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start polling; the schedule lives as long as the returned handle
    pub fn activate(self) -> PollerHandle {
        let (tx, rx) = watch::channel(MetricsView::default());
        let task = tokio::spawn(Self::run_poll_loop(self.source, self.interval, tx));
        PollerHandle { view: rx, task }
    }

    async fn run_poll_loop(
        source: Arc<dyn HealthSource>,
        interval: Duration,
        tx: watch::Sender<MetricsView>,
    ) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut view = MetricsView::default();

        loop {
            ticker.tick().await;

            match source.fetch().await {
                Ok(snapshot) => {
                    view.record_success(snapshot);
                    increment(CounterMetric::HealthPollSucceeded);
                    set_gauge(GaugeMetric::LatencyP95Ms, snapshot.latency_p95_ms);
                }
                Err(e) => {
                    view.record_failure();
                    increment(CounterMetric::HealthPollFailed);
                    tracing::debug!(
                        error = %e,
                        failures = view.consecutive_failures,
                        "Health poll failed, keeping last snapshot"
                    );
                }
            }

            tx.send_replace(view.clone());
        }
    }
}

/// Active polling subscription
///
/// Deactivating (or dropping) the handle cancels the schedule at once; a
/// request still in flight is abandoned and its result never published.
pub struct PollerHandle {
    view: watch::Receiver<MetricsView>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Current snapshot (default until the first successful poll)
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.view.borrow().snapshot
    }

    pub fn view(&self) -> MetricsView {
        self.view.borrow().clone()
    }

    /// Wait for the next poll result; `false` once polling has stopped
    pub async fn changed(&mut self) -> bool {
        self.view.changed().await.is_ok()
    }

    /// Independent receiver of view updates
    pub fn subscribe(&self) -> watch::Receiver<MetricsView> {
        self.view.clone()
    }

    /// Cancel the schedule
    pub fn deactivate(self) {
        // Drop aborts the task
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poller::HealthError;
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Replays scripted outcomes, then keeps failing
    struct ScriptedSource {
        outcomes: Mutex<VecDeque<Option<MetricsSnapshot>>>,
        calls: AtomicUsize,
        delay: Duration,
    }

    impl ScriptedSource {
        fn new(outcomes: Vec<Option<MetricsSnapshot>>) -> Arc<Self> {
            Self::with_delay(outcomes, Duration::ZERO)
        }

        fn with_delay(outcomes: Vec<Option<MetricsSnapshot>>, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                outcomes: Mutex::new(outcomes.into()),
                calls: AtomicUsize::new(0),
                delay,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HealthSource for ScriptedSource {
        async fn fetch(&self) -> Result<MetricsSnapshot, HealthError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            let next = self.outcomes.lock().unwrap().pop_front().flatten();
            next.ok_or(HealthError::Status(StatusCode::SERVICE_UNAVAILABLE))
        }
    }

    fn snap(latency: f64) -> MetricsSnapshot {
        MetricsSnapshot {
            latency_p95_ms: latency,
            integrations: 1,
            control_checks: 2,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_immediately_then_every_interval() {
        let source = ScriptedSource::new(vec![]);
        let handle = MetricsPoller::new(source.clone(), Duration::from_secs(5)).activate();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(source.calls(), 1);

        tokio::time::sleep(Duration::from_secs(12)).await;
        assert_eq!(source.calls(), 3);

        handle.deactivate();
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_tracks_last_success() {
        let source = ScriptedSource::new(vec![None, Some(snap(90.0)), None, Some(snap(70.0)), None]);
        let mut handle = MetricsPoller::new(source, Duration::from_secs(5)).activate();

        let mut seen = Vec::new();
        for _ in 0..5 {
            assert!(handle.changed().await);
            seen.push(handle.snapshot().latency_p95_ms);
        }

        assert_eq!(seen, vec![150.0, 90.0, 90.0, 70.0, 70.0]);
        assert_eq!(handle.view().consecutive_failures, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_result_ignored_after_deactivate() {
        let source = ScriptedSource::with_delay(vec![Some(snap(10.0))], Duration::from_secs(3));
        let handle = MetricsPoller::new(source.clone(), Duration::from_secs(5)).activate();
        let observer = handle.subscribe();

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(source.calls(), 1);

        handle.deactivate();
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(observer.borrow().snapshot, MetricsSnapshot::default());
        assert!(observer.borrow().last_success.is_none());
    }

    #[test]
    fn test_zero_interval_clamped() {
        let poller = MetricsPoller::new(ScriptedSource::new(vec![]), Duration::ZERO);
        assert_eq!(poller.interval(), MIN_INTERVAL);
    }
}

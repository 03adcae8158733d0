//! Health snapshot types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point-in-time backend metrics, replaced wholesale on each good poll
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// End-to-end p95 latency in milliseconds
    pub latency_p95_ms: f64,
    /// Connected venues
    pub integrations: u64,
    /// Control checks per route
    pub control_checks: u64,
}

impl Default for MetricsSnapshot {
    fn default() -> Self {
        Self {
            latency_p95_ms: 150.0,
            integrations: 18,
            control_checks: 42,
        }
    }
}

/// Read-only view published by an active poller
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsView {
    pub snapshot: MetricsSnapshot,
    /// Time of the most recent successful poll
    pub last_success: Option<DateTime<Utc>>,
    /// Failed polls since the last success
    pub consecutive_failures: u32,
}

impl MetricsView {
    /// Record a successful poll
    pub fn record_success(&mut self, snapshot: MetricsSnapshot) {
        self.snapshot = snapshot;
        self.last_success = Some(Utc::now());
        self.consecutive_failures = 0;
    }

    /// Record a failed poll; the snapshot is left as it was
    pub fn record_failure(&mut self) {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
    }

    /// Whether any poll has succeeded yet
    pub fn is_default(&self) -> bool {
        self.last_success.is_none()
    }
}

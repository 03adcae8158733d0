//! Backend health polling
//!
//! Pulls a small metrics snapshot from `GET {base_url}/health` on a fixed
//! cadence and exposes the latest good value.

mod health;
mod scheduler;
mod types;

pub use health::{HealthClient, HealthError};
pub use scheduler::{MetricsPoller, PollerHandle};
pub use types::{MetricsSnapshot, MetricsView};

use async_trait::async_trait;

/// Trait for health snapshot sources
#[async_trait]
pub trait HealthSource: Send + Sync {
    /// Fetch one snapshot
    async fn fetch(&self) -> Result<MetricsSnapshot, HealthError>;
}

//! Prometheus metrics

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::{Ipv4Addr, SocketAddr};

/// Counter metric types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterMetric {
    /// Health poll returned a snapshot
    HealthPollSucceeded,
    /// Health poll failed (status, network or payload)
    HealthPollFailed,
    /// Event stream connection opened
    StreamOpened,
    /// Event stream connection failed or dropped
    StreamErrors,
    /// Market message accepted into the window
    StreamMessages,
    /// Market message dropped as malformed
    StreamMessagesDropped,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GaugeMetric {
    /// Samples currently in the chart window
    WindowSamples,
    /// 1 while the stream is live, 0 otherwise
    StreamLive,
    /// Last reported p95 latency
    LatencyP95Ms,
}

impl CounterMetric {
    pub fn name(&self) -> &'static str {
        match self {
            CounterMetric::HealthPollSucceeded => "hyper_health_polls_succeeded_total",
            CounterMetric::HealthPollFailed => "hyper_health_polls_failed_total",
            CounterMetric::StreamOpened => "hyper_stream_opened_total",
            CounterMetric::StreamErrors => "hyper_stream_errors_total",
            CounterMetric::StreamMessages => "hyper_stream_messages_total",
            CounterMetric::StreamMessagesDropped => "hyper_stream_messages_dropped_total",
        }
    }
}

impl GaugeMetric {
    pub fn name(&self) -> &'static str {
        match self {
            GaugeMetric::WindowSamples => "hyper_chart_window_samples",
            GaugeMetric::StreamLive => "hyper_stream_live",
            GaugeMetric::LatencyP95Ms => "hyper_backend_latency_p95_ms",
        }
    }
}

/// Increment a counter by one
pub fn increment(metric: CounterMetric) {
    counter!(metric.name()).increment(1);
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    gauge!(metric.name()).set(value);
}

/// Serve `/metrics` on `0.0.0.0:port`
///
/// Must be called from within a tokio runtime.
pub fn install_exporter(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to start metrics exporter: {}", e))?;

    tracing::info!(%addr, "Prometheus exporter listening");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names_are_prefixed() {
        let counters = [
            CounterMetric::HealthPollSucceeded,
            CounterMetric::HealthPollFailed,
            CounterMetric::StreamOpened,
            CounterMetric::StreamErrors,
            CounterMetric::StreamMessages,
            CounterMetric::StreamMessagesDropped,
        ];
        for c in counters {
            assert!(c.name().starts_with("hyper_"));
            assert!(c.name().ends_with("_total"));
        }
        assert_eq!(GaugeMetric::StreamLive.name(), "hyper_stream_live");
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        increment(CounterMetric::StreamMessages);
        set_gauge(GaugeMetric::WindowSamples, 3.0);
    }
}

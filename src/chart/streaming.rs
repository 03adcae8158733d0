//! Streaming chart: connection state machine plus sliding sample window

use super::mapper;
use super::types::{ChartView, ConnectionStatus, PathProjection, StreamSample};
use super::window::{SampleWindow, WINDOW_CAPACITY};
use crate::sse::{SseConnection, SseEvent};
use crate::telemetry::{increment, set_gauge, CounterMetric, GaugeMetric};
use serde::Deserialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Market stream message: `{"payload":{"bar":{"t":..,"c":..}}}`
#[derive(Debug, Deserialize)]
struct MarketMessage {
    payload: MarketPayload,
}

#[derive(Debug, Deserialize)]
struct MarketPayload {
    bar: Bar,
}

#[derive(Debug, Deserialize)]
struct Bar {
    t: f64,
    c: f64,
}

/// Parse a market message into a sample; `None` for any other shape
pub fn parse_sample(data: &str) -> Option<StreamSample> {
    let msg: MarketMessage = serde_json::from_str(data).ok()?;
    Some(StreamSample::new(msg.payload.bar.t, msg.payload.bar.c))
}

/// Chart state driven by three transport signals: open, error, message
///
/// Signals are applied one at a time. After [`close`](Self::close) every
/// signal is ignored.
#[derive(Debug, Clone)]
pub struct StreamingChart {
    status: ConnectionStatus,
    window: SampleWindow,
    projection: PathProjection,
    closed: bool,
}

impl StreamingChart {
    pub fn new() -> Self {
        Self::with_capacity(WINDOW_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            status: ConnectionStatus::Connecting,
            window: SampleWindow::new(capacity),
            projection: PathProjection::empty(),
            closed: false,
        }
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn projection(&self) -> &PathProjection {
        &self.projection
    }

    pub fn window(&self) -> &SampleWindow {
        &self.window
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn view(&self) -> ChartView {
        ChartView {
            status: self.status,
            projection: self.projection.clone(),
            samples: self.window.len(),
        }
    }

    /// Transport opened
    pub fn on_open(&mut self) -> bool {
        self.set_status(ConnectionStatus::Live)
    }

    /// Transport failed; the last trace is kept
    pub fn on_error(&mut self) -> bool {
        self.set_status(ConnectionStatus::Disconnected)
    }

    /// Apply a message body; returns whether the window changed
    pub fn on_message(&mut self, data: &str) -> bool {
        if self.closed {
            return false;
        }

        let Some(sample) = parse_sample(data) else {
            tracing::trace!(len = data.len(), "Dropping malformed market message");
            increment(CounterMetric::StreamMessagesDropped);
            return false;
        };

        self.window.push(sample);
        self.projection = mapper::project(self.window.iter());

        increment(CounterMetric::StreamMessages);
        set_gauge(GaugeMetric::WindowSamples, self.window.len() as f64);
        true
    }

    /// Dispatch a transport event; returns whether the view changed
    pub fn handle(&mut self, event: SseEvent) -> bool {
        match event {
            SseEvent::Open => self.on_open(),
            SseEvent::Error(reason) => {
                tracing::debug!(%reason, "Market stream error");
                self.on_error()
            }
            SseEvent::Message(msg) if msg.is_default_event() => self.on_message(&msg.data),
            SseEvent::Message(msg) => {
                tracing::trace!(event = %msg.event, "Ignoring named event");
                false
            }
        }
    }

    /// Stop reacting to signals
    pub fn close(&mut self) {
        self.closed = true;
    }

    fn set_status(&mut self, status: ConnectionStatus) -> bool {
        if self.closed {
            return false;
        }
        if self.status != status {
            tracing::info!(from = %self.status, to = %status, "Market stream status changed");
        }
        self.status = status;
        set_gauge(GaugeMetric::StreamLive, if status.is_live() { 1.0 } else { 0.0 });
        true
    }

    /// Drive this chart from `connection` on a background task
    pub fn activate(self, connection: SseConnection) -> ChartHandle {
        let (tx, rx) = watch::channel(self.view());
        let task = tokio::spawn(Self::run_event_loop(self, connection, tx));
        ChartHandle { view: rx, task }
    }

    async fn run_event_loop(
        mut chart: StreamingChart,
        mut connection: SseConnection,
        tx: watch::Sender<ChartView>,
    ) {
        while let Some(event) = connection.recv().await {
            if chart.handle(event) {
                tx.send_replace(chart.view());
            }
        }
        tracing::debug!("Market stream transport stopped");
    }
}

impl Default for StreamingChart {
    fn default() -> Self {
        Self::new()
    }
}

/// Active chart subscription
///
/// Deactivating (or dropping) the handle closes the stream connection
/// synchronously. The last published view stays readable until then.
pub struct ChartHandle {
    view: watch::Receiver<ChartView>,
    task: JoinHandle<()>,
}

impl ChartHandle {
    /// Latest published view
    pub fn view(&self) -> ChartView {
        self.view.borrow().clone()
    }

    pub fn status(&self) -> ConnectionStatus {
        self.view.borrow().status
    }

    /// Wait for the next update; `false` once the chart has stopped
    pub async fn changed(&mut self) -> bool {
        self.view.changed().await.is_ok()
    }

    /// Independent receiver of view updates
    pub fn subscribe(&self) -> watch::Receiver<ChartView> {
        self.view.clone()
    }

    /// Close the connection and stop processing events
    pub fn deactivate(self) {
        // Drop aborts the task
    }
}

impl Drop for ChartHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

//! Event-stream client with automatic reconnection

use super::parser::SseParser;
use super::types::{SseConfig, SseError, SseEvent};
use crate::telemetry::{increment, CounterMetric};
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;

const LAST_EVENT_ID: &str = "last-event-id";

/// Reusable event-stream client
pub struct SseClient {
    config: SseConfig,
    http: Client,
}

/// State carried across reconnects
#[derive(Debug, Default)]
struct Session {
    last_event_id: Option<String>,
    retry: Option<Duration>,
    opened: bool,
}

impl Session {
    /// Delay before the first retry after a successful open
    ///
    /// A server `retry:` replaces the configured initial delay but never
    /// exceeds the configured maximum.
    fn base_delay(&self, config: &SseConfig) -> Duration {
        self.retry
            .unwrap_or(config.initial_reconnect_delay)
            .min(config.max_reconnect_delay)
    }
}

/// Why a connection ended without an error
enum StreamEnd {
    /// Consumer went away
    ReceiverDropped,
    /// Server answered 204: do not reconnect
    NoContent,
}

impl SseClient {
    /// Create a new client with the given configuration
    pub fn new(config: SseConfig) -> Result<Self, SseError> {
        let http = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| SseError::Client(e.to_string()))?;

        Ok(Self { config, http })
    }

    /// Create a new client with just a URL using default config
    pub fn with_url(url: impl Into<String>) -> Result<Self, SseError> {
        Self::new(SseConfig::new(url))
    }

    /// Get the configured URL
    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Open the stream
    ///
    /// Spawns a background task that owns the HTTP connection and
    /// reconnects with doubling backoff. Every open, message and failure is
    /// delivered, in order, through the returned connection.
    pub fn connect(&self) -> SseConnection {
        let (tx, rx) = mpsc::channel(self.config.channel_capacity.max(1));
        let config = self.config.clone();
        let http = self.http.clone();

        let task = tokio::spawn(async move {
            if let Err(e) = Self::run_connection_loop(http, config, tx).await {
                tracing::error!(error = %e, "Event stream connection loop failed");
            }
        });

        SseConnection {
            events: rx,
            task: Some(task),
        }
    }

    /// Run the connection loop with automatic reconnection
    async fn run_connection_loop(
        http: Client,
        config: SseConfig,
        tx: mpsc::Sender<SseEvent>,
    ) -> Result<(), SseError> {
        let mut session = Session::default();
        let mut reconnect_attempts = 0;
        let mut reconnect_delay = config.initial_reconnect_delay;

        loop {
            session.opened = false;
            match Self::connect_and_stream(&http, &config, &tx, &mut session).await {
                Ok(StreamEnd::ReceiverDropped) => {
                    tracing::debug!("Receiver dropped, closing event stream");
                    break;
                }
                Ok(StreamEnd::NoContent) => {
                    tracing::info!("Server returned 204, not reconnecting");
                    let _ = tx.send(SseEvent::Error("stream closed by server".into())).await;
                    break;
                }
                Err(e) => {
                    // A successful open resets the backoff
                    if session.opened {
                        reconnect_attempts = 0;
                        reconnect_delay = session.base_delay(&config);
                    }
                    reconnect_attempts += 1;
                    increment(CounterMetric::StreamErrors);

                    tracing::warn!(
                        error = %e,
                        attempt = reconnect_attempts,
                        delay_ms = reconnect_delay.as_millis() as u64,
                        "Event stream error, reconnecting..."
                    );

                    if tx.send(SseEvent::Error(e.to_string())).await.is_err() {
                        tracing::debug!("Receiver dropped, stopping reconnection");
                        break;
                    }

                    // Check max reconnects (0 = infinite)
                    if config.max_reconnect_attempts > 0
                        && reconnect_attempts >= config.max_reconnect_attempts
                    {
                        tracing::error!("Max reconnection attempts reached");
                        return Err(SseError::MaxReconnectsExceeded);
                    }

                    sleep(reconnect_delay).await;
                    reconnect_delay = (reconnect_delay * 2).min(config.max_reconnect_delay);
                }
            }
        }

        Ok(())
    }

    /// Connect and forward events until the stream ends
    async fn connect_and_stream(
        http: &Client,
        config: &SseConfig,
        tx: &mpsc::Sender<SseEvent>,
        session: &mut Session,
    ) -> Result<StreamEnd, SseError> {
        tracing::info!(url = %config.url, "Connecting to event stream");

        let mut request = http
            .get(&config.url)
            .header(ACCEPT, "text/event-stream")
            .header(CACHE_CONTROL, "no-cache");
        if let Some(id) = &session.last_event_id {
            request = request.header(LAST_EVENT_ID, id.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| SseError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(StreamEnd::NoContent);
        }
        if !status.is_success() {
            return Err(SseError::HttpStatus(status.as_u16()));
        }

        tracing::info!("Event stream connected");
        session.opened = true;
        increment(CounterMetric::StreamOpened);

        if tx.send(SseEvent::Open).await.is_err() {
            return Ok(StreamEnd::ReceiverDropped);
        }

        let mut parser = SseParser::new()
            .with_last_event_id(session.last_event_id.clone())
            .with_max_event_size(config.max_event_size);
        let mut body = response.bytes_stream();

        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| SseError::ConnectionFailed(e.to_string()))?;

            for message in parser.feed(&chunk) {
                if tx.send(SseEvent::Message(message)).await.is_err() {
                    return Ok(StreamEnd::ReceiverDropped);
                }
            }

            session.last_event_id = parser.last_event_id().map(str::to_owned);
            if let Some(retry) = parser.take_retry() {
                tracing::debug!(retry_ms = retry.as_millis() as u64, "Server set reconnection delay");
                session.retry = Some(retry);
            }
        }

        Err(SseError::StreamEnded)
    }
}

/// An open stream: ordered events plus ownership of the transport task
///
/// Dropping or closing the connection stops the transport immediately.
pub struct SseConnection {
    events: mpsc::Receiver<SseEvent>,
    task: Option<JoinHandle<()>>,
}

impl SseConnection {
    /// Wrap an event channel fed by some other transport
    pub fn from_receiver(events: mpsc::Receiver<SseEvent>) -> Self {
        Self { events, task: None }
    }

    /// Next event, or `None` once the transport has stopped
    pub async fn recv(&mut self) -> Option<SseEvent> {
        self.events.recv().await
    }

    /// Stop the transport; buffered events are discarded
    pub fn close(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.events.close();
        while self.events.try_recv().is_ok() {}
    }
}

impl Drop for SseConnection {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

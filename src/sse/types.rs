//! Event-stream types and configuration

use super::parser::DEFAULT_MAX_EVENT_SIZE;
use std::time::Duration;

/// Event-stream client configuration
#[derive(Debug, Clone)]
pub struct SseConfig {
    /// Stream URL to connect to
    pub url: String,
    /// Maximum reconnection attempts before giving up (0 = infinite)
    pub max_reconnect_attempts: u32,
    /// Delay before the first reconnection attempt
    pub initial_reconnect_delay: Duration,
    /// Maximum delay between reconnection attempts
    pub max_reconnect_delay: Duration,
    /// Timeout for establishing the TCP/TLS connection
    pub connect_timeout: Duration,
    /// Buffer size of the event channel
    pub channel_capacity: usize,
    /// Largest line or event accepted from the server, in bytes
    pub max_event_size: usize,
}

impl Default for SseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_reconnect_attempts: 0,
            initial_reconnect_delay: Duration::from_secs(3),
            max_reconnect_delay: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            channel_capacity: 256,
            max_event_size: DEFAULT_MAX_EVENT_SIZE,
        }
    }
}

impl SseConfig {
    /// Create a new config with the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Build from the `[stream]` section plus the resolved stream URL
    pub fn from_stream_config(url: impl Into<String>, stream: &crate::config::StreamConfig) -> Self {
        Self::new(url)
            .max_reconnects(stream.max_reconnect_attempts)
            .initial_delay(Duration::from_millis(stream.initial_reconnect_ms))
            .max_delay(Duration::from_millis(stream.max_reconnect_ms))
    }

    /// Set maximum reconnection attempts
    pub fn max_reconnects(mut self, n: u32) -> Self {
        self.max_reconnect_attempts = n;
        self
    }

    /// Set initial reconnection delay
    pub fn initial_delay(mut self, d: Duration) -> Self {
        self.initial_reconnect_delay = d;
        self
    }

    /// Set maximum reconnection delay
    pub fn max_delay(mut self, d: Duration) -> Self {
        self.max_reconnect_delay = d;
        self
    }

    /// Set connect timeout
    pub fn connect_timeout(mut self, d: Duration) -> Self {
        self.connect_timeout = d;
        self
    }

    /// Set the largest accepted line or event
    pub fn max_event_size(mut self, bytes: usize) -> Self {
        self.max_event_size = bytes;
        self
    }
}

/// A dispatched server-sent event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseMessage {
    /// Event type (`message` when the server sets none)
    pub event: String,
    /// Data lines joined with `\n`
    pub data: String,
    /// Last event id in effect when this event was dispatched
    pub id: Option<String>,
}

impl SseMessage {
    /// Whether this is an unnamed (default `message`) event
    pub fn is_default_event(&self) -> bool {
        self.event == DEFAULT_EVENT_TYPE
    }
}

/// Event type used when the server omits `event:`
pub const DEFAULT_EVENT_TYPE: &str = "message";

/// Signals delivered to stream consumers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// Connection established (2xx response received)
    Open,
    /// A complete event arrived
    Message(SseMessage),
    /// Connection failed or dropped; a reconnect may follow
    Error(String),
}

/// Event-stream errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum SseError {
    /// HTTP client could not be built
    #[error("Client setup failed: {0}")]
    Client(String),
    /// Connection failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    /// Server answered with a non-success status
    #[error("Unexpected HTTP status: {0}")]
    HttpStatus(u16),
    /// Server closed the stream
    #[error("Stream ended")]
    StreamEnded,
    /// Maximum reconnection attempts exceeded
    #[error("Maximum reconnection attempts exceeded")]
    MaxReconnectsExceeded,
}

//! Server-sent events client
//!
//! Opens a `text/event-stream` connection, parses frames incrementally and
//! reconnects with doubling backoff. Consumers see a single ordered stream
//! of open, message and error signals.

mod client;
mod parser;
mod types;

pub use client::{SseClient, SseConnection};
pub use parser::SseParser;
pub use types::{SseConfig, SseError, SseEvent, SseMessage, DEFAULT_EVENT_TYPE};

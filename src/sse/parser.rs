//! Incremental `text/event-stream` parser
//!
//! Bytes may arrive split anywhere, including inside a UTF-8 sequence or
//! between the CR and LF of a line ending. An event still being assembled
//! when the stream ends is discarded, and so is any id it carried.
//!
//! Lines and events are bounded by `max_event_size`. A line or event that
//! grows past it is dropped up to the next blank line, after which parsing
//! resumes normally.

use super::types::{SseMessage, DEFAULT_EVENT_TYPE};
use std::time::Duration;

/// Default cap on a single line or event, in bytes
pub const DEFAULT_MAX_EVENT_SIZE: usize = 1024 * 1024;

const BOM: char = '\u{FEFF}';

#[derive(Debug)]
pub struct SseParser {
    /// Undecoded tail (incomplete UTF-8 sequence)
    pending: Vec<u8>,
    /// Current line, not yet terminated
    line: String,
    /// Previous chunk ended with CR; swallow a leading LF
    after_cr: bool,
    /// At least one character has been seen (BOM check done)
    started: bool,
    /// Current line overflowed; skip to its end
    skipping_line: bool,
    /// Current event overflowed; skip to the next blank line
    skipping_event: bool,
    data: String,
    event: String,
    /// Id set by the event being assembled, committed on a blank line
    id_buffer: Option<String>,
    last_event_id: Option<String>,
    retry: Option<Duration>,
    max_event_size: usize,
}

impl Default for SseParser {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            line: String::new(),
            after_cr: false,
            started: false,
            skipping_line: false,
            skipping_event: false,
            data: String::new(),
            event: String::new(),
            id_buffer: None,
            last_event_id: None,
            retry: None,
            max_event_size: DEFAULT_MAX_EVENT_SIZE,
        }
    }
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume with the id from a previous connection
    pub fn with_last_event_id(mut self, id: Option<String>) -> Self {
        self.id_buffer = id.clone();
        self.last_event_id = id;
        self
    }

    /// Cap the size of a single line or event
    pub fn with_max_event_size(mut self, bytes: usize) -> Self {
        self.max_event_size = bytes.max(1);
        self
    }

    /// Id of the last dispatched event block
    pub fn last_event_id(&self) -> Option<&str> {
        self.last_event_id.as_deref()
    }

    /// Reconnection delay announced by the server since the last call
    pub fn take_retry(&mut self) -> Option<Duration> {
        self.retry.take()
    }

    /// Bytes held while waiting for the rest of a line or event
    pub fn buffered_len(&self) -> usize {
        self.pending.len() + self.line.len() + self.data.len() + self.event.len()
    }

    /// Feed raw bytes, returning every event completed by them
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<SseMessage> {
        self.pending.extend_from_slice(bytes);

        let text = match std::str::from_utf8(&self.pending) {
            Ok(s) => {
                let s = s.to_owned();
                self.pending.clear();
                s
            }
            Err(e) if e.error_len().is_none() => {
                let tail = self.pending.split_off(e.valid_up_to());
                let head = std::mem::replace(&mut self.pending, tail);
                String::from_utf8_lossy(&head).into_owned()
            }
            Err(_) => {
                let s = String::from_utf8_lossy(&self.pending).into_owned();
                self.pending.clear();
                s
            }
        };

        self.feed_str(&text)
    }

    /// Feed already-decoded text
    pub fn feed_str(&mut self, text: &str) -> Vec<SseMessage> {
        let mut out = Vec::new();
        for ch in text.chars() {
            if !self.started {
                self.started = true;
                if ch == BOM {
                    continue;
                }
            }
            match ch {
                '\n' if self.after_cr => {
                    self.after_cr = false;
                }
                '\r' | '\n' => {
                    self.after_cr = ch == '\r';
                    if std::mem::take(&mut self.skipping_line) {
                        continue;
                    }
                    let line = std::mem::take(&mut self.line);
                    if let Some(msg) = self.process_line(&line) {
                        out.push(msg);
                    }
                }
                _ => {
                    self.after_cr = false;
                    if self.skipping_line {
                        continue;
                    }
                    if self.line.len() + ch.len_utf8() > self.max_event_size {
                        tracing::debug!(
                            limit = self.max_event_size,
                            "Event stream line too long, discarding event"
                        );
                        self.line = String::new();
                        self.skipping_line = true;
                        self.discard_event();
                        continue;
                    }
                    self.line.push(ch);
                }
            }
        }
        out
    }

    fn process_line(&mut self, line: &str) -> Option<SseMessage> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') || self.skipping_event {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "data" => {
                if self.data.len() + value.len() + 1 > self.max_event_size {
                    tracing::debug!(
                        limit = self.max_event_size,
                        "Event stream event too large, discarding"
                    );
                    self.discard_event();
                    return None;
                }
                self.data.push_str(value);
                self.data.push('\n');
            }
            "event" => self.event = value.to_string(),
            "id" if !value.contains('\0') => {
                self.id_buffer = (!value.is_empty()).then(|| value.to_string());
            }
            "retry" if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) => {
                if let Ok(ms) = value.parse::<u64>() {
                    self.retry = Some(Duration::from_millis(ms));
                }
            }
            _ => {}
        }
        None
    }

    /// Drop everything assembled for the current event
    fn discard_event(&mut self) {
        self.data = String::new();
        self.event.clear();
        self.skipping_event = true;
    }

    fn dispatch(&mut self) -> Option<SseMessage> {
        self.last_event_id = self.id_buffer.clone();
        let event = std::mem::take(&mut self.event);
        if std::mem::take(&mut self.skipping_event) || self.data.is_empty() {
            return None;
        }

        let mut data = std::mem::take(&mut self.data);
        if data.ends_with('\n') {
            data.pop();
        }

        Some(SseMessage {
            event: if event.is_empty() {
                DEFAULT_EVENT_TYPE.to_string()
            } else {
                event
            },
            data,
            id: self.last_event_id.clone(),
        })
    }
}

//! Chart types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default viewport width in pixels
pub const VIEWPORT_WIDTH: f64 = 280.0;
/// Default viewport height in pixels
pub const VIEWPORT_HEIGHT: f64 = 80.0;

/// A single `(t, c)` point from the market stream
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StreamSample {
    /// Timestamp as supplied by the server
    pub t: f64,
    /// Value (bar close)
    pub c: f64,
}

impl StreamSample {
    pub fn new(t: f64, c: f64) -> Self {
        Self { t, c }
    }
}

/// Connection state of the market stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// No transport signal received yet
    #[default]
    Connecting,
    /// Transport reported open
    Live,
    /// Transport reported an error; reconnection is not distinguished
    Disconnected,
}

impl ConnectionStatus {
    /// Label shown next to the chart
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionStatus::Connecting => "connecting…",
            ConnectionStatus::Live => "live",
            ConnectionStatus::Disconnected => "disconnected",
        }
    }

    pub fn is_live(&self) -> bool {
        *self == ConnectionStatus::Live
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Pixel-space path derived from the sample window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathProjection {
    /// SVG path commands (`M x y L x y ...`)
    pub d: String,
    /// Viewport width
    pub w: f64,
    /// Viewport height
    pub h: f64,
}

impl PathProjection {
    /// Empty trace at the default viewport size
    pub fn empty() -> Self {
        Self {
            d: String::new(),
            w: VIEWPORT_WIDTH,
            h: VIEWPORT_HEIGHT,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.d.is_empty()
    }

    /// Number of plotted points
    pub fn point_count(&self) -> usize {
        self.d
            .split_whitespace()
            .filter(|tok| *tok == "M" || *tok == "L")
            .count()
    }
}

impl Default for PathProjection {
    fn default() -> Self {
        Self::empty()
    }
}

/// Read-only view published by an active chart
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartView {
    pub status: ConnectionStatus,
    pub projection: PathProjection,
    /// Samples currently held in the window
    pub samples: usize,
}

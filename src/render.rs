//! Presentation helpers: stat cards, status indicator and SVG sparkline

use crate::chart::{ChartView, ConnectionStatus, PathProjection};
use crate::poller::MetricsSnapshot;
use std::fmt;

/// Gradient stops for the trace stroke
const GRADIENT_FROM: &str = "#22d3ee";
const GRADIENT_TO: &str = "#a78bfa";

/// One labelled metric card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
    pub sub: &'static str,
}

impl fmt::Display for StatCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<16}{:>10}  {}", self.label, self.value, self.sub)
    }
}

/// Cards for the three health metrics
pub fn stat_cards(snapshot: &MetricsSnapshot) -> [StatCard; 3] {
    [
        StatCard {
            label: "Latency (p95)",
            value: format!("< {}ms", snapshot.latency_p95_ms),
            sub: "end-to-end",
        },
        StatCard {
            label: "Integrations",
            value: snapshot.integrations.to_string(),
            sub: "venues connected",
        },
        StatCard {
            label: "Control Checks",
            value: snapshot.control_checks.to_string(),
            sub: "per route",
        },
    ]
}

/// Visual weight of the status label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Warning,
}

impl Tone {
    pub fn color(&self) -> &'static str {
        match self {
            Tone::Positive => "#16a34a",
            Tone::Warning => "#d97706",
        }
    }
}

/// Status label shown next to the chart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusIndicator {
    pub label: &'static str,
    pub tone: Tone,
}

impl From<ConnectionStatus> for StatusIndicator {
    fn from(status: ConnectionStatus) -> Self {
        let tone = if status.is_live() {
            Tone::Positive
        } else {
            Tone::Warning
        };
        Self {
            label: status.label(),
            tone,
        }
    }
}

/// Render the trace as a standalone SVG document
pub fn render_svg(projection: &PathProjection) -> String {
    let (w, h) = (projection.w, projection.h);
    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            r#"<path d="{d}" fill="none" stroke="url(#g)" stroke-width="2"/>"#,
            r#"<defs><linearGradient id="g" x1="0" y1="0" x2="1" y2="0">"#,
            r#"<stop offset="0%" stop-color="{from}"/>"#,
            r#"<stop offset="100%" stop-color="{to}"/>"#,
            r#"</linearGradient></defs></svg>"#
        ),
        w = w,
        h = h,
        d = projection.d,
        from = GRADIENT_FROM,
        to = GRADIENT_TO,
    )
}

/// Header line plus SVG for a chart view
pub fn render_chart(view: &ChartView) -> String {
    let indicator = StatusIndicator::from(view.status);
    format!(
        "Live Demo  [{}]  ({} samples)\n{}",
        indicator.label,
        view.samples,
        render_svg(&view.projection)
    )
}

//! Live market chart
//!
//! Consumes the market event stream, keeps the most recent samples in a
//! bounded window and projects them into a fixed-size path.

pub mod mapper;
mod streaming;
mod types;
mod window;

pub use mapper::{project, project_into};
pub use streaming::{parse_sample, ChartHandle, StreamingChart};
pub use types::{
    ChartView, ConnectionStatus, PathProjection, StreamSample, VIEWPORT_HEIGHT, VIEWPORT_WIDTH,
};
pub use window::{SampleWindow, WINDOW_CAPACITY};

//! hyper-telemetry: live telemetry client for the Hyper trading demo
//!
//! This library provides the core components for:
//! - Fixed-cadence polling of the backend health snapshot
//! - A server-sent events client with reconnection
//! - A streaming chart over a bounded sample window
//! - Pure coordinate mapping from samples to an SVG path
//! - Rendering of stat cards, status indicator and sparkline
//! - Logging and Prometheus metrics

pub mod chart;
pub mod cli;
pub mod config;
pub mod poller;
pub mod render;
pub mod sse;
pub mod telemetry;

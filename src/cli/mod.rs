//! CLI interface for hyper-telemetry
//!
//! Provides subcommands for:
//! - `watch`: Live stat cards and chart status
//! - `health`: One health poll, printed as JSON
//! - `chart`: Collect stream samples and print the rendered chart
//! - `config`: Show effective configuration

mod chart;
mod health;
mod watch;

pub use chart::ChartArgs;
pub use health::HealthArgs;
pub use watch::WatchArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "hyper-telemetry")]
#[command(about = "Live telemetry client for the Hyper trading demo backend")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll health and stream the market chart until Ctrl-C
    Watch(WatchArgs),
    /// Poll the health endpoint once
    Health(HealthArgs),
    /// Collect market samples and print the chart
    Chart(ChartArgs),
    /// Show effective configuration
    Config,
}

//! Watch command implementation

use crate::chart::{ChartView, StreamingChart};
use crate::config::Config;
use crate::poller::{HealthClient, MetricsPoller, MetricsView};
use crate::render::{render_svg, stat_cards, StatusIndicator};
use crate::sse::{SseClient, SseConfig};
use clap::Args;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Rewrite this SVG file whenever the chart changes
    #[arg(long)]
    pub svg: Option<PathBuf>,
}

impl WatchArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let source = Arc::new(HealthClient::from_config(config)?);
        let poller = MetricsPoller::new(source, config.poller.interval()).activate();

        let sse = SseConfig::from_stream_config(config.backend.market_stream_url(), &config.stream);
        let client = SseClient::new(sse)?;
        let chart = StreamingChart::with_capacity(config.chart.window_capacity).activate(client.connect());

        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        };
        run_watch_loop(poller.subscribe(), chart.subscribe(), self.svg.as_deref(), shutdown).await;

        poller.deactivate();
        chart.deactivate();
        Ok(())
    }
}

/// Print every view update until `shutdown` resolves or polling stops
///
/// The chart may stop first; health output continues without it.
async fn run_watch_loop(
    mut metrics_rx: watch::Receiver<MetricsView>,
    mut chart_rx: watch::Receiver<ChartView>,
    svg: Option<&Path>,
    shutdown: impl Future<Output = ()>,
) {
    tokio::pin!(shutdown);

    print_metrics(&metrics_rx.borrow_and_update());
    print_chart(&chart_rx.borrow_and_update());

    let mut chart_open = true;
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Interrupted, shutting down");
                break;
            }
            changed = metrics_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = metrics_rx.borrow_and_update().clone();
                print_metrics(&view);
            }
            changed = chart_rx.changed(), if chart_open => {
                if changed.is_err() {
                    tracing::warn!("Market stream stopped; health polling continues");
                    chart_open = false;
                    continue;
                }
                let view = chart_rx.borrow_and_update().clone();
                print_chart(&view);
                if let Some(path) = svg {
                    if let Err(e) = tokio::fs::write(path, render_svg(&view.projection)).await {
                        tracing::warn!(error = %e, path = %path.display(), "Failed to write SVG");
                    }
                }
            }
        }
    }
}

fn print_metrics(view: &MetricsView) {
    for card in stat_cards(&view.snapshot) {
        println!("{}", card);
    }
}

fn print_chart(view: &ChartView) {
    let indicator = StatusIndicator::from(view.status);
    println!("Live Demo: {} ({} samples)", indicator.label, view.samples);
}

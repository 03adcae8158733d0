//! Chart command implementation

use crate::chart::StreamingChart;
use crate::config::Config;
use crate::render::render_chart;
use crate::sse::{SseClient, SseConfig};
use clap::Args;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct ChartArgs {
    /// Stop after this many samples are in the window
    #[arg(long, default_value = "121")]
    pub samples: usize,

    /// Stop after this many seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,
}

impl ChartArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let sse = SseConfig::from_stream_config(config.backend.market_stream_url(), &config.stream);
        let client = SseClient::new(sse)?;

        let target = self.samples.clamp(1, config.chart.window_capacity.max(1));
        let mut handle =
            StreamingChart::with_capacity(config.chart.window_capacity).activate(client.connect());

        tracing::info!(url = client.url(), target, "Collecting market samples");

        let collected = tokio::time::timeout(Duration::from_secs(self.timeout), async {
            while handle.view().samples < target {
                if !handle.changed().await {
                    break;
                }
            }
        })
        .await;

        if collected.is_err() {
            tracing::info!(samples = handle.view().samples, "Timed out, rendering what arrived");
        }

        let view = handle.view();
        handle.deactivate();
        println!("{}", render_chart(&view));
        Ok(())
    }
}

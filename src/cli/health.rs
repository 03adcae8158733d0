//! Health command implementation

use crate::config::Config;
use crate::poller::{HealthClient, MetricsSnapshot};
use clap::Args;

#[derive(Args, Debug)]
pub struct HealthArgs {
    /// Exit non-zero when the poll fails instead of printing defaults
    #[arg(long)]
    pub strict: bool,
}

impl HealthArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let client = HealthClient::from_config(config)?;

        let snapshot = match client.fetch_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) if self.strict => return Err(e.into()),
            Err(e) => {
                tracing::warn!(error = %e, url = client.url(), "Health poll failed, showing defaults");
                MetricsSnapshot::default()
            }
        };

        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        Ok(())
    }
}

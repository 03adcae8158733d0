use clap::Parser;
use hyper_telemetry::cli::{Cli, Commands};
use hyper_telemetry::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config)
        .unwrap_or_else(|e| {
            eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
            eprintln!("Using default configuration");
            Config::default()
        })
        .with_env_overrides();

    // Initialize telemetry
    hyper_telemetry::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Watch(args) => {
            tracing::info!(backend = %config.backend.base_url, "Starting live watch");
            args.execute(&config).await?;
        }
        Commands::Health(args) => {
            args.execute(&config).await?;
        }
        Commands::Chart(args) => {
            args.execute(&config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!("  Backend: {}", config.backend.base_url);
            println!("  Health: {}", config.backend.health_url());
            println!("  Stream: {}", config.backend.market_stream_url());
            println!("  Poll interval: {}ms", config.poller.interval_ms);
            println!(
                "  Reconnect: {}ms..{}ms, max attempts {}",
                config.stream.initial_reconnect_ms,
                config.stream.max_reconnect_ms,
                config.stream.max_reconnect_attempts
            );
            println!("  Window: {} samples", config.chart.window_capacity);
            println!(
                "  Log: {} ({:?})",
                config.telemetry.log_level, config.telemetry.log_format
            );
        }
    }

    Ok(())
}

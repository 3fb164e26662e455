use anyhow::{Context, Result};
use clap::Parser;
use rotel_mqtt::{init_logging, run, Args, BridgeConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    args.validate().context("Invalid command line arguments")?;

    init_logging(args.logging_mode(), args.log_level.as_deref())
        .context("Failed to initialize logging")?;

    let config = BridgeConfig::from(args);
    config.validate().context("Invalid configuration")?;

    run(config).await.context("Bridge stopped")
}

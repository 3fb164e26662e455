//! Command line arguments

use std::time::Duration;

use clap::Parser;

use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result};
use crate::logging::LoggingMode;

/// Rotel RS-232 to MQTT bridge
///
/// Publishes the amplifier's state as retained JSON on `<prefix>/state` and
/// accepts commands on `<prefix>/command/<action>`.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "rotel-mqtt")]
#[command(about = "Bridge a Rotel amplifier's RS-232 port to an MQTT broker")]
#[command(version)]
pub struct Args {
    /// Serial device connected to the amplifier
    #[arg(long, default_value = "/dev/ttyUSB0")]
    pub serial: String,

    /// Serial baud rate
    #[arg(long, default_value = "115200")]
    pub baud: u32,

    /// MQTT broker, e.g. tcp://localhost:1883
    #[arg(long, default_value = "tcp://localhost:1883")]
    pub broker: String,

    /// MQTT client identifier
    #[arg(long, default_value = "rotel-mqtt")]
    pub client_id: String,

    /// Prefix for the state and command topics
    #[arg(long, default_value = "rotel")]
    pub topic_prefix: String,

    /// Seconds to wait before querying the amplifier
    #[arg(long, default_value = "2")]
    pub startup_delay: u64,

    /// Log level (error, warn, info, debug, trace); overrides ROTEL_LOG_LEVEL and RUST_LOG
    #[arg(long)]
    pub log_level: Option<String>,

    /// Verbose logging with source locations
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    /// Logging mode selected by `--debug`
    pub fn logging_mode(&self) -> LoggingMode {
        if self.debug {
            LoggingMode::Debug
        } else {
            LoggingMode::Development
        }
    }

    /// Validate command line arguments
    pub fn validate(&self) -> Result<()> {
        if let Some(level) = &self.log_level {
            match level.to_lowercase().as_str() {
                "error" | "warn" | "info" | "debug" | "trace" => {}
                _ => {
                    return Err(BridgeError::Configuration(format!(
                        "Invalid log level '{}'. Valid levels: error, warn, info, debug, trace",
                        level
                    )));
                }
            }
        }

        Ok(())
    }
}

impl From<Args> for BridgeConfig {
    fn from(args: Args) -> Self {
        BridgeConfig::new()
            .with_serial_device(args.serial)
            .with_baud_rate(args.baud)
            .with_broker(args.broker)
            .with_client_id(args.client_id)
            .with_topic_prefix(args.topic_prefix)
            .with_startup_delay(Duration::from_secs(args.startup_delay))
    }
}

//! Configuration types for the bridge
//!
//! [`BridgeConfig`] carries everything needed to open the serial device and
//! reach the broker. It is normally built from command line arguments (see
//! [`crate::cli::Args`]).

use std::time::Duration;

use url::Url;

use crate::error::{BridgeError, Result};
use crate::topics::Topics;

/// Default MQTT port when the broker URL does not name one
pub const DEFAULT_MQTT_PORT: u16 = 1883;

/// Configuration for the bridge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Serial device path
    /// Default: /dev/ttyUSB0
    pub serial_device: String,

    /// Serial baud rate (8N1, no flow control)
    /// Default: 115200
    pub baud_rate: u32,

    /// Broker URL, `tcp://host:port`, `mqtt://host:port` or `host[:port]`
    /// Default: tcp://localhost:1883
    pub broker: String,

    /// MQTT client identifier
    /// Default: rotel-mqtt
    pub client_id: String,

    /// Topic prefix for state and command topics
    /// Default: rotel
    pub topic_prefix: String,

    /// Delay between connecting and sending the initial queries
    /// Default: 2 seconds
    pub startup_delay: Duration,

    /// MQTT keep-alive interval
    /// Default: 30 seconds
    pub keep_alive: Duration,

    /// Capacity of the MQTT client request channel
    /// Default: 64
    pub channel_capacity: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            serial_device: "/dev/ttyUSB0".to_string(),
            baud_rate: 115_200,
            broker: "tcp://localhost:1883".to_string(),
            client_id: "rotel-mqtt".to_string(),
            topic_prefix: "rotel".to_string(),
            startup_delay: Duration::from_secs(2),
            keep_alive: Duration::from_secs(30),
            channel_capacity: 64,
        }
    }
}

impl BridgeConfig {
    /// Create a BridgeConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration and return any issues
    pub fn validate(&self) -> Result<()> {
        if self.serial_device.trim().is_empty() {
            return Err(BridgeError::Configuration(
                "Serial device path must not be empty".to_string(),
            ));
        }

        if self.baud_rate == 0 {
            return Err(BridgeError::Configuration(
                "Baud rate must be greater than 0".to_string(),
            ));
        }

        if self.client_id.is_empty() {
            return Err(BridgeError::Configuration(
                "MQTT client id must not be empty".to_string(),
            ));
        }

        if self.topic_prefix.is_empty()
            || self.topic_prefix.contains(['+', '#'])
            || self.topic_prefix.ends_with('/')
        {
            return Err(BridgeError::Configuration(format!(
                "Invalid topic prefix '{}': must be non-empty, without wildcards or a trailing '/'",
                self.topic_prefix
            )));
        }

        if self.keep_alive < Duration::from_secs(5) {
            return Err(BridgeError::Configuration(
                "MQTT keep-alive must be at least 5 seconds".to_string(),
            ));
        }

        if self.channel_capacity == 0 {
            return Err(BridgeError::Configuration(
                "MQTT channel capacity must be greater than 0".to_string(),
            ));
        }

        self.broker_address().map(|_| ())
    }

    /// Host and port of the broker
    pub fn broker_address(&self) -> Result<(String, u16)> {
        let invalid = |reason: &str| {
            BridgeError::Configuration(format!("Invalid broker '{}': {}", self.broker, reason))
        };

        let raw = if self.broker.contains("://") {
            self.broker.clone()
        } else {
            format!("tcp://{}", self.broker)
        };
        let url = Url::parse(&raw).map_err(|e| invalid(&e.to_string()))?;

        match url.scheme() {
            "tcp" | "mqtt" => {}
            other => return Err(invalid(&format!("unsupported scheme '{}'", other))),
        }

        let host = url
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| invalid("missing host"))?;

        Ok((host.to_string(), url.port().unwrap_or(DEFAULT_MQTT_PORT)))
    }

    /// Topics derived from the configured prefix
    pub fn topics(&self) -> Topics {
        Topics::new(&self.topic_prefix)
    }

    /// Builder pattern methods for fluent configuration

    pub fn with_serial_device(mut self, device: impl Into<String>) -> Self {
        self.serial_device = device.into();
        self
    }

    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn with_broker(mut self, broker: impl Into<String>) -> Self {
        self.broker = broker.into();
        self
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = client_id.into();
        self
    }

    pub fn with_topic_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.topic_prefix = prefix.into();
        self
    }

    pub fn with_startup_delay(mut self, delay: Duration) -> Self {
        self.startup_delay = delay;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_config() {
        let config = BridgeConfig::default();
        assert_eq!(config.serial_device, "/dev/ttyUSB0");
        assert_eq!(config.baud_rate, 115_200);
        assert_eq!(config.startup_delay, Duration::from_secs(2));
        assert!(config.validate().is_ok());
    }

    #[rstest]
    #[case("tcp://localhost:1883", "localhost", 1883)]
    #[case("mqtt://broker.lan:1884", "broker.lan", 1884)]
    #[case("192.168.1.20", "192.168.1.20", 1883)]
    #[case("broker.lan:2883", "broker.lan", 2883)]
    fn test_broker_address(#[case] broker: &str, #[case] host: &str, #[case] port: u16) {
        let config = BridgeConfig::new().with_broker(broker);
        assert_eq!(config.broker_address().unwrap(), (host.to_string(), port));
    }

    #[rstest]
    #[case("http://localhost:1883")]
    #[case("tcp://:1883")]
    #[case("")]
    fn test_invalid_broker(#[case] broker: &str) {
        let config = BridgeConfig::new().with_broker(broker);
        assert!(config.broker_address().is_err());
        assert!(config.validate().is_err());
    }

    #[rstest]
    #[case("")]
    #[case("rotel/")]
    #[case("rotel/+")]
    #[case("home/#")]
    fn test_invalid_topic_prefix(#[case] prefix: &str) {
        let config = BridgeConfig::new().with_topic_prefix(prefix);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation() {
        let no_device = BridgeConfig::new().with_serial_device("  ");
        assert!(no_device.validate().is_err());

        let no_baud = BridgeConfig::new().with_baud_rate(0);
        assert!(no_baud.validate().is_err());

        let no_client = BridgeConfig::new().with_client_id("");
        assert!(no_client.validate().is_err());
    }

    #[test]
    fn test_builder_pattern() {
        let config = BridgeConfig::new()
            .with_serial_device("/dev/ttyS1")
            .with_baud_rate(9600)
            .with_broker("mqtt://broker:1884")
            .with_client_id("amp-livingroom")
            .with_topic_prefix("home/amp")
            .with_startup_delay(Duration::from_millis(500));

        assert_eq!(config.serial_device, "/dev/ttyS1");
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.topics().state(), "home/amp/state");
        assert_eq!(config.startup_delay, Duration::from_millis(500));
        assert!(config.validate().is_ok());
    }
}

//! Error types for the bridge adapters

use crate::logging::LoggingError;

/// Errors that can stop the bridge
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The serial device could not be opened
    #[error("Failed to open serial device {device}: {source}")]
    SerialOpen {
        /// Device path that was tried
        device: String,
        /// Underlying serial port error
        source: tokio_serial::Error,
    },

    /// The serial device reported end of stream
    #[error("Serial device closed the connection")]
    SerialClosed,

    /// Reading from or writing to the serial device failed
    #[error("Serial I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A request could not be queued for the broker
    #[error("MQTT client error: {0}")]
    MqttClient(#[from] rumqttc::ClientError),

    /// The broker connection failed
    #[error("MQTT connection error: {0}")]
    MqttConnection(#[from] rumqttc::ConnectionError),

    /// The snapshot could not be encoded for publishing
    #[error("Failed to serialize state: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration provided
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Logging could not be set up
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),
}

/// Convenience type alias for Results using BridgeError.
pub type Result<T> = std::result::Result<T, BridgeError>;

//! Rotel MQTT Bridge
//!
//! Connects a Rotel amplifier's RS-232 port to an MQTT broker.
//!
//! # Architecture
//!
//! ```text
//! serial read half → Bridge::run_serial_loop → StateProcessor → <prefix>/state
//!                                                   │
//!                                                   └──→ RequestSink → serial write half
//!
//! <prefix>/command/<action> → OperatorAction → RequestSink
//! ```
//!
//! The state processor sits behind a synchronous lock that is never held
//! across an await. Every write to the device goes through one
//! [`RequestSink`], which serializes them.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use rotel_mqtt::{init_logging, run, BridgeConfig, LoggingMode};
//!
//! init_logging(LoggingMode::Development, None)?;
//!
//! let config = BridgeConfig::new()
//!     .with_serial_device("/dev/ttyUSB0")
//!     .with_broker("tcp://broker.lan:1883");
//! config.validate()?;
//!
//! run(config).await?;
//! ```

pub mod bridge;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod mqtt;
pub mod publish;
pub mod runtime;
pub mod topics;
pub mod transport;

pub use bridge::{Bridge, READ_BUFFER_SIZE};
pub use cli::Args;
pub use config::BridgeConfig;
pub use error::{BridgeError, Result};
pub use logging::{init_logging, LoggingError, LoggingMode};
pub use publish::{MqttStatePublisher, StatePublisher};
pub use runtime::run;
pub use topics::Topics;
pub use transport::{RequestSink, SerialRequestSink};

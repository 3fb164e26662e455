//! # rotel-protocol
//!
//! Parsing and request building for the Rotel RS-232 ASCII control protocol.
//!
//! ## Usage
//!
//! ### Decoding the device stream
//! ```rust
//! use rotel_protocol::{Command, StreamParser};
//!
//! let mut parser = StreamParser::new();
//! assert!(parser.feed(b"display=010,01234").is_empty());
//!
//! let commands = parser.feed(b"56789volume=45!");
//! assert_eq!(
//!     commands,
//!     vec![Command::new("display", "0123456789"), Command::new("volume", "45")]
//! );
//! ```
//!
//! ### Building requests from operator input
//! ```rust
//! use rotel_protocol::{OperatorAction, Request};
//!
//! let action = OperatorAction::parse("volume", "up").unwrap();
//! assert_eq!(action, Some(OperatorAction::Send(Request::VolumeUp)));
//! ```

pub mod action;
pub mod command;
pub mod error;
pub mod parser;
pub mod request;

// Re-export the main types for convenient top-level access
pub use action::{OperatorAction, Source};
pub use command::{Command, CommandKind};
pub use error::{ActionError, ActionResult};
pub use parser::StreamParser;
pub use request::Request;

//! Decoded device commands
//!
//! A [`Command`] is one `(key, value)` unit extracted from the device stream.
//! The key vocabulary is defined by the amplifier firmware and is not known
//! exhaustively, so the raw key is always kept and [`CommandKind::Other`]
//! covers anything outside the known set.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One decoded `(key, value)` pair from the device
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Command {
    /// Raw key as sent by the device (e.g. `volume`)
    pub key: String,
    /// Raw value, without the terminating `!`
    pub value: String,
}

impl Command {
    /// Create a command from a key and a value
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Split a simple command body (`key=value`, terminator already removed)
    ///
    /// The body is split at the first `=`. A body without any `=` becomes a
    /// command with an empty value.
    pub fn from_body(body: &str) -> Self {
        match body.split_once('=') {
            Some((key, value)) => Self::new(key, value),
            None => Self::new(body, ""),
        }
    }

    /// Classify the key against the known vocabulary
    pub fn kind(&self) -> CommandKind {
        CommandKind::from_key(&self.key)
    }

    /// Get the key as a string slice
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the value as a string slice
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Known command keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Volume,
    Source,
    Freq,
    Display,
    Display1,
    Display2,
    Treble,
    Bass,
    Tone,
    Balance,
    Mute,
    Power,
    PowerOff,
    /// Any key outside the known vocabulary
    Other,
}

impl CommandKind {
    /// Map a raw key to its kind
    pub fn from_key(key: &str) -> Self {
        match key {
            "volume" => CommandKind::Volume,
            "source" => CommandKind::Source,
            "freq" => CommandKind::Freq,
            "display" => CommandKind::Display,
            "display1" => CommandKind::Display1,
            "display2" => CommandKind::Display2,
            "treble" => CommandKind::Treble,
            "bass" => CommandKind::Bass,
            "tone" => CommandKind::Tone,
            "balance" => CommandKind::Balance,
            "mute" => CommandKind::Mute,
            "power" => CommandKind::Power,
            "power_off" => CommandKind::PowerOff,
            _ => CommandKind::Other,
        }
    }

    /// Whether this key is part of the known vocabulary
    pub fn is_known(&self) -> bool {
        !matches!(self, CommandKind::Other)
    }
}

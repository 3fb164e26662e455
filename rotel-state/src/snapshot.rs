//! Device snapshot: the bridge's best-known copy of amplifier state

use rotel_protocol::CommandKind;
use serde::{Deserialize, Serialize};

/// Power value recorded when the device announces it is shutting down
pub const STANDBY: &str = "standby";

/// Current state of the amplifier as seen through its status reports
///
/// Every field is either the last value the device reported or the empty
/// string when the value is unknown. The power field is published under the
/// `state` key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    pub balance: String,
    pub bass: String,
    pub display: String,
    pub display1: String,
    pub display2: String,
    pub freq: String,
    pub mute: String,
    pub source: String,
    #[serde(rename = "state")]
    pub power: String,
    pub tone: String,
    pub treble: String,
    pub volume: String,
}

impl DeviceSnapshot {
    /// Snapshot keys in publication order
    pub const FIELDS: [&'static str; 12] = [
        "balance", "bass", "display", "display1", "display2", "freq", "mute", "source", "state",
        "tone", "treble", "volume",
    ];

    /// Create a snapshot with every field unknown
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a field by its snapshot key
    pub fn get(&self, field: &str) -> Option<&str> {
        let value = match field {
            "balance" => &self.balance,
            "bass" => &self.bass,
            "display" => &self.display,
            "display1" => &self.display1,
            "display2" => &self.display2,
            "freq" => &self.freq,
            "mute" => &self.mute,
            "source" => &self.source,
            "state" | "power" => &self.power,
            "tone" => &self.tone,
            "treble" => &self.treble,
            "volume" => &self.volume,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Field that a command of this kind writes verbatim, if any
    pub(crate) fn field_mut(&mut self, kind: CommandKind) -> Option<&mut String> {
        match kind {
            CommandKind::Volume => Some(&mut self.volume),
            CommandKind::Source => Some(&mut self.source),
            CommandKind::Freq => Some(&mut self.freq),
            CommandKind::Display => Some(&mut self.display),
            CommandKind::Display1 => Some(&mut self.display1),
            CommandKind::Display2 => Some(&mut self.display2),
            CommandKind::Treble => Some(&mut self.treble),
            CommandKind::Bass => Some(&mut self.bass),
            CommandKind::Tone => Some(&mut self.tone),
            CommandKind::Balance => Some(&mut self.balance),
            CommandKind::Mute
            | CommandKind::Power
            | CommandKind::PowerOff
            | CommandKind::Other => None,
        }
    }

    /// Mark the device as in standby and forget everything else
    pub fn reset_to_standby(&mut self) {
        *self = Self {
            power: STANDBY.to_string(),
            ..Self::default()
        };
    }

    /// Whether the device last reported standby
    pub fn is_standby(&self) -> bool {
        self.power == STANDBY
    }

    /// Whether nothing is known about the device yet
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Replace a field's value, reporting whether it changed
pub(crate) fn replace(field: &mut String, value: &str) -> bool {
    if field.as_str() == value {
        false
    } else {
        value.clone_into(field);
        true
    }
}

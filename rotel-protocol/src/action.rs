//! Operator action translation
//!
//! Operators address the bridge with an action name and a free-form payload
//! (for example `volume` / `up`). Each valid action becomes exactly one
//! [`Request`], or a re-initialization. Invalid payloads are rejected here so
//! nothing malformed is ever written to the device.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ActionError, ActionResult};
use crate::request::Request;

/// Highest absolute volume level the amplifier accepts
pub const MAX_VOLUME: u8 = 96;

/// Largest bass/treble step either side of flat
pub const MAX_TONE_STEP: i8 = 10;

/// Largest balance step towards either channel
pub const MAX_BALANCE_STEP: u8 = 15;

/// Input sources selectable over RS-232
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Cd,
    Coax1,
    Coax2,
    Coax3,
    Opt1,
    Opt2,
    Opt3,
    Aux,
    Aux1,
    Aux2,
    Tuner,
    Phono,
    Usb,
    Bluetooth,
    PcUsb,
}

impl Source {
    /// All sources, in protocol document order
    pub const ALL: [Source; 15] = [
        Source::Cd,
        Source::Coax1,
        Source::Coax2,
        Source::Coax3,
        Source::Opt1,
        Source::Opt2,
        Source::Opt3,
        Source::Aux,
        Source::Aux1,
        Source::Aux2,
        Source::Tuner,
        Source::Phono,
        Source::Usb,
        Source::Bluetooth,
        Source::PcUsb,
    ];

    /// Protocol name of the source (also its selection command without `!`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Cd => "cd",
            Source::Coax1 => "coax1",
            Source::Coax2 => "coax2",
            Source::Coax3 => "coax3",
            Source::Opt1 => "opt1",
            Source::Opt2 => "opt2",
            Source::Opt3 => "opt3",
            Source::Aux => "aux",
            Source::Aux1 => "aux1",
            Source::Aux2 => "aux2",
            Source::Tuner => "tuner",
            Source::Phono => "phono",
            Source::Usb => "usb",
            Source::Bluetooth => "bluetooth",
            Source::PcUsb => "pc_usb",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Source::ALL
            .iter()
            .copied()
            .find(|source| source.as_str() == name)
            .ok_or_else(|| ActionError::InvalidSource(s.to_string()))
    }
}

/// Result of translating one operator message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorAction {
    /// Write this request to the device
    Send(Request),
    /// Ask for power state, then run the full re-query sequence
    Reinitialize,
}

impl OperatorAction {
    /// Translate an action name and payload
    ///
    /// Returns `Ok(None)` for an empty payload, which every action ignores.
    pub fn parse(action: &str, payload: &str) -> ActionResult<Option<Self>> {
        let payload = payload.trim();
        if payload.is_empty() {
            return Ok(None);
        }

        let action = match action {
            "volume" => OperatorAction::Send(parse_volume(payload)?),
            "power" => OperatorAction::Send(parse_power(payload)?),
            "mute" => OperatorAction::Send(parse_mute(payload)?),
            "source" => OperatorAction::Send(Request::Source(payload.parse()?)),
            "bass" => OperatorAction::Send(Request::Bass(parse_tone("bass", payload)?)),
            "treble" => OperatorAction::Send(Request::Treble(parse_tone("treble", payload)?)),
            "balance" => OperatorAction::Send(Request::Balance(parse_balance(payload)?)),
            "send" => OperatorAction::Send(Request::Raw(payload.to_string())),
            "initialize" => OperatorAction::Reinitialize,
            other => return Err(ActionError::UnknownAction(other.to_string())),
        };

        Ok(Some(action))
    }
}

fn parse_volume(payload: &str) -> ActionResult<Request> {
    match payload.to_ascii_lowercase().as_str() {
        "up" => Ok(Request::VolumeUp),
        "down" => Ok(Request::VolumeDown),
        "max" => Ok(Request::VolumeMax),
        "min" => Ok(Request::VolumeMin),
        level => match level.parse::<u8>() {
            Ok(level) if level <= MAX_VOLUME => Ok(Request::VolumeSet(level)),
            _ => Err(ActionError::InvalidVolume(payload.to_string())),
        },
    }
}

fn parse_power(payload: &str) -> ActionResult<Request> {
    match payload.to_ascii_lowercase().as_str() {
        "on" => Ok(Request::PowerOn),
        "off" | "standby" => Ok(Request::PowerOff),
        "toggle" => Ok(Request::PowerToggle),
        _ => Err(ActionError::InvalidPower(payload.to_string())),
    }
}

fn parse_mute(payload: &str) -> ActionResult<Request> {
    match payload.to_ascii_lowercase().as_str() {
        "on" => Ok(Request::MuteOn),
        "off" => Ok(Request::MuteOff),
        "toggle" => Ok(Request::MuteToggle),
        _ => Err(ActionError::InvalidMute(payload.to_string())),
    }
}

/// Normalizes to the device form: `up`, `down`, `000`, `+NN` or `-NN`
fn parse_tone(control: &'static str, payload: &str) -> ActionResult<String> {
    let invalid = || ActionError::InvalidTone {
        control,
        value: payload.to_string(),
    };

    match payload.to_ascii_lowercase().as_str() {
        "up" => Ok("up".to_string()),
        "down" => Ok("down".to_string()),
        step => {
            let step: i8 = step.parse().map_err(|_| invalid())?;
            match step {
                0 => Ok("000".to_string()),
                s if s.unsigned_abs() <= MAX_TONE_STEP.unsigned_abs() => Ok(format!("{:+03}", s)),
                _ => Err(invalid()),
            }
        }
    }
}

/// Normalizes to the device form: `000`, `lNN` or `rNN`
fn parse_balance(payload: &str) -> ActionResult<String> {
    let invalid = || ActionError::InvalidBalance(payload.to_string());
    let lowered = payload.to_ascii_lowercase();

    if lowered.chars().all(|c| c.is_ascii_digit()) {
        return match lowered.parse::<u8>() {
            Ok(0) => Ok("000".to_string()),
            _ => Err(invalid()),
        };
    }

    let (channel, step) = if let Some(step) = lowered.strip_prefix('l') {
        ('l', step)
    } else if let Some(step) = lowered.strip_prefix('r') {
        ('r', step)
    } else {
        return Err(invalid());
    };

    if step.is_empty() || !step.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    match step.parse::<u8>() {
        Ok(0) => Ok("000".to_string()),
        Ok(step) if step <= MAX_BALANCE_STEP => Ok(format!("{}{:02}", channel, step)),
        _ => Err(invalid()),
    }
}

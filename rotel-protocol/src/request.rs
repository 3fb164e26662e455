//! Outbound protocol requests
//!
//! Every string the bridge writes to the device is a [`Request`]. The wire
//! form is the fixed vocabulary from the device's RS-232 protocol document,
//! each request terminated by `!`.

use std::borrow::Cow;
use std::fmt;

use crate::action::Source;

/// A single request written to the device
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Request {
    // Queries
    GetCurrentPower,
    DisplayUpdateAuto,
    GetDisplay,
    GetDisplay1,
    GetDisplay2,
    GetVolume,
    GetCurrentSource,
    GetCurrentFreq,
    GetTone,
    GetBass,
    GetTreble,
    GetBalance,

    // Volume
    VolumeUp,
    VolumeDown,
    VolumeMax,
    VolumeMin,
    /// Absolute volume level
    VolumeSet(u8),

    // Power
    PowerOn,
    PowerOff,
    PowerToggle,

    // Mute
    MuteToggle,
    MuteOn,
    MuteOff,

    /// Select an input source
    Source(Source),

    // Tone controls, payload already validated (`up`, `down`, `000`, `+05`, ...)
    Bass(String),
    Treble(String),
    Balance(String),

    /// Operator supplied text sent without interpretation
    Raw(String),
}

impl Request {
    /// Status re-queries issued after startup and every power transition
    pub const REQUERY_SEQUENCE: [Request; 11] = [
        Request::DisplayUpdateAuto,
        Request::GetDisplay,
        Request::GetDisplay1,
        Request::GetDisplay2,
        Request::GetVolume,
        Request::GetCurrentSource,
        Request::GetCurrentFreq,
        Request::GetTone,
        Request::GetBass,
        Request::GetTreble,
        Request::GetBalance,
    ];

    /// Wire text for this request
    pub fn to_wire(&self) -> Cow<'static, str> {
        let fixed = match self {
            Request::GetCurrentPower => "get_current_power!",
            Request::DisplayUpdateAuto => "display_update_auto!",
            Request::GetDisplay => "get_display!",
            Request::GetDisplay1 => "get_display1!",
            Request::GetDisplay2 => "get_display2!",
            Request::GetVolume => "get_volume!",
            Request::GetCurrentSource => "get_current_source!",
            Request::GetCurrentFreq => "get_current_freq!",
            Request::GetTone => "get_tone!",
            Request::GetBass => "get_bass!",
            Request::GetTreble => "get_treble!",
            Request::GetBalance => "get_balance!",
            Request::VolumeUp => "volume_up!",
            Request::VolumeDown => "volume_down!",
            Request::VolumeMax => "volume_max!",
            Request::VolumeMin => "volume_min!",
            Request::PowerOn => "power_on!",
            Request::PowerOff => "power_off!",
            Request::PowerToggle => "power_toggle!",
            Request::MuteToggle => "mute!",
            Request::MuteOn => "mute_on!",
            Request::MuteOff => "mute_off!",
            Request::VolumeSet(level) => return Cow::Owned(format!("volume_{:02}!", level)),
            Request::Source(source) => return Cow::Owned(format!("{}!", source.as_str())),
            Request::Bass(value) => return Cow::Owned(format!("bass_{}!", value)),
            Request::Treble(value) => return Cow::Owned(format!("treble_{}!", value)),
            Request::Balance(value) => return Cow::Owned(format!("balance_{}!", value)),
            Request::Raw(text) => return Cow::Owned(text.clone()),
        };
        Cow::Borrowed(fixed)
    }

    /// Whether this request only reads device state
    pub fn is_query(&self) -> bool {
        matches!(
            self,
            Request::GetCurrentPower
                | Request::DisplayUpdateAuto
                | Request::GetDisplay
                | Request::GetDisplay1
                | Request::GetDisplay2
                | Request::GetVolume
                | Request::GetCurrentSource
                | Request::GetCurrentFreq
                | Request::GetTone
                | Request::GetBass
                | Request::GetTreble
                | Request::GetBalance
        )
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Request::GetCurrentPower, "get_current_power!")]
    #[case(Request::DisplayUpdateAuto, "display_update_auto!")]
    #[case(Request::VolumeSet(7), "volume_07!")]
    #[case(Request::VolumeSet(45), "volume_45!")]
    #[case(Request::Source(Source::Coax2), "coax2!")]
    #[case(Request::Source(Source::PcUsb), "pc_usb!")]
    #[case(Request::Bass("+03".to_string()), "bass_+03!")]
    #[case(Request::Treble("down".to_string()), "treble_down!")]
    #[case(Request::Balance("l05".to_string()), "balance_l05!")]
    #[case(Request::MuteToggle, "mute!")]
    #[case(Request::Raw("dimmer_3!".to_string()), "dimmer_3!")]
    fn test_wire_text(#[case] request: Request, #[case] expected: &str) {
        assert_eq!(request.to_wire(), expected);
        assert_eq!(request.to_string(), expected);
    }

    #[test]
    fn test_requery_sequence_order() {
        let wire: Vec<_> = Request::REQUERY_SEQUENCE
            .iter()
            .map(|r| r.to_wire().into_owned())
            .collect();

        assert_eq!(
            wire,
            vec![
                "display_update_auto!",
                "get_display!",
                "get_display1!",
                "get_display2!",
                "get_volume!",
                "get_current_source!",
                "get_current_freq!",
                "get_tone!",
                "get_bass!",
                "get_treble!",
                "get_balance!",
            ]
        );
    }

    #[test]
    fn test_requery_sequence_never_asks_for_power() {
        assert!(!Request::REQUERY_SEQUENCE.contains(&Request::GetCurrentPower));
        assert!(Request::REQUERY_SEQUENCE.iter().all(Request::is_query));
    }
}

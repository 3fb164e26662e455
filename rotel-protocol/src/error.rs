//! Error types for operator action translation

use thiserror::Error;

/// Errors raised while validating an operator payload
///
/// None of these ever reach the device: an invalid payload produces no
/// request at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// The action name is not one the bridge handles
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// Volume must be up/down/max/min or a level within range
    #[error("Invalid volume: {0}")]
    InvalidVolume(String),

    /// Power must be on/off/standby/toggle
    #[error("Invalid power state: {0}")]
    InvalidPower(String),

    /// Mute must be on/off/toggle
    #[error("Invalid mute state: {0}")]
    InvalidMute(String),

    /// Source name is not one of the device inputs
    #[error("Invalid source: {0}")]
    InvalidSource(String),

    /// Bass/treble must be up/down/000 or a signed step
    #[error("Invalid {control} value: {value}")]
    InvalidTone {
        /// Either "bass" or "treble"
        control: &'static str,
        /// The rejected payload
        value: String,
    },

    /// Balance must be 000 or l/r followed by a step
    #[error("Invalid balance: {0}")]
    InvalidBalance(String),
}

/// Result type alias for action translation
pub type ActionResult<T> = Result<T, ActionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_error_display() {
        let error = ActionError::InvalidSource("hdmi9".to_string());
        assert_eq!(error.to_string(), "Invalid source: hdmi9");

        let error = ActionError::InvalidTone {
            control: "bass",
            value: "+99".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid bass value: +99");

        let error = ActionError::UnknownAction("eject".to_string());
        assert_eq!(error.to_string(), "Unknown action: eject");
    }
}

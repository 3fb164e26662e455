//! Command reducer - folds decoded commands into the device snapshot
//!
//! The reducer performs no I/O. It decides which follow-up requests the
//! device needs and hands them back to the caller in order.

use rotel_protocol::{Command, CommandKind, Request};

use crate::snapshot::{replace, DeviceSnapshot};

/// Mute report sent when the device cannot tell which way mute went
pub const MUTE_AMBIGUOUS: &str = "on/off";

/// Whether a re-query sequence starts by asking for the power state
///
/// Startup passes [`PowerQuery::Include`]. Power reports pass
/// [`PowerQuery::Skip`], since the answer would be another power report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerQuery {
    Include,
    Skip,
}

/// Requests that resynchronize the snapshot with the device
pub fn requery_sequence(power: PowerQuery) -> Vec<Request> {
    let mut requests = Vec::with_capacity(Request::REQUERY_SEQUENCE.len() + 1);
    if power == PowerQuery::Include {
        requests.push(Request::GetCurrentPower);
    }
    requests.extend(Request::REQUERY_SEQUENCE);
    requests
}

/// What a command did to the snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A field took a new value
    Updated,
    /// A field was written with the value it already had
    Unchanged,
    /// The report was ambiguous; a re-query was requested instead
    Deferred,
    /// The device announced shutdown and the snapshot was reset
    Reset,
    /// Known key, but the value has no rule
    Ignored,
    /// Key outside the known vocabulary, left to the caller
    Unrecognized,
}

/// Result of reducing one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reduction {
    /// Requests to write to the device, in order
    pub requests: Vec<Request>,
    /// Effect on the snapshot
    pub outcome: Outcome,
}

impl Reduction {
    fn quiet(outcome: Outcome) -> Self {
        Self {
            requests: Vec::new(),
            outcome,
        }
    }

    fn field(changed: bool) -> Self {
        Self::quiet(if changed {
            Outcome::Updated
        } else {
            Outcome::Unchanged
        })
    }

    /// Whether the snapshot may have changed
    pub fn changed_snapshot(&self) -> bool {
        matches!(self.outcome, Outcome::Updated | Outcome::Reset)
    }
}

/// Apply one command to the snapshot in place
pub fn reduce(snapshot: &mut DeviceSnapshot, command: &Command) -> Reduction {
    let kind = command.kind();
    if !kind.is_known() {
        return Reduction::quiet(Outcome::Unrecognized);
    }
    let value = command.value();

    if let Some(field) = snapshot.field_mut(kind) {
        return Reduction::field(replace(field, value));
    }

    match kind {
        CommandKind::Mute if value == MUTE_AMBIGUOUS => Reduction {
            // the toggle report arrives with a real volume change
            requests: vec![Request::GetVolume],
            outcome: Outcome::Deferred,
        },
        CommandKind::Mute => Reduction::field(replace(&mut snapshot.mute, value)),
        CommandKind::Power if value == "on" || value == "standby" => {
            let changed = replace(&mut snapshot.power, value);
            Reduction {
                requests: requery_sequence(PowerQuery::Skip),
                outcome: if changed {
                    Outcome::Updated
                } else {
                    Outcome::Unchanged
                },
            }
        }
        CommandKind::Power => Reduction::quiet(Outcome::Ignored),
        CommandKind::PowerOff => {
            snapshot.reset_to_standby();
            Reduction::quiet(Outcome::Reset)
        }
        _ => Reduction::quiet(Outcome::Unrecognized),
    }
}

/// Functional form of [`reduce`]: returns the updated snapshot and requests
pub fn apply(command: &Command, snapshot: &DeviceSnapshot) -> (DeviceSnapshot, Vec<Request>) {
    let mut updated = snapshot.clone();
    let reduction = reduce(&mut updated, command);
    (updated, reduction.requests)
}

//! State processor for turning raw device bytes into snapshot updates

use rotel_protocol::{Command, Request, StreamParser};

use crate::reducer::{reduce, Outcome};
use crate::snapshot::DeviceSnapshot;

/// Everything one chunk of device output produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessedChunk {
    /// Commands decoded from the chunk, in stream order
    pub commands: Vec<Command>,
    /// Follow-up requests, in the order the reducer issued them
    pub requests: Vec<Request>,
    /// Commands whose key the reducer does not know
    pub unrecognized: Vec<Command>,
    /// Whether any snapshot field changed
    pub changed: bool,
}

/// Owns the parser and the snapshot; the only writer of device state
///
/// Callers must serialize access (one reader loop, or a lock around
/// [`process_chunk`](Self::process_chunk)).
#[derive(Debug, Default)]
pub struct StateProcessor {
    parser: StreamParser,
    snapshot: DeviceSnapshot,
}

impl StateProcessor {
    /// Create a processor with an empty buffer and an unknown snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a chunk and fold every completed command into the snapshot
    pub fn process_chunk(&mut self, chunk: &[u8]) -> ProcessedChunk {
        let commands = self.parser.feed(chunk);
        let mut processed = ProcessedChunk::default();

        for command in &commands {
            let reduction = reduce(&mut self.snapshot, command);
            tracing::debug!(
                key = %command.key,
                value = %command.value,
                outcome = ?reduction.outcome,
                "Processed device command"
            );

            processed.changed |= reduction.changed_snapshot();
            if reduction.outcome == Outcome::Unrecognized {
                processed.unrecognized.push(command.clone());
            }
            processed.requests.extend(reduction.requests);
        }

        processed.commands = commands;
        processed
    }

    /// Current snapshot, for publishing
    pub fn snapshot(&self) -> &DeviceSnapshot {
        &self.snapshot
    }

    /// Bytes waiting for the rest of a command
    pub fn pending(&self) -> &[u8] {
        self.parser.pending()
    }

    /// Drop any partial command, keeping the snapshot
    pub fn discard_pending(&mut self) {
        self.parser.clear();
    }
}

//! Rotel State Management
//!
//! Folds the decoded device stream into a snapshot of amplifier state.
//!
//! # Architecture
//!
//! ```text
//! serial bytes → StreamParser → Command → reduce() → DeviceSnapshot
//!                                            │
//!                                            └──→ follow-up Requests
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use rotel_state::{StateProcessor, PowerQuery, requery_sequence};
//!
//! let mut processor = StateProcessor::new();
//!
//! // At startup the bridge asks for everything, power included
//! let startup = requery_sequence(PowerQuery::Include);
//! assert_eq!(startup.len(), 12);
//!
//! let processed = processor.process_chunk(b"power=on!volume=45!");
//! assert_eq!(processor.snapshot().volume, "45");
//!
//! // The power report triggers a re-query that does not ask for power again
//! assert_eq!(processed.requests.len(), 11);
//! ```

pub mod processor;
pub mod reducer;
pub mod snapshot;

pub use processor::{ProcessedChunk, StateProcessor};
pub use reducer::{apply, reduce, requery_sequence, Outcome, PowerQuery, Reduction, MUTE_AMBIGUOUS};
pub use snapshot::{DeviceSnapshot, STANDBY};

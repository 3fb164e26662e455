//! The bridge: device bytes in, snapshots and requests out
//!
//! [`Bridge`] holds the only [`StateProcessor`]. The lock around it is held
//! for the synchronous parse-and-reduce step only, never across an await, so
//! publishing and serial writes run without it.

use parking_lot::Mutex;
use rotel_protocol::{OperatorAction, Request};
use rotel_state::{requery_sequence, DeviceSnapshot, PowerQuery, StateProcessor};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{BridgeError, Result};
use crate::publish::StatePublisher;
use crate::topics::Topics;
use crate::transport::RequestSink;

/// Bytes requested per serial read
pub const READ_BUFFER_SIZE: usize = 128;

/// Connects the device stream, the state processor and the bus
pub struct Bridge<S, P> {
    processor: Mutex<StateProcessor>,
    sink: S,
    publisher: P,
    topics: Topics,
}

impl<S, P> Bridge<S, P>
where
    S: RequestSink,
    P: StatePublisher,
{
    pub fn new(sink: S, publisher: P, topics: Topics) -> Self {
        Self {
            processor: Mutex::new(StateProcessor::new()),
            sink,
            publisher,
            topics,
        }
    }

    pub fn topics(&self) -> &Topics {
        &self.topics
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Copy of the current snapshot
    pub fn snapshot(&self) -> DeviceSnapshot {
        self.processor.lock().snapshot().clone()
    }

    /// Ask for power state, then everything else
    pub async fn initialize(&self) -> Result<()> {
        tracing::info!("Requesting full device state");
        self.send_all(&requery_sequence(PowerQuery::Include)).await
    }

    /// Process one chunk of device output
    ///
    /// Sends any follow-up requests in order, then publishes the snapshot.
    pub async fn handle_chunk(&self, chunk: &[u8]) -> Result<()> {
        let (processed, snapshot) = {
            let mut processor = self.processor.lock();
            let processed = processor.process_chunk(chunk);
            (processed, processor.snapshot().clone())
        };

        if processed.changed && snapshot.is_standby() {
            tracing::info!("Amplifier is in standby");
        }

        for command in &processed.unrecognized {
            tracing::debug!(key = %command.key, value = %command.value, "Ignoring unrecognized command");
        }

        self.send_all(&processed.requests).await?;
        self.publisher.publish_state(&snapshot).await
    }

    /// Route one bus message; topics that are not commands are ignored
    pub async fn handle_operator_message(&self, topic: &str, payload: &[u8]) -> Result<()> {
        let Some(action) = self.topics.action(topic) else {
            return Ok(());
        };
        let payload = String::from_utf8_lossy(payload);

        match OperatorAction::parse(action, &payload) {
            Ok(Some(OperatorAction::Send(request))) => {
                tracing::info!(action, request = %request, "Operator command");
                self.sink.send_request(&request).await
            }
            Ok(Some(OperatorAction::Reinitialize)) => self.initialize().await,
            Ok(None) => Ok(()),
            Err(e) => {
                tracing::warn!(action, payload = %payload, error = %e, "Rejected operator command");
                Ok(())
            }
        }
    }

    /// Drop any partially received command, keeping the snapshot
    pub fn shutdown(&self) {
        let mut processor = self.processor.lock();
        let pending = processor.pending().len();
        processor.discard_pending();
        if pending > 0 {
            tracing::debug!(bytes = pending, "Discarded partial device command");
        }
    }

    /// Read the device until the stream ends or fails
    pub async fn run_serial_loop<R>(&self, mut reader: R) -> Result<()>
    where
        R: AsyncRead + Unpin + Send,
    {
        let mut buf = [0u8; READ_BUFFER_SIZE];
        loop {
            let n = reader.read(&mut buf).await?;
            if n == 0 {
                return Err(BridgeError::SerialClosed);
            }
            self.handle_chunk(&buf[..n]).await?;
        }
    }

    async fn send_all(&self, requests: &[Request]) -> Result<()> {
        for request in requests {
            self.sink.send_request(request).await?;
        }
        Ok(())
    }
}

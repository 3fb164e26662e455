//! Serial transport adapter
//!
//! The serial stream is split once at startup. The read half belongs to the
//! bridge's read loop. The write half sits behind a single async mutex inside
//! [`SerialRequestSink`], so reducer re-queries and operator commands never
//! interleave on the wire, and the read side never waits on the lock.

use async_trait::async_trait;
use rotel_protocol::Request;
use tokio::io::{AsyncWrite, AsyncWriteExt, ReadHalf, WriteHalf};
use tokio::sync::Mutex;
use tokio_serial::{SerialPortBuilderExt, SerialStream};

use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result};

/// Something that can deliver requests to the device
#[async_trait]
pub trait RequestSink: Send + Sync {
    /// Write one request; concurrent callers are serialized
    async fn send_request(&self, request: &Request) -> Result<()>;
}

/// Writes requests to an async byte sink, one at a time
pub struct SerialRequestSink<W> {
    writer: Mutex<W>,
}

impl<W> SerialRequestSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Give back the underlying writer
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

#[async_trait]
impl<W> RequestSink for SerialRequestSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn send_request(&self, request: &Request) -> Result<()> {
        let wire = request.to_wire();

        let mut writer = self.writer.lock().await;
        writer.write_all(wire.as_bytes()).await?;
        writer.flush().await?;
        drop(writer);

        if request.is_query() {
            tracing::trace!(request = %wire, "Sent serial query");
        } else {
            tracing::debug!(request = %wire, "Sent serial request");
        }
        Ok(())
    }
}

/// Open the configured serial device (8N1, no flow control)
pub fn open_serial(config: &BridgeConfig) -> Result<SerialStream> {
    tokio_serial::new(&config.serial_device, config.baud_rate)
        .data_bits(tokio_serial::DataBits::Eight)
        .parity(tokio_serial::Parity::None)
        .stop_bits(tokio_serial::StopBits::One)
        .flow_control(tokio_serial::FlowControl::None)
        .open_native_async()
        .map_err(|source| BridgeError::SerialOpen {
            device: config.serial_device.clone(),
            source,
        })
}

/// Split a serial stream into the read loop's half and a request sink
pub fn split_serial(
    stream: SerialStream,
) -> (ReadHalf<SerialStream>, SerialRequestSink<WriteHalf<SerialStream>>) {
    let (reader, writer) = tokio::io::split(stream);
    (reader, SerialRequestSink::new(writer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_sink_writes_wire_text() {
        let sink = SerialRequestSink::new(Vec::new());
        sink.send_request(&Request::GetVolume).await.unwrap();
        sink.send_request(&Request::VolumeSet(30)).await.unwrap();

        assert_eq!(sink.into_inner(), b"get_volume!volume_30!");
    }

    #[tokio::test]
    async fn test_concurrent_requests_do_not_interleave() {
        let sink = Arc::new(SerialRequestSink::new(Vec::new()));

        let mut tasks = Vec::new();
        for level in 0..20u8 {
            let sink = Arc::clone(&sink);
            tasks.push(tokio::spawn(async move {
                sink.send_request(&Request::VolumeSet(level)).await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let sink = Arc::try_unwrap(sink).ok().unwrap();
        let written = String::from_utf8(sink.into_inner()).unwrap();
        let mut requests: Vec<&str> = written.split_inclusive('!').collect();
        requests.sort_unstable();

        let mut expected: Vec<String> = (0..20u8).map(|l| format!("volume_{:02}!", l)).collect();
        expected.sort_unstable();
        assert_eq!(requests, expected);
    }
}

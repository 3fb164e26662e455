//! State publishing adapter

use async_trait::async_trait;
use rotel_state::DeviceSnapshot;
use rumqttc::{AsyncClient, QoS};

use crate::error::Result;

/// Something that can publish the current snapshot
#[async_trait]
pub trait StatePublisher: Send + Sync {
    async fn publish_state(&self, snapshot: &DeviceSnapshot) -> Result<()>;
}

/// Publishes the snapshot as retained JSON on the state topic
#[derive(Clone)]
pub struct MqttStatePublisher {
    client: AsyncClient,
    topic: String,
}

impl MqttStatePublisher {
    pub fn new(client: AsyncClient, topic: impl Into<String>) -> Self {
        Self {
            client,
            topic: topic.into(),
        }
    }
}

#[async_trait]
impl StatePublisher for MqttStatePublisher {
    async fn publish_state(&self, snapshot: &DeviceSnapshot) -> Result<()> {
        let payload = serde_json::to_vec(snapshot)?;
        self.client
            .publish(self.topic.as_str(), QoS::AtMostOnce, true, payload)
            .await?;
        Ok(())
    }
}

//! MQTT client setup and event loop

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};

use crate::bridge::Bridge;
use crate::config::BridgeConfig;
use crate::error::Result;
use crate::publish::StatePublisher;
use crate::transport::RequestSink;

/// Client options for the configured broker
pub fn mqtt_options(config: &BridgeConfig) -> Result<MqttOptions> {
    let (host, port) = config.broker_address()?;

    let mut options = MqttOptions::new(config.client_id.clone(), host, port);
    options.set_keep_alive(config.keep_alive);
    options.set_clean_session(true);
    Ok(options)
}

/// Drive the broker connection and hand command messages to the bridge
///
/// Subscribes on every ConnAck so a fresh session picks the commands up
/// again. Returns when the connection fails.
pub async fn run_mqtt_loop<S, P>(
    bridge: &Bridge<S, P>,
    client: &AsyncClient,
    mut eventloop: EventLoop,
) -> Result<()>
where
    S: RequestSink,
    P: StatePublisher,
{
    let filter = bridge.topics().command_filter();

    loop {
        match eventloop.poll().await? {
            Event::Incoming(Packet::ConnAck(ack)) => {
                tracing::info!(code = ?ack.code, "Connected to broker");
                client.try_subscribe(filter.as_str(), QoS::AtMostOnce)?;
                tracing::debug!(filter = %filter, "Subscribed to commands");
            }
            Event::Incoming(Packet::Publish(publish)) => {
                bridge
                    .handle_operator_message(&publish.topic, &publish.payload)
                    .await?;
            }
            Event::Incoming(Packet::Disconnect) => {
                tracing::warn!("Broker sent disconnect");
            }
            _ => {}
        }
    }
}

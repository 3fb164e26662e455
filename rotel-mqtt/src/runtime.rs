//! Wires the adapters together and runs until shutdown

use rumqttc::AsyncClient;

use crate::bridge::Bridge;
use crate::config::BridgeConfig;
use crate::error::Result;
use crate::mqtt::{mqtt_options, run_mqtt_loop};
use crate::publish::MqttStatePublisher;
use crate::transport::{open_serial, split_serial};

/// Run the bridge until Ctrl-C or a transport failure
///
/// Opens the serial device, connects to the broker and sends the initial
/// queries after `startup_delay`. Bytes of an unfinished command are
/// discarded on shutdown.
pub async fn run(config: BridgeConfig) -> Result<()> {
    let serial = open_serial(&config)?;
    let (reader, sink) = split_serial(serial);
    tracing::info!(
        device = %config.serial_device,
        baud = config.baud_rate,
        "Opened serial device"
    );

    let topics = config.topics();
    let (client, eventloop) = AsyncClient::new(mqtt_options(&config)?, config.channel_capacity);
    let publisher = MqttStatePublisher::new(client.clone(), topics.state());
    let bridge = Bridge::new(sink, publisher, topics);
    tracing::info!(broker = %config.broker, state = %bridge.topics().state(), "Starting bridge");

    let startup = async {
        tokio::time::sleep(config.startup_delay).await;
        bridge.initialize().await
    };

    let running = async {
        tokio::try_join!(
            run_mqtt_loop(&bridge, &client, eventloop),
            bridge.run_serial_loop(reader),
            startup,
        )
        .map(|_| ())
    };

    let result = tokio::select! {
        result = running => {
            if let Err(e) = &result {
                tracing::error!(error = %e, "Bridge stopped");
            }
            result
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shut down");
            if let Err(e) = client.try_disconnect() {
                tracing::debug!(error = %e, "Broker disconnect not sent");
            }
            Ok(())
        }
    };

    bridge.shutdown();
    result
}

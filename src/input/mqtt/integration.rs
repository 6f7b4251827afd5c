//! MQTT integration orchestrator.
//!
//! Wires the MQTT client to the controller, keeping MQTT internals out of
//! main.rs.

use super::client::{MqttClient, MqttMessage};
use super::link::{LinkMonitor, LinkState};
use crate::climate::Controller;
use crate::error::HandleError;
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub struct MqttIntegration {
    client: MqttClient,
    monitor: LinkMonitor,
    controller: Arc<Controller>,
}

impl MqttIntegration {
    pub fn new(client: MqttClient, monitor: LinkMonitor, controller: Arc<Controller>) -> Self {
        Self {
            client,
            monitor,
            controller,
        }
    }

    /// Start the MQTT integration.
    ///
    /// Spawns a background task that runs the event loop and feeds every
    /// inbound message to the controller until `shutdown` is cancelled.
    pub fn start(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run(shutdown).await;
        })
    }

    async fn run(self, shutdown: CancellationToken) {
        let (msg_tx, mut msg_rx) = mpsc::channel::<MqttMessage>(64);

        let monitor = self.monitor.clone();
        let mqtt_loop = tokio::spawn(self.client.run(msg_tx, monitor));

        // One message at a time, so readings for a room apply in arrival order.
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("[MQTT] Shutdown requested");
                    break;
                }
                msg = msg_rx.recv() => match msg {
                    Some(msg) => dispatch(&self.controller, msg).await,
                    None => {
                        warn!("[MQTT] Event loop ended");
                        break;
                    }
                },
            }
        }

        mqtt_loop.abort();
        self.monitor.set(LinkState::Closed);
    }
}

/// Route one message to the controller. Failures are logged and the message
/// is dropped; they never stop the integration.
async fn dispatch(controller: &Controller, msg: MqttMessage) {
    match controller.handle(&msg.topic, &msg.payload).await {
        Ok(Some(command)) => {
            debug!(
                "[MQTT] {} -> room {} valve {}",
                msg.topic,
                command.room,
                command.level.percent()
            );
        }
        Ok(None) => {}
        Err(e @ HandleError::Decode(_)) => {
            warn!("[MQTT] {} on {}", e, msg.topic);
        }
        Err(e @ HandleError::Publish { .. }) => {
            log::error!("[MQTT] {}", e);
        }
    }
}

//! MQTT client wrapper for the reading and actuator topics.

use super::link::{LinkMonitor, LinkState};
use crate::config::MqttConfig;
use log::{debug, error, info, warn};
use rumqttc::{AsyncClient, ConnectReturnCode, Event, EventLoop, MqttOptions, Packet, QoS};
use std::time::Duration;
use tokio::sync::mpsc;

/// Message received from MQTT broker.
#[derive(Debug, Clone)]
pub struct MqttMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

/// MQTT client that keeps its subscriptions alive across reconnects.
pub struct MqttClient {
    client: AsyncClient,
    event_loop: EventLoop,
    subscriptions: Vec<String>,
}

impl MqttClient {
    /// Create a new MQTT client from configuration.
    ///
    /// `subscriptions` are (re)subscribed every time the broker accepts a
    /// connection.
    pub fn new(config: &MqttConfig, subscriptions: Vec<String>) -> Self {
        let mut options =
            MqttOptions::new(&config.client_id, &config.broker_host, config.broker_port);
        options.set_keep_alive(Duration::from_secs(config.keep_alive_secs));

        // Set credentials if provided
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            options.set_credentials(username, password);
        }

        let (client, event_loop) = AsyncClient::new(options, 100);

        Self {
            client,
            event_loop,
            subscriptions,
        }
    }

    /// Get a clone of the async client for publishing from other tasks.
    pub fn client(&self) -> AsyncClient {
        self.client.clone()
    }

    /// Run the MQTT event loop and forward messages to the provided channel.
    ///
    /// Runs until the receiving side of `tx` is dropped. Connection state
    /// changes are recorded in `monitor`.
    pub async fn run(mut self, tx: mpsc::Sender<MqttMessage>, monitor: LinkMonitor) {
        info!("[MQTT] Starting event loop");

        loop {
            match self.event_loop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                    if ack.code == ConnectReturnCode::Success {
                        info!("[MQTT] Connected to broker");
                        monitor.set(LinkState::Connected);
                        self.subscribe_all();
                    } else {
                        warn!("[MQTT] Broker refused connection: {:?}", ack.code);
                        monitor.set(LinkState::Disconnected(format!("{:?}", ack.code)));
                    }
                }
                Ok(Event::Incoming(Packet::SubAck(ack))) => {
                    debug!("[MQTT] Subscribed (pkid {}): {:?}", ack.pkid, ack.return_codes);
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    let msg = MqttMessage {
                        topic: publish.topic.clone(),
                        payload: publish.payload.to_vec(),
                    };
                    if tx.send(msg).await.is_err() {
                        info!("[MQTT] Message channel closed, stopping event loop");
                        break;
                    }
                }
                Ok(Event::Incoming(Packet::Disconnect)) => {
                    warn!("[MQTT] Broker closed the connection");
                    monitor.set(LinkState::Disconnected("disconnected by broker".to_string()));
                }
                Ok(_) => {}
                Err(e) => {
                    error!("[MQTT] Connection error: {:?}", e);
                    monitor.set(LinkState::Disconnected(e.to_string()));
                    // Wait before reconnecting
                    tokio::time::sleep(Duration::from_secs(5)).await;
                }
            }
        }

        monitor.set(LinkState::Closed);
    }

    /// Queue subscriptions without awaiting: this runs inside the event loop
    /// that drains the request queue.
    fn subscribe_all(&self) {
        for topic in &self.subscriptions {
            match self.client.try_subscribe(topic, QoS::AtMostOnce) {
                Ok(()) => info!("[MQTT] Subscribing to {}", topic),
                Err(e) => warn!("[MQTT] Failed to subscribe to {}: {:?}", topic, e),
            }
        }
    }
}

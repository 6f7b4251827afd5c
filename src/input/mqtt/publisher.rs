//! Valve commands over MQTT.

use crate::climate::{ActuatorCommand, ActuatorPublisher, Topics};
use crate::error::TransportError;
use async_trait::async_trait;
use log::debug;
use rumqttc::{AsyncClient, QoS};

/// Publishes `{"value": 0|100}` to `actuators/room-<room>/set`.
///
/// QoS 0, not retained: commands are level-based, so a lost one is corrected
/// by the next reading for that room.
pub struct MqttActuatorPublisher {
    client: AsyncClient,
    topics: Topics,
}

impl MqttActuatorPublisher {
    pub fn new(client: AsyncClient, topics: Topics) -> Self {
        Self { client, topics }
    }
}

#[async_trait]
impl ActuatorPublisher for MqttActuatorPublisher {
    async fn publish(&self, command: &ActuatorCommand) -> Result<(), TransportError> {
        let topic = self.topics.actuator(&command.room);
        let payload = serde_json::to_vec(&command.payload())
            .map_err(|e| TransportError::Client(e.to_string()))?;

        debug!("[MQTT] Publishing to {}: {}", topic, String::from_utf8_lossy(&payload));
        self.client
            .publish(topic, QoS::AtMostOnce, false, payload)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::climate::{RoomId, ValveLevel};
    use rumqttc::MqttOptions;

    #[tokio::test]
    async fn test_publish_queues_without_waiting_for_broker() {
        // Nothing polls the event loop, so this only succeeds if publish is
        // fire-and-forget.
        let (client, _event_loop) =
            AsyncClient::new(MqttOptions::new("publisher-test", "127.0.0.1", 1883), 10);
        let publisher = MqttActuatorPublisher::new(client, Topics::default());
        let command = ActuatorCommand::new(RoomId::new("1").unwrap(), ValveLevel::Open);

        assert_eq!(publisher.publish(&command).await, Ok(()));
        assert_eq!(publisher.publish(&command).await, Ok(()));
    }
}

//! Event handling: decode, update, decide, publish.

use super::actuator::{ActuatorCommand, ActuatorPublisher};
use super::decision::decide;
use super::decoder::decode;
use super::reading::{RoomId, SensorReading};
use super::room::{RoomState, RoomStore};
use super::status::{Connectivity, ConnectivityProbe, StatusReport};
use super::topics::Topics;
use crate::config::ControllerConfig;
use crate::error::HandleError;
use log::{debug, info};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Owns the room store and reacts to each inbound event.
///
/// The store lock is held from the update until the command has been handed
/// to the publisher, so a decision is never taken from a state that another
/// in-flight event is rewriting. Contention is low, so one lock covers all
/// rooms.
pub struct Controller {
    config: ControllerConfig,
    topics: Topics,
    store: Mutex<RoomStore>,
    publisher: Arc<dyn ActuatorPublisher>,
    probe: Arc<dyn ConnectivityProbe>,
}

impl Controller {
    pub fn new(
        config: ControllerConfig,
        topics: Topics,
        publisher: Arc<dyn ActuatorPublisher>,
        probe: Arc<dyn ConnectivityProbe>,
    ) -> Self {
        Self {
            config,
            topics,
            store: Mutex::new(RoomStore::new()),
            publisher,
            probe,
        }
    }

    pub fn desired_temperature(&self) -> f64 {
        self.config.desired_temperature
    }

    pub fn topics(&self) -> &Topics {
        &self.topics
    }

    /// Handle one raw event from the bus.
    ///
    /// Returns the command that was published, or `None` when the room's state
    /// does not warrant one yet. A decode failure leaves every room untouched.
    pub async fn handle(
        &self,
        topic: &str,
        payload: &[u8],
    ) -> Result<Option<ActuatorCommand>, HandleError> {
        debug!("Inbound event on {}: {}", topic, String::from_utf8_lossy(payload));
        let reading = decode(&self.topics, topic, payload)?;
        self.apply(reading).await
    }

    /// Fold an already decoded reading into its room and react to it.
    pub async fn apply(
        &self,
        reading: SensorReading,
    ) -> Result<Option<ActuatorCommand>, HandleError> {
        let mut store = self.store.lock().await;
        let state = store.upsert(&reading.room, reading.measurement);
        info!(
            "Room {} {} updated to {} (temperature={:?}, motion={:?})",
            reading.room,
            reading.metric(),
            reading.measurement,
            state.temperature,
            state.motion
        );

        let Some(level) = decide(&state, self.config.desired_temperature) else {
            debug!("Room {} has no temperature yet, no valve command", reading.room);
            return Ok(None);
        };

        let command = ActuatorCommand::new(reading.room, level);
        if let Err(source) = self.publisher.publish(&command).await {
            return Err(HandleError::Publish { command, source });
        }
        drop(store);

        info!("Room {} valve set to {}", command.room, command.level.percent());
        Ok(Some(command))
    }

    /// Copy of one room's state.
    pub async fn room(&self, room: &RoomId) -> Option<RoomState> {
        self.store.lock().await.get(room)
    }

    pub async fn status(&self) -> StatusReport {
        let state = self.store.lock().await.snapshot();
        StatusReport {
            connectivity: Connectivity::from_probe(self.probe.as_ref()),
            desired_temperature: self.config.desired_temperature,
            state,
        }
    }
}

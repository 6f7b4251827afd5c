// Shared fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use climate_controller::climate::{
    ActuatorCommand, ActuatorPublisher, ConnectivityProbe, Controller, Topics,
};
use climate_controller::config::ControllerConfig;
use climate_controller::error::TransportError;
use parking_lot::Mutex;
use std::sync::Arc;

/// Publisher that records every command instead of sending it.
#[derive(Default)]
pub struct RecordingPublisher {
    sent: Mutex<Vec<ActuatorCommand>>,
}

impl RecordingPublisher {
    pub fn sent(&self) -> Vec<ActuatorCommand> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl ActuatorPublisher for RecordingPublisher {
    async fn publish(&self, command: &ActuatorCommand) -> Result<(), TransportError> {
        self.sent.lock().push(command.clone());
        Ok(())
    }
}

/// Probe with a fixed answer.
pub struct FixedProbe(pub Result<bool, TransportError>);

impl ConnectivityProbe for FixedProbe {
    fn is_connected(&self) -> Result<bool, TransportError> {
        self.0.clone()
    }
}

pub fn controller(
    desired_temperature: f64,
    probe: FixedProbe,
) -> (Arc<Controller>, Arc<RecordingPublisher>) {
    let publisher = Arc::new(RecordingPublisher::default());
    let controller = Controller::new(
        ControllerConfig::new(desired_temperature).unwrap(),
        Topics::default(),
        publisher.clone(),
        Arc::new(probe),
    );
    (Arc::new(controller), publisher)
}

//! MQTT transport for sensor readings and valve commands.
//!
//! This module connects the controller to the broker: inbound publishes on the
//! reading topics are routed to [`Controller::handle`](crate::climate::Controller::handle)
//! and valve commands are published back on the per-room actuator topics.

mod client;
mod integration;
mod link;
mod publisher;

pub use client::{MqttClient, MqttMessage};
pub use integration::MqttIntegration;
pub use link::{LinkMonitor, LinkState};
pub use publisher::MqttActuatorPublisher;

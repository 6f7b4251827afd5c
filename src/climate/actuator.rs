//! Valve commands and the publisher seam.

use super::reading::RoomId;
use crate::error::TransportError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Valve opening. Commands carry an absolute level, never a delta, so
/// sending the same command twice has the same effect as sending it once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValveLevel {
    Closed,
    Open,
}

impl ValveLevel {
    pub fn percent(self) -> u8 {
        match self {
            ValveLevel::Closed => 0,
            ValveLevel::Open => 100,
        }
    }

    pub fn from_percent(percent: u8) -> Option<Self> {
        match percent {
            0 => Some(ValveLevel::Closed),
            100 => Some(ValveLevel::Open),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActuatorCommand {
    pub room: RoomId,
    pub level: ValveLevel,
}

impl ActuatorCommand {
    pub fn new(room: RoomId, level: ValveLevel) -> Self {
        Self { room, level }
    }

    pub fn payload(&self) -> ActuatorPayload {
        ActuatorPayload {
            value: self.level.percent(),
        }
    }
}

/// Wire body of `actuators/room-<room>/set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActuatorPayload {
    pub value: u8,
}

/// Sends valve commands to the bus.
///
/// Delivery is fire-and-forget: an `Ok` means the command was handed to the
/// transport, not that the valve acknowledged it.
#[async_trait]
pub trait ActuatorPublisher: Send + Sync {
    async fn publish(&self, command: &ActuatorCommand) -> Result<(), TransportError>;
}

//! Per-room state and the decision engine.
//!
//! Data flows one way: a raw event is decoded into a [`SensorReading`], folded
//! into the [`RoomStore`], and the room's new state is mapped by [`decide`] to
//! an [`ActuatorCommand`] handed to an [`ActuatorPublisher`].

pub mod actuator;
pub mod controller;
pub mod decision;
pub mod decoder;
pub mod reading;
pub mod room;
pub mod status;
pub mod topics;

pub use actuator::{ActuatorCommand, ActuatorPublisher, ValveLevel};
pub use controller::Controller;
pub use decision::decide;
pub use decoder::decode;
pub use reading::{Measurement, Metric, RoomId, SensorReading};
pub use room::{RoomState, RoomStore};
pub use status::{Connectivity, ConnectivityProbe, StatusReport};
pub use topics::Topics;

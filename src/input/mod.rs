//! Input sources feeding the controller.
//!
//! Current input sources:
//! - `mqtt`: sensor readings from an MQTT broker, valve commands back to it

pub mod mqtt;

//! Reactive climate controller library.
//!
//! Folds temperature and motion readings arriving over MQTT into per-room
//! state and drives each room's heating valve from that state.

pub mod climate;
pub mod config;
pub mod error;
pub mod http;
pub mod input;

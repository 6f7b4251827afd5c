//! In-memory room state.
//!
//! [`RoomStore`] has no locking of its own; [`Controller`](super::Controller)
//! owns it behind a mutex so an update and the decision taken from it happen
//! as one step.

use super::reading::{Measurement, RoomId};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Latest known readings of one room.
///
/// Each field stays `None` until the first reading of that kind arrives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RoomState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motion: Option<bool>,
}

impl RoomState {
    fn apply(&mut self, measurement: Measurement) {
        match measurement {
            Measurement::Temperature(celsius) => self.temperature = Some(celsius),
            Measurement::Motion(detected) => self.motion = Some(detected),
        }
    }
}

/// Rooms are created on their first reading and never evicted.
#[derive(Debug, Default)]
pub struct RoomStore {
    rooms: HashMap<RoomId, RoomState>,
}

impl RoomStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set exactly one field of the room, creating the room if needed.
    ///
    /// Returns a copy of the room's state after the update.
    pub fn upsert(&mut self, room: &RoomId, measurement: Measurement) -> RoomState {
        let state = self.rooms.entry(room.clone()).or_default();
        state.apply(measurement);
        *state
    }

    pub fn get(&self, room: &RoomId) -> Option<RoomState> {
        self.rooms.get(room).copied()
    }

    /// Copy of every room, ordered by room id.
    pub fn snapshot(&self) -> BTreeMap<RoomId, RoomState> {
        self.rooms
            .iter()
            .map(|(room, state)| (room.clone(), *state))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

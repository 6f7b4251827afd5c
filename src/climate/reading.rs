//! Typed sensor readings.

use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{AsRefStr, Display, EnumString};

/// The two kinds of readings a room reports.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Temperature,
    Motion,
}

/// Identifier of one room, taken from the `<prefix>-<room>` sensor id.
///
/// Only ASCII alphanumerics and `_` are accepted so the id can be embedded
/// in an MQTT topic level as is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(id: &str) -> Option<Self> {
        let valid = !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        valid.then(|| Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single observed value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measurement {
    /// Degrees Celsius
    Temperature(f64),
    /// Whether motion was detected
    Motion(bool),
}

impl Measurement {
    pub fn metric(&self) -> Metric {
        match self {
            Measurement::Temperature(_) => Metric::Temperature,
            Measurement::Motion(_) => Metric::Motion,
        }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measurement::Temperature(celsius) => write!(f, "{celsius}°C"),
            Measurement::Motion(detected) => write!(f, "{detected}"),
        }
    }
}

/// A decoded reading for one room.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    pub room: RoomId,
    pub measurement: Measurement,
}

impl SensorReading {
    pub fn temperature(room: RoomId, celsius: f64) -> Self {
        Self {
            room,
            measurement: Measurement::Temperature(celsius),
        }
    }

    pub fn motion(room: RoomId, detected: bool) -> Self {
        Self {
            room,
            measurement: Measurement::Motion(detected),
        }
    }

    pub fn metric(&self) -> Metric {
        self.measurement.metric()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_room_id_validation() {
        assert_eq!(RoomId::new("1").unwrap().as_str(), "1");
        assert_eq!(RoomId::new("living_room2").unwrap().as_str(), "living_room2");
        assert!(RoomId::new("").is_none());
        assert!(RoomId::new("a/b").is_none());
        assert!(RoomId::new("room#").is_none());
        assert!(RoomId::new("1 ").is_none());
    }

    #[test]
    fn test_metric_names() {
        assert_eq!(Metric::Temperature.to_string(), "temperature");
        assert_eq!(Metric::from_str("motion").unwrap(), Metric::Motion);
        assert!(Metric::from_str("humidity").is_err());
    }
}

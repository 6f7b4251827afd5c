//! Decoding of raw sensor events.
//!
//! Payloads look like:
//! ```json
//! {"sensorID": "sensor-1", "type": "temperature", "value": 21.5}
//! ```
//! The `type` field is optional, but when present it must name the same
//! metric as the topic the event arrived on.

use super::reading::{Measurement, Metric, RoomId, SensorReading};
use super::topics::Topics;
use crate::error::DecodeError;
use serde_json::{Map, Value};
use std::str::FromStr;

/// Decode one event into a typed reading. Has no side effects.
pub fn decode(topics: &Topics, topic: &str, payload: &[u8]) -> Result<SensorReading, DecodeError> {
    let metric = topics
        .metric_for(topic)
        .ok_or_else(|| DecodeError::UnknownTopic(topic.to_string()))?;

    let message: Value =
        serde_json::from_slice(payload).map_err(|e| DecodeError::InvalidJson(e.to_string()))?;
    let fields = match message {
        Value::Object(fields) => fields,
        other => {
            return Err(DecodeError::InvalidJson(format!(
                "expected an object, got {}",
                json_type(&other)
            )));
        }
    };

    let room = room_field(&fields)?;
    check_type_field(&fields, metric)?;

    let value = fields.get("value").ok_or(DecodeError::MissingField("value"))?;
    let measurement = match metric {
        Metric::Temperature => value.as_f64().map(Measurement::Temperature),
        Metric::Motion => value.as_bool().map(Measurement::Motion),
    }
    .ok_or(DecodeError::ValueTypeMismatch {
        metric,
        found: json_type(value),
    })?;

    Ok(SensorReading { room, measurement })
}

fn room_field(fields: &Map<String, Value>) -> Result<RoomId, DecodeError> {
    let sensor_id = fields
        .get("sensorID")
        .ok_or(DecodeError::MissingField("sensorID"))?;
    let sensor_id = sensor_id
        .as_str()
        .ok_or_else(|| DecodeError::InvalidSensorId(sensor_id.to_string()))?;
    room_from_sensor_id(sensor_id)
}

/// Extract the room from a `<prefix>-<room>` sensor id.
///
/// Exactly one `-` is allowed and both halves must be non-empty.
pub fn room_from_sensor_id(sensor_id: &str) -> Result<RoomId, DecodeError> {
    let invalid = || DecodeError::InvalidSensorId(sensor_id.to_string());

    let (prefix, room) = sensor_id.split_once('-').ok_or_else(invalid)?;
    if prefix.is_empty() || room.contains('-') {
        return Err(invalid());
    }
    RoomId::new(room).ok_or_else(invalid)
}

fn check_type_field(fields: &Map<String, Value>, metric: Metric) -> Result<(), DecodeError> {
    let Some(kind) = fields.get("type") else {
        return Ok(());
    };

    let matches = kind
        .as_str()
        .and_then(|k| Metric::from_str(k).ok())
        .is_some_and(|k| k == metric);
    if matches {
        Ok(())
    } else {
        Err(DecodeError::MetricMismatch {
            topic_metric: metric,
            payload_type: kind.as_str().map_or_else(|| kind.to_string(), str::to_string),
        })
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

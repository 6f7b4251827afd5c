use crate::climate::{ActuatorCommand, Metric};
use thiserror::Error as ThisError;

/// Why an inbound sensor event was rejected.
///
/// A rejected event is dropped without touching any room state.
#[derive(ThisError, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("Topic is not a reading topic: {0}")]
    UnknownTopic(String),

    #[error("Payload is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Payload is missing field `{0}`")]
    MissingField(&'static str),

    #[error("Sensor id is not of the form <prefix>-<room>: {0:?}")]
    InvalidSensorId(String),

    #[error("Value for {metric} reading has wrong type: {found}")]
    ValueTypeMismatch { metric: Metric, found: &'static str },

    #[error("Payload type {payload_type:?} does not match {topic_metric} topic")]
    MetricMismatch {
        topic_metric: Metric,
        payload_type: String,
    },
}

/// Failures of the message bus link.
#[derive(ThisError, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("MQTT event loop has not been started")]
    NotStarted,

    #[error("MQTT event loop has terminated")]
    EventLoopClosed,

    #[error("MQTT client error: {0}")]
    Client(String),
}

impl From<rumqttc::ClientError> for TransportError {
    fn from(e: rumqttc::ClientError) -> Self {
        TransportError::Client(e.to_string())
    }
}

/// Failure of one inbound event. Never fatal: the next event is handled normally.
#[derive(ThisError, Debug, Clone, PartialEq)]
pub enum HandleError {
    /// Event dropped before touching any state.
    #[error("Dropped event: {0}")]
    Decode(#[from] DecodeError),

    /// State was updated but the resulting command could not be sent.
    #[error("Failed to publish valve command for room {}: {source}", .command.room)]
    Publish {
        command: ActuatorCommand,
        source: TransportError,
    },
}

#[derive(ThisError, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Desired temperature must be a finite number, got {0}")]
    NonFiniteTemperature(f64),
}

#[derive(ThisError, Debug)]
pub enum ControllerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("HTTP server error: {0}")]
    Http(String),

    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ControllerError>;

//! Read-only status projection.

use super::reading::RoomId;
use super::room::RoomState;
use crate::error::TransportError;
use serde::Serialize;
use std::collections::BTreeMap;

/// Reports whether the bus link is up.
pub trait ConnectivityProbe: Send + Sync {
    fn is_connected(&self) -> Result<bool, TransportError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Connectivity {
    Ok,
    NotConnected,
    UnknownError,
}

impl Connectivity {
    /// Probe errors are reported as [`Connectivity::UnknownError`], never raised.
    pub fn from_probe(probe: &dyn ConnectivityProbe) -> Self {
        match probe.is_connected() {
            Ok(true) => Connectivity::Ok,
            Ok(false) => Connectivity::NotConnected,
            Err(e) => {
                log::debug!("Connectivity probe failed: {}", e);
                Connectivity::UnknownError
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub connectivity: Connectivity,
    pub desired_temperature: f64,
    pub state: BTreeMap<RoomId, RoomState>,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedProbe(Result<bool, TransportError>);

    impl ConnectivityProbe for FixedProbe {
        fn is_connected(&self) -> Result<bool, TransportError> {
            self.0.clone()
        }
    }

    #[test]
    fn test_connectivity_from_probe() {
        assert_eq!(Connectivity::from_probe(&FixedProbe(Ok(true))), Connectivity::Ok);
        assert_eq!(
            Connectivity::from_probe(&FixedProbe(Ok(false))),
            Connectivity::NotConnected
        );
        assert_eq!(
            Connectivity::from_probe(&FixedProbe(Err(TransportError::NotStarted))),
            Connectivity::UnknownError
        );
    }

    #[test]
    fn test_report_json_shape() {
        let mut state = BTreeMap::new();
        state.insert(
            RoomId::new("1").unwrap(),
            RoomState {
                temperature: Some(10.0),
                motion: Some(true),
            },
        );
        let report = StatusReport {
            connectivity: Connectivity::NotConnected,
            desired_temperature: 22.0,
            state,
        };

        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            serde_json::json!({
                "connectivity": "not-connected",
                "desiredTemperature": 22.0,
                "state": { "1": { "temperature": 10.0, "motion": true } }
            })
        );
    }
}

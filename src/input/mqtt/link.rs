//! Shared view of the broker connection.

use crate::climate::ConnectivityProbe;
use crate::error::TransportError;
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkState {
    /// Event loop not started yet
    Idle,
    Connected,
    /// Last poll failed; rumqttc reconnects on the next poll
    Disconnected(String),
    /// Event loop terminated
    Closed,
}

/// Connection state written by the MQTT event loop and read by the status
/// endpoint. Cheap to clone; all clones share one state.
#[derive(Debug, Clone)]
pub struct LinkMonitor {
    state: Arc<RwLock<LinkState>>,
}

impl LinkMonitor {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(LinkState::Idle)),
        }
    }

    pub fn state(&self) -> LinkState {
        self.state.read().clone()
    }

    pub fn set(&self, state: LinkState) {
        *self.state.write() = state;
    }
}

impl Default for LinkMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectivityProbe for LinkMonitor {
    fn is_connected(&self) -> Result<bool, TransportError> {
        match &*self.state.read() {
            LinkState::Idle => Err(TransportError::NotStarted),
            LinkState::Connected => Ok(true),
            LinkState::Disconnected(_) => Ok(false),
            LinkState::Closed => Err(TransportError::EventLoopClosed),
        }
    }
}

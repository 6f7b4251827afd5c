//! Valve decision rule.

use super::actuator::ValveLevel;
use super::room::RoomState;

/// Map one room's state to a valve level.
///
/// - Motion `false` closes the valve whatever the temperature.
/// - Missing motion counts as motion, so a silent motion sensor never
///   withholds heat.
/// - With motion, the valve opens strictly below `desired_temperature`.
///
/// Returns `None` while an occupied room has not reported a temperature yet:
/// no command is sent until there is something to compare.
pub fn decide(state: &RoomState, desired_temperature: f64) -> Option<ValveLevel> {
    if state.motion == Some(false) {
        return Some(ValveLevel::Closed);
    }

    let temperature = state.temperature?;
    if temperature < desired_temperature {
        Some(ValveLevel::Open)
    } else {
        Some(ValveLevel::Closed)
    }
}

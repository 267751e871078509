//! Reference signal shaping for the feedforward controller

use serde::{Deserialize, Serialize};

use crate::utils::constants::REFERENCE_RAMP_RATE;

/// Shape of the reference signal presented to the feedforward controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InputType {
    /// Reference jumps to the setpoint
    #[default]
    Step,
    /// Reference slews towards the setpoint at [`REFERENCE_RAMP_RATE`]
    Ramp,
}

/// Next value of the reference after `dt` seconds
pub fn shape_reference(input_type: InputType, current: f64, setpoint: f64, dt: f64) -> f64 {
    match input_type {
        InputType::Step => setpoint,
        InputType::Ramp => {
            let max_change = REFERENCE_RAMP_RATE * dt.max(0.0);
            current + (setpoint - current).clamp(-max_change, max_change)
        }
    }
}

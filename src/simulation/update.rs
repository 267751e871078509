//! Partial parameter edits merged into a state between ticks

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::state::SimulationState;
use super::step::reset_controller_memory;
use crate::control::{ControlStrategy, FeedforwardModel, FeedforwardStrategy, InputType};
use crate::error::{Error, Result};
use crate::plant::TankParams;
use crate::utils::constants::{MAX_PUMP_FLOW_LPM, OUTPUT_MAX, OUTPUT_MIN};

/// Geometry edits for one tank
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TankUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outlet_area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl TankUpdate {
    fn apply(&self, tank: &TankParams, prefix: &'static [&'static str; 4]) -> Result<TankParams> {
        let area = positive(prefix[0], self.area.unwrap_or(tank.area))?;
        let max_height = positive(prefix[1], self.max_height.unwrap_or(tank.max_height))?;
        let outlet_area = positive(prefix[2], self.outlet_area.unwrap_or(tank.outlet_area))?;
        let height = finite(prefix[3], self.height.unwrap_or(tank.height))?;

        Ok(TankParams::new(area, max_height, outlet_area).with_height(height))
    }
}

/// Set of optional edits; `None` fields keep their current value
///
/// Supplying any controller field (gains, setpoint, strategy or feedforward
/// configuration) clears the controller memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParameterUpdate {
    pub tank1: TankUpdate,
    pub tank2: TankUpdate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controller_output: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pump_flow: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kc: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ti: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub td: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setpoint: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_strategy: Option<ControlStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_noise: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noise_intensity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_type: Option<InputType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedforward_model: Option<FeedforwardModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedforward_strategy: Option<FeedforwardStrategy>,
}

const TANK1_FIELDS: [&str; 4] = ["tank1.area", "tank1.max_height", "tank1.outlet_area", "tank1.height"];
const TANK2_FIELDS: [&str; 4] = ["tank2.area", "tank2.max_height", "tank2.outlet_area", "tank2.height"];

impl ParameterUpdate {
    /// True when the edit touches the controller block
    pub fn touches_controller(&self) -> bool {
        self.kc.is_some()
            || self.ti.is_some()
            || self.td.is_some()
            || self.setpoint.is_some()
            || self.control_strategy.is_some()
            || self.input_type.is_some()
            || self.feedforward_model.is_some()
            || self.feedforward_strategy.is_some()
    }

    /// Merge the edit into `state`
    ///
    /// The whole edit is rejected if any value is invalid; `state` is never
    /// partially updated. Controller output and pump flow are clamped to
    /// their physical ranges rather than rejected.
    pub fn apply(&self, state: &SimulationState) -> Result<SimulationState> {
        self.merge(state).map_err(|err| {
            warn!("rejected parameter update: {}", err);
            err
        })
    }

    fn merge(&self, state: &SimulationState) -> Result<SimulationState> {
        let tank1 = self.tank1.apply(&state.tank1, &TANK1_FIELDS)?;
        let tank2 = self.tank2.apply(&state.tank2, &TANK2_FIELDS)?;

        let controller_output = finite("controller_output", self.controller_output.unwrap_or(state.controller_output))?
            .clamp(OUTPUT_MIN, OUTPUT_MAX);
        let pump_flow = finite("pump_flow", self.pump_flow.unwrap_or(state.pump_flow))?.clamp(0.0, MAX_PUMP_FLOW_LPM);

        let noise_intensity = finite("noise_intensity", self.noise_intensity.unwrap_or(state.noise_intensity))?;
        if noise_intensity < 0.0 {
            return Err(Error::InvalidParameter {
                name: "noise_intensity",
                value: noise_intensity,
                reason: "must not be negative",
            });
        }

        let mut controller = state.controller.clone();
        controller.kc = finite("kc", self.kc.unwrap_or(controller.kc))?;
        controller.ti = finite("ti", self.ti.unwrap_or(controller.ti))?;
        controller.td = finite("td", self.td.unwrap_or(controller.td))?;
        let setpoint = finite("setpoint", self.setpoint.unwrap_or(controller.setpoint))?;
        if setpoint < 0.0 || setpoint > tank2.max_height {
            return Err(Error::InvalidParameter {
                name: "setpoint",
                value: setpoint,
                reason: "must lie within the height of tank 2",
            });
        }
        controller.setpoint = setpoint;

        let control_strategy = self.control_strategy.unwrap_or(state.control_strategy);
        if control_strategy != state.control_strategy {
            debug!("control strategy {:?} -> {:?}", state.control_strategy, control_strategy);
        }

        let merged = SimulationState {
            tank1,
            tank2,
            controller_output,
            pump_flow,
            controller,
            control_strategy,
            enable_noise: self.enable_noise.unwrap_or(state.enable_noise),
            noise_intensity,
            input_type: self.input_type.unwrap_or(state.input_type),
            feedforward_model: self.feedforward_model.unwrap_or(state.feedforward_model),
            feedforward_strategy: self.feedforward_strategy.unwrap_or(state.feedforward_strategy),
            pid_components: if control_strategy.is_feedback() {
                state.pid_components
            } else {
                None
            },
            ..state.clone()
        };

        if self.touches_controller() {
            Ok(reset_controller_memory(&merged))
        } else {
            Ok(merged)
        }
    }
}

fn finite(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::InvalidParameter {
            name,
            value,
            reason: "must be a finite number",
        })
    }
}

fn positive(name: &'static str, value: f64) -> Result<f64> {
    let value = finite(name, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(Error::InvalidParameter {
            name,
            value,
            reason: "must be positive",
        })
    }
}

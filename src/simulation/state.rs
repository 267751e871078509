//! Simulation state of one two-tank instance
//!
//! `SimulationState` is the single source of truth for a running
//! simulation. It is a plain value: every operation in this crate takes a
//! state and returns a new one, so there are no hidden shared references
//! between ticks and parameter edits.

use serde::{Deserialize, Serialize};

use crate::control::{
    ControlStrategy, ControllerParams, FeedforwardModel, FeedforwardOptions, FeedforwardStrategy, InputType,
    PidComponents,
};
use crate::plant::TankParams;

/// Aggregate state of the simulated process and its controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationState {
    /// Upper tank, fed by the inlet valve
    pub tank1: TankParams,
    /// Lower tank, fed by tank 1 and drained by the disturbance pump
    pub tank2: TankParams,
    /// Inlet valve command (0-100%)
    pub controller_output: f64,
    /// Disturbance pump flow (L/min)
    pub pump_flow: f64,
    /// Simulated time (s)
    pub time: f64,
    pub controller: ControllerParams,
    /// Gates whether `step` advances the physics
    pub is_running: bool,
    pub control_strategy: ControlStrategy,
    pub enable_noise: bool,
    /// Noise multiplier (0 disables the perturbation)
    pub noise_intensity: f64,
    pub input_type: InputType,
    pub feedforward_model: FeedforwardModel,
    pub feedforward_strategy: FeedforwardStrategy,
    /// Term breakdown of the last controller evaluation, output only
    #[serde(skip_deserializing)]
    pub pid_components: Option<PidComponents>,
}

impl SimulationState {
    /// Default state: both tanks empty, 50% valve, no disturbance, stopped
    pub fn initial() -> Self {
        Self {
            tank1: TankParams::default(),
            tank2: TankParams::default(),
            controller_output: 50.0,
            pump_flow: 0.0,
            time: 0.0,
            controller: ControllerParams::default(),
            is_running: false,
            control_strategy: ControlStrategy::default(),
            enable_noise: false,
            noise_intensity: 1.0,
            input_type: InputType::default(),
            feedforward_model: FeedforwardModel::default(),
            feedforward_strategy: FeedforwardStrategy::default(),
            pid_components: None,
        }
    }

    /// Level of the controlled tank (m)
    pub fn process_variable(&self) -> f64 {
        self.tank2.height
    }

    /// Tracking error against the setpoint (m)
    pub fn error(&self) -> f64 {
        self.controller.setpoint - self.process_variable()
    }

    /// Feedforward configuration carried by this state
    pub fn feedforward_options(&self) -> FeedforwardOptions {
        FeedforwardOptions {
            input_type: self.input_type,
            model: self.feedforward_model,
            strategy: self.feedforward_strategy,
        }
    }

    /// Same state with the simulation started
    pub fn started(&self) -> Self {
        Self {
            is_running: true,
            ..self.clone()
        }
    }

    /// Same state with the simulation stopped
    pub fn stopped(&self) -> Self {
        Self {
            is_running: false,
            ..self.clone()
        }
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::initial()
    }
}

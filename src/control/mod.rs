//! Controller family for the two-tank process
//!
//! The controlled variable is always the level of tank 2, in metres. The
//! manipulated variable is the inlet valve command in percent.
//!
//! | Strategy          | Law                                                |
//! |-------------------|----------------------------------------------------|
//! | `MANUAL`          | output held at its current value                   |
//! | `PI`              | `Kc e + Kc/Ti ∫e`                                  |
//! | `PID`             | PI + `Kc Td de/dt`                                 |
//! | `PID_FEEDFORWARD` | PID on the shaped reference + reference and        |
//! |                   | disturbance feedforward (see [`feedforward`])      |
//!
//! Output is always clamped to `[0, 100]`.

pub mod feedforward;
pub mod pid;
pub mod reference;
pub mod transfer_function;

use serde::{Deserialize, Serialize};

pub use feedforward::{FeedforwardModel, FeedforwardStrategy};
pub use pid::{PidComponents, PidLaw, PidMemory};
pub use reference::InputType;
pub use transfer_function::TransferFunction;

use crate::plant::{SystemConstants, TankParams};
use crate::utils::constants::{MAX_PUMP_FLOW_LPM, OUTPUT_MAX, OUTPUT_MIN};

/// Control strategy selected by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlStrategy {
    Manual,
    #[default]
    Pid,
    Pi,
    PidFeedforward,
}

impl ControlStrategy {
    /// True for every strategy that closes the loop
    pub fn is_feedback(&self) -> bool {
        !matches!(self, ControlStrategy::Manual)
    }
}

/// Controller gains, setpoint and memory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerParams {
    /// Proportional gain (% per m)
    pub kc: f64,
    /// Integral time (s), `<= 0` disables integral action
    pub ti: f64,
    /// Derivative time (s)
    pub td: f64,
    /// Target level of tank 2 (m)
    pub setpoint: f64,
    /// Accumulated error (m·s)
    #[serde(default)]
    pub error_sum: f64,
    /// Error of the previous tick (m)
    #[serde(default)]
    pub last_error: f64,
    /// Current value of the shaped reference (m)
    #[serde(default)]
    pub reference: f64,
    /// State of the transfer-function feedforward filter
    #[serde(default)]
    pub feedforward_state: Vec<f64>,
}

impl ControllerParams {
    /// Gains and setpoint with cleared memory
    pub fn new(kc: f64, ti: f64, td: f64, setpoint: f64) -> Self {
        Self {
            kc,
            ti,
            td,
            setpoint,
            error_sum: 0.0,
            last_error: 0.0,
            reference: 0.0,
            feedforward_state: Vec::new(),
        }
    }

    /// Same gains with memory cleared; the reference restarts at `measured`
    pub fn with_memory_reset(&self, measured: f64) -> Self {
        Self {
            error_sum: 0.0,
            last_error: 0.0,
            reference: measured,
            feedforward_state: Vec::new(),
            ..self.clone()
        }
    }

    fn memory(&self) -> PidMemory {
        PidMemory {
            error_sum: self.error_sum,
            last_error: self.last_error,
        }
    }
}

impl Default for ControllerParams {
    fn default() -> Self {
        Self::new(300.0, 60.0, 1.0, 0.25)
    }
}

/// Feedforward configuration, used only by `PID_FEEDFORWARD`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeedforwardOptions {
    pub input_type: InputType,
    pub model: FeedforwardModel,
    pub strategy: FeedforwardStrategy,
}

/// Plant signals available to the controller on one tick
#[derive(Debug, Clone, Copy)]
pub struct Measurement<'a> {
    pub tank1: &'a TankParams,
    pub tank2: &'a TankParams,
    /// Disturbance pump flow (L/min)
    pub pump_flow: f64,
}

/// Result of one controller evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct ControlOutcome {
    /// Clamped controller output (%)
    pub output: f64,
    /// Parameters with updated memory
    pub params: ControllerParams,
    /// Term breakdown, `None` in manual mode
    pub components: Option<PidComponents>,
}

/// Evaluate `strategy` for one tick of length `dt`
pub fn compute_control(
    strategy: ControlStrategy,
    options: FeedforwardOptions,
    params: &ControllerParams,
    measurement: Measurement<'_>,
    current_output: f64,
    dt: f64,
) -> ControlOutcome {
    let law = match strategy {
        ControlStrategy::Manual => {
            return ControlOutcome {
                output: current_output,
                params: params.clone(),
                components: None,
            };
        }
        ControlStrategy::Pi => PidLaw::pi(params.kc, params.ti),
        ControlStrategy::Pid | ControlStrategy::PidFeedforward => PidLaw::pid(params.kc, params.ti, params.td),
    };

    let feedforward = strategy == ControlStrategy::PidFeedforward;

    let reference = if feedforward {
        reference::shape_reference(options.input_type, params.reference, params.setpoint, dt)
    } else {
        params.setpoint
    };

    let error = reference - measurement.tank2.height;
    let (mut components, memory) = law.evaluate(params.memory(), error, dt);

    let mut filter_state = params.feedforward_state.clone();
    if feedforward {
        let constants = SystemConstants::at_setpoint(measurement.tank1, measurement.tank2, params.setpoint);
        let disturbance = measurement.pump_flow.clamp(0.0, MAX_PUMP_FLOW_LPM);

        let (disturbance_term, next_state) = feedforward::disturbance_feedforward(
            options.strategy,
            options.model,
            &constants,
            disturbance,
            &params.feedforward_state,
            dt,
        );
        let reference_term = feedforward::reference_feedforward(measurement.tank2, reference);

        components.feedforward = Some(reference_term + disturbance_term);
        filter_state = next_state;
    }

    let output = components.total();
    let output = if output.is_finite() {
        output.clamp(OUTPUT_MIN, OUTPUT_MAX)
    } else {
        current_output
    };

    ControlOutcome {
        output,
        params: ControllerParams {
            error_sum: memory.error_sum,
            last_error: memory.last_error,
            reference,
            feedforward_state: filter_state,
            ..params.clone()
        },
        components: Some(components),
    }
}

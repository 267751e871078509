//! One fixed-increment tick of the two-tank process

use log::{debug, trace};

use super::state::SimulationState;
use crate::control::{compute_control, Measurement};
use crate::noise::{add_noise_to_inflow, UniformSource};
use crate::utils::constants::{output_to_inflow, pump_flow_to_m3s};

/// Advance the whole system by `dt` seconds
///
/// The physics is integrated first from the current valve command, then the
/// controller sees the new tank 2 level and produces the command for the
/// next tick. Tank 2 receives only the liquid tank 1 can actually release.
/// Returns `state` unchanged when it is not running or `dt` is not
/// positive.
pub fn step<S: UniformSource + ?Sized>(state: &SimulationState, dt: f64, source: &mut S) -> SimulationState {
    if !state.is_running || dt.is_nan() || dt <= 0.0 {
        return state.clone();
    }

    let mut inflow = output_to_inflow(state.controller_output);
    if state.enable_noise {
        inflow = add_noise_to_inflow(inflow, state.noise_intensity, source);
    }

    let q1 = state.tank1.drainable_outflow(inflow, dt);
    let q2 = state.tank2.outflow();
    let disturbance = pump_flow_to_m3s(state.pump_flow);

    let advanced = SimulationState {
        tank1: state.tank1.integrate(inflow, q1, dt),
        tank2: state.tank2.integrate(q1, q2 + disturbance, dt),
        ..state.clone()
    };

    let mut next = control_output(&advanced, dt);
    next.time = state.time + dt;

    trace!(
        "t={:.2} h1={:.4} h2={:.4} u={:.2} qi={:.3e}",
        next.time,
        next.tank1.height,
        next.tank2.height,
        next.controller_output,
        inflow
    );

    next
}

/// Evaluate the selected controller on the current levels
///
/// Updates `controller_output`, controller memory and `pid_components`;
/// tank levels and time are untouched.
pub fn control_output(state: &SimulationState, dt: f64) -> SimulationState {
    let outcome = compute_control(
        state.control_strategy,
        state.feedforward_options(),
        &state.controller,
        Measurement {
            tank1: &state.tank1,
            tank2: &state.tank2,
            pump_flow: state.pump_flow,
        },
        state.controller_output,
        dt,
    );

    SimulationState {
        controller_output: outcome.output,
        controller: outcome.params,
        pid_components: outcome.components,
        ..state.clone()
    }
}

/// Clear the integral and derivative memory of the controller
///
/// The shaped reference restarts from the measured tank 2 level and the
/// feedforward filter restarts at equilibrium on the next evaluation.
pub fn reset_controller_memory(state: &SimulationState) -> SimulationState {
    debug!("controller memory reset at t={:.2}", state.time);
    SimulationState {
        controller: state.controller.with_memory_reset(state.tank2.height),
        ..state.clone()
    }
}

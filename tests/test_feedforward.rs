//! Disturbance rejection with and without feedforward

use approx::assert_abs_diff_eq;
use tanksim::prelude::*;

struct NoDraws;

impl UniformSource for NoDraws {
    fn next_uniform(&mut self) -> f64 {
        panic!("noise source consulted")
    }
}

const SETPOINT: f64 = 0.25;

/// Both tanks at equilibrium for tank 2 at the setpoint with no pump flow
fn equilibrium(strategy: ControlStrategy) -> SimulationState {
    let mut state = SimulationState::initial().started();
    let q = outflow_at(state.tank2.outlet_area, SETPOINT);
    let u = inflow_to_output(q);

    state.control_strategy = strategy;
    state.tank1 = state.tank1.with_height(state.tank1.equilibrium_height(q));
    state.tank2 = state.tank2.with_height(SETPOINT);
    state.controller_output = u;
    state.controller.setpoint = SETPOINT;
    if strategy != ControlStrategy::PidFeedforward {
        // Integral memory that already supplies the steady-state output
        state.controller.error_sum = u * state.controller.ti / state.controller.kc;
    }
    state
}

/// Settle for a few ticks, apply a 5 L/min pump step and run 300 s.
/// Returns the peak absolute error and the final error.
fn pump_step(state: SimulationState) -> (f64, f64) {
    let mut state = state;
    for _ in 0..10 {
        state = step(&state, SIM_TIMESTEP, &mut NoDraws);
    }
    assert_abs_diff_eq!(state.tank2.height, SETPOINT, epsilon = 1e-9);

    state = ParameterUpdate {
        pump_flow: Some(5.0),
        ..Default::default()
    }
    .apply(&state)
    .unwrap();

    let mut peak: f64 = 0.0;
    for _ in 0..3000 {
        state = step(&state, SIM_TIMESTEP, &mut NoDraws);
        peak = peak.max(state.error().abs());
    }
    (peak, state.error())
}

#[test]
fn test_static_feedforward_holds_equilibrium_with_constant_pump() {
    let mut state = equilibrium(ControlStrategy::PidFeedforward);
    state.pump_flow = 5.0;
    let q = outflow_at(state.tank2.outlet_area, SETPOINT) + pump_flow_to_m3s(5.0);
    state.tank1 = state.tank1.with_height(state.tank1.equilibrium_height(q));
    state.controller_output = inflow_to_output(q);

    for _ in 0..1000 {
        state = step(&state, SIM_TIMESTEP, &mut NoDraws);
    }
    assert_abs_diff_eq!(state.tank2.height, SETPOINT, epsilon = 1e-6);
    assert_abs_diff_eq!(state.controller_output, inflow_to_output(q), epsilon = 1e-3);

    let terms = state.pid_components.unwrap();
    let expected = inflow_to_output(outflow_at(state.tank2.outlet_area, SETPOINT)) + 500.0 / MAX_INFLOW_LPM;
    assert_abs_diff_eq!(terms.feedforward.unwrap(), expected, epsilon = 1e-6);
}

#[test]
fn test_feedforward_reduces_peak_error() {
    let (pid_peak, pid_final) = pump_step(equilibrium(ControlStrategy::Pid));

    let (static_peak, static_final) = pump_step(equilibrium(ControlStrategy::PidFeedforward));

    let mut lagged = equilibrium(ControlStrategy::PidFeedforward);
    lagged.feedforward_strategy = FeedforwardStrategy::TransferFunction;
    lagged.feedforward_model = FeedforwardModel::Disturbance;
    let (lag_peak, lag_final) = pump_step(lagged);

    assert!(static_peak < pid_peak, "static {} vs pid {}", static_peak, pid_peak);
    assert!(lag_peak < pid_peak, "transfer function {} vs pid {}", lag_peak, pid_peak);
    assert!(static_peak < lag_peak);

    for e in [pid_final, static_final, lag_final] {
        assert!(e.abs() < 5e-3, "final error {}", e);
    }
}

#[test]
fn test_process_model_lead_beats_static_gain() {
    let mut state = equilibrium(ControlStrategy::PidFeedforward);
    state.feedforward_strategy = FeedforwardStrategy::TransferFunction;
    state.feedforward_model = FeedforwardModel::Process;
    let (peak, last) = pump_step(state);
    let (static_peak, _) = pump_step(equilibrium(ControlStrategy::PidFeedforward));

    assert!(peak.is_finite());
    assert!(peak < static_peak, "process {} vs static {}", peak, static_peak);
    assert!(last.abs() < 5e-3, "final error {}", last);
}

#[test]
fn test_ramp_reference_rate_limited() {
    let mut state = SimulationState::initial().started();
    state.control_strategy = ControlStrategy::PidFeedforward;
    state.input_type = InputType::Ramp;
    state = reset_controller_memory(&state);

    let mut previous = state.controller.reference;
    for _ in 0..200 {
        state = step(&state, SIM_TIMESTEP, &mut NoDraws);
        let change = state.controller.reference - previous;
        assert!(change <= REFERENCE_RAMP_RATE * SIM_TIMESTEP + 1e-12);
        previous = state.controller.reference;
    }
    assert!(state.controller.reference < SETPOINT);
    assert!(state.controller.reference > 0.0);
}

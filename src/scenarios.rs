//! Preset tuning scenarios
//!
//! Each preset is a [`ParameterUpdate`] merged into the current state, so
//! applying one resets the controller memory but keeps the tank levels.

use log::debug;

use crate::control::ControlStrategy;
use crate::error::{Error, Result};
use crate::simulation::{ParameterUpdate, SimulationState};

/// Named parameter preset
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub name: &'static str,
    pub description: &'static str,
    pub update: ParameterUpdate,
}

impl Scenario {
    /// Merge the preset into `state`
    pub fn apply(&self, state: &SimulationState) -> Result<SimulationState> {
        debug!("applying scenario '{}'", self.name);
        self.update.apply(state)
    }
}

fn preset(kc: f64, ti: f64, td: f64, setpoint: f64, pump_flow: f64) -> ParameterUpdate {
    ParameterUpdate {
        kc: Some(kc),
        ti: Some(ti),
        td: Some(td),
        setpoint: Some(setpoint),
        pump_flow: Some(pump_flow),
        control_strategy: Some(ControlStrategy::Pid),
        ..Default::default()
    }
}

/// All built-in scenarios
pub fn scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "Oscillating Response",
            description: "Aggressive controller gains cause tank levels to oscillate. \
                          High proportional gain makes the system respond quickly but overshoot.",
            update: preset(1500.0, 15.0, 0.5, 0.25, 2.0),
        },
        Scenario {
            name: "Stable Control",
            description: "Well-tuned PID parameters provide smooth and stable response with minimal overshoot.",
            update: preset(300.0, 60.0, 1.0, 0.30, 0.0),
        },
        Scenario {
            name: "Disturbance Rejection",
            description: "Tests how well the controller handles sudden changes in pump flow (disturbance).",
            update: preset(500.0, 40.0, 1.0, 0.20, 5.0),
        },
        Scenario {
            name: "Slow Response",
            description: "Conservative gains result in slow but stable response without oscillations.",
            update: preset(100.0, 120.0, 0.0, 0.20, 2.0),
        },
    ]
}

/// Look up a scenario by name, ignoring ASCII case
pub fn find_scenario(name: &str) -> Result<Scenario> {
    scenarios()
        .into_iter()
        .find(|s| s.name.eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| Error::UnknownScenario(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_scenario() {
        let s = find_scenario("stable control").unwrap();
        assert_eq!(s.name, "Stable Control");
        assert!(matches!(find_scenario("Chaos"), Err(Error::UnknownScenario(_))));
    }

    #[test]
    fn test_every_scenario_applies() {
        let mut state = SimulationState::initial();
        state.controller.error_sum = 2.0;
        for scenario in scenarios() {
            let next = scenario.apply(&state).unwrap();
            assert_eq!(Some(next.controller.setpoint), scenario.update.setpoint);
            assert_eq!(Some(next.pump_flow), scenario.update.pump_flow);
            assert_eq!(next.controller.error_sum, 0.0);
            assert_eq!(next.tank1, state.tank1);
        }
    }
}

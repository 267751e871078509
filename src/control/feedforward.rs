//! Feedforward terms of the PID_FEEDFORWARD controller
//!
//! Two contributions are added to the PID output:
//!
//! - **Reference feedforward**: the controller output that holds tank 2 at
//!   the reference in steady state. This is the static inverse of the plant
//!   (the plant evaluated at `s = 0`), computed from the nonlinear outflow
//!   law so it is exact at every level.
//! - **Disturbance feedforward**: cancels the measured pump flow. The law is
//!   selected by [`FeedforwardStrategy`]; every variant has the same gain at
//!   `s = 0`, `Kff = -k3/(k1 k2)`, which reduces to `100 / MAX_INFLOW_LPM`.
//!
//! Transfer-function variants, with `Kff` and the constants from
//! [`SystemConstants`]:
//!
//! ```text
//! PROCESS:      Gff(s) = Kff (t1 s + 1)(t2 s + 1) / ((t3 s + 1)(α t1 s + 1))
//! DISTURBANCE:  Gff(s) = Kff / (t3 s + 1)
//! ```
//!
//! PROCESS is the ideal `-Gd/Gp` made proper by a lead filter with
//! `α = FEEDFORWARD_LEAD_RATIO`. DISTURBANCE keeps the static process inverse
//! and follows the disturbance dynamics.

use log::debug;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use super::transfer_function::TransferFunction;
use crate::error::Result;
use crate::plant::{outflow_at, SystemConstants, TankParams};
use crate::utils::constants::{inflow_to_output, FEEDFORWARD_LEAD_RATIO};

/// Disturbance feedforward law
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedforwardStrategy {
    /// `u = Kff * D`
    #[default]
    StaticGain,
    /// `u = Gff(s) D`, with `Gff` chosen by [`FeedforwardModel`]
    TransferFunction,
}

/// Closed-loop model the transfer-function feedforward is derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedforwardModel {
    /// Inverse of the process model, `-Gd(s)/Gp(s)`
    #[default]
    Process,
    /// Disturbance dynamics over the static process gain, `-Gd(s)/Gp(0)`
    Disturbance,
}

/// Feedforward filter for `model`
pub fn feedforward_filter(constants: &SystemConstants, model: FeedforwardModel) -> Result<TransferFunction> {
    let k = constants.feedforward_gain();
    let SystemConstants { t1, t2, t3, .. } = *constants;

    match model {
        FeedforwardModel::Process => {
            let lead = FEEDFORWARD_LEAD_RATIO * t1;
            TransferFunction::new(
                &[k * t1 * t2, k * (t1 + t2), k],
                &[t3 * lead, t3 + lead, 1.0],
            )
        }
        FeedforwardModel::Disturbance => TransferFunction::new(&[k], &[t3, 1.0]),
    }
}

/// Controller output (%) that holds tank 2 at `reference` in steady state
pub fn reference_feedforward(tank2: &TankParams, reference: f64) -> f64 {
    inflow_to_output(outflow_at(tank2.outlet_area, reference))
}

/// Disturbance feedforward for a pump flow of `disturbance` L/min
///
/// `filter_state` is the state of the transfer-function filter from the
/// previous tick. An empty or mismatched state (after a memory reset)
/// starts the filter at equilibrium for the current disturbance, so only
/// later changes of the pump flow excite the dynamics.
///
/// Returns the feedforward output and the next filter state.
pub fn disturbance_feedforward(
    strategy: FeedforwardStrategy,
    model: FeedforwardModel,
    constants: &SystemConstants,
    disturbance: f64,
    filter_state: &[f64],
    dt: f64,
) -> (f64, Vec<f64>) {
    let static_output = constants.feedforward_gain() * disturbance;

    match strategy {
        FeedforwardStrategy::StaticGain => (static_output, Vec::new()),
        FeedforwardStrategy::TransferFunction => match feedforward_filter(constants, model) {
            Ok(filter) => {
                let state = if filter_state.len() == filter.order() {
                    DVector::from_column_slice(filter_state)
                } else {
                    filter.steady_state(disturbance)
                };
                let next = filter.advance(&state, disturbance, dt);
                let output = filter.output(&next, disturbance);
                (output, next.iter().copied().collect())
            }
            Err(err) => {
                debug!("feedforward filter unavailable, using static gain: {}", err);
                (static_output, Vec::new())
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::constants::MAX_INFLOW_LPM;
    use approx::assert_relative_eq;

    fn constants() -> SystemConstants {
        let tank = TankParams::default();
        SystemConstants::at_setpoint(&tank, &tank, 0.25)
    }

    #[test]
    fn test_filters_share_static_gain() {
        let sc = constants();
        for model in [FeedforwardModel::Process, FeedforwardModel::Disturbance] {
            let tf = feedforward_filter(&sc, model).unwrap();
            assert_relative_eq!(tf.dc_gain(), sc.feedforward_gain(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_static_gain() {
        let (u, state) = disturbance_feedforward(
            FeedforwardStrategy::StaticGain,
            FeedforwardModel::Process,
            &constants(),
            5.0,
            &[],
            0.1,
        );
        assert_relative_eq!(u, 500.0 / MAX_INFLOW_LPM, epsilon = 1e-9);
        assert!(state.is_empty());
    }

    #[test]
    fn test_filter_starts_at_equilibrium() {
        let sc = constants();
        for model in [FeedforwardModel::Process, FeedforwardModel::Disturbance] {
            let (u, state) = disturbance_feedforward(
                FeedforwardStrategy::TransferFunction,
                model,
                &sc,
                4.0,
                &[],
                0.1,
            );
            assert_relative_eq!(u, sc.feedforward_gain() * 4.0, epsilon = 1e-9);
            assert_eq!(state.len(), feedforward_filter(&sc, model).unwrap().order());
        }
    }

    #[test]
    fn test_process_model_leads_disturbance_model_lags() {
        let sc = constants();
        let dt = 0.1;
        let target = sc.feedforward_gain() * 5.0;

        // Both filters at rest with no disturbance, then a 5 L/min step
        let (_, process_state) = disturbance_feedforward(
            FeedforwardStrategy::TransferFunction,
            FeedforwardModel::Process,
            &sc,
            0.0,
            &[],
            dt,
        );
        let (_, disturbance_state) = disturbance_feedforward(
            FeedforwardStrategy::TransferFunction,
            FeedforwardModel::Disturbance,
            &sc,
            0.0,
            &[],
            dt,
        );

        let (lead, _) = disturbance_feedforward(
            FeedforwardStrategy::TransferFunction,
            FeedforwardModel::Process,
            &sc,
            5.0,
            &process_state,
            dt,
        );
        let (lag, _) = disturbance_feedforward(
            FeedforwardStrategy::TransferFunction,
            FeedforwardModel::Disturbance,
            &sc,
            5.0,
            &disturbance_state,
            dt,
        );

        assert!(lead > target, "process model should overshoot: {} <= {}", lead, target);
        assert!(lag > 0.0 && lag < target, "disturbance model should lag: {}", lag);
    }

    #[test]
    fn test_degenerate_filter_falls_back_to_static_gain() {
        let sc = SystemConstants {
            t3: f64::NAN,
            ..constants()
        };
        assert!(feedforward_filter(&sc, FeedforwardModel::Disturbance).is_err());

        let mut state = vec![0.5];
        for _ in 0..3 {
            let (u, next) = disturbance_feedforward(
                FeedforwardStrategy::TransferFunction,
                FeedforwardModel::Disturbance,
                &sc,
                2.0,
                &state,
                0.1,
            );
            assert_relative_eq!(u, sc.feedforward_gain() * 2.0, epsilon = 1e-12);
            assert!(next.is_empty());
            state = next;
        }
    }

    #[test]
    fn test_reference_feedforward_holds_level() {
        let tank = TankParams::default();
        let u = reference_feedforward(&tank, 0.25);
        let inflow = crate::utils::constants::output_to_inflow(u);
        assert_relative_eq!(inflow, outflow_at(tank.outlet_area, 0.25), epsilon = 1e-15);
        assert!(u > 0.0 && u < 100.0);
    }
}

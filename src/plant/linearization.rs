//! Linearized system constants of the two-tank process
//!
//! Around an operating point `h0`, Torricelli's outflow is approximated by
//! its tangent, `q ≈ q0 + c (h - h0)` with conductance
//! `c = a sqrt(2g) / (2 sqrt(h0))`. Each tank then behaves as a first-order
//! lag with resistance `R = 1/c` and time constant `T = A R`:
//!
//! ```text
//! Gp(s) = H2(s)/U(s) = k1 k2 / ((t1 s + 1)(t2 s + 1))   [m per %]
//! Gd(s) = H2(s)/D(s) = k3 / (t3 s + 1)                  [m per L/min]
//! ```
//!
//! The operating point is the steady state with tank 2 at the setpoint and
//! no disturbance, so both constants move with the setpoint.

use serde::{Deserialize, Serialize};

use super::tank::{outflow_at, TankParams};
use crate::utils::constants::{max_inflow, GRAVITY, LPM_TO_M3S, MIN_LEVEL};

/// Gains and time constants of the linearized two-tank process
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SystemConstants {
    /// Controller output (%) to tank 1 level (m)
    pub k1: f64,
    /// Tank 1 level to tank 2 level
    pub k2: f64,
    /// Disturbance pump flow (L/min) to tank 2 level (m), negative
    pub k3: f64,
    /// Tank 1 time constant (s)
    pub t1: f64,
    /// Tank 2 time constant (s)
    pub t2: f64,
    /// Disturbance path time constant (s)
    pub t3: f64,
}

/// Linearized outlet conductance `dq/dh` at `height` (m²/s)
pub fn conductance(outlet_area: f64, height: f64) -> f64 {
    outlet_area * (2.0 * GRAVITY).sqrt() / (2.0 * height.max(MIN_LEVEL).sqrt())
}

impl SystemConstants {
    /// Linearize both tanks around the steady state that holds tank 2 at `setpoint`
    pub fn at_setpoint(tank1: &TankParams, tank2: &TankParams, setpoint: f64) -> Self {
        let h2 = setpoint.max(MIN_LEVEL);
        let flow = outflow_at(tank2.outlet_area, h2);
        let h1 = tank1.equilibrium_height(flow).max(MIN_LEVEL);
        Self::at_levels(tank1, tank2, h1, h2)
    }

    /// Linearize around explicit operating levels
    pub fn at_levels(tank1: &TankParams, tank2: &TankParams, h1: f64, h2: f64) -> Self {
        let r1 = 1.0 / conductance(tank1.outlet_area, h1);
        let r2 = 1.0 / conductance(tank2.outlet_area, h2);
        let t2 = tank2.area * r2;

        Self {
            k1: r1 * max_inflow() / 100.0,
            k2: r2 / r1,
            k3: -r2 * LPM_TO_M3S,
            t1: tank1.area * r1,
            t2,
            t3: t2,
        }
    }

    /// Static gain of the process path, `Gp(0)` (m per %)
    pub fn process_gain(&self) -> f64 {
        self.k1 * self.k2
    }

    /// Static feedforward gain `-Gd(0)/Gp(0)` (% per L/min)
    ///
    /// Returns 0 when the constants are degenerate.
    pub fn feedforward_gain(&self) -> f64 {
        let gain = -self.k3 / self.process_gain();
        if gain.is_finite() {
            gain
        } else {
            0.0
        }
    }
}

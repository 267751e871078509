//! Gravity-drained tank model
//!
//! Outflow follows Torricelli's law, `q = a * sqrt(2 g h)`, and the level
//! obeys the mass balance `A dh/dt = q_in - q_out`, integrated with a
//! forward Euler step.
//!
//! The level under the orifice is floored at [`MIN_LEVEL`], so an empty
//! tank still reports a small outflow. Flow passed on to another tank goes
//! through [`TankParams::drainable_outflow`], which caps it at the liquid
//! actually available during the step.

use serde::{Deserialize, Serialize};

use crate::utils::constants::{GRAVITY, MIN_LEVEL};

/// Geometry and level of one tank
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TankParams {
    /// Cross-sectional area (m²)
    pub area: f64,
    /// Current liquid level (m), kept in `[0, max_height]`
    pub height: f64,
    /// Physical ceiling (m)
    pub max_height: f64,
    /// Effective drain orifice area (m²)
    pub outlet_area: f64,
}

impl TankParams {
    /// Create an empty tank
    pub fn new(area: f64, max_height: f64, outlet_area: f64) -> Self {
        Self {
            area,
            height: 0.0,
            max_height,
            outlet_area,
        }
    }

    /// Same tank filled to `height`, clamped to the physical range
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height.clamp(0.0, self.max_height);
        self
    }

    /// Level as a percentage of `max_height`, for display
    pub fn level_percent(&self) -> f64 {
        if self.max_height > 0.0 {
            self.height / self.max_height * 100.0
        } else {
            0.0
        }
    }

    /// Outflow through the drain orifice (m³/s)
    pub fn outflow(&self) -> f64 {
        outflow_at(self.outlet_area, self.height)
    }

    /// Outflow over a step of `dt` seconds, limited to the stored volume
    /// plus what `inflow` delivers in the same step (m³/s)
    pub fn drainable_outflow(&self, inflow: f64, dt: f64) -> f64 {
        let available = self.height.max(0.0) * self.area / dt + inflow.max(0.0);
        self.outflow().min(available)
    }

    /// Steady-state level at which the outflow equals `flow` (m)
    pub fn equilibrium_height(&self, flow: f64) -> f64 {
        if self.outlet_area <= 0.0 || flow <= 0.0 {
            return 0.0;
        }
        let velocity = flow / self.outlet_area;
        velocity * velocity / (2.0 * GRAVITY)
    }

    /// Advance the level by one Euler step and return the new tank
    pub fn integrate(&self, inflow: f64, outflow: f64, dt: f64) -> Self {
        Self {
            height: integrate_level(self, inflow, outflow, dt),
            ..*self
        }
    }
}

impl Default for TankParams {
    /// 100 cm² tank, 50 cm tall, 1 cm² outlet, empty
    fn default() -> Self {
        Self::new(0.01, 0.5, 0.0001)
    }
}

/// Torricelli outflow for an orifice of `outlet_area` under `height` of liquid
///
/// The level is floored at [`MIN_LEVEL`], so the result is finite and
/// non-negative for any input level.
#[inline]
pub fn outflow_at(outlet_area: f64, height: f64) -> f64 {
    outlet_area.max(0.0) * (2.0 * GRAVITY * height.max(MIN_LEVEL)).sqrt()
}

/// Outflow of `tank` (m³/s)
#[inline]
pub fn outflow(tank: &TankParams) -> f64 {
    tank.outflow()
}

/// Euler step of the mass balance, clamped to `[0, max_height]`
pub fn integrate_level(tank: &TankParams, inflow: f64, outflow: f64, dt: f64) -> f64 {
    let rate = (inflow - outflow) / tank.area;
    (tank.height + rate * dt).clamp(0.0, tank.max_height)
}

//! Physical model of the two gravity-drained tanks

pub mod linearization;
pub mod tank;

pub use linearization::{conductance, SystemConstants};
pub use tank::{integrate_level, outflow, outflow_at, TankParams};

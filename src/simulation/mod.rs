//! Simulation state, the per-tick step and parameter merging

pub mod state;
pub mod step;
pub mod update;

pub use state::SimulationState;
pub use step::{control_output, reset_controller_memory, step};
pub use update::{ParameterUpdate, TankUpdate};

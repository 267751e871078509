//! tanksim - Two-tank liquid-level process simulator
//!
//! Numerical core of an educational simulator for two gravity-drained tanks
//! in series. An inlet valve feeds tank 1, tank 1 drains into tank 2, and a
//! disturbance pump drains tank 2. The level of tank 2 is controlled by a
//! MANUAL, PI, PID or PID-with-feedforward controller.
//!
//! # Architecture
//!
//! - [`SimulationState`] is a plain value. [`step`] takes a state and
//!   returns the next one; nothing is mutated in place.
//! - Noise is drawn from an injectable [`UniformSource`], so runs are
//!   reproducible under test.
//! - [`DataRecorder`] keeps the full history for CSV export, while
//!   [`TrendWindow`] keeps a bounded window for live charts.
//! - [`Session`] drives ticks, edits and recording for a front end.
//!
//! # Example
//!
//! ```rust
//! use tanksim::prelude::*;
//!
//! let mut state = SimulationState::initial().started();
//! let mut noise = RngSource::new(Some(42));
//! let mut recorder = DataRecorder::new();
//!
//! for _ in 0..100 {
//!     state = step(&state, SIM_TIMESTEP, &mut noise);
//!     recorder.add_data_point(&state);
//! }
//!
//! assert_eq!(recorder.data_point_count(), 100);
//! assert!(state.tank1.height > 0.0);
//! ```

pub mod config;
pub mod control;
pub mod error;
pub mod noise;
pub mod plant;
pub mod recorder;
pub mod scenarios;
pub mod session;
pub mod simulation;
pub mod utils;

pub use config::SimulationConfig;
pub use control::{compute_control, ControlStrategy, ControllerParams, FeedforwardModel, FeedforwardStrategy, InputType};
pub use error::{Error, Result};
pub use noise::{add_noise_to_inflow, RngSource, UniformSource};
pub use plant::{SystemConstants, TankParams};
pub use recorder::{parse_csv, DataRecorder, SimulationDataPoint, TrendWindow};
pub use scenarios::{find_scenario, scenarios, Scenario};
pub use session::Session;
pub use simulation::{control_output, reset_controller_memory, step, ParameterUpdate, SimulationState};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::control::*;
    pub use crate::error::{Error, Result};
    pub use crate::noise::{RngSource, UniformSource};
    pub use crate::plant::*;
    pub use crate::recorder::*;
    pub use crate::session::Session;
    pub use crate::simulation::*;
    pub use crate::utils::constants::*;
}

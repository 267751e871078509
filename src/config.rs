//! Run configuration loaded from JSON
//!
//! Every field is optional:
//!
//! ```json
//! {
//!   "time_step": 0.1,
//!   "duration": 120.0,
//!   "seed": 42,
//!   "scenario": "Disturbance Rejection",
//!   "overrides": { "control_strategy": "PID_FEEDFORWARD", "enable_noise": true },
//!   "output": "run.csv"
//! }
//! ```
//!
//! The scenario is applied first, then `overrides` on top of it.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::session::Session;
use crate::simulation::ParameterUpdate;
use crate::utils::constants::SIM_TIMESTEP;

fn default_time_step() -> f64 {
    SIM_TIMESTEP
}

fn default_duration() -> f64 {
    60.0
}

/// Settings for one batch run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    /// Seconds of simulated time per tick
    #[serde(default = "default_time_step")]
    pub time_step: f64,
    /// Seconds of simulated time to run
    #[serde(default = "default_duration")]
    pub duration: f64,
    /// Noise seed; entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub scenario: Option<String>,
    #[serde(default)]
    pub overrides: ParameterUpdate,
    /// CSV destination
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_step: default_time_step(),
            duration: default_duration(),
            seed: None,
            scenario: None,
            overrides: ParameterUpdate::default(),
            output: None,
        }
    }
}

impl SimulationConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        debug!("loading configuration from {}", path.as_ref().display());
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    fn validate(&self) -> Result<()> {
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return Err(Error::InvalidParameter {
                name: "time_step",
                value: self.time_step,
                reason: "must be positive",
            });
        }
        if !(self.duration.is_finite() && self.duration >= 0.0) {
            return Err(Error::InvalidParameter {
                name: "duration",
                value: self.duration,
                reason: "must not be negative",
            });
        }
        Ok(())
    }

    /// Session configured and started, ready to tick
    pub fn build_session(&self) -> Result<Session> {
        self.validate()?;
        let mut session = Session::seeded(self.seed).with_time_step(self.time_step);
        if let Some(name) = &self.scenario {
            session.apply_scenario(name)?;
        }
        session.update(&self.overrides)?;
        session.start();
        Ok(session)
    }
}

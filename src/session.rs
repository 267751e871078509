//! Session driver tying state, noise source and recorders together
//!
//! A [`Session`] is what an interactive front end holds: it serializes
//! ticks and edits against one [`SimulationState`], records every advanced
//! tick in a [`DataRecorder`] and keeps a short [`TrendWindow`] for live
//! charts.

use std::path::Path;

use log::{debug, info};

use crate::error::Result;
use crate::noise::{RngSource, UniformSource};
use crate::recorder::{DataRecorder, TrendWindow};
use crate::scenarios::find_scenario;
use crate::simulation::{self, ParameterUpdate, SimulationState};
use crate::utils::constants::SIM_TIMESTEP;

/// Samples kept by the live trend (60 s at the default time step)
pub const TREND_CAPACITY: usize = 600;

/// One simulation run with its recordings
#[derive(Debug, Clone)]
pub struct Session<S: UniformSource = RngSource> {
    state: SimulationState,
    source: S,
    dt: f64,
    recorder: DataRecorder,
    trend: TrendWindow<TREND_CAPACITY>,
}

impl Session<RngSource> {
    /// Session on the default state with an optionally seeded noise source
    pub fn seeded(seed: Option<u64>) -> Self {
        Self::new(SimulationState::initial(), RngSource::new(seed))
    }
}

impl<S: UniformSource> Session<S> {
    pub fn new(state: SimulationState, source: S) -> Self {
        Self {
            state,
            source,
            dt: SIM_TIMESTEP,
            recorder: DataRecorder::new(),
            trend: TrendWindow::new(),
        }
    }

    /// Use `dt` seconds per tick; non-positive values are ignored
    pub fn with_time_step(mut self, dt: f64) -> Self {
        if dt > 0.0 && dt.is_finite() {
            self.dt = dt;
        }
        self
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn time_step(&self) -> f64 {
        self.dt
    }

    pub fn recorder(&self) -> &DataRecorder {
        &self.recorder
    }

    pub fn recorder_mut(&mut self) -> &mut DataRecorder {
        &mut self.recorder
    }

    pub fn trend(&self) -> &TrendWindow<TREND_CAPACITY> {
        &self.trend
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running
    }

    pub fn start(&mut self) {
        info!("simulation started at t={:.2}", self.state.time);
        self.state = self.state.started();
    }

    pub fn stop(&mut self) {
        info!("simulation stopped at t={:.2}", self.state.time);
        self.state = self.state.stopped();
    }

    /// Back to the default state; recordings are discarded
    pub fn reset(&mut self) {
        debug!("session reset");
        self.state = SimulationState::initial();
        self.recorder.clear_data();
        self.trend.clear();
    }

    /// Merge a parameter edit; the state is unchanged on error
    pub fn update(&mut self, update: &ParameterUpdate) -> Result<()> {
        self.state = update.apply(&self.state)?;
        Ok(())
    }

    /// Apply the scenario named `name`
    pub fn apply_scenario(&mut self, name: &str) -> Result<()> {
        let scenario = find_scenario(name)?;
        self.state = scenario.apply(&self.state)?;
        info!("scenario '{}' loaded", scenario.name);
        Ok(())
    }

    /// Advance one tick; returns false when the session is stopped
    pub fn tick(&mut self) -> bool {
        if !self.state.is_running {
            return false;
        }

        self.state = simulation::step(&self.state, self.dt, &mut self.source);
        self.recorder.add_data_point(&self.state);
        self.trend.push(&self.state);
        true
    }

    /// Run for `duration` seconds of simulated time, returns the tick count
    pub fn run_for(&mut self, duration: f64) -> usize {
        let ticks = (duration / self.dt).round().max(0.0) as usize;
        (0..ticks).take_while(|_| self.tick()).count()
    }

    pub fn export_csv(&self) -> String {
        self.recorder.export_to_csv()
    }

    pub fn save_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.recorder.save(path)
    }
}
